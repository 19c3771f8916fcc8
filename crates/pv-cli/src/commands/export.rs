use std::path::Path;

use pv_core::export;

pub fn run(path: &Path, format: &str, output: Option<&Path>) -> Result<(), String> {
    let graph = super::load(path)?;

    let content = match format {
        "json" => graph
            .to_json()
            .map_err(|e| format!("JSON serialization error: {e}"))?,
        "dot" | "graphviz" => export::to_dot(&graph),
        "markdown" | "md" => export::to_markdown(&graph),
        _ => {
            return Err(format!(
                "unsupported format: \"{format}\". Use: json, dot, markdown"
            ));
        }
    };

    if let Some(out) = output {
        std::fs::write(out, &content)
            .map_err(|e| format!("cannot write to {}: {e}", out.display()))?;
        println!("  Exported to {}", out.display());
    } else {
        print!("{content}");
    }

    Ok(())
}
