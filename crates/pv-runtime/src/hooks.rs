//! Named host callbacks fired as the runner enters and leaves nodes.

use std::collections::HashMap;
use std::fmt;

use pv_core::NodeId;

/// Whether a hook fires on entering or leaving a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPhase {
    /// The node is being entered.
    Activated,
    /// The node is being left.
    Deactivated,
}

/// What a hook handler is told about the firing.
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
    /// The hook name as referenced by the node.
    pub hook: &'a str,
    /// The node that referenced it.
    pub node: NodeId,
    /// Entering or leaving.
    pub phase: HookPhase,
}

/// A host callback.
pub type HookFn = Box<dyn FnMut(&HookContext<'_>)>;

/// Outcome of firing a list of hook names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookReport {
    /// Names that had at least one handler, in firing order.
    pub fired: Vec<String>,
    /// Names with no handler bound.
    pub unbound: Vec<String>,
}

/// Binds hook names to host callbacks.
///
/// Several handlers may share a name; they run in the order they were bound.
#[derive(Default)]
pub struct HookRegistry {
    handlers: HashMap<String, Vec<HookFn>>,
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("HookRegistry").field("hooks", &names).finish()
    }
}

impl HookRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a handler to `name`.
    pub fn bind<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: FnMut(&HookContext<'_>) + 'static,
    {
        self.handlers
            .entry(name.into())
            .or_default()
            .push(Box::new(handler));
    }

    /// Remove every handler bound to `name`. Returns false if there were none.
    pub fn unbind(&mut self, name: &str) -> bool {
        self.handlers.remove(name).is_some()
    }

    /// Returns true if at least one handler is bound to `name`.
    pub fn is_bound(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Fire each name in order, synchronously.
    pub fn fire<S: AsRef<str>>(&mut self, names: &[S], node: NodeId, phase: HookPhase) -> HookReport {
        let mut report = HookReport::default();
        for name in names {
            let name = name.as_ref();
            match self.handlers.get_mut(name) {
                Some(handlers) => {
                    let ctx = HookContext {
                        hook: name,
                        node,
                        phase,
                    };
                    for handler in handlers.iter_mut() {
                        handler(&ctx);
                    }
                    report.fired.push(name.to_string());
                }
                None => {
                    tracing::debug!(hook = name, %node, "no handler bound");
                    report.unbound.push(name.to_string());
                }
            }
        }
        report
    }
}
