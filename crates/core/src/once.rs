//! One-time initialization keyed by a static identifier.

use std::collections::HashSet;
use std::sync::{Mutex, OnceLock};

#[derive(Debug, Default)]
pub struct InitRegistry {
    done: HashSet<&'static str>,
}

impl InitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `init` the first time `id` is seen. Returns whether it ran.
    pub fn ensure<F: FnOnce()>(&mut self, id: &'static str, init: F) -> bool {
        if !self.done.insert(id) {
            return false;
        }
        init();
        true
    }

    pub fn is_initialized(&self, id: &str) -> bool {
        self.done.contains(id)
    }
}

fn global() -> &'static Mutex<InitRegistry> {
    static GLOBAL: OnceLock<Mutex<InitRegistry>> = OnceLock::new();
    GLOBAL.get_or_init(|| Mutex::new(InitRegistry::new()))
}

/// Process-wide [`InitRegistry::ensure`]. The lock is released before `init`
/// runs.
pub fn ensure_global<F: FnOnce()>(id: &'static str, init: F) -> bool {
    let first = {
        let mut registry = global().lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        registry.done.insert(id)
    };
    if first {
        init();
    }
    first
}
