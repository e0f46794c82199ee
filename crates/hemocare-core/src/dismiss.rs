//! Outside-click dismissal for the patient search dropdown.
//!
//! The host forwards every global pointer-down together with its hit test
//! against the search control. Listeners are held in a registry and stay
//! subscribed only while the returned [`DismissScope`] is alive, so a torn
//! down form can never leave a dangling listener behind.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// A pointer-down listener. The argument is the host's hit test: `true`
/// when the event landed inside the search control's bounding region.
pub type PointerListener = Arc<dyn Fn(bool) + Send + Sync>;

/// Registry of global pointer-down listeners.
pub struct PointerBus {
    next_token: AtomicU64,
    listeners: Mutex<HashMap<u64, PointerListener>>,
}

impl PointerBus {
    /// Create an empty bus.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next_token: AtomicU64::new(1),
            listeners: Mutex::new(HashMap::new()),
        })
    }

    /// Subscribe a listener. It stays registered until the returned scope
    /// is dropped.
    pub fn subscribe(self: &Arc<Self>, listener: PointerListener) -> DismissScope {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.insert(token, listener);
        }
        DismissScope {
            bus: Arc::clone(self),
            token,
        }
    }

    /// Fan a pointer-down event out to every listener.
    pub fn pointer_down(&self, inside_search: bool) {
        // Snapshot first so a listener may subscribe/unsubscribe re-entrantly.
        let snapshot: Vec<PointerListener> = match self.listeners.lock() {
            Ok(listeners) => listeners.values().cloned().collect(),
            Err(_) => return,
        };
        for listener in snapshot {
            listener(inside_search);
        }
    }

    /// How many listeners are currently registered.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().map(|l| l.len()).unwrap_or(0)
    }

    fn unsubscribe(&self, token: u64) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.remove(&token);
        }
    }
}

/// RAII handle for a registered listener. Dropping it removes the listener
/// from the bus regardless of exit path.
pub struct DismissScope {
    bus: Arc<PointerBus>,
    token: u64,
}

impl Drop for DismissScope {
    fn drop(&mut self) {
        self.bus.unsubscribe(self.token);
    }
}
