//! Panes that asked to receive telemetry-driven updates.
//!
//! Telemetry carries a conversation id but no pane identity, so every
//! classified event is broadcast to all registered panes. A registration's
//! `conversation_id` is kept for diagnostics only.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tmux_stat_core::state::session_key;

/// Registrations not refreshed for this long are pruned by the watchdog.
pub const STALE_REGISTRATION_SECS: i64 = 600; // 10 minutes

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Raw tmux pane id (`%3`), used for tmux lookups and store writes.
    pub pane_id: String,
    pub conversation_id: Option<String>,
    pub registered_at: i64,
    /// Last register call or telemetry fan-out to this pane.
    pub last_seen: i64,
}

#[derive(Debug, Default)]
pub struct RegistrationTable {
    entries: Mutex<HashMap<String, Registration>>,
}

impl RegistrationTable {
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Registration>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds or refreshes a pane. Returns the key the pane is stored under.
    pub fn register(
        &self,
        pane_id: &str,
        conversation_id: Option<String>,
        now: i64,
    ) -> tmux_stat_core::Result<String> {
        let key = session_key(pane_id)?;
        let mut entries = self.lock();
        let registered_at = entries.get(&key).map_or(now, |e| e.registered_at);
        entries.insert(
            key.clone(),
            Registration {
                pane_id: pane_id.to_string(),
                conversation_id: conversation_id.filter(|c| !c.is_empty()),
                registered_at,
                last_seen: now,
            },
        );
        Ok(key)
    }

    /// Removes a pane. Returns whether it was registered.
    pub fn unregister(&self, pane_id: &str) -> bool {
        match session_key(pane_id) {
            Ok(key) => self.lock().remove(&key).is_some(),
            Err(_) => false,
        }
    }

    /// Pane ids registered right now, sorted for stable fan-out order.
    pub fn snapshot(&self) -> Vec<String> {
        let mut panes: Vec<String> = self.lock().values().map(|e| e.pane_id.clone()).collect();
        panes.sort();
        panes
    }

    pub fn touch(&self, pane_id: &str, now: i64) {
        let Ok(key) = session_key(pane_id) else {
            return;
        };
        if let Some(entry) = self.lock().get_mut(&key) {
            entry.last_seen = entry.last_seen.max(now);
        }
    }

    /// Drops registrations unseen for longer than `max_age_secs`.
    pub fn prune_stale(&self, now: i64, max_age_secs: i64) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, e| now - e.last_seen <= max_age_secs);
        before - entries.len()
    }

    #[cfg(test)]
    pub fn get(&self, pane_id: &str) -> Option<Registration> {
        let key = session_key(pane_id).ok()?;
        self.lock().get(&key).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
