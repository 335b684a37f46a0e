use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

/// Lets each user run at most one copy of a command at a time.
#[derive(Clone, Debug, Default)]
pub(crate) struct InFlight {
    running: Arc<Mutex<HashSet<(&'static str, u64)>>>,
}

/// Held for as long as a command runs. Dropping it frees the slot.
#[derive(Debug)]
pub(crate) struct InFlightGuard {
    key: (&'static str, u64),
    running: Arc<Mutex<HashSet<(&'static str, u64)>>>,
}

pub(crate) const BUSY_MESSAGE: &str =
    "You are already using this command, please wait until it has finished.";

impl InFlight {
    /// Claims `command` for `user_id`, or `None` if it is already running.
    pub(crate) fn acquire(&self, command: &'static str, user_id: u64) -> Option<InFlightGuard> {
        let key = (command, user_id);
        let mut running = self.running.lock().unwrap_or_else(|e| e.into_inner());
        if !running.insert(key) {
            log::debug!("User {} is already running {}", user_id, command);
            return None;
        }
        Some(InFlightGuard {
            key,
            running: self.running.clone(),
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.running
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.key);
    }
}
