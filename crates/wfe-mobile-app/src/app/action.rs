/*
[INPUT]:  User-triggered operations on the orchestrator
[OUTPUT]: Action identities and in-flight guards
[POS]:    Orchestration layer - duplicate-submission protection
[UPDATE]: When adding orchestrator operations that hit the network
*/

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use crate::error::AppError;

/// A network-bound user action, keyed at the granularity duplicates are refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Login,
    RefreshProcesses,
    LoadTasks(i64),
    StartProcess(i64),
    CompleteTask(i64),
    DelegateTask(i64),
    OpenTaskForm(i64),
    RefreshMyTasks,
    LoadStatistics,
    LoadProfile,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Login => write!(f, "login"),
            Action::RefreshProcesses => write!(f, "loading processes"),
            Action::LoadTasks(id) => write!(f, "loading tasks of process {id}"),
            Action::StartProcess(id) => write!(f, "starting process {id}"),
            Action::CompleteTask(id) => write!(f, "completing task {id}"),
            Action::DelegateTask(id) => write!(f, "delegating task {id}"),
            Action::OpenTaskForm(id) => write!(f, "loading form of task {id}"),
            Action::RefreshMyTasks => write!(f, "loading my tasks"),
            Action::LoadStatistics => write!(f, "loading statistics"),
            Action::LoadProfile => write!(f, "loading profile"),
        }
    }
}

#[derive(Debug, Default)]
struct Registry {
    next_ticket: u64,
    pending: HashMap<Action, u64>,
}

/// Set of actions currently awaiting the server
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    registry: Arc<Mutex<Registry>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `action` pending, or refuse if it already is
    pub fn begin(&self, action: Action) -> Result<InFlightGuard, AppError> {
        let mut registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        if registry.pending.contains_key(&action) {
            return Err(AppError::InFlight(action));
        }
        registry.next_ticket += 1;
        let ticket = registry.next_ticket;
        registry.pending.insert(action, ticket);
        Ok(InFlightGuard {
            registry: Arc::clone(&self.registry),
            action,
            ticket,
        })
    }

    pub fn contains(&self, action: Action) -> bool {
        let registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        registry.pending.contains_key(&action)
    }

    pub fn is_empty(&self) -> bool {
        let registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        registry.pending.is_empty()
    }

    /// Forget every pending action; outstanding guards become no-ops
    pub fn clear(&self) {
        let mut registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        registry.pending.clear();
    }
}

/// Releases its action on drop
#[derive(Debug)]
pub struct InFlightGuard {
    registry: Arc<Mutex<Registry>>,
    action: Action,
    ticket: u64,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        // A guard from before `clear` must not release a newer marker.
        if registry.pending.get(&self.action) == Some(&self.ticket) {
            registry.pending.remove(&self.action);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_action_refused() {
        let in_flight = InFlight::new();
        let _guard = in_flight.begin(Action::CompleteTask(7)).unwrap();

        let err = in_flight.begin(Action::CompleteTask(7)).unwrap_err();
        assert!(matches!(err, AppError::InFlight(Action::CompleteTask(7))));
        assert!(in_flight.begin(Action::CompleteTask(8)).is_ok());
    }

    #[test]
    fn test_guard_drop_releases_action() {
        let in_flight = InFlight::new();
        {
            let _guard = in_flight.begin(Action::StartProcess(44)).unwrap();
            assert!(in_flight.contains(Action::StartProcess(44)));
        }
        assert!(!in_flight.contains(Action::StartProcess(44)));
        assert!(in_flight.is_empty());
    }

    #[test]
    fn test_stale_guard_does_not_release_newer_marker() {
        let in_flight = InFlight::new();
        let stale = in_flight.begin(Action::RefreshMyTasks).unwrap();
        in_flight.clear();

        let _fresh = in_flight.begin(Action::RefreshMyTasks).unwrap();
        drop(stale);
        assert!(in_flight.contains(Action::RefreshMyTasks));
    }
}
