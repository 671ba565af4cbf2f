/*
[INPUT]:  Fetched processes, tasks, task variables and user actions
[OUTPUT]: Plain view state consumed by renderers
[POS]:    Orchestration layer - client-side view-state model
[UPDATE]: When the screens need new derived state
*/

use std::collections::BTreeSet;

use wfe_mobile_adapter::{Executor, ProcessInstance, Task, TaskVariable, TaskVariables};

use crate::config::TrackedProcessConfig;
use crate::statistics::Statistics;

/// Which list the main screen shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Active,
    Ended,
    MyTasks,
}

/// Placeholder for a configured process id plus whatever has been fetched for it
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedProcess {
    pub id: i64,
    pub label: Option<String>,
    pub data: Option<ProcessInstance>,
    pub tasks: Vec<Task>,
    /// Set once the task sublist has been fetched; collapsing keeps it
    pub tasks_loaded: bool,
    pub expanded: bool,
    pub loading_tasks: bool,
    pub starting: bool,
}

impl TrackedProcess {
    pub fn placeholder(config: &TrackedProcessConfig) -> Self {
        Self {
            id: config.id,
            label: config.label.clone(),
            data: None,
            tasks: Vec::new(),
            tasks_loaded: false,
            expanded: false,
            loading_tasks: false,
            starting: false,
        }
    }

    /// Client-side status filter behind the active/ended tabs
    pub fn matches_tab(&self, tab: Tab) -> bool {
        match (tab, &self.data) {
            (Tab::Active, Some(data)) => data.is_active(),
            (Tab::Ended, Some(data)) => data.is_ended(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadingFlags {
    pub login: bool,
    pub processes: bool,
    pub my_tasks: bool,
    pub task_form: bool,
    pub statistics: bool,
    pub profile: bool,
    /// Tasks whose completion or delegation is awaiting the server
    pub submitting_tasks: BTreeSet<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Message the presentation layer shows to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: String,
}

/// Completion form built from the variables the server lists for a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub task_id: i64,
    /// Owning tracked process; `None` when opened from "my tasks"
    pub process_id: Option<i64>,
    pub fields: Vec<FormField>,
}

impl TaskForm {
    pub fn new(task_id: i64, process_id: Option<i64>, variables: &[TaskVariable]) -> Self {
        Self {
            task_id,
            process_id,
            fields: variables
                .iter()
                .map(|v| FormField {
                    name: v.name.clone(),
                    value: String::new(),
                })
                .collect(),
        }
    }

    /// Returns false for a name the form does not have
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => {
                field.value = value.into();
                true
            }
            None => false,
        }
    }

    pub fn values(&self) -> TaskVariables {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.value.clone()))
            .collect()
    }
}

/// Everything the screens render
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub display_name: Option<String>,
    pub active_tab: Tab,
    pub processes: Vec<TrackedProcess>,
    pub my_tasks: Vec<Task>,
    pub my_tasks_loaded: bool,
    pub loading: LoadingFlags,
    pub notice: Option<Notice>,
    pub task_form: Option<TaskForm>,
    pub statistics: Option<Statistics>,
    pub profile: Option<Executor>,
    /// Bumped on login/logout so late responses from an old session are dropped
    pub(crate) session_epoch: u64,
}

impl ViewState {
    /// Fresh state for a new session, one placeholder per tracked id
    pub fn for_session(
        display_name: String,
        tracked: &[TrackedProcessConfig],
        session_epoch: u64,
    ) -> Self {
        Self {
            display_name: Some(display_name),
            processes: tracked.iter().map(TrackedProcess::placeholder).collect(),
            session_epoch,
            ..Self::default()
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.display_name.is_some()
    }

    pub fn process(&self, id: i64) -> Option<&TrackedProcess> {
        self.processes.iter().find(|p| p.id == id)
    }

    pub fn process_mut(&mut self, id: i64) -> Option<&mut TrackedProcess> {
        self.processes.iter_mut().find(|p| p.id == id)
    }

    /// Tracked processes passing the current tab's filter
    pub fn filtered_processes(&self) -> impl Iterator<Item = &TrackedProcess> {
        let tab = self.active_tab;
        self.processes.iter().filter(move |p| p.matches_tab(tab))
    }
}
