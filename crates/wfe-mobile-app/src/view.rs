/*
[INPUT]:  ViewState
[OUTPUT]: Display-ready process and task rows
[POS]:    Presentation data - what every renderer prints
[UPDATE]: When screens show new fields or placeholder texts change
*/

use chrono::{DateTime, Utc};
use serde::Serialize;
use wfe_mobile_adapter::Task;

use crate::app::state::{TrackedProcess, ViewState};

const UNKNOWN_PROCESS: &str = "Unknown process";
const NO_STATUS: &str = "N/A";
const NO_DATE: &str = "Date not specified";
const UNTITLED: &str = "Untitled";
const UNASSIGNED: &str = "Unassigned";

/// `01 January 2024, 10:00`
const TIMESTAMP_FORMAT: &str = "%d %B %Y, %H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessView {
    pub id: i64,
    pub badge: String,
    pub title: String,
    pub status: String,
    pub started: String,
    /// Only set for ended processes
    pub completed: Option<String>,
    pub expanded: bool,
    pub loading_tasks: bool,
    pub starting: bool,
    /// Empty while collapsed
    pub tasks: Vec<TaskView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskView {
    pub id: i64,
    /// 1-based position in its list
    pub position: usize,
    pub name: String,
    pub owner: String,
    pub state: String,
    pub process_name: Option<String>,
}

pub fn format_timestamp(value: Option<&DateTime<Utc>>) -> String {
    value
        .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| NO_DATE.to_string())
}

impl ProcessView {
    pub fn from_tracked(process: &TrackedProcess) -> Self {
        let data = process.data.as_ref();
        let ended = data.is_some_and(|d| d.is_ended());

        Self {
            id: process.id,
            badge: process
                .label
                .clone()
                .unwrap_or_else(|| format!("#{}", process.id)),
            title: data
                .and_then(|d| d.definition_name.clone())
                .unwrap_or_else(|| UNKNOWN_PROCESS.to_string()),
            status: data
                .and_then(|d| d.execution_status.as_ref())
                .map(|s| s.to_string())
                .unwrap_or_else(|| NO_STATUS.to_string()),
            started: format_timestamp(data.and_then(|d| d.start_date.as_ref())),
            completed: ended.then(|| format_timestamp(data.and_then(|d| d.end_date.as_ref()))),
            expanded: process.expanded,
            loading_tasks: process.loading_tasks,
            starting: process.starting,
            tasks: if process.expanded {
                task_views(&process.tasks)
            } else {
                Vec::new()
            },
        }
    }
}

impl TaskView {
    pub fn from_task(position: usize, task: &Task) -> Self {
        Self {
            id: task.id,
            position,
            name: task.name.clone().unwrap_or_else(|| UNTITLED.to_string()),
            owner: task
                .owner
                .as_ref()
                .and_then(|o| o.full_name.clone())
                .unwrap_or_else(|| UNASSIGNED.to_string()),
            state: task.state.clone().unwrap_or_default(),
            process_name: task.process_name.clone(),
        }
    }
}

pub fn task_views(tasks: &[Task]) -> Vec<TaskView> {
    tasks
        .iter()
        .enumerate()
        .map(|(i, task)| TaskView::from_task(i + 1, task))
        .collect()
}

impl ViewState {
    /// Rows for the current process tab
    pub fn visible_processes(&self) -> Vec<ProcessView> {
        self.filtered_processes().map(ProcessView::from_tracked).collect()
    }

    pub fn my_task_views(&self) -> Vec<TaskView> {
        task_views(&self.my_tasks)
    }
}
