/*
[INPUT]:  Task ids, paging parameters, form variables and a bound bearer token
[OUTPUT]: Task lists, task variable sets, completion and delegation results
[POS]:    HTTP layer - task endpoints (require bearer token)
[UPDATE]: When adding task endpoints or changing request bodies
*/

// ### Task Endpoints

use reqwest::Method;
use tracing::info;

use crate::http::{AuthenticatedClient, Result};
use crate::types::{
    CompleteTaskRequest, Executor, MyTasksRequest, Task, TaskDetail, TaskPage, TaskVariables,
};

impl AuthenticatedClient {
    /// Tasks of one process
    ///
    /// GET task/process/{process_id}
    pub async fn list_tasks_for_process(&self, process_id: i64) -> Result<Vec<Task>> {
        let endpoint = format!("task/process/{process_id}");
        let builder = self.request(Method::GET, &endpoint)?;
        self.send_list(builder).await
    }

    /// Tasks of the current user; page and size are forwarded verbatim
    ///
    /// POST task/my {page, size}
    pub async fn list_my_tasks(&self, page: u32, size: u32) -> Result<Vec<Task>> {
        let builder = self
            .request(Method::POST, "task/my")?
            .json(&MyTasksRequest { page, size });
        let page: Option<TaskPage> = self.send_optional(builder).await?;
        Ok(page.map(TaskPage::into_tasks).unwrap_or_default())
    }

    /// Editable variables of a task
    ///
    /// GET task/{task_id}
    pub async fn get_task_variables(&self, task_id: i64) -> Result<TaskDetail> {
        let endpoint = format!("task/{task_id}");
        let builder = self.request(Method::GET, &endpoint)?;
        self.send_json(builder).await
    }

    /// Complete a task, optionally submitting form variables
    ///
    /// POST task/{task_id}/complete {parameters?}
    pub async fn complete_task(&self, task_id: i64, variables: Option<TaskVariables>) -> Result<()> {
        let endpoint = format!("task/{task_id}/complete");
        let body = CompleteTaskRequest {
            parameters: variables,
        };
        let builder = self.request(Method::POST, &endpoint)?.json(&body);
        self.send_empty(builder).await?;
        info!(task_id, "task completed");
        Ok(())
    }

    /// Reassign a task
    ///
    /// PATCH task/{task_id}/delegate?currentOwnerName={name}&keepCurrentOwner={bool}
    pub async fn delegate_task(
        &self,
        task_id: i64,
        current_owner_name: &str,
        keep_current_owner: bool,
        new_assignees: &[Executor],
    ) -> Result<()> {
        let endpoint = format!("task/{task_id}/delegate");
        let keep = if keep_current_owner { "true" } else { "false" };
        let builder = self
            .request(Method::PATCH, &endpoint)?
            .query(&[("currentOwnerName", current_owner_name), ("keepCurrentOwner", keep)])
            .json(new_assignees);
        self.send_empty(builder).await?;
        info!(task_id, assignees = new_assignees.len(), "task delegated");
        Ok(())
    }
}
