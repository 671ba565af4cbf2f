/*
[INPUT]:  Authenticated client and "my tasks" paging
[OUTPUT]: Aggregate counts of active/ended processes and the user's tasks
[POS]:    Statistics - summary shown on the statistics screen
[UPDATE]: When adding new counters
*/

use serde::Serialize;
use wfe_mobile_adapter::{AuthenticatedClient, ExecutionStatus, Result};

use crate::config::MyTasksConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Statistics {
    pub active_count: usize,
    pub ended_count: usize,
    pub task_count: usize,
}

impl Statistics {
    /// Server-side status queries for both process counts plus the task list
    pub async fn fetch(client: &AuthenticatedClient, paging: MyTasksConfig) -> Result<Self> {
        let (active, ended, tasks) = tokio::try_join!(
            client.list_process_instances(Some(ExecutionStatus::Active)),
            client.list_process_instances(Some(ExecutionStatus::Ended)),
            client.list_my_tasks(paging.page, paging.page_size),
        )?;

        Ok(Self {
            active_count: active.len(),
            ended_count: ended.len(),
            task_count: tasks.len(),
        })
    }

    /// Labelled series for bar/pie charts
    pub fn series(&self) -> [(&'static str, usize); 3] {
        [
            ("Active", self.active_count),
            ("Ended", self.ended_count),
            ("My tasks", self.task_count),
        ]
    }

    /// Percentage of a value within the series, 0 when everything is empty
    pub fn share(&self, value: usize) -> f64 {
        let total = self.active_count + self.ended_count + self.task_count;
        if total == 0 {
            0.0
        } else {
            value as f64 * 100.0 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wfe_mobile_adapter::{ClientConfig, WfeClient};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_counts_each_collection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/process/instances"))
            .and(query_param("status", "ACTIVE"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 1}, {"id": 2}, {"id": 3}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/process/instances"))
            .and(query_param("status", "ENDED"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{"id": 4}])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/task/my"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": [{"id": 10}, {"id": 11}]
            })))
            .mount(&server)
            .await;

        let client = WfeClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
            .unwrap()
            .authenticated("token");
        let stats = Statistics::fetch(&client, MyTasksConfig::default()).await.unwrap();

        assert_eq!(
            stats,
            Statistics {
                active_count: 3,
                ended_count: 1,
                task_count: 2
            }
        );
        assert_eq!(stats.series()[2], ("My tasks", 2));
    }

    #[test]
    fn test_share_of_empty_statistics() {
        let stats = Statistics::default();
        assert_eq!(stats.share(0), 0.0);
    }

    #[test]
    fn test_share_percentage() {
        let stats = Statistics {
            active_count: 1,
            ended_count: 1,
            task_count: 2,
        };
        assert_eq!(stats.share(stats.task_count), 50.0);
    }
}
