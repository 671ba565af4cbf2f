/*
[INPUT]:  Process-type ids, status filters and a bound bearer token
[OUTPUT]: Process instances and start confirmations
[POS]:    HTTP layer - process directory endpoints (require bearer token)
[UPDATE]: When adding process endpoints or changing the tracked-process join
*/

// ### Process Endpoints

use futures_util::future::try_join_all;
use reqwest::Method;
use tracing::{debug, info};

use crate::http::{AuthenticatedClient, Result};
use crate::types::{ExecutionStatus, ProcessInstance};

impl AuthenticatedClient {
    /// Fetch one process instance
    ///
    /// GET process/{id}
    pub async fn get_process(&self, id: i64) -> Result<ProcessInstance> {
        let endpoint = format!("process/{id}");
        let builder = self.request(Method::GET, &endpoint)?;
        self.send_json(builder).await
    }

    /// List process instances, optionally filtered by status on the server
    ///
    /// GET process/instances?status={status}
    pub async fn list_process_instances(
        &self,
        status: Option<ExecutionStatus>,
    ) -> Result<Vec<ProcessInstance>> {
        let mut builder = self.request(Method::GET, "process/instances")?;
        if let Some(status) = status {
            builder = builder.query(&[("status", status.as_query_value())]);
        }
        self.send_list(builder).await
    }

    /// Fetch every tracked process concurrently.
    ///
    /// Results come back in `ids` order. The join is all-or-nothing: the
    /// first failure fails the whole call.
    pub async fn list_tracked_processes(&self, ids: &[i64]) -> Result<Vec<ProcessInstance>> {
        debug!(count = ids.len(), "fetching tracked processes");
        try_join_all(ids.iter().map(|&id| self.get_process(id))).await
    }

    /// Start a process
    ///
    /// POST process/{id}/start
    pub async fn start_process(&self, id: i64) -> Result<()> {
        let endpoint = format!("process/{id}/start");
        let builder = self.request(Method::POST, &endpoint)?;
        self.send_empty(builder).await?;
        info!(process_id = id, "process started");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::http::{ClientConfig, WfeClient, WfeError};
    use crate::types::ExecutionStatus;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> crate::http::AuthenticatedClient {
        WfeClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
            .expect("client init")
            .authenticated("token")
    }

    #[tokio::test]
    async fn test_list_tracked_processes_keeps_configured_order() {
        let server = MockServer::start().await;
        for (id, name) in [(44, "Vacation"), (12, "Purchase"), (30, "Onboarding")] {
            Mock::given(method("GET"))
                .and(path(format!("/process/{id}")))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "id": id,
                    "definitionName": name,
                    "executionStatus": "ACTIVE",
                })))
                .expect(1)
                .mount(&server)
                .await;
        }

        let client = client_for(&server);
        let processes = client
            .list_tracked_processes(&[44, 12, 30])
            .await
            .expect("list_tracked_processes failed");

        let ids: Vec<i64> = processes.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![44, 12, 30]);
    }

    #[tokio::test]
    async fn test_list_tracked_processes_fails_if_any_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/process/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 1})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/process/2"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.list_tracked_processes(&[1, 2]).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_list_tracked_processes_with_space_separated_dates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/process/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 1,
                "startDate": "2024-01-01T10:00:00Z",
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/process/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 2,
                "startDate": "2024-01-01 10:00:00",
                "endDate": "sometime",
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let processes = tokio_test::assert_ok!(client.list_tracked_processes(&[1, 2]).await);
        assert_eq!(processes.len(), 2);
        assert_eq!(processes[0].start_date, processes[1].start_date);
        assert!(processes[1].end_date.is_none());
    }

    #[tokio::test]
    async fn test_list_process_instances_empty_answers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/process/instances"))
            .and(query_param("status", "ACTIVE"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/process/instances"))
            .and(query_param("status", "ENDED"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let active = client.list_process_instances(Some(ExecutionStatus::Active)).await;
        let ended = client.list_process_instances(Some(ExecutionStatus::Ended)).await;
        assert!(tokio_test::assert_ok!(active).is_empty());
        assert!(tokio_test::assert_ok!(ended).is_empty());
    }

    #[tokio::test]
    async fn test_list_process_instances_with_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/process/instances"))
            .and(query_param("status", "ENDED"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 3, "executionStatus": "ENDED"},
                {"id": 4, "executionStatus": "ENDED"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let processes = client
            .list_process_instances(Some(ExecutionStatus::Ended))
            .await
            .unwrap();
        assert_eq!(processes.len(), 2);
        assert!(processes.iter().all(|p| p.is_ended()));
    }

    #[tokio::test]
    async fn test_start_process_accepts_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/process/44/start"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.start_process(44).await.expect("start_process failed");
    }

    #[tokio::test]
    async fn test_start_process_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/process/44/start"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.start_process(44).await.unwrap_err();
        assert!(matches!(err, WfeError::RequestFailure { status: Some(403), .. }));
    }
}
