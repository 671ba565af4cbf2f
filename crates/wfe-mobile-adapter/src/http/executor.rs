/*
[INPUT]:  Executor names and ids with a bound bearer token
[OUTPUT]: Executor records and removal confirmations
[POS]:    HTTP layer - executor endpoints (require bearer token)
[UPDATE]: When adding executor endpoints
*/

// ### Executor Endpoints

use reqwest::Method;

use crate::http::{AuthenticatedClient, Result};
use crate::types::Executor;

impl AuthenticatedClient {
    /// Look executors up by name; no match is an empty list
    ///
    /// GET executor/?name={name}
    pub async fn lookup_executor_by_name(&self, name: &str) -> Result<Vec<Executor>> {
        let builder = self
            .request(Method::GET, "executor/")?
            .query(&[("name", name)]);
        self.send_list(builder).await
    }

    /// Remove executors
    ///
    /// DELETE executor/ [ids]
    pub async fn remove_executors(&self, ids: &[i64]) -> Result<()> {
        let builder = self.request(Method::DELETE, "executor/")?.json(ids);
        self.send_empty(builder).await
    }
}

#[cfg(test)]
mod tests {
    use crate::http::{ClientConfig, WfeClient};
    use rstest::rstest;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_lookup_executor_encodes_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/executor/"))
            .and(query_param("name", "Ivan Petrov & Co"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 1, "name": "ipetrov", "fullName": "Ivan Petrov & Co", "type": "ACTOR"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = WfeClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
            .unwrap()
            .authenticated("token");
        let found = client.lookup_executor_by_name("Ivan Petrov & Co").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "ipetrov");
    }

    #[rstest]
    #[case(ResponseTemplate::new(404))]
    #[case(ResponseTemplate::new(200).set_body_string("null"))]
    #[tokio::test]
    async fn test_lookup_without_match_is_empty(#[case] template: ResponseTemplate) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/executor/"))
            .respond_with(template)
            .expect(1)
            .mount(&server)
            .await;

        let client = WfeClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
            .unwrap()
            .authenticated("token");
        let found = tokio_test::assert_ok!(client.lookup_executor_by_name("nobody").await);
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_remove_executors_sends_ids() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/executor/"))
            .and(body_json(serde_json::json!([3, 4])))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = WfeClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
            .unwrap()
            .authenticated("token");
        client.remove_executors(&[3, 4]).await.unwrap();
    }
}
