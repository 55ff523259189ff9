use std::borrow::Cow;

use serde::Deserialize;
use tracing::warn;

use crate::error::DrugInteractError;

const OPENFDA_BASE: &str = "https://api.fda.gov";
const OPENFDA_API: &str = "openfda";
const OPENFDA_BASE_ENV: &str = "DRUGINTERACT_OPENFDA_BASE";
const MAX_SEARCH_LEN: usize = 1024;

pub(crate) struct OpenFdaClient {
    client: reqwest::Client,
    base: Cow<'static, str>,
    api_key: Option<String>,
}

impl OpenFdaClient {
    pub(crate) fn new() -> Result<Self, DrugInteractError> {
        Ok(Self {
            client: crate::sources::shared_client()?,
            base: crate::sources::env_base(OPENFDA_BASE, OPENFDA_BASE_ENV),
            api_key: std::env::var("OPENFDA_API_KEY")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        })
    }

    #[cfg(test)]
    pub(crate) fn new_for_test(
        base: String,
        api_key: Option<String>,
    ) -> Result<Self, DrugInteractError> {
        Ok(Self {
            client: crate::sources::shared_client()?,
            base: Cow::Owned(base),
            api_key: api_key
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base.as_ref().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Total number of FAERS reports matching `search`.
    ///
    /// Only the result-set total is needed, so every request is issued with
    /// `limit=1` and the record payload is ignored. An HTTP 404 (openFDA's
    /// way of reporting an empty match set) or a parseable body without
    /// `meta.results.total` counts as zero; other error statuses and
    /// unparseable bodies propagate.
    pub(crate) async fn event_total(&self, search: &str) -> Result<usize, DrugInteractError> {
        if search.is_empty() {
            return Err(DrugInteractError::InvalidArgument(
                "search expression is required".into(),
            ));
        }
        if search.len() > MAX_SEARCH_LEN {
            return Err(DrugInteractError::InvalidArgument(
                "search expression is too long".into(),
            ));
        }

        let url = self.endpoint("drug/event.json");
        let mut req = self
            .client
            .get(&url)
            .query(&[("search", search), ("limit", "1")]);
        if let Some(key) = self.api_key.as_deref() {
            req = req.query(&[("api_key", key)]);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let bytes = crate::sources::read_limited_body(resp, OPENFDA_API).await?;

        if status.as_u16() == 404 {
            warn!(search, "openFDA matched no reports; counting zero");
            return Ok(0);
        }
        if !status.is_success() {
            let excerpt = crate::sources::body_excerpt(&bytes);
            return Err(DrugInteractError::Api {
                api: OPENFDA_API.to_string(),
                message: format!("HTTP {status}: {excerpt}"),
            });
        }

        let body: EventCountResponse =
            serde_json::from_slice(&bytes).map_err(|source| DrugInteractError::ApiJson {
                api: OPENFDA_API.to_string(),
                source,
            })?;

        match body
            .meta
            .and_then(|meta| meta.results)
            .and_then(|results| results.total)
        {
            Some(total) => Ok(total),
            None => {
                warn!(
                    search,
                    "openFDA response missing meta.results.total; counting zero"
                );
                Ok(0)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct EventCountResponse {
    #[serde(default)]
    meta: Option<EventMeta>,
}

#[derive(Debug, Deserialize)]
struct EventMeta {
    #[serde(default)]
    results: Option<EventMetaResults>,
}

#[derive(Debug, Deserialize)]
struct EventMetaResults {
    #[serde(default)]
    total: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn event_total_reads_meta_results_total() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/drug/event.json"))
            .and(query_param("search", "seriousnessdeath:\"1\""))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "meta": {"results": {"skip": 0, "limit": 1, "total": 42}},
                "results": [{"safetyreportid": "1"}]
            })))
            .mount(&server)
            .await;

        let client = OpenFdaClient::new_for_test(server.uri(), None).unwrap();
        let total = client.event_total("seriousnessdeath:\"1\"").await.unwrap();
        assert_eq!(total, 42);
    }

    #[tokio::test]
    async fn event_total_counts_zero_on_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/drug/event.json"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": {"code": "NOT_FOUND", "message": "No matches found!"}
            })))
            .mount(&server)
            .await;

        let client = OpenFdaClient::new_for_test(server.uri(), None).unwrap();
        let total = client.event_total("seriousnessdeath:\"1\"").await.unwrap();
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn event_total_counts_zero_when_total_field_missing() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/drug/event.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"meta": {"disclaimer": "..."}})),
            )
            .mount(&server)
            .await;

        let client = OpenFdaClient::new_for_test(server.uri(), None).unwrap();
        let total = client.event_total("seriousnessdeath:\"1\"").await.unwrap();
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn event_total_propagates_server_errors() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/drug/event.json"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let client = OpenFdaClient::new_for_test(server.uri(), None).unwrap();
        let err = client
            .event_total("seriousnessdeath:\"1\"")
            .await
            .unwrap_err();
        assert!(matches!(err, DrugInteractError::Api { .. }));
        assert!(err.to_string().contains("upstream exploded"));
    }

    #[tokio::test]
    async fn event_total_rejects_non_json_success_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/drug/event.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let client = OpenFdaClient::new_for_test(server.uri(), None).unwrap();
        let err = client
            .event_total("seriousnessdeath:\"1\"")
            .await
            .unwrap_err();
        assert!(matches!(err, DrugInteractError::ApiJson { .. }));
    }

    #[tokio::test]
    async fn event_total_validates_search_expression() {
        let client = OpenFdaClient::new_for_test("http://127.0.0.1".into(), None).unwrap();

        let err = client.event_total("").await.unwrap_err();
        assert!(matches!(err, DrugInteractError::InvalidArgument(_)));

        let err = client.event_total(&"x".repeat(2048)).await.unwrap_err();
        assert!(matches!(err, DrugInteractError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn event_total_includes_api_key_when_configured() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/drug/event.json"))
            .and(query_param("api_key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "meta": {"results": {"skip": 0, "limit": 1, "total": 1}},
                "results": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenFdaClient::new_for_test(server.uri(), Some("test-key".into())).unwrap();
        let total = client.event_total("seriousnessdeath:\"1\"").await.unwrap();
        assert_eq!(total, 1);
    }
}
