use crate::adapters::outbound::network::endpoint::{normalize_base_url, user_agent};
use crate::metrics_aggregation::domain::{StaticAnalysisIssue, StaticAnalysisReport};
use crate::ports::outbound::StaticAnalysisRepository;
use crate::shared::error::{is_auth_status, MetricsError};
use crate::shared::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const SERVICE_NAME: &str = "SonarQube";
const MEASURE_KEYS: &str = "coverage,bugs,vulnerabilities,code_smells";

#[derive(Debug, Default, Deserialize)]
struct MeasuresResponse {
    #[serde(default)]
    component: MeasuresComponent,
}

#[derive(Debug, Default, Deserialize)]
struct MeasuresComponent {
    #[serde(default)]
    measures: Vec<Measure>,
}

#[derive(Debug, Deserialize)]
struct Measure {
    metric: String,
    #[serde(default)]
    value: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct IssuesPage {
    #[serde(default)]
    issues: Vec<IssueEntry>,
    #[serde(default)]
    facets: Vec<Facet>,
    #[serde(default)]
    paging: Option<Paging>,
}

#[derive(Debug, Deserialize)]
struct IssueEntry {
    #[serde(default)]
    key: String,
    #[serde(default, rename = "type")]
    issue_type: String,
    #[serde(default)]
    severity: String,
    #[serde(default)]
    component: String,
    #[serde(default, rename = "textRange")]
    text_range: Option<TextRange>,
}

#[derive(Debug, Deserialize)]
struct TextRange {
    #[serde(default, rename = "startLine")]
    start_line: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct Facet {
    property: String,
    #[serde(default)]
    values: Vec<FacetValue>,
}

#[derive(Debug, Deserialize)]
struct FacetValue {
    val: String,
    count: u64,
}

#[derive(Debug, Deserialize)]
struct Paging {
    #[serde(rename = "pageIndex")]
    page_index: u64,
    #[serde(rename = "pageSize")]
    page_size: u64,
    total: u64,
}

/// SonarQubeClient adapter for the static-analysis web API
///
/// Implements the StaticAnalysisRepository port with two endpoints:
/// `api/measures/component` for project measures and `api/issues/search`
/// for open issues. The first issues page also requests the severity facet.
///
/// # Limits
/// - 10 second timeout per request
/// - 100 issues per page, at most 10 pages
/// - No retries; a failed measures fetch leaves the snapshot without the
///   external fallback values, a failed issues page ends paging early
pub struct SonarQubeClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl SonarQubeClient {
    const TIMEOUT_SECONDS: u64 = 10;
    const PAGE_SIZE: u64 = 100;
    const MAX_PAGES: u64 = 10;

    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(Self::TIMEOUT_SECONDS))
            .user_agent(user_agent())
            .build()?;

        Ok(Self {
            client,
            base_url: normalize_base_url(base_url),
            token: token.into(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let endpoint = format!("{}{}", self.base_url, path);
        let url = format!("{}?{}", endpoint, encode_query(query));

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| MetricsError::NetworkUnavailable {
                endpoint: endpoint.clone(),
                details: e.to_string(),
            })?;

        let status = response.status().as_u16();
        if is_auth_status(status) {
            return Err(MetricsError::AuthFailure {
                service: SERVICE_NAME.to_string(),
                status,
            }
            .into());
        }
        if !response.status().is_success() {
            return Err(MetricsError::NetworkUnavailable {
                endpoint,
                details: format!("HTTP {}", status),
            }
            .into());
        }

        response.json::<T>().await.map_err(|e| {
            MetricsError::NetworkUnavailable {
                endpoint,
                details: format!("unexpected response body: {}", e),
            }
            .into()
        })
    }

    async fn fetch_measures(&self, project_key: &str) -> Result<MeasuresResponse> {
        self.get_json(
            "/api/measures/component",
            &[
                ("component", project_key.to_string()),
                ("metricKeys", MEASURE_KEYS.to_string()),
            ],
        )
        .await
    }

    async fn fetch_issue_page(&self, project_key: &str, page: u64) -> Result<IssuesPage> {
        let mut query = vec![
            ("componentKeys", project_key.to_string()),
            ("resolved", "false".to_string()),
            ("p", page.to_string()),
            ("ps", Self::PAGE_SIZE.to_string()),
        ];
        if page == 1 {
            query.push(("facets", "severities".to_string()));
        }
        self.get_json("/api/issues/search", &query).await
    }
}

#[async_trait]
impl StaticAnalysisRepository for SonarQubeClient {
    async fn fetch_report(&self, project_key: &str) -> Result<StaticAnalysisReport> {
        let measures = self.fetch_measures(project_key).await?;

        // Measures and the issues fetched so far survive a failed page
        let mut pages = Vec::new();
        for page in 1..=Self::MAX_PAGES {
            let issues_page = match self.fetch_issue_page(project_key, page).await {
                Ok(issues_page) => issues_page,
                Err(e) => {
                    tracing::warn!(
                        project = %project_key,
                        page,
                        "Issues page failed, keeping {} earlier page(s): {:#}",
                        pages.len(),
                        e
                    );
                    break;
                }
            };
            let more = has_next_page(issues_page.paging.as_ref(), page);
            pages.push(issues_page);
            if !more {
                break;
            }
        }

        Ok(build_report(measures, pages))
    }
}

fn encode_query(query: &[(&str, String)]) -> String {
    query
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn has_next_page(paging: Option<&Paging>, requested_page: u64) -> bool {
    match paging {
        Some(p) => p.page_index.max(requested_page) * p.page_size.max(1) < p.total,
        None => false,
    }
}

fn build_report(measures: MeasuresResponse, pages: Vec<IssuesPage>) -> StaticAnalysisReport {
    let mut report = StaticAnalysisReport::default();

    for measure in measures.component.measures {
        let Some(value) = measure.value.as_deref().and_then(|v| v.trim().parse::<f64>().ok()) else {
            continue;
        };
        match measure.metric.as_str() {
            "coverage" => report.coverage = Some(value.clamp(0.0, 100.0)),
            "bugs" => report.bugs = value.max(0.0) as u64,
            "vulnerabilities" => report.vulnerabilities = value.max(0.0) as u64,
            "code_smells" => report.code_smells = value.max(0.0) as u64,
            _ => {}
        }
    }

    for page in pages {
        for facet in page.facets.into_iter().filter(|f| f.property == "severities") {
            for value in facet.values {
                report.issues_by_severity.insert(value.val.to_uppercase(), value.count);
            }
        }

        report.issues.extend(page.issues.into_iter().map(|issue| StaticAnalysisIssue {
            file: component_path(&issue.component).to_string(),
            line: issue.text_range.and_then(|r| r.start_line),
            key: issue.key,
            issue_type: issue.issue_type,
            severity: issue.severity,
        }));
    }

    report
}

/// Strips the `project:` prefix from a component key.
fn component_path(component: &str) -> &str {
    component
        .split_once(':')
        .map(|(_, path)| path)
        .unwrap_or(component)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::error::{classify, FailureKind};
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_build_report_from_responses() {
        let measures: MeasuresResponse = serde_json::from_str(
            r#"{"component": {"key": "demo", "measures": [
                {"metric": "coverage", "value": "71.3"},
                {"metric": "bugs", "value": "4"},
                {"metric": "vulnerabilities", "value": "1"},
                {"metric": "code_smells", "value": "120"},
                {"metric": "sqale_index", "value": "999"}
            ]}}"#,
        )
        .unwrap();
        let page: IssuesPage = serde_json::from_str(
            r#"{
                "paging": {"pageIndex": 1, "pageSize": 100, "total": 2},
                "issues": [
                    {"key": "AX1", "type": "BUG", "severity": "MAJOR",
                     "component": "demo:src/app/main.py", "textRange": {"startLine": 42}},
                    {"key": "AX2", "type": "CODE_SMELL", "severity": "MINOR",
                     "component": "demo"}
                ],
                "facets": [{"property": "severities", "values": [
                    {"val": "MAJOR", "count": 1}, {"val": "MINOR", "count": 1}
                ]}]
            }"#,
        )
        .unwrap();

        let report = build_report(measures, vec![page]);

        assert_eq!(report.coverage, Some(71.3));
        assert_eq!(report.bugs, 4);
        assert_eq!(report.vulnerabilities, 1);
        assert_eq!(report.code_smells, 120);
        assert_eq!(report.issues_with_severity("MAJOR"), 1);
        assert_eq!(report.issues.len(), 2);
        assert_eq!(report.issues[0].file, "src/app/main.py");
        assert_eq!(report.issues[0].line, Some(42));
        assert_eq!(report.issues[1].file, "demo");
        assert_eq!(report.issues[1].line, None);
    }

    #[test]
    fn test_missing_coverage_measure_stays_none() {
        let measures: MeasuresResponse = serde_json::from_str(
            r#"{"component": {"measures": [{"metric": "bugs", "value": "2"}]}}"#,
        )
        .unwrap();
        let report = build_report(measures, vec![]);
        assert_eq!(report.coverage, None);
        assert_eq!(report.bugs, 2);
    }

    #[test]
    fn test_query_values_are_encoded() {
        let query = [
            ("componentKeys", "org:my repo".to_string()),
            ("metricKeys", MEASURE_KEYS.to_string()),
        ];
        assert_eq!(
            encode_query(&query),
            "componentKeys=org%3Amy%20repo&metricKeys=coverage%2Cbugs%2Cvulnerabilities%2Ccode_smells"
        );
    }

    #[test]
    fn test_paging() {
        let paging = |index, total| Paging {
            page_index: index,
            page_size: 100,
            total,
        };
        assert!(has_next_page(Some(&paging(1, 250)), 1));
        assert!(has_next_page(Some(&paging(2, 250)), 2));
        assert!(!has_next_page(Some(&paging(3, 250)), 3));
        assert!(!has_next_page(Some(&paging(1, 100)), 1));
        assert!(!has_next_page(None, 1));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_failure() {
        let client = SonarQubeClient::new("127.0.0.1:1", "token").unwrap();
        let err = client.fetch_report("demo").await.unwrap_err();
        assert_eq!(classify(&err), FailureKind::NetworkUnavailable);
    }

    fn measures_body() -> serde_json::Value {
        json!({"component": {"key": "demo", "measures": [
            {"metric": "coverage", "value": "64.0"},
            {"metric": "bugs", "value": "3"}
        ]}})
    }

    fn issues_body(page: u64, total: u64, keys: &[&str]) -> serde_json::Value {
        let issues: Vec<_> = keys
            .iter()
            .map(|key| json!({"key": key, "type": "BUG", "severity": "MAJOR",
                              "component": "demo:src/lib.py", "textRange": {"startLine": 7}}))
            .collect();
        json!({
            "paging": {"pageIndex": page, "pageSize": 100, "total": total},
            "issues": issues,
            "facets": [{"property": "severities", "values": [{"val": "MAJOR", "count": total}]}]
        })
    }

    async fn mount_measures(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/measures/component"))
            .and(query_param("component", "demo"))
            .and(query_param("metricKeys", MEASURE_KEYS))
            .and(header("authorization", "Bearer secret-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(measures_body()))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_fetch_report_follows_issue_pages() {
        let server = MockServer::start().await;
        mount_measures(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/issues/search"))
            .and(query_param("componentKeys", "demo"))
            .and(query_param("resolved", "false"))
            .and(query_param("p", "1"))
            .and(query_param("facets", "severities"))
            .respond_with(ResponseTemplate::new(200).set_body_json(issues_body(1, 150, &["I1"])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/issues/search"))
            .and(query_param("p", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "paging": {"pageIndex": 2, "pageSize": 100, "total": 150},
                "issues": [{"key": "I2", "type": "VULNERABILITY", "severity": "CRITICAL",
                            "component": "demo:src/api.py"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = SonarQubeClient::new(&server.uri(), "secret-token").unwrap();
        let report = client.fetch_report("demo").await.unwrap();

        assert_eq!(report.coverage, Some(64.0));
        assert_eq!(report.bugs, 3);
        assert_eq!(report.issues_with_severity("MAJOR"), 150);
        let keys: Vec<&str> = report.issues.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["I1", "I2"]);
        assert_eq!(report.issues[1].line, None);
    }

    #[tokio::test]
    async fn test_rejected_token_is_auth_failure() {
        let server = MockServer::start().await;
        Mock::given(path("/api/measures/component"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = SonarQubeClient::new(&server.uri(), "stale-token").unwrap();
        let err = client.fetch_report("demo").await.unwrap_err();

        assert_eq!(classify(&err), FailureKind::AuthFailure);
        assert!(matches!(
            err.downcast_ref::<MetricsError>(),
            Some(MetricsError::AuthFailure { status: 401, .. })
        ));
    }

    #[tokio::test]
    async fn test_server_error_is_network_failure() {
        let server = MockServer::start().await;
        Mock::given(path("/api/measures/component"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = SonarQubeClient::new(&server.uri(), "secret-token").unwrap();
        let err = client.fetch_report("demo").await.unwrap_err();

        assert_eq!(classify(&err), FailureKind::NetworkUnavailable);
        assert!(err.to_string().contains("HTTP 500"));
    }

    #[tokio::test]
    async fn test_issue_paging_stops_at_page_limit() {
        let server = MockServer::start().await;
        mount_measures(&server).await;
        Mock::given(path("/api/issues/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(issues_body(1, 5000, &["I"])))
            .expect(SonarQubeClient::MAX_PAGES)
            .mount(&server)
            .await;

        let client = SonarQubeClient::new(&server.uri(), "secret-token").unwrap();
        let report = client.fetch_report("demo").await.unwrap();

        assert_eq!(report.issues.len() as u64, SonarQubeClient::MAX_PAGES);
    }

    #[tokio::test]
    async fn test_failed_issue_page_keeps_earlier_results() {
        let server = MockServer::start().await;
        mount_measures(&server).await;
        Mock::given(path("/api/issues/search"))
            .and(query_param("p", "1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(issues_body(1, 250, &["I1", "I2"])),
            )
            .mount(&server)
            .await;
        Mock::given(path("/api/issues/search"))
            .and(query_param("p", "2"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(path("/api/issues/search"))
            .and(query_param("p", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(issues_body(3, 250, &["I3"])))
            .expect(0)
            .mount(&server)
            .await;

        let client = SonarQubeClient::new(&server.uri(), "secret-token").unwrap();
        let report = client.fetch_report("demo").await.unwrap();

        assert_eq!(report.coverage, Some(64.0));
        assert_eq!(report.bugs, 3);
        assert_eq!(report.issues_with_severity("MAJOR"), 250);
        assert_eq!(report.issues.len(), 2);
    }
}
