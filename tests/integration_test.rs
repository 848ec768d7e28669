/// Integration tests for the application layer
mod test_utilities;

use pipeline_metrics::shared::error::classify;
use pipeline_metrics::prelude::*;
use test_utilities::mocks::*;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TRIVY_REPORT: &str = r#"{
  "SchemaVersion": 2,
  "ArtifactName": ".",
  "Results": [
    {
      "Target": "requirements.txt",
      "Class": "lang-pkgs",
      "Vulnerabilities": [
        {"VulnerabilityID": "CVE-2023-43804", "PkgName": "urllib3", "InstalledVersion": "1.26.5", "FixedVersion": "1.26.17", "Severity": "CRITICAL", "Title": "Cookie request header leak"},
        {"VulnerabilityID": "CVE-2024-22195", "PkgName": "jinja2", "InstalledVersion": "3.1.2", "FixedVersion": "3.1.3", "Severity": "critical", "Title": "HTML attribute injection"},
        {"VulnerabilityID": "CVE-2024-35195", "PkgName": "requests", "InstalledVersion": "2.31.0", "FixedVersion": "2.32.0", "Severity": "HIGH", "Title": "Certificate verification bypass"},
        {"VulnerabilityID": "CVE-2024-3651", "PkgName": "idna", "InstalledVersion": "3.6", "Severity": "LOW", "Title": "Quadratic complexity in encode"}
      ]
    },
    {
      "Target": "Dockerfile",
      "Class": "config",
      "Vulnerabilities": [
        {"VulnerabilityID": "CVE-2023-43804", "PkgName": "urllib3", "InstalledVersion": "1.26.5", "FixedVersion": "1.26.17", "Severity": "CRITICAL", "Title": "Cookie request header leak"}
      ]
    }
  ]
}"#;

const QUALITY_SUMMARY: &str = "\
=== Code quality scan ===
Files scanned: 214
TODO/FIXME comments: 5
Debug statements: 3
";

fn request(repository: &str) -> CollectRequest {
    CollectRequest::builder(
        RepositoryIdentity::new(repository).unwrap(),
        RunIdentity {
            run_id: "8812345".to_string(),
            run_number: Some(311),
        },
    )
    .search_roots(SearchRoots::new("/scratch", "/results", "/work"))
    .repository_root("/work/external-repo")
    .build()
}

fn collect_use_case(
    reader: MockArtifactReader,
    lister: MockTrackedFileLister,
    static_analysis: Option<MockStaticAnalysisRepository>,
    progress_reporter: MockProgressReporter,
) -> CollectMetricsUseCase<
    MockArtifactReader,
    MockTrackedFileLister,
    MockStaticAnalysisRepository,
    MockProgressReporter,
> {
    CollectMetricsUseCase::new(reader, lister, static_analysis, progress_reporter)
}

/// Artifacts only: no tracked files, no static-analysis service
fn files_only(
    reader: MockArtifactReader,
) -> CollectMetricsUseCase<
    MockArtifactReader,
    MockTrackedFileLister,
    MockStaticAnalysisRepository,
    MockProgressReporter,
> {
    collect_use_case(reader, MockTrackedFileLister::new(), None, MockProgressReporter::new())
}

#[tokio::test]
async fn test_collect_end_to_end_scenario() {
    let reader = MockArtifactReader::new()
        .with_file("/scratch/trivy-results.json", TRIVY_REPORT)
        .with_file("/results/quality-results.txt", QUALITY_SUMMARY);
    let use_case = files_only(reader);

    let response = use_case.execute(request("payments-api")).await.unwrap();
    let snapshot = &response.snapshot;

    let vulns = snapshot.domain(MetricDomain::Vulnerabilities);
    assert_eq!(vulns.count("total"), 4);
    assert_eq!(vulns.count("critical"), 2);
    assert_eq!(vulns.count("high"), 1);
    assert_eq!(vulns.count("medium"), 0);
    assert_eq!(vulns.count("low"), 1);
    assert_eq!(vulns.vulnerabilities().len(), 4);

    let quality = snapshot.domain(MetricDomain::QualityIssues);
    assert_eq!(quality.count("large_files"), 0);
    assert_eq!(quality.count("total_improvements"), 8);
    assert_eq!(quality.count("files_scanned"), 214);

    // 100 - (2x5 + 1x2) - (5x0.1 + 3x0.05)
    assert_eq!(response.quality_score(), 87.35);

    let payload = &response.payload;
    let found = |severity: &str| {
        payload
            .find("security_vulnerabilities_found", &[("severity", severity)])
            .map(|line| line.value())
    };
    assert_eq!(found("critical"), Some(2.0));
    assert_eq!(found("medium"), Some(0.0));
    assert_eq!(
        payload
            .find("security_vulnerability_info", &[("id", "CVE-2024-3651")])
            .and_then(|line| line.label("fixed")),
        Some("")
    );
    assert_eq!(
        payload
            .find("code_quality_score", &[("repository", "payments-api")])
            .map(|line| line.value()),
        Some(87.35)
    );
}

#[tokio::test]
async fn test_collect_reports_progress() {
    let progress_reporter = MockProgressReporter::new();
    let use_case = collect_use_case(
        MockArtifactReader::new(),
        MockTrackedFileLister::new(),
        Some(MockStaticAnalysisRepository::with_report(StaticAnalysisReport::default())),
        progress_reporter.clone(),
    );

    use_case.execute(request("payments-api")).await.unwrap();

    let messages = progress_reporter.get_messages();
    assert!(messages[0].contains("payments-api"));
    assert!(messages.iter().any(|m| m.starts_with("Waiting: ")));
    let last = messages.last().unwrap();
    assert!(last.starts_with("Completed: "));
    assert!(last.contains("quality score"));
}

#[tokio::test]
async fn test_coverage_json_wins_over_xml() {
    let reader = MockArtifactReader::new()
        .with_file(
            "/scratch/coverage.xml",
            r#"<coverage line-rate="0.40" lines-valid="100" lines-covered="40"/>"#,
        )
        .with_file("/results/coverage.json", r#"{"coverage": 82.5}"#);
    let use_case = files_only(reader);

    let response = use_case.execute(request("demo")).await.unwrap();
    assert_eq!(
        response.snapshot.domain(MetricDomain::Coverage).value("percent"),
        82.5
    );
}

#[tokio::test]
async fn test_valid_zero_coverage_is_not_replaced_by_service() {
    let reader = MockArtifactReader::new()
        .with_file("/work/lcov.info", "SF:a.py\nLF:20\nLH:0\nend_of_record\n");
    let service = MockStaticAnalysisRepository::with_report(StaticAnalysisReport {
        coverage: Some(55.0),
        ..Default::default()
    });
    let use_case = collect_use_case(
        reader,
        MockTrackedFileLister::new(),
        Some(service),
        MockProgressReporter::new(),
    );

    let response = use_case.execute(request("demo")).await.unwrap();
    let coverage = response.snapshot.domain(MetricDomain::Coverage);
    assert!(coverage.is_present());
    assert_eq!(coverage.value("percent"), 0.0);
}

#[tokio::test]
async fn test_truncated_report_still_produces_snapshot() {
    let truncated = &TRIVY_REPORT[..TRIVY_REPORT.len() / 2];
    let reader = MockArtifactReader::new().with_file("/scratch/trivy-results.json", truncated);
    let use_case = files_only(reader);

    let response = use_case.execute(request("demo")).await.unwrap();
    let vulns = response.snapshot.domain(MetricDomain::Vulnerabilities);
    assert_eq!(vulns.presence(), &DomainPresence::Absent);
    assert_eq!(vulns.count("total"), 0);
    assert!(!response.payload.is_empty());
}

#[tokio::test]
async fn test_unreadable_artifact_falls_through() {
    let reader = MockArtifactReader::new()
        .with_unreadable("/scratch/unit-test-results.json")
        .with_file(
            "/results/test-results.json",
            r#"{"unit_tests": {"total": 120, "passed": 118, "failed": 1, "skipped": 1, "duration_seconds": 14.2}}"#,
        );
    let use_case = files_only(reader);

    let response = use_case.execute(request("demo")).await.unwrap();
    let unit = response.snapshot.domain(MetricDomain::UnitTests);
    assert_eq!(unit.origin(), Some("/results/test-results.json"));
    assert_eq!(unit.count("passed"), 118);
}

#[tokio::test]
async fn test_large_artifacts_come_from_tracked_files_only() {
    let lister = MockTrackedFileLister::new()
        .with_file("scanner/bin/trivy", 5 * 1024 * 1024)
        .with_file("sonar-scanner-cli-5.0.zip", 40 * 1024 * 1024)
        .with_file("src/model.bin", 5 * 1024 * 1024)
        .with_file("data/sample.parquet", 2_500_000);
    let reader = MockArtifactReader::new().with_file(
        "/work/quality-results.txt",
        "TODO/FIXME comments: 2\nLarge files (>1MB): 17\nTotal suggestions: 19\n",
    );
    let use_case = collect_use_case(reader, lister, None, MockProgressReporter::new());

    let response = use_case.execute(request("demo")).await.unwrap();
    let large = response.snapshot.domain(MetricDomain::LargeArtifacts);
    let paths: Vec<&str> = large
        .large_artifacts()
        .iter()
        .map(|r| r.relative_path.as_str())
        .collect();
    assert_eq!(paths, vec!["src/model.bin", "data/sample.parquet"]);

    let quality = response.snapshot.domain(MetricDomain::QualityIssues);
    assert_eq!(quality.count("large_files"), 2);
    // an explicit total is kept as reported
    assert_eq!(quality.count("total_improvements"), 19);
    assert!(response
        .payload
        .find("large_file_size_bytes", &[("path", "src/model.bin")])
        .is_some());
}

#[tokio::test]
async fn test_unavailable_listing_reports_large_artifacts_absent() {
    let use_case = collect_use_case(
        MockArtifactReader::new(),
        MockTrackedFileLister::with_failure(),
        None,
        MockProgressReporter::new(),
    );

    let response = use_case.execute(request("demo")).await.unwrap();
    assert!(!response
        .snapshot
        .domain(MetricDomain::LargeArtifacts)
        .is_present());
    assert_eq!(response.domains_present(), 0);
}

#[tokio::test]
async fn test_static_analysis_failures_are_contained() {
    for (service, expected) in [
        (MockStaticAnalysisRepository::with_auth_failure(), FailureKind::AuthFailure),
        (MockStaticAnalysisRepository::with_network_failure(), FailureKind::NetworkUnavailable),
    ] {
        let progress_reporter = MockProgressReporter::new();
        let use_case = collect_use_case(
            MockArtifactReader::new().with_file("/work/coverage.json", r#"{"coverage": 61}"#),
            MockTrackedFileLister::new(),
            Some(service.clone()),
            progress_reporter.clone(),
        );

        let response = use_case.execute(request("demo")).await.unwrap();
        assert_eq!(response.static_analysis, StaticAnalysisStatus::Failed(expected));
        assert_eq!(service.call_count(), 1);
        assert_eq!(
            response.snapshot.domain(MetricDomain::Coverage).value("percent"),
            61.0
        );
        assert!(response.payload.find("sonarqube_bugs", &[]).is_none());
        assert!(progress_reporter
            .get_messages()
            .iter()
            .any(|m| m.starts_with("Error: ")));
    }
}

#[tokio::test]
async fn test_static_analysis_issues_are_emitted() {
    let mut report = StaticAnalysisReport {
        coverage: Some(48.0),
        bugs: 3,
        vulnerabilities: 1,
        code_smells: 40,
        ..Default::default()
    };
    report.issues_by_severity.insert("MAJOR".to_string(), 1);
    report.issues.push(StaticAnalysisIssue {
        key: "AYx1".to_string(),
        issue_type: "BUG".to_string(),
        severity: "MAJOR".to_string(),
        file: "src/app/handlers.py".to_string(),
        line: Some(88),
    });
    let use_case = collect_use_case(
        MockArtifactReader::new(),
        MockTrackedFileLister::new(),
        Some(MockStaticAnalysisRepository::with_report(report)),
        MockProgressReporter::new(),
    );

    let response = use_case.execute(request("demo")).await.unwrap();
    let payload = &response.payload;

    // no coverage artifact, so the service's measure is used
    assert_eq!(
        response.snapshot.domain(MetricDomain::Coverage).value("percent"),
        48.0
    );
    assert_eq!(
        payload
            .find("sonarqube_issues_by_severity", &[("severity", "MAJOR")])
            .map(|l| l.value()),
        Some(1.0)
    );
    let issue = payload
        .find("sonarqube_issue_info", &[("key", "AYx1")])
        .unwrap();
    assert_eq!(issue.label("project"), Some("demo"));
    assert_eq!(issue.label("line"), Some("88"));
    // 3 bugs x 0.3 + 1 vulnerability x 1
    assert_eq!(response.quality_score(), 98.1);
}

#[tokio::test]
async fn test_push_twice_replaces_snapshot() {
    let reader = MockArtifactReader::new().with_file("/scratch/trivy-results.json", TRIVY_REPORT);
    let collect = files_only(reader);
    let response = collect.execute(request("payments-api")).await.unwrap();

    let collector = MockMetricsCollector::new();
    let progress_reporter = MockProgressReporter::new();
    let push = PushMetricsUseCase::new(collector.clone(), progress_reporter.clone());
    let repository = RepositoryIdentity::new("payments-api").unwrap();

    let first = push.execute(&repository, &response.payload).await.unwrap();
    let after_first = collector.stored("pipeline-metrics", "payments-api").unwrap();
    let second = push.execute(&repository, &response.payload).await.unwrap();
    let after_second = collector.stored("pipeline-metrics", "payments-api").unwrap();

    assert_eq!(first, second);
    assert_eq!(after_first, after_second);
    assert_eq!(collector.group_count(), 1);
    assert_eq!(collector.calls(), vec!["DELETE", "PUT", "DELETE", "PUT"]);
    assert!(after_second.contains(
        "security_vulnerabilities_found{repository=\"payments-api\",severity=\"critical\"} 2\n"
    ));
    assert!(progress_reporter
        .get_messages()
        .last()
        .is_some_and(|m| m.starts_with("Completed: ") && m.contains("Pushed")));
}

#[tokio::test]
async fn test_push_reports_attempted_and_accepted_lines() {
    let collect = files_only(MockArtifactReader::new());
    let response = collect.execute(request("demo")).await.unwrap();
    let repository = RepositoryIdentity::new("demo").unwrap();

    let tolerant = PushMetricsUseCase::new(
        MockMetricsCollector::new().with_delete_failure(),
        MockProgressReporter::new(),
    );
    let report = tolerant.execute(&repository, &response.payload).await.unwrap();
    assert_eq!(report.attempted_lines, response.payload.len());
    assert_eq!(report.accepted_lines, report.attempted_lines);
    assert!(!report.stale_cleared);

    let rejecting = PushMetricsUseCase::new(
        MockMetricsCollector::new().with_put_rejection(401),
        MockProgressReporter::new(),
    );
    let err = rejecting.execute(&repository, &response.payload).await.unwrap_err();
    assert_eq!(classify(&err), FailureKind::AuthFailure);
    assert!(err
        .to_string()
        .contains(&format!("0 of {}", response.payload.len())));
}

#[tokio::test]
async fn test_pushgateway_client_against_http_collector() {
    let group_path = "/metrics/job/pipeline-metrics/instance/payments-api";
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(group_path))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(group_path))
        .and(header("content-type", "text/plain"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    // a bare authority gets an http scheme
    let authority = server.uri().trim_start_matches("http://").to_string();
    let client = PushgatewayClient::new(&authority).unwrap();
    let group = CollectorGroup {
        job: "pipeline-metrics".to_string(),
        instance: "payments-api".to_string(),
    };

    client.delete_group(&group).await.unwrap();
    client
        .replace_group(&group, "code_quality_score{repository=\"payments-api\"} 87.35\n")
        .await
        .unwrap();
    client
        .replace_group(&group, "code_quality_score{repository=\"payments-api\"} 90\n")
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let methods: Vec<&str> = requests.iter().map(|r| r.method.as_str()).collect();
    assert_eq!(methods, vec!["DELETE", "PUT", "PUT"]);
    assert!(requests.iter().all(|r| r.url.path() == group_path));
    assert_eq!(
        String::from_utf8_lossy(&requests[2].body),
        "code_quality_score{repository=\"payments-api\"} 90\n"
    );
}

#[tokio::test]
async fn test_pushgateway_client_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = PushgatewayClient::new(&server.uri()).unwrap();
    let group = CollectorGroup {
        job: "pipeline-metrics".to_string(),
        instance: "demo".to_string(),
    };

    let err = client.replace_group(&group, "x 1\n").await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<MetricsError>(),
        Some(MetricsError::CollectorRejected { status: 500, .. })
    ));
}
