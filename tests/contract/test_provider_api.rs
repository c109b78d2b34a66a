use depscan::config::ScanConfig;
use depscan::error::DepScanError;
use depscan::models::SignalKind;
use depscan::providers::{
    GithubClient, NpmRegistryClient, OsvClient, RegistryProvider, RepositoryProvider,
    VulnerabilityProvider,
};
use depscan::DependencyAnalyzer;
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

fn config_for(server: &ServerGuard) -> ScanConfig {
    ScanConfig::new().with_base_url(&server.url())
}

fn left_pad_document() -> String {
    json!({
        "name": "left-pad",
        "description": "String left pad",
        "dist-tags": { "latest": "1.3.0" },
        "time": {
            "created": "2014-03-18T00:00:00.000Z",
            "1.3.0": "2018-04-09T01:08:51.392Z"
        },
        "license": "WTFPL",
        "repository": { "type": "git", "url": "git+https://github.com/stevemao/left-pad.git" }
    })
    .to_string()
}

async fn mock_registry(server: &mut ServerGuard) -> (mockito::Mock, mockito::Mock) {
    let metadata = server
        .mock("GET", "/left-pad")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(left_pad_document())
        .create_async()
        .await;

    let downloads = server
        .mock("GET", "/downloads/point/last-week/left-pad")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "downloads": 4_200_000, "package": "left-pad" }).to_string())
        .create_async()
        .await;

    (metadata, downloads)
}

async fn mock_github(server: &mut ServerGuard) -> Vec<mockito::Mock> {
    let repo = server
        .mock("GET", "/repos/stevemao/left-pad")
        .match_header("accept", "application/vnd.github.v3+json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "stargazers_count": 1200,
                "open_issues_count": 12,
                "pushed_at": "2023-01-10T10:00:00Z",
                "html_url": "https://github.com/stevemao/left-pad"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let contributors = server
        .mock("GET", "/repos/stevemao/left-pad/contributors")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("per_page".into(), "1".into()),
            Matcher::UrlEncoded("anon".into(), "true".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_header(
            "link",
            r#"<https://api.github.com/repositories/1/contributors?per_page=1&anon=true&page=2>; rel="next", <https://api.github.com/repositories/1/contributors?per_page=1&anon=true&page=17>; rel="last""#,
        )
        .with_body("[{}]")
        .create_async()
        .await;

    let closed = server
        .mock("GET", "/search/issues")
        .match_query(Matcher::UrlEncoded(
            "q".into(),
            "repo:stevemao/left-pad type:issue state:closed".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "total_count": 48, "items": [] }).to_string())
        .create_async()
        .await;

    vec![repo, contributors, closed]
}

#[tokio::test]
async fn npm_metadata_is_mapped() {
    let mut server = Server::new_async().await;
    let (metadata_mock, downloads_mock) = mock_registry(&mut server).await;

    let client = NpmRegistryClient::new(&config_for(&server)).unwrap();
    let data = client.fetch_metadata("left-pad").await.unwrap().unwrap();

    metadata_mock.assert_async().await;
    downloads_mock.assert_async().await;
    assert_eq!(data.latest_version, "1.3.0");
    assert_eq!(data.last_publish_date, "2018-04-09T01:08:51.392Z");
    assert_eq!(data.weekly_downloads, 4_200_000);
    assert_eq!(data.license.as_deref(), Some("WTFPL"));
    assert_eq!(data.description, "String left pad");
    assert_eq!(
        data.repository_url.as_deref(),
        Some("https://github.com/stevemao/left-pad")
    );
}

#[tokio::test]
async fn npm_missing_package_is_no_data() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/no-such-package")
        .with_status(404)
        .with_body(json!({ "error": "Not found" }).to_string())
        .create_async()
        .await;

    let client = NpmRegistryClient::new(&config_for(&server)).unwrap();
    assert!(client.fetch_metadata("no-such-package").await.unwrap().is_none());
}

#[tokio::test]
async fn npm_server_error_is_reported() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/left-pad")
        .with_status(503)
        .create_async()
        .await;

    let client = NpmRegistryClient::new(&config_for(&server)).unwrap();
    let err = client.fetch_metadata("left-pad").await.unwrap_err();
    assert!(matches!(err, DepScanError::UpstreamStatus { status: 503, .. }));
}

#[tokio::test]
async fn npm_download_failure_counts_as_zero() {
    let mut server = Server::new_async().await;
    let _metadata = server
        .mock("GET", "/left-pad")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(left_pad_document())
        .create_async()
        .await;
    let _downloads = server
        .mock("GET", "/downloads/point/last-week/left-pad")
        .with_status(500)
        .create_async()
        .await;

    let client = NpmRegistryClient::new(&config_for(&server)).unwrap();
    let data = client.fetch_metadata("left-pad").await.unwrap().unwrap();
    assert_eq!(data.weekly_downloads, 0);
}

#[tokio::test]
async fn github_statistics_are_mapped() {
    let mut server = Server::new_async().await;
    let mocks = mock_github(&mut server).await;

    let client = GithubClient::new(&config_for(&server)).unwrap();
    let stats = client
        .fetch_statistics("left-pad", Some("https://github.com/stevemao/left-pad"))
        .await
        .unwrap()
        .unwrap();

    for mock in &mocks {
        mock.assert_async().await;
    }
    assert_eq!(stats.contributor_count, 17);
    assert_eq!(stats.open_issue_count, 12);
    assert_eq!(stats.closed_issue_count, 48);
    assert_eq!(stats.stars, 1200);
    assert_eq!(stats.last_commit_date, "2023-01-10T10:00:00Z");
    assert_eq!(stats.repo_url, "https://github.com/stevemao/left-pad");
}

#[tokio::test]
async fn github_token_is_sent_as_bearer() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/repos/stevemao/left-pad")
        .match_header("authorization", "Bearer ghp_test")
        .with_status(404)
        .create_async()
        .await;

    let config = config_for(&server).with_github_token("ghp_test".to_string());
    let client = GithubClient::new(&config).unwrap();
    let stats = client
        .fetch_statistics("left-pad", Some("git+https://github.com/stevemao/left-pad.git"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(stats.is_none());
}

#[tokio::test]
async fn github_without_repository_url_makes_no_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = GithubClient::new(&config_for(&server)).unwrap();
    assert!(client.fetch_statistics("left-pad", None).await.unwrap().is_none());
    assert!(client
        .fetch_statistics("left-pad", Some("https://gitlab.com/someone/left-pad"))
        .await
        .unwrap()
        .is_none());

    mock.assert_async().await;
}

#[tokio::test]
async fn osv_query_strips_range_prefix_and_maps_severity() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/query")
        .match_body(Matcher::PartialJson(json!({
            "package": { "name": "lodash", "ecosystem": "npm" },
            "version": "4.17.20"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "vulns": [
                    {
                        "id": "GHSA-35jh-r3h4-6jhm",
                        "summary": "Command Injection in lodash",
                        "database_specific": { "severity": "HIGH" }
                    },
                    {
                        "id": "GHSA-29mw-wpgm-hmr9",
                        "severity": [{ "type": "CVSS_V3", "score": "CVSS:3.1/AV:N/AC:L" }]
                    },
                    { "id": "OSV-1" }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = OsvClient::new(&config_for(&server)).unwrap();
    let report = client
        .fetch_vulnerabilities("lodash", "^4.17.20")
        .await
        .unwrap()
        .unwrap();

    mock.assert_async().await;
    assert_eq!(report.vulnerabilities.len(), 3);
    assert_eq!(report.vulnerabilities[0].severity, "HIGH");
    assert_eq!(report.vulnerabilities[0].summary, "Command Injection in lodash");
    assert_eq!(report.vulnerabilities[1].severity, "CVSS:3.1/AV:N/AC:L");
    assert_eq!(report.vulnerabilities[1].summary, "No summary available");
    assert_eq!(report.vulnerabilities[2].severity, "UNKNOWN");
}

#[tokio::test]
async fn osv_empty_response_is_a_clean_report() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/query")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .create_async()
        .await;

    let client = OsvClient::new(&config_for(&server)).unwrap();
    let report = client.fetch_vulnerabilities("zod", "3.22.4").await.unwrap().unwrap();
    assert!(report.is_clean());
}

#[tokio::test]
async fn live_clients_feed_the_analyzer() {
    let mut server = Server::new_async().await;
    let _registry = mock_registry(&mut server).await;
    let _github = mock_github(&mut server).await;
    let _osv = server
        .mock("POST", "/v1/query")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .create_async()
        .await;

    let analyzer = DependencyAnalyzer::new(&config_for(&server)).unwrap();
    let result = analyzer
        .analyze_manifest(r#"{ "dependencies": { "left-pad": "^1.3.0" } }"#)
        .await
        .unwrap();

    let dep = &result.dependencies[0];
    assert!(!dep.has_partial_data, "metadata: {:?}", dep.metadata);
    assert!(dep.signals.iter().all(|s| s.available));
    assert_eq!(dep.signal(SignalKind::BusFactor).unwrap().detail, "17 contributor(s)");
    assert_eq!(
        dep.signal(SignalKind::License).unwrap().detail,
        "Non-standard license: WTFPL"
    );
}

#[test]
fn lookup_request_counts_match_the_calls_each_client_makes() {
    let config = ScanConfig::new();

    assert_eq!(NpmRegistryClient::new(&config).unwrap().requests_per_lookup(), 2);
    assert_eq!(GithubClient::new(&config).unwrap().requests_per_lookup(), 3);
    assert_eq!(OsvClient::new(&config).unwrap().requests_per_lookup(), 1);
}
