mod harness;

use harness::config::ConfigBuilder;
use harness::mock_webui::MockWebUi;
use harness::server::TestServer;

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let mock = MockWebUi::start().await.unwrap();
    let config = ConfigBuilder::new(&mock.base_url()).build();

    let server = TestServer::start(config).await.unwrap();

    let resp = server.client().get(server.url("/health")).send().await.unwrap();

    assert_eq!(resp.status(), 200);

    let body = resp.text().await.unwrap();
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn health_endpoint_custom_path() {
    let mock = MockWebUi::start().await.unwrap();
    let config = ConfigBuilder::new(&mock.base_url()).with_health_path("/healthz").build();

    let server = TestServer::start(config).await.unwrap();

    let resp = server.client().get(server.url("/healthz")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let resp = server.client().get(server.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn health_endpoint_disabled() {
    let mock = MockWebUi::start().await.unwrap();
    let config = ConfigBuilder::new(&mock.base_url()).without_health().build();

    let server = TestServer::start(config).await.unwrap();

    let resp = server.client().get(server.url("/health")).send().await.unwrap();

    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn health_does_not_touch_backend() {
    let mock = MockWebUi::start().await.unwrap();
    let config = ConfigBuilder::new(&mock.base_url()).build();

    let server = TestServer::start(config).await.unwrap();
    server.client().get(server.url("/health")).send().await.unwrap();

    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn malformed_or_colliding_health_path_fails_startup() {
    let mock = MockWebUi::start().await.unwrap();

    for path in ["health", "/openapi.json", "/tools/generate_image", "/mcp", "/mcp/health"] {
        let config = ConfigBuilder::new(&mock.base_url()).with_health_path(path).build();

        let err = TestServer::start(config).await.err().unwrap_or_else(|| panic!("{path} accepted"));
        assert!(err.to_string().contains("server.health.path"), "{path}: {err}");
    }
}
