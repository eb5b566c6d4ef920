//! Integration tests for `HttpImageFetcher` using wiremock HTTP mocks.

use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mbimport_bridge::{BridgeError, HttpImageFetcher, HttpTransport, ImageSource, RetryPolicy};

fn test_fetcher(server: &MockServer) -> HttpImageFetcher {
    let transport = HttpTransport::new(&server.uri(), 5, "mbimport-test/0.1")
        .expect("failed to build test transport");
    HttpImageFetcher::new(transport, RetryPolicy::new(3, Duration::ZERO))
}

#[tokio::test]
async fn fetch_returns_raw_body() {
    let server = MockServer::start().await;
    let jpeg = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];

    Mock::given(method("GET"))
        .and(path("/images/1.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(jpeg.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = test_fetcher(&server);
    let body = fetcher
        .fetch(&format!("{}/images/1.jpg", server.uri()))
        .await
        .expect("image should be fetched");
    assert_eq!(body, jpeg);
}

#[tokio::test]
async fn fetch_retries_transient_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/images/1.jpg"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/images/1.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"img".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = test_fetcher(&server);
    let body = fetcher
        .fetch(&format!("{}/images/1.jpg", server.uri()))
        .await
        .expect("second attempt succeeds");
    assert_eq!(body, b"img".to_vec());
}

#[tokio::test]
async fn fetch_gives_up_after_three_attempts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/images/missing.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .expect(3)
        .mount(&server)
        .await;

    let fetcher = test_fetcher(&server);
    let err = fetcher
        .fetch(&format!("{}/images/missing.jpg", server.uri()))
        .await
        .unwrap_err();
    assert!(
        matches!(err, BridgeError::UnexpectedStatus { status: 404, .. }),
        "expected UnexpectedStatus(404), got: {err:?}"
    );
}

#[tokio::test]
async fn fetch_sends_no_authorization_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/images/2.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"img".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = test_fetcher(&server);
    fetcher
        .fetch(&format!("{}/images/2.jpg", server.uri()))
        .await
        .expect("image should be fetched");

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn fetch_rejects_unparseable_url_without_retrying() {
    let server = MockServer::start().await;
    let transport = HttpTransport::new(&server.uri(), 5, "mbimport-test/0.1")
        .expect("failed to build test transport");
    // A minute-long back-off would blow the test timeout if a retry happened.
    let fetcher = HttpImageFetcher::new(transport, RetryPolicy::new(3, Duration::from_secs(60)));

    let err = tokio::time::timeout(Duration::from_secs(5), fetcher.fetch("not a url"))
        .await
        .expect("request build errors must not be retried")
        .unwrap_err();
    assert!(
        matches!(err, BridgeError::Http(ref e) if e.is_builder()),
        "expected a request build error, got: {err:?}"
    );
}
