//! Integration tests using wiremock to simulate the service.

use cognima::{
    configure, Auth, AuthStyle, Client, ClientError, ConfigError, Payload, RequestDescriptor,
    ResponseEnvelope,
};
use serde::Deserialize;
use serde_json::json;
use std::time::{Duration, Instant};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize, PartialEq)]
struct X {
    x: u32,
}

fn client_for(server: &MockServer) -> Client {
    Client::builder()
        .base_url(server.uri())
        .unwrap()
        .api_key_header("X-API-Key", "ck_test")
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_configure_round_trip() {
    let client = configure(
        "https://cog.api.br/api/v1",
        Auth::header("X-API-Key", "ck_test"),
    )
    .unwrap();

    assert_eq!(client.base_url(), "https://cog.api.br/api/v1");
    assert_eq!(
        client.auth_style(),
        AuthStyle::Header("X-API-Key".to_string())
    );

    let client = configure("https://cog.api.br/api/v1", Auth::bearer("ck_test")).unwrap();
    assert_eq!(client.auth_style(), AuthStyle::Bearer);

    for base in ["https://cog.api.br", "https://cog.api.br/", "http://localhost:8080/api/v1/"] {
        let client = configure(base, Auth::None).unwrap();
        assert_eq!(client.base_url(), base);
    }
}

#[tokio::test]
async fn test_host_only_base_url_joins_paths() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": {}})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let base = mock_server.uri();
    let client = configure(&base, Auth::None).unwrap();
    assert_eq!(client.base_url(), base);

    client.request(RequestDescriptor::get("/status")).await.unwrap();
}

#[tokio::test]
async fn test_configure_rejects_bad_urls() {
    assert!(matches!(
        configure("not a url", Auth::None),
        Err(ConfigError::InvalidUrl(_))
    ));
    assert!(matches!(
        configure("ftp://cog.api.br/api/v1", Auth::None),
        Err(ConfigError::NotAbsolute(_))
    ));
}

#[tokio::test]
async fn test_success_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": {"x": 1}})),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client
        .request(RequestDescriptor::get("/status"))
        .await
        .unwrap();

    assert_eq!(response.status.as_u16(), 200);
    assert_eq!(response.data(), Some(&json!({"x": 1})));
    assert!(!response.raw_body.is_empty());

    let typed = client.get::<X>("/status").await.unwrap();
    assert_eq!(typed.data, X { x: 1 });
}

#[tokio::test]
async fn test_failure_envelope_is_not_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/vimeo/download"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "bad_url",
            "message": "invalid"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let descriptor =
        RequestDescriptor::get("/vimeo/download").with_query_param("url", "https://nope");

    let response = client.request(descriptor.clone()).await.unwrap();
    assert_eq!(
        response.data,
        Payload::Envelope(ResponseEnvelope::Failure {
            error_code: Some("bad_url".to_string()),
            message: "invalid".to_string(),
            http_status: Some(200),
        })
    );

    // The typed path turns it into an error
    let err = client.call::<X>(descriptor).await.unwrap_err();
    match err {
        ClientError::Api {
            error_code,
            message,
            http_status,
        } => {
            assert_eq!(error_code.as_deref(), Some("bad_url"));
            assert_eq!(message, "invalid");
            assert_eq!(http_status, Some(200));
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_client_error_403() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/freefire/sendlikes"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"message": "plan too low"})),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .request(RequestDescriptor::get("/freefire/sendlikes").with_query_param("playerId", 1))
        .await
        .unwrap_err();

    assert!(err.is_client_error());
    match err {
        ClientError::ClientSide {
            status,
            body,
            rate_limit_info,
            ..
        } => {
            assert_eq!(status.as_u16(), 403);
            assert!(body.contains("plan too low"));
            assert!(rate_limit_info.is_none());
        }
        other => panic!("expected ClientSide, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_500() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .request(RequestDescriptor::get("/status"))
        .await
        .unwrap_err();

    assert!(err.is_server_error());
    assert_eq!(err.status().unwrap().as_u16(), 503);
    assert_eq!(err.raw_response(), Some("maintenance"));
}

#[tokio::test]
async fn test_rate_limit_headers_on_429() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "30")
                .insert_header("x-ratelimit-limit", "100")
                .insert_header("x-ratelimit-remaining", "0"),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .request(RequestDescriptor::get("/status"))
        .await
        .unwrap_err();

    let info = err.rate_limit_info().unwrap();
    assert_eq!(info.retry_after, Some(Duration::from_secs(30)));
    assert_eq!(info.limit, Some(100));
    assert_eq!(info.remaining, Some(0));
    assert!(info.is_exhausted());
}

#[tokio::test]
async fn test_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .base_url(mock_server.uri())
        .unwrap()
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();

    let start = Instant::now();
    let err = client
        .request(RequestDescriptor::get("/slow"))
        .await
        .unwrap_err();

    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(200));
    assert!(elapsed < Duration::from_secs(1), "timed out after {:?}", elapsed);
    assert!(err.is_timeout());
    assert!(matches!(err, ClientError::Transport { timeout: true, .. }));
}

#[tokio::test]
async fn test_descriptor_timeout_overrides_client() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true}))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .base_url(mock_server.uri())
        .unwrap()
        .timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    let response = client
        .request(RequestDescriptor::get("/slow").with_timeout(Duration::from_secs(5)))
        .await
        .unwrap();

    assert_eq!(response.status.as_u16(), 200);
}

#[tokio::test]
async fn test_duplicate_query_keys_are_never_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let descriptor = RequestDescriptor::get("/search")
        .with_query_param("q", "rust")
        .with_query_param("q", "tokio");

    let err = client.request(descriptor).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidParameters(_)));
}

#[tokio::test]
async fn test_query_params_and_base_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .and(query_param("q", "inteligência artificial"))
        .and(query_param("max", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"query": "inteligência artificial", "totalResults": 0, "results": []}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = configure(
        &format!("{}/api/v1", mock_server.uri()),
        Auth::bearer("ck_test"),
    )
    .unwrap();

    let results = client
        .search()
        .web("inteligência artificial", Some(10))
        .await
        .unwrap();
    assert_eq!(results.data.total_results, 0);
}

#[tokio::test]
async fn test_api_key_header_is_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .and(header("x-api-key", "ck_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client
        .request(RequestDescriptor::get("/status"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_bearer_header_is_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gdrive/info"))
        .and(header("authorization", "Bearer ck_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = configure(&mock_server.uri(), Auth::bearer("ck_test")).unwrap();
    client
        .request(RequestDescriptor::get("/gdrive/info").with_query_param("url", "https://x"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/youtube/search"))
        .and(body_json(json!({"query": "rust async"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"count": 0, "results": []}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let search = client.youtube().search("rust async").await.unwrap();
    assert!(search.data.results.is_empty());
}

#[tokio::test]
async fn test_binary_download_is_unmodified() {
    let mock_server = MockServer::start().await;
    let audio: Vec<u8> = vec![0x49, 0x44, 0x33, 0x04, 0x00, 0xff, 0xfe, 0x00, 0x7b];

    Mock::given(method("GET"))
        .and(path("/spotify/download"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(audio.clone(), "audio/mpeg")
                .insert_header("content-disposition", r#"attachment; filename="song.mp3""#),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client
        .request(
            RequestDescriptor::get("/spotify/download")
                .with_query_param("url", "https://open.spotify.com/track/1")
                .binary(),
        )
        .await
        .unwrap();

    let binary = response.data.binary().unwrap();
    assert_eq!(&binary.bytes[..], &audio[..]);
    assert_eq!(binary.content_type.as_deref(), Some("audio/mpeg"));
    assert_eq!(binary.filename(), Some("song.mp3"));
    assert!(response.raw_body.is_empty());
}

#[tokio::test]
async fn test_malformed_json_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .request(RequestDescriptor::get("/status"))
        .await
        .unwrap_err();

    match err {
        ClientError::Decode {
            raw_response,
            status,
            ..
        } => {
            assert_eq!(raw_response, "<html>oops</html>");
            assert_eq!(status.as_u16(), 200);
        }
        other => panic!("expected Decode, got {:?}", other),
    }
}

#[tokio::test]
async fn test_shape_mismatch_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": {"x": "one"}})),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.get::<X>("/status").await.unwrap_err();

    assert!(matches!(err, ClientError::Decode { .. }));
    assert!(err.raw_response().unwrap().contains("\"one\""));
}

#[tokio::test]
async fn test_request_sequence_is_paced_and_ordered() {
    let mock_server = MockServer::start().await;

    for (p, status) in [("/a", 200u16), ("/b", 500), ("/c", 200)] {
        Mock::given(method("GET"))
            .and(path(p))
            .respond_with(
                ResponseTemplate::new(status).set_body_json(json!({"success": true, "data": p})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let client = client_for(&mock_server);
    let descriptors = ["/a", "/b", "/c"].into_iter().map(RequestDescriptor::get);
    let delay = Duration::from_millis(100);

    let start = Instant::now();
    let results = client.request_sequence(descriptors, delay).await;

    assert!(start.elapsed() >= delay * 2);
    assert_eq!(results.len(), 3);
    assert_eq!(
        results[0].as_ref().unwrap().data(),
        Some(&json!("/a"))
    );
    assert!(matches!(results[1], Err(ClientError::ServerSide { .. })));
    assert_eq!(
        results[2].as_ref().unwrap().data(),
        Some(&json!("/c"))
    );
}

#[tokio::test]
async fn test_request_sequence_empty() {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server);

    let start = Instant::now();
    let results = client
        .request_sequence(Vec::new(), Duration::from_secs(5))
        .await;

    assert!(results.is_empty());
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Nothing listens on port 9 on the loopback interface
    let client = configure("http://127.0.0.1:9", Auth::None).unwrap();

    let err = client
        .request(RequestDescriptor::get("/status"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Transport { timeout: false, .. }));
    assert!(err.status().is_none());
}

#[tokio::test]
async fn test_truncated_error_body_keeps_status() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Promises 100 bytes, sends 7, then hangs up
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 1024];
        let _ = socket.read(&mut buf).await;
        let _ = socket
            .write_all(b"HTTP/1.1 502 Bad Gateway\r\nContent-Length: 100\r\n\r\npartial")
            .await;
    });

    let client = configure(&format!("http://{}", addr), Auth::None).unwrap();
    let err = client
        .request(RequestDescriptor::get("/status"))
        .await
        .unwrap_err();

    match err {
        ClientError::ServerSide { status, body, .. } => {
            assert_eq!(status.as_u16(), 502);
            assert!(body.is_empty());
        }
        other => panic!("expected ServerSide, got {:?}", other),
    }
}
