//! Integration tests for `PageClient` against a local HTTP server.
//!
//! The live test at the bottom is ignored by default. To run it, create a
//! `.env` file in the pagewindow-lib directory with:
//!
//! ```env
//! PAGEWINDOW_OFFSET_URL=https://dummyjson.com/todos
//! PAGEWINDOW_COLLECTION_KEY=todos
//! ```
//!
//! Then run: `cargo test -p pagewindow-lib --test client -- --ignored`

use std::convert::Infallible;
use std::env;
use std::time::Duration;

use http_body_util::Full;
use hyper::Request;
use hyper::Response;
use hyper::StatusCode;
use hyper::body::Bytes;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use pagewindow_lib::PageClient;
use pagewindow_lib::api::OffsetSource;
use pagewindow_lib::api::SearchSource;
use pagewindow_lib::config::WindowConfig;
use pagewindow_lib::controller::Completion;
use pagewindow_lib::controller::ReplaceController;
use pagewindow_lib::error::ApiError;
use pagewindow_lib::error::Error;
use pagewindow_lib::error::SourceError;
use pagewindow_lib::model::RecordId;
use tokio::net::TcpListener;

type Route = fn(&Request<Incoming>) -> (StatusCode, String);

/// Serves `route` on an ephemeral port and returns the base URL.
async fn serve(route: Route) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let io = TokioIo::new(stream);
            tokio::spawn(async move {
                let service = service_fn(move |req: Request<Incoming>| async move {
                    let (status, body) = route(&req);
                    Ok::<_, Infallible>(
                        Response::builder()
                            .status(status)
                            .header("content-type", "application/json")
                            .body(Full::new(Bytes::from(body)))
                            .unwrap(),
                    )
                });
                let _ = http1::Builder::new().serve_connection(io, service).await;
            });
        }
    });

    format!("http://{}", addr)
}

fn query_param(req: &Request<Incoming>, name: &str) -> Option<String> {
    req.uri().query()?.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

/// Offset endpoint with 25 todos, shaped like dummyjson.
fn todos(req: &Request<Incoming>) -> (StatusCode, String) {
    let limit: usize = query_param(req, "limit").and_then(|v| v.parse().ok()).unwrap_or(30);
    let skip: usize = query_param(req, "skip").and_then(|v| v.parse().ok()).unwrap_or(0);

    let todos: Vec<serde_json::Value> = (1..=25usize)
        .skip(skip)
        .take(limit)
        .map(|id| {
            serde_json::json!({
                "id": id,
                "todo": format!("Task {}", id),
                "completed": id % 3 == 0,
                "userId": id % 7,
            })
        })
        .collect();

    let body = serde_json::json!({"todos": todos, "total": 25, "skip": skip, "limit": limit});
    (StatusCode::OK, body.to_string())
}

/// Search endpoint that requires an access key and ends after two pages.
fn photos(req: &Request<Incoming>) -> (StatusCode, String) {
    let authorized = req
        .headers()
        .get("authorization")
        .is_some_and(|v| v == "Client-ID test-key");
    if !authorized {
        let body = serde_json::json!({"type": "error", "errors": ["missing access key"]});
        return (StatusCode::OK, body.to_string());
    }

    let page: u32 = query_param(req, "page").and_then(|v| v.parse().ok()).unwrap_or(1);
    let query = query_param(req, "query").unwrap_or_default();
    let results: Vec<serde_json::Value> = if page <= 2 {
        (0..2)
            .map(|i| serde_json::json!({"id": format!("{}-{}-{}", query, page, i), "alt_description": null}))
            .collect()
    } else {
        Vec::new()
    };

    let body = serde_json::json!({"type": "success", "results": results});
    (StatusCode::OK, body.to_string())
}

fn broken(_req: &Request<Incoming>) -> (StatusCode, String) {
    (StatusCode::OK, "{not json".to_string())
}

fn unavailable(_req: &Request<Incoming>) -> (StatusCode, String) {
    (StatusCode::SERVICE_UNAVAILABLE, "try later".to_string())
}

#[tokio::test]
async fn test_fetch_offset_page() {
    let base = serve(todos).await;
    let client = PageClient::builder()
        .url(format!("{}/todos", base))
        .collection_key("todos")
        .build();

    let page = client.fetch_offset(10, 20).await.unwrap();

    assert_eq!(page.len(), 5);
    assert_eq!(page.total(), Some(25));
    assert_eq!(page.records()[0].id(), &RecordId::Int(21));
    assert_eq!(page.records()[0].get_str("todo"), Some("Task 21"));
}

#[tokio::test]
async fn test_search_sends_access_key_and_query() {
    let base = serve(photos).await;
    let client = PageClient::builder()
        .url(format!("{}/unused", base))
        .search_url(format!("{}/search/photos", base))
        .access_key("test-key")
        .build();

    let results = client
        .search(2, 10, Some("cats"))
        .await
        .unwrap()
        .into_results()
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id(), &RecordId::Text("cats-2-0".into()));
}

#[tokio::test]
async fn test_search_error_envelope() {
    let base = serve(photos).await;
    let client = PageClient::builder()
        .url(format!("{}/unused", base))
        .search_url(format!("{}/search/photos", base))
        .build();

    let response = client.search(1, 10, None).await.unwrap();
    assert!(!response.is_success());
    assert!(matches!(
        response.into_results(),
        Err(SourceError::Upstream { .. })
    ));
}

#[tokio::test]
async fn test_search_without_search_url() {
    let client = PageClient::builder().url("http://127.0.0.1:9/todos").build();
    assert!(matches!(client.search(1, 10, None).await, Err(Error::Config(_))));
}

#[tokio::test]
async fn test_http_error_status() {
    let base = serve(unavailable).await;
    let client = PageClient::builder().url(base).build();

    match client.fetch_offset(10, 0).await {
        Err(Error::Api(ApiError::Http { status, message })) => {
            assert_eq!(status, 503);
            assert_eq!(message, "try later");
        }
        other => panic!("expected HTTP error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body() {
    let base = serve(broken).await;
    let client = PageClient::builder().url(base).build();

    match client.fetch_offset(10, 0).await {
        Err(Error::Api(ApiError::Parse { body, .. })) => {
            assert_eq!(body.as_deref(), Some("{not json"));
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_table_over_http() {
    let base = serve(todos).await;
    let client = PageClient::builder()
        .url(format!("{}/todos", base))
        .collection_key("todos")
        .timeout(Duration::from_secs(5))
        .build();

    let mut table = ReplaceController::new(WindowConfig::default());
    assert_eq!(table.start(&client).await, Some(Completion::Applied { added: 10 }));

    let request = table.jump_to("2").unwrap();
    assert_eq!(table.run(request, &client).await, Completion::Applied { added: 5 });
    assert_eq!(table.page_count(), Some(3));

    // Past the end of the data but inside the navigation bound.
    let request = table.next().unwrap();
    assert_eq!(table.run(request, &client).await, Completion::Applied { added: 0 });
    assert_eq!(table.cursor(), 3);
}

#[tokio::test]
#[ignore = "requires PAGEWINDOW_OFFSET_URL in .env file"]
async fn test_live_offset_endpoint() {
    let _ = dotenvy::dotenv();
    let url = env::var("PAGEWINDOW_OFFSET_URL")
        .expect("Missing PAGEWINDOW_OFFSET_URL. See module docs.");
    let key = env::var("PAGEWINDOW_COLLECTION_KEY").unwrap_or_else(|_| "items".into());

    let client = PageClient::builder()
        .url(url)
        .collection_key(key)
        .timeout(Duration::from_secs(10))
        .build();

    let mut table = ReplaceController::new(WindowConfig::default());
    let completion = table.start(&client).await;

    assert_eq!(completion, Some(Completion::Applied { added: 10 }));
    println!("Loaded {} rows, total {:?}", table.items().len(), table.total());
}
