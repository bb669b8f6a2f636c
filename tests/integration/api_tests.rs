//! API integration tests

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use bookshelf_server::{api::create_router, models::Book, repository::Repository, AppState};

const BOOK_ISBN: &str = "123456789";

fn sample_book() -> Book {
    Book {
        isbn: BOOK_ISBN.to_string(),
        amazon_url: "https://amazon.com/taco".to_string(),
        author: "Elie".to_string(),
        language: "English".to_string(),
        pages: 100,
        publisher: "Publisher sample".to_string(),
        title: "my book".to_string(),
        year: 1991,
    }
}

fn new_book_payload() -> Value {
    json!({
        "isbn": "9876543",
        "amazon_url": "https://amazon.com/test",
        "author": "tester",
        "language": "english",
        "pages": 1000,
        "publisher": "anonymous",
        "title": "say wut",
        "year": 2030
    })
}

fn update_payload() -> Value {
    json!({
        "amazon_url": "https://test.com",
        "author": "mcfly",
        "language": "english",
        "pages": 500,
        "publisher": "nope nah",
        "title": "Updated Libro",
        "year": 2005
    })
}

/// Router over a store holding the sample book
async fn seeded_app() -> Router {
    let repository = Repository::in_memory();
    repository
        .books
        .insert(&sample_book())
        .await
        .expect("Failed to seed book");
    create_router(AppState::new(repository))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    send_request(app, request).await
}

async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to send request");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Failed to parse response")
    };
    (status, body)
}

fn violation_fields(body: &Value) -> Vec<String> {
    body["violations"]
        .as_array()
        .expect("No violations in response")
        .iter()
        .map(|v| v["field"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn test_create_book() {
    let app = seeded_app().await;

    let (status, body) = send(&app, Method::POST, "/api/v1/books", Some(new_book_payload())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["book"]["isbn"], "9876543");
}

#[tokio::test]
async fn test_create_book_without_required_fields() {
    let app = seeded_app().await;

    let (status, body) = send(&app, Method::POST, "/api/v1/books", Some(json!({ "year": 2000 }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
    assert_eq!(violation_fields(&body).len(), 7);
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let app = seeded_app().await;
    let payload = new_book_payload();

    send(&app, Method::POST, "/api/v1/books", Some(payload.clone())).await;
    let (status, body) = send(&app, Method::GET, "/api/v1/books/9876543", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["book"], payload);
}

#[tokio::test]
async fn test_duplicate_isbn_conflicts() {
    let app = seeded_app().await;
    let mut payload = new_book_payload();
    payload["isbn"] = json!(BOOK_ISBN);

    let (status, body) = send(&app, Method::POST, "/api/v1/books", Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Duplicate");

    let (_, body) = send(&app, Method::GET, "/api/v1/books", None).await;
    let books = body["books"].as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["title"], "my book");
}

#[tokio::test]
async fn test_create_with_integral_float_pages() {
    let app = seeded_app().await;
    let mut payload = new_book_payload();
    payload["pages"] = json!(1000.0);

    let (status, body) = send(&app, Method::POST, "/api/v1/books", Some(payload)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["book"]["pages"], 1000);
}

#[tokio::test]
async fn test_create_with_unknown_field() {
    let app = seeded_app().await;
    let mut payload = new_book_payload();
    payload["badField"] = json!("DO NOT ADD");

    let (status, body) = send(&app, Method::POST, "/api/v1/books", Some(payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(violation_fields(&body), vec!["badField"]);
}

#[tokio::test]
async fn test_list_books() {
    let app = seeded_app().await;

    let (status, body) = send(&app, Method::GET, "/api/v1/books", None).await;

    assert_eq!(status, StatusCode::OK);
    let books = body["books"].as_array().expect("books is not an array");
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["isbn"], BOOK_ISBN);
    assert!(books[0]["amazon_url"].is_string());
}

#[tokio::test]
async fn test_list_empty_store() {
    let app = create_router(AppState::new(Repository::in_memory()));

    let (status, body) = send(&app, Method::GET, "/api/v1/books", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "books": [] }));
}

#[tokio::test]
async fn test_get_single_book() {
    let app = seeded_app().await;

    let (status, body) = send(&app, Method::GET, &format!("/api/v1/books/{}", BOOK_ISBN), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["book"]["isbn"], BOOK_ISBN);
}

#[tokio::test]
async fn test_get_missing_book() {
    let app = seeded_app().await;

    let (status, body) = send(&app, Method::GET, "/api/v1/books/9999", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchBook");
    assert!(body.get("violations").is_none());
}

#[tokio::test]
async fn test_update_book() {
    let app = seeded_app().await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/books/{}", BOOK_ISBN),
        Some(update_payload()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["book"]["isbn"], BOOK_ISBN);
    assert_eq!(body["book"]["title"], "Updated Libro");

    let (_, body) = send(&app, Method::GET, &format!("/api/v1/books/{}", BOOK_ISBN), None).await;
    assert_eq!(body["book"]["pages"], 500);
}

#[tokio::test]
async fn test_incorrect_book_update() {
    let app = seeded_app().await;
    let mut payload = update_payload();
    payload["isbn"] = json!("353535353");
    payload["badField"] = json!("DO NOT ADD");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/books/{}", BOOK_ISBN),
        Some(payload),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(violation_fields(&body), vec!["isbn", "badField"]);

    let (_, body) = send(&app, Method::GET, &format!("/api/v1/books/{}", BOOK_ISBN), None).await;
    assert_eq!(body["book"]["title"], "my book");
}

#[tokio::test]
async fn test_update_with_same_isbn_is_rejected() {
    let app = seeded_app().await;
    let mut payload = update_payload();
    payload["isbn"] = json!(BOOK_ISBN);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/books/{}", BOOK_ISBN),
        Some(payload),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(violation_fields(&body), vec!["isbn"]);
}

#[tokio::test]
async fn test_update_missing_book() {
    let app = seeded_app().await;

    let (status, _) = send(&app, Method::PUT, "/api/v1/books/9999", Some(update_payload())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_book() {
    let app = seeded_app().await;

    let (status, body) = send(&app, Method::DELETE, &format!("/api/v1/books/{}", BOOK_ISBN), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Book deleted" }));
}

#[tokio::test]
async fn test_delete_twice_is_not_found() {
    let app = seeded_app().await;
    let uri = format!("/api/v1/books/{}", BOOK_ISBN);

    send(&app, Method::DELETE, &uri, None).await;
    let (status, _) = send(&app, Method::DELETE, &uri, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_missing_book() {
    let app = seeded_app().await;

    let (status, _) = send(&app, Method::DELETE, "/api/v1/books/9999", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = seeded_app().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/books")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{\"isbn\": "))
        .unwrap();

    let (status, body) = send_request(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
}

#[tokio::test]
async fn test_missing_content_type_is_bad_request() {
    let app = seeded_app().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/books")
        .body(Body::from(new_book_payload().to_string()))
        .unwrap();

    let (status, _) = send_request(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_object_payload() {
    let app = seeded_app().await;

    let (status, body) = send(&app, Method::POST, "/api/v1/books", Some(json!([1, 2, 3]))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(violation_fields(&body), vec!["body"]);
}

#[tokio::test]
async fn test_unknown_route() {
    let app = seeded_app().await;

    let (status, body) = send(&app, Method::GET, "/api/v1/authors", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchRoute");
    assert!(body["message"].as_str().unwrap().contains("/api/v1/authors"));
}

#[tokio::test]
async fn test_health_and_readiness() {
    let app = seeded_app().await;

    let (status, body) = send(&app, Method::GET, "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/api/v1/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}
