#![allow(dead_code)]

use std::path::PathBuf;

use actix_http::Request;
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse},
    http::{header, StatusCode},
    middleware::Logger,
    test, App,
};
use serde_json::json;
use taskboard::{auth::TokenService, uploads::AttachmentStorage, AppState};
use uuid::Uuid;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const MULTIPART_BOUNDARY: &str = "taskboard-test-boundary";

/// In-memory application state plus a private upload directory that is removed on drop.
pub struct TestContext {
    pub state: AppState,
    pub upload_dir: PathBuf,
}

impl TestContext {
    pub fn new() -> Self {
        let upload_dir = std::env::temp_dir().join(format!("taskboard-it-{}", Uuid::new_v4()));
        let state = AppState::in_memory(
            TokenService::new(TEST_SECRET, 3600),
            AttachmentStorage::new(&upload_dir).with_max_bytes(1024),
            // Lowest cost bcrypt accepts; keeps the suite fast.
            4,
        );
        Self { state, upload_dir }
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

pub fn app(
    state: &AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = state.clone();
    App::new()
        .wrap(Logger::default())
        .configure(move |cfg| state.configure(cfg))
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// Status of a request whether the app answered it or a middleware rejected it.
pub async fn call_status(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    req: Request,
) -> StatusCode {
    match test::try_call_service(app, req).await {
        Ok(resp) => resp.status(),
        Err(err) => err.as_response_error().status_code(),
    }
}

pub async fn register(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    email: &str,
    password: &str,
) -> StatusCode {
    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    test::call_service(app, req).await.status()
}

pub async fn login(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    email: &str,
    password: &str,
) -> Result<String, String> {
    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    if status != StatusCode::OK {
        return Err(format!(
            "Login failed with {}: {}",
            status,
            String::from_utf8_lossy(&body)
        ));
    }
    let json: serde_json::Value =
        serde_json::from_slice(&body).map_err(|e| format!("Bad login body: {}", e))?;
    json["token"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| "Login response has no token".to_string())
}

pub async fn register_and_login(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    email: &str,
    password: &str,
) -> String {
    assert_eq!(register(app, email, password).await, StatusCode::CREATED);
    login(app, email, password).await.expect("login should succeed")
}

pub fn multipart_body(field: &str, filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
            b = MULTIPART_BOUNDARY,
            field = field,
            filename = filename,
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());
    body
}

pub fn upload_request(task_id: &str, token: &str, field: &str, filename: &str, content: &[u8]) -> Request {
    test::TestRequest::post()
        .uri(&format!("/tasks/{}/upload", task_id))
        .insert_header(bearer(token))
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
        ))
        .set_payload(multipart_body(field, filename, content))
        .to_request()
}
