mod common;

use actix_web::{http::StatusCode, test};
use pretty_assertions::assert_eq;
use serde_json::json;
use taskboard::auth::TokenService;
use uuid::Uuid;

use common::{app, bearer, call_status, login, register, TestContext, TEST_SECRET};

#[test_log::test(actix_rt::test)]
async fn test_register_and_login_flow() {
    let ctx = TestContext::new();
    let app = test::init_service(app(&ctx.state)).await;

    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({ "email": "a@x.com", "password": "secret1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "message": "User registered successfully" }));

    // Same email again is a conflict.
    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({ "email": "a@x.com", "password": "another1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "User already exists");

    let token = login(&app, "a@x.com", "secret1").await.expect("login");
    let claims = ctx.state.tokens.verify(&token).expect("token verifies");

    let req = test::TestRequest::get()
        .uri("/auth/me")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let profile: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(
        profile,
        json!({ "id": claims.sub.to_string(), "email": "a@x.com" })
    );
}

#[test_log::test(actix_rt::test)]
async fn test_invalid_registration_inputs() {
    let ctx = TestContext::new();
    let app = test::init_service(app(&ctx.state)).await;

    let test_cases = vec![
        (json!({ "password": "secret1" }), "missing email"),
        (json!({ "email": "a@x.com" }), "missing password"),
        (json!({ "email": "invalid-email", "password": "secret1" }), "invalid email format"),
        (json!({ "email": "a@x.com", "password": "12345" }), "password too short"),
    ];

    for (payload, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body = test::read_body(resp).await;
        assert_eq!(
            status,
            StatusCode::BAD_REQUEST,
            "Test case failed: {}. Body: {:?}",
            description,
            String::from_utf8_lossy(&body)
        );
    }
}

#[test_log::test(actix_rt::test)]
async fn test_invalid_login_inputs() {
    let ctx = TestContext::new();
    let app = test::init_service(app(&ctx.state)).await;
    assert_eq!(register(&app, "login@x.com", "secret1").await, StatusCode::CREATED);

    let test_cases = vec![
        (json!({ "password": "secret1" }), StatusCode::BAD_REQUEST, "missing email"),
        (json!({ "email": "login@x.com" }), StatusCode::BAD_REQUEST, "missing password"),
        (
            json!({ "email": "invalid-email", "password": "secret1" }),
            StatusCode::BAD_REQUEST,
            "invalid email format",
        ),
        (
            json!({ "email": "login@x.com", "password": "" }),
            StatusCode::BAD_REQUEST,
            "empty password",
        ),
        (
            json!({ "email": "login@x.com", "password": "wrong-password" }),
            StatusCode::UNAUTHORIZED,
            "incorrect password",
        ),
        (
            json!({ "email": "nobody@x.com", "password": "secret1" }),
            StatusCode::UNAUTHORIZED,
            "non-existent user",
        ),
    ];

    for (payload, expected_status, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(status, expected_status, "Test case failed: {}", description);
        if status == StatusCode::UNAUTHORIZED {
            assert_eq!(body["message"], "Invalid email or password", "{}", description);
        }
    }
}

#[test_log::test(actix_rt::test)]
async fn test_profile_requires_valid_token() {
    let ctx = TestContext::new();
    let app = test::init_service(app(&ctx.state)).await;

    let req = test::TestRequest::get().uri("/auth/me").to_request();
    assert_eq!(call_status(&app, req).await, StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/auth/me")
        .insert_header(bearer("garbage"))
        .to_request();
    assert_eq!(call_status(&app, req).await, StatusCode::UNAUTHORIZED);

    let foreign = TokenService::new("some-other-secret", 3600)
        .generate(Uuid::new_v4())
        .unwrap();
    let req = test::TestRequest::get()
        .uri("/auth/me")
        .insert_header(bearer(&foreign))
        .to_request();
    assert_eq!(call_status(&app, req).await, StatusCode::UNAUTHORIZED);

    // Correctly signed but for a user that does not exist.
    let orphan = ctx.state.tokens.generate(Uuid::new_v4()).unwrap();
    let req = test::TestRequest::get()
        .uri("/auth/me")
        .insert_header(bearer(&orphan))
        .to_request();
    assert_eq!(call_status(&app, req).await, StatusCode::NOT_FOUND);
}

#[test_log::test(actix_rt::test)]
async fn test_expired_token_is_rejected() {
    let ctx = TestContext::new();
    let app = test::init_service(app(&ctx.state)).await;
    assert_eq!(register(&app, "late@x.com", "secret1").await, StatusCode::CREATED);
    let token = login(&app, "late@x.com", "secret1").await.unwrap();
    let user_id = ctx.state.tokens.verify(&token).unwrap().sub;

    // Same key, but issued with a lifetime that is already over.
    let expired = TokenService::new(TEST_SECRET, -60).generate(user_id).unwrap();
    let req = test::TestRequest::get()
        .uri("/tasks")
        .insert_header(bearer(&expired))
        .to_request();
    assert_eq!(call_status(&app, req).await, StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/tasks")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(call_status(&app, req).await, StatusCode::OK);
}
