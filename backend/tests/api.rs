use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use hangouts::{
    constants::USER_ID_HEADER,
    db::MemoryStore,
    handlers::{create_router, AppState},
    models::{NewUser, ProfileUpdate, User},
    services::EngineSettings,
    HangoutEngine, Uuid,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    host: User,
    bob: User,
    carol: User,
    dave: User,
}

/// host -> {bob, carol}; dave -> {carol}.
async fn spawn_app() -> TestApp {
    let engine = HangoutEngine::new(Arc::new(MemoryStore::new()), EngineSettings::default());

    let mut users = Vec::new();
    for name in ["host", "bob", "carol", "dave"] {
        let user = engine
            .register_user(NewUser {
                name: name.to_string(),
                bio: String::new(),
                profile_image_url: format!("https://img.example/{name}.png"),
            })
            .await
            .unwrap();
        users.push(user);
    }
    let [host, bob, carol, dave]: [User; 4] = users.try_into().unwrap();

    let host = engine
        .update_profile(host.id, host.id, ProfileUpdate {
            friend_ids: Some(vec![bob.id, carol.id]),
            ..ProfileUpdate::default()
        })
        .await
        .unwrap();
    let dave = engine
        .update_profile(dave.id, dave.id, ProfileUpdate {
            friend_ids: Some(vec![carol.id]),
            ..ProfileUpdate::default()
        })
        .await
        .unwrap();

    TestApp {
        router: create_router(AppState::new(engine)),
        host,
        bob,
        carol,
        dave,
    }
}

async fn call(router: &Router, method: Method, uri: &str, user: Option<Uuid>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user_id) = user {
        builder = builder.header(USER_ID_HEADER, user_id.to_string());
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app().await;
    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_requires_user_header() {
    let app = spawn_app().await;

    let (status, body) = call(&app.router, Method::GET, "/api/hangouts", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHENTICATED");

    let request = Request::builder()
        .uri("/api/hangouts")
        .header(USER_ID_HEADER, "not-a-uuid")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_approval_flow_over_http() {
    let app = spawn_app().await;

    let (status, hangout) = call(
        &app.router,
        Method::POST,
        "/api/hangouts",
        Some(app.host.id),
        Some(json!({
            "participant_ids": [app.bob.id, app.dave.id],
            "activity_description": "Karaoke night",
            "details": "Room 4"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(hangout["status"], "pending_approval");
    assert_eq!(hangout["host"]["name"], "host");
    assert_eq!(hangout["participants"].as_array().unwrap().len(), 2);
    let hangout_id = hangout["id"].as_str().unwrap().to_string();

    // dave must wait for carol's approval.
    let (status, body) = call(&app.router, Method::PUT, &format!("/api/hangouts/{hangout_id}/accept"), Some(app.dave.id), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let (status, requests) = call(&app.router, Method::GET, "/api/connection-requests", Some(app.carol.id), None).await;
    assert_eq!(status, StatusCode::OK);
    let requests = requests.as_array().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["requested"]["name"], "dave");
    let request_id = requests[0]["id"].as_str().unwrap().to_string();

    let (status, _) = call(
        &app.router,
        Method::PUT,
        &format!("/api/connection-requests/{request_id}"),
        Some(app.bob.id),
        Some(json!({ "decision": "approved" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call(
        &app.router,
        Method::PUT,
        &format!("/api/connection-requests/{request_id}"),
        Some(app.carol.id),
        Some(json!({ "decision": "approved" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = call(
        &app.router,
        Method::PUT,
        &format!("/api/connection-requests/{request_id}"),
        Some(app.carol.id),
        Some(json!({ "decision": "rejected" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (status, hangouts) = call(&app.router, Method::GET, "/api/hangouts", Some(app.dave.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hangouts[0]["status"], "pending");
    assert_eq!(hangouts[0]["can_respond"], true);

    call(&app.router, Method::PUT, &format!("/api/hangouts/{hangout_id}/accept"), Some(app.bob.id), None).await;
    let (status, hangout) = call(&app.router, Method::PUT, &format!("/api/hangouts/{hangout_id}/accept"), Some(app.dave.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hangout["status"], "confirmed");
}

#[tokio::test]
async fn test_cancel_over_http() {
    let app = spawn_app().await;

    let (_, hangout) = call(
        &app.router,
        Method::POST,
        "/api/hangouts",
        Some(app.host.id),
        Some(json!({
            "participant_ids": [app.dave.id],
            "activity_description": "Bowling"
        })),
    )
    .await;
    let hangout_id = hangout["id"].as_str().unwrap().to_string();

    let (status, _) = call(&app.router, Method::DELETE, &format!("/api/hangouts/{hangout_id}"), Some(app.dave.id), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call(&app.router, Method::DELETE, &format!("/api/hangouts/{hangout_id}"), Some(app.host.id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, requests) = call(&app.router, Method::GET, "/api/connection-requests", Some(app.carol.id), None).await;
    assert!(requests.as_array().unwrap().is_empty());

    let (_, hangouts) = call(&app.router, Method::GET, "/api/hangouts", Some(app.host.id), None).await;
    assert!(hangouts.as_array().unwrap().is_empty());

    let missing = Uuid::new_v4();
    let (status, _) = call(&app.router, Method::PUT, &format!("/api/hangouts/{missing}/accept"), Some(app.host.id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_profile_update_over_http() {
    let app = spawn_app().await;

    let (status, _) = call(
        &app.router,
        Method::PUT,
        &format!("/api/users/{}", app.host.id),
        Some(app.bob.id),
        Some(json!({ "bio": "hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, user) = call(
        &app.router,
        Method::PUT,
        &format!("/api/users/{}", app.bob.id),
        Some(app.bob.id),
        Some(json!({ "bio": "Plays the ukulele", "friend_ids": [app.host.id, app.carol.id] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["bio"], "Plays the ukulele");
    assert_eq!(user["first_degree_friend_ids"].as_array().unwrap().len(), 2);

    let (status, body) = call(
        &app.router,
        Method::POST,
        "/api/hangouts",
        Some(app.host.id),
        Some(json!({ "participant_ids": [], "activity_description": "Nothing" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, users) = call(&app.router, Method::GET, "/api/users", Some(app.host.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 4);
}
