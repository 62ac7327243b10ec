use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use playdeck_dto::bookings::AvailabilityQuery;
use playdeck_dto::client::{Client, ClientConfig, Error};
use playdeck_dto::diagnostics::{Diagnostic, ErrorKind, RecordedDiagnostics};
use playdeck_dto::games::GameListQuery;
use playdeck_dto::types::{PlatformType, ResourceId};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type SeenHeaders = Arc<Mutex<Vec<Option<String>>>>;

fn game(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "rating": 4.5,
        "platform": "ps5",
        "genre": { "id": 1, "name": "Action" },
        "maxPlayers": 2
    })
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{address}/api/")
}

fn client(base: &str, token: Option<&str>, diagnostics: &RecordedDiagnostics) -> Client {
    let config = ClientConfig::new()
        .with_url(base)
        .unwrap()
        .with_optional_token(token)
        .with_timeout(Duration::from_millis(300))
        .with_diagnostics(Arc::new(diagnostics.clone()));
    Client::new(config).unwrap()
}

async fn me(State(seen): State<SeenHeaders>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    seen.lock().unwrap().push(auth.clone());

    match auth.as_deref() {
        Some("Bearer s3cret") => (
            StatusCode::OK,
            Json(json!({ "data": { "id": 1, "email": "ana@example.com" } })),
        ),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Not authenticated" })),
        ),
    }
}

fn app(seen: SeenHeaders) -> Router {
    Router::new()
        .route(
            "/api/games",
            get(|| async { Json(json!([game(1, "Gran Turismo 7"), game(2, "God of War")])) }),
        )
        .route(
            "/api/consoles",
            get(|| async {
                Json(json!({ "data": [{ "id": 1, "name": "Station 1", "platform": "ps5" }] }))
            }),
        )
        .route(
            "/api/events",
            get(|| async { Json(json!({ "items": [] })) }),
        )
        .route(
            "/api/games/:id",
            get(|| async { (StatusCode::NOT_FOUND, Json(json!({ "message": "Game not found" }))) })
                .delete(|| async { StatusCode::NO_CONTENT }),
        )
        .route(
            "/api/dashboard/stats",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
        )
        .route(
            "/api/bookings",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(json!([]))
            }),
        )
        .route(
            "/api/bookings/check-availability",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                Json(json!({
                    "available": params.contains_key("startsAt") && params.contains_key("endsAt"),
                    "availableConsoles": [params.get("platform").cloned().unwrap_or_default()],
                }))
            }),
        )
        .route("/api/me", get(me))
        .with_state(seen)
}

#[tokio::test]
async fn lists_accept_bare_and_wrapped_bodies() {
    let diagnostics = RecordedDiagnostics::new();
    let base = serve(app(Default::default())).await;
    let client = client(&base, None, &diagnostics);

    let games = client.games_list(&GameListQuery::default()).await.unwrap();
    assert_eq!(games.len(), 2);
    assert_eq!(games[0].title, "Gran Turismo 7");

    let consoles = client.consoles_list(&Default::default()).await.unwrap();
    assert_eq!(consoles.len(), 1);
    assert_eq!(consoles[0].platform, PlatformType::Ps5);

    assert!(diagnostics.entries().is_empty());
}

#[tokio::test]
async fn non_list_collection_is_malformed() {
    let diagnostics = RecordedDiagnostics::new();
    let base = serve(app(Default::default())).await;
    let client = client(&base, None, &diagnostics);

    let err = client.events_list(&Default::default()).await.unwrap_err();
    assert!(matches!(err, Error::MalformedResponse(_)), "{err:?}");
    assert_eq!(diagnostics.kinds(), vec![ErrorKind::MalformedResponse]);
}

#[tokio::test]
async fn token_is_sent_as_bearer() {
    let diagnostics = RecordedDiagnostics::new();
    let seen = SeenHeaders::default();
    let base = serve(app(seen.clone())).await;

    let user = client(&base, Some("s3cret"), &diagnostics)
        .auth_me()
        .await
        .unwrap();
    assert_eq!(user.email, "ana@example.com");
    assert_eq!(user.id, ResourceId::Int(1));
    assert_eq!(
        seen.lock().unwrap().as_slice(),
        &[Some("Bearer s3cret".to_string())]
    );
}

#[tokio::test]
async fn missing_token_still_sends_the_request() {
    let diagnostics = RecordedDiagnostics::new();
    let seen = SeenHeaders::default();
    let base = serve(app(seen.clone())).await;
    let client = client(&base, None, &diagnostics);
    assert!(!client.is_authenticated());

    let err = client.auth_me().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ClientError);
    assert_eq!(err.status().map(|s| s.as_u16()), Some(401));
    assert_eq!(seen.lock().unwrap().as_slice(), &[None]);
}

#[tokio::test]
async fn server_error_keeps_status() {
    let diagnostics = RecordedDiagnostics::new();
    let base = serve(app(Default::default())).await;

    let err = client(&base, None, &diagnostics)
        .dashboard_stats()
        .await
        .unwrap_err();
    match &err {
        Error::ServerError(status, body) => {
            assert_eq!(status.as_u16(), 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(err.to_string(), "server error: 503 Service Unavailable: maintenance");

    assert_eq!(
        diagnostics.entries(),
        vec![Diagnostic::RequestFailed {
            kind: ErrorKind::ServerError,
            endpoint: format!("{base}dashboard/stats"),
            status: Some(503),
        }]
    );
}

#[tokio::test]
async fn not_found_is_a_client_error() {
    let diagnostics = RecordedDiagnostics::new();
    let base = serve(app(Default::default())).await;

    let err = client(&base, None, &diagnostics)
        .games_get(&ResourceId::Int(99))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.kind(), ErrorKind::ClientError);
    assert_eq!(err.to_string(), "client error: 404 Not Found: Game not found");
}

#[tokio::test]
async fn delete_ignores_empty_body() {
    let diagnostics = RecordedDiagnostics::new();
    let base = serve(app(Default::default())).await;

    let ok = client(&base, None, &diagnostics)
        .games_delete(&ResourceId::Int(1))
        .await
        .unwrap();
    assert_eq!(ok, playdeck_dto::Ok);
}

#[tokio::test]
async fn slow_response_times_out() {
    let diagnostics = RecordedDiagnostics::new();
    let base = serve(app(Default::default())).await;

    let err = client(&base, None, &diagnostics)
        .bookings_list(&Default::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Timeout(_)), "{err:?}");
    assert_eq!(err.status(), None);
    assert_eq!(diagnostics.kinds(), vec![ErrorKind::Timeout]);
}

#[tokio::test]
async fn closed_port_is_unreachable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let diagnostics = RecordedDiagnostics::new();
    let err = client(&format!("http://{address}/api/"), None, &diagnostics)
        .games_list(&Default::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NetworkUnreachable(_)), "{err:?}");
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn availability_sends_query() {
    let diagnostics = RecordedDiagnostics::new();
    let base = serve(app(Default::default())).await;
    let starts_at = chrono::Utc::now();

    let result = client(&base, None, &diagnostics)
        .bookings_check_availability(&AvailabilityQuery {
            console_id: None,
            platform: Some(PlatformType::Ps4),
            starts_at,
            ends_at: starts_at + chrono::Duration::hours(2),
        })
        .await
        .unwrap();
    assert!(result.available);
    assert_eq!(result.available_consoles, vec![ResourceId::from("ps4")]);
}
