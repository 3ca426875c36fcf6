//! Wire-level tests for `VeoovibesClientImpl` against a mock controller.

use reqwest::Client;
use serde_json::json;
use veoovibes_core::vendor::StatusCode;
use veoovibes_core::{ApiError, VeoovibesClientImpl, VeoovibesControls, VeoovibesReads};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "secret";

fn client_for(server: &MockServer) -> VeoovibesClientImpl {
    VeoovibesClientImpl::new(Client::new(), server.address().to_string(), API_KEY)
}

fn succeeded() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "status": "succeeded" }))
}

/// Returns the decoded query pairs of every request the server received.
async fn received_queries(server: &MockServer) -> Vec<Vec<(String, String)>> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| r.url.query_pairs().into_owned().collect())
        .collect()
}

#[tokio::test]
async fn list_rooms_sends_api_key_and_applies_name_fallbacks() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/listrooms"))
        .and(query_param("api_key", API_KEY))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(include_str!("fixtures/listrooms.json"))
                .insert_header("content-type", "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let rooms = client_for(&server).list_rooms().await.unwrap();

    assert_eq!(rooms.len(), 3);
    assert_eq!(rooms["1"].name, "Kitchen");
    assert!(rooms["1"].is_available);
    assert_eq!(rooms["2"].name, "Living Room");
    assert!(!rooms["2"].is_available);
    assert_eq!(rooms["7"].name, "Room 7");
    assert!(rooms["7"].is_available);
}

#[tokio::test]
async fn api_key_is_first_query_parameter() {
    let server = MockServer::start().await;
    Mock::given(path("/api/v1/room_play"))
        .respond_with(succeeded())
        .mount(&server)
        .await;

    client_for(&server).room_play("4").await.unwrap();

    let queries = received_queries(&server).await;
    assert_eq!(
        queries[0],
        vec![
            ("api_key".to_string(), API_KEY.to_string()),
            ("room".to_string(), "4".to_string()),
        ]
    );
}

#[tokio::test]
async fn feedback_repeats_room_parameter() {
    let server = MockServer::start().await;
    Mock::given(path("/api/v1/get_room_feedback"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(include_str!("fixtures/get_room_feedback.json")),
        )
        .mount(&server)
        .await;

    let feedback = client_for(&server)
        .get_room_feedback(&["1".to_string(), "2".to_string()])
        .await
        .unwrap();

    let rooms: Vec<String> = received_queries(&server).await[0]
        .iter()
        .filter(|(k, _)| k == "room[]")
        .map(|(_, v)| v.clone())
        .collect();
    assert_eq!(rooms, vec!["1", "2"]);

    assert_eq!(
        feedback.text_for("1").and_then(|t| t.roomtitle.as_deref()),
        Some("New Song")
    );
    assert_eq!(feedback.volume_for("1"), Some(35.0));
    assert_eq!(feedback.volume_for("2"), None);
}

#[tokio::test]
async fn player_status_read_from_result() {
    let server = MockServer::start().await;
    Mock::given(path("/api/v1/room_player_status"))
        .and(query_param("room", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "succeeded",
            "result": {
                "status_code": "playing",
                "title": "Song",
                "current_volume": "40"
            }
        })))
        .mount(&server)
        .await;

    let status = client_for(&server).room_player_status("1").await.unwrap();

    assert_eq!(status.status_code(), StatusCode::Playing);
    assert_eq!(status.title.as_deref(), Some("Song"));
    assert_eq!(status.volume_percent(), Some(40.0));
}

#[tokio::test]
async fn player_status_read_from_top_level_body() {
    let server = MockServer::start().await;
    Mock::given(path("/api/v1/room_player_status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "succeeded",
            "status_code": "Paused",
            "is_playing": "0",
            "artist": "Band"
        })))
        .mount(&server)
        .await;

    let status = client_for(&server).room_player_status("1").await.unwrap();

    assert_eq!(status.status_code(), StatusCode::Paused);
    assert_eq!(status.is_playing_flag(), Some(false));
    assert_eq!(status.artist.as_deref(), Some("Band"));
}

#[tokio::test]
async fn rejected_envelope_names_endpoint() {
    let server = MockServer::start().await;
    Mock::given(path("/api/v1/room_stop"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "failed", "message": "room busy" })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).room_stop("1").await.unwrap_err();

    match err {
        ApiError::Rejected { endpoint, body } => {
            assert_eq!(endpoint, "room_stop");
            assert!(body.contains("room busy"));
        }
        other => panic!("Expected Rejected, got {:?}", other),
    }
}

#[tokio::test]
async fn http_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(path("/api/v1/listFavorites"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client_for(&server).list_favorites().await.unwrap_err();

    match err {
        ApiError::HttpStatus {
            endpoint,
            status,
            body,
        } => {
            assert_eq!(endpoint, "listFavorites");
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("Expected HttpStatus, got {:?}", other),
    }
}

#[tokio::test]
async fn non_json_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(path("/api/v1/listrooms"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).list_rooms().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn unreachable_controller_is_transient() {
    // Bind then release a port so nothing is listening on it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let host = listener.local_addr().unwrap().to_string();
    drop(listener);

    let client = VeoovibesClientImpl::new(Client::new(), host, API_KEY);
    let err = client.list_rooms().await.unwrap_err();

    match &err {
        ApiError::Http { endpoint, .. } => assert_eq!(endpoint, "listrooms"),
        other => panic!("Expected Http, got {:?}", other),
    }
    assert!(err.is_transient());
    assert_eq!(err.endpoint(), "listrooms");
}

#[tokio::test]
async fn list_favorites_falls_back_to_key_for_id() {
    let server = MockServer::start().await;
    Mock::given(path("/api/v1/listFavorites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "succeeded",
            "result": {
                "a": { "favId": "11", "name": "Jazz", "type": "Playlist" },
                "b": { "name": "Radio" }
            }
        })))
        .mount(&server)
        .await;

    let favorites = client_for(&server).list_favorites().await.unwrap();

    assert_eq!(favorites["a"].fav_id, "11");
    assert!(favorites["a"].is_music());
    assert_eq!(favorites["b"].fav_id, "b");
    assert!(!favorites["b"].is_music());
}

#[tokio::test]
async fn volume_set_sends_clamped_vol() {
    let server = MockServer::start().await;
    Mock::given(path("/api/v1/room_vol_set"))
        .and(query_param("room", "3"))
        .and(query_param("vol", "100"))
        .respond_with(succeeded())
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).room_vol_set("3", 150).await.unwrap();
}

#[tokio::test]
async fn play_favorite_sends_fav_id() {
    let server = MockServer::start().await;
    Mock::given(path("/api/v1/playfavorite"))
        .and(query_param("room", "2"))
        .and(query_param("favId", "11"))
        .respond_with(succeeded())
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).play_favorite("2", "11").await.unwrap();
}

#[tokio::test]
async fn step_commands_hit_their_endpoints() {
    let server = MockServer::start().await;
    for endpoint in ["room_next", "room_prev", "room_vol_up", "room_vol_down"] {
        Mock::given(path(format!("/api/v1/{}", endpoint)))
            .and(query_param("room", "5"))
            .respond_with(succeeded())
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client_for(&server);
    client.room_next("5").await.unwrap();
    client.room_prev("5").await.unwrap();
    client.room_vol_up("5").await.unwrap();
    client.room_vol_down("5").await.unwrap();
}
