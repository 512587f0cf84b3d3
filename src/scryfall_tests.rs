//! Tests for the Scryfall API client.

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{CardFace, ImageQuality, ImageUris, ScryfallCard, ScryfallClient};
use crate::error::DeckError;

const BOLT_ID: &str = "a65e485b-03a2-4634-9218-f5bb7c104d41";
const DELVER_ID: &str = "11bf83bb-c95b-4b4f-9a56-ce7a1816307a";

fn scryfall_error_json(status: u16, code: &str, details: &str) -> serde_json::Value {
    serde_json::json!({
        "object": "error",
        "status": status,
        "code": code,
        "details": details
    })
}

// ── deserialization ──────────────────────────────────────────────────

#[test]
fn deserialize_single_faced_card() {
    let card_json = r#"{
        "object": "card",
        "id": "a65e485b-03a2-4634-9218-f5bb7c104d41",
        "name": "Lightning Bolt",
        "layout": "normal",
        "cmc": 1.0,
        "legalities": { "modern": "legal" },
        "image_uris": {
            "small": "https://example.com/small.jpg",
            "normal": "https://example.com/normal.jpg",
            "large": "https://example.com/large.jpg",
            "png": "https://example.com/card.png"
        }
    }"#;

    let card: ScryfallCard = serde_json::from_str(card_json).unwrap();
    assert_eq!(card.name, "Lightning Bolt");
    assert!(!card.is_multi_faced());

    let uris = card.image_uris.as_ref().unwrap();
    assert_eq!(uris.url(ImageQuality::Normal), Some("https://example.com/normal.jpg"));
    assert_eq!(uris.url(ImageQuality::Large), Some("https://example.com/large.jpg"));
    assert_eq!(uris.url(ImageQuality::Png), Some("https://example.com/card.png"));
}

#[test]
fn deserialize_double_faced_card() {
    let card_json = r#"{
        "name": "Delver of Secrets // Insectile Aberration",
        "layout": "transform",
        "card_faces": [
            {
                "name": "Delver of Secrets",
                "mana_cost": "{U}",
                "image_uris": { "normal": "https://example.com/front.jpg" }
            },
            {
                "name": "Insectile Aberration",
                "image_uris": { "normal": "https://example.com/back.jpg" }
            }
        ]
    }"#;

    let card: ScryfallCard = serde_json::from_str(card_json).unwrap();
    assert!(card.is_multi_faced());
    assert!(card.image_uris.is_none());
    assert_eq!(card.card_faces.len(), 2);

    let back = card.face("Insectile Aberration").unwrap();
    assert_eq!(
        back.image_uris.as_ref().unwrap().url(ImageQuality::Normal),
        Some("https://example.com/back.jpg")
    );
    assert!(card.face("Nonexistent").is_none());
}

#[test]
fn deserialize_minimal_card_defaults_missing_fields() {
    let card: ScryfallCard = serde_json::from_str("{}").unwrap();
    assert_eq!(card, ScryfallCard::default());
    assert!(card.card_faces.is_empty());
    assert!(card.image_uris.is_none());
}

#[test]
fn image_url_ignores_empty_strings() {
    let uris = ImageUris {
        normal: Some(String::new()),
        ..Default::default()
    };
    assert_eq!(uris.url(ImageQuality::Normal), None);
    assert_eq!(uris.url(ImageQuality::Large), None);
}

#[test]
fn image_quality_parses_case_insensitively() {
    assert_eq!("normal".parse::<ImageQuality>(), Ok(ImageQuality::Normal));
    assert_eq!("LARGE".parse::<ImageQuality>(), Ok(ImageQuality::Large));
    assert_eq!("Png".parse::<ImageQuality>(), Ok(ImageQuality::Png));
    assert!("art_crop".parse::<ImageQuality>().is_err());
    assert_eq!(ImageQuality::default(), ImageQuality::Normal);
    assert_eq!(ImageQuality::Png.to_string(), "png");
}

#[test]
fn card_face_defaults() {
    let face: CardFace = serde_json::from_str(r#"{ "name": "Front" }"#).unwrap();
    assert_eq!(face.name, "Front");
    assert!(face.image_uris.is_none());
}

#[test]
fn base_url_trailing_slash_is_trimmed() {
    let client = ScryfallClient::with_base_url("https://api.example.com/").unwrap();
    assert_eq!(client.base_url(), "https://api.example.com");
}

// ── fetch_card ───────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_card_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/cards/{BOLT_ID}")))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": BOLT_ID,
            "name": "Lightning Bolt",
            "layout": "normal",
            "prices": { "eur": "1.50" },
            "image_uris": { "normal": "https://example.com/image.jpg" }
        })))
        .mount(&mock_server)
        .await;

    let base_url = mock_server.uri();
    let result = tokio::task::spawn_blocking(move || {
        ScryfallClient::with_base_url(&base_url)
            .unwrap()
            .fetch_card(BOLT_ID)
    })
    .await
    .unwrap();

    let card = result.unwrap();
    assert_eq!(card.id, BOLT_ID);
    assert_eq!(card.name, "Lightning Bolt");
    assert_eq!(card.layout, "normal");
}

#[tokio::test]
async fn fetch_card_double_faced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/cards/{DELVER_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": DELVER_ID,
            "name": "Delver of Secrets // Insectile Aberration",
            "card_faces": [
                { "name": "Delver of Secrets", "image_uris": { "normal": "https://example.com/front.jpg" } },
                { "name": "Insectile Aberration", "image_uris": { "normal": "https://example.com/back.jpg" } }
            ]
        })))
        .mount(&mock_server)
        .await;

    let base_url = mock_server.uri();
    let card = tokio::task::spawn_blocking(move || {
        ScryfallClient::with_base_url(&base_url)
            .unwrap()
            .fetch_card(DELVER_ID)
    })
    .await
    .unwrap()
    .unwrap();

    let names: Vec<&str> = card.card_faces.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Delver of Secrets", "Insectile Aberration"]);
}

#[tokio::test]
async fn fetch_card_404_returns_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/cards/{BOLT_ID}")))
        .respond_with(ResponseTemplate::new(404).set_body_json(scryfall_error_json(
            404,
            "not_found",
            "No card found with the given ID or set code and collector number.",
        )))
        .mount(&mock_server)
        .await;

    let base_url = mock_server.uri();
    let result = tokio::task::spawn_blocking(move || {
        ScryfallClient::with_base_url(&base_url)
            .unwrap()
            .fetch_card(BOLT_ID)
    })
    .await
    .unwrap();

    match result {
        Err(DeckError::CardNotFound(id)) => assert_eq!(id, BOLT_ID),
        other => panic!("Expected DeckError::CardNotFound, got: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_card_error_body_returns_api_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/cards/{BOLT_ID}")))
        .respond_with(ResponseTemplate::new(429).set_body_json(scryfall_error_json(
            429,
            "rate_limited",
            "Too many requests",
        )))
        .mount(&mock_server)
        .await;

    let base_url = mock_server.uri();
    let result = tokio::task::spawn_blocking(move || {
        ScryfallClient::with_base_url(&base_url)
            .unwrap()
            .fetch_card(BOLT_ID)
    })
    .await
    .unwrap();

    match result {
        Err(DeckError::ApiResponse { status, details }) => {
            assert_eq!(status, 429);
            assert_eq!(details, "Too many requests");
        }
        other => panic!("Expected DeckError::ApiResponse, got: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_card_plain_500_returns_http_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/cards/{BOLT_ID}")))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&mock_server)
        .await;

    let base_url = mock_server.uri();
    let result = tokio::task::spawn_blocking(move || {
        ScryfallClient::with_base_url(&base_url)
            .unwrap()
            .fetch_card(BOLT_ID)
    })
    .await
    .unwrap();

    match result {
        Err(DeckError::HttpStatus(status)) => {
            assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        }
        other => panic!("Expected DeckError::HttpStatus(500), got: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_card_other_success_status_is_rejected() {
    let mock_server = MockServer::start().await;

    // A card body behind anything but 200 is still a failure
    Mock::given(method("GET"))
        .and(path(format!("/cards/{BOLT_ID}")))
        .respond_with(ResponseTemplate::new(203).set_body_json(serde_json::json!({
            "id": BOLT_ID,
            "name": "Lightning Bolt"
        })))
        .mount(&mock_server)
        .await;

    let base_url = mock_server.uri();
    let result = tokio::task::spawn_blocking(move || {
        ScryfallClient::with_base_url(&base_url)
            .unwrap()
            .fetch_card(BOLT_ID)
    })
    .await
    .unwrap();

    match result {
        Err(DeckError::HttpStatus(status)) => assert_eq!(status.as_u16(), 203),
        other => panic!("Expected DeckError::HttpStatus(203), got: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_card_malformed_body_returns_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/cards/{BOLT_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let base_url = mock_server.uri();
    let result = tokio::task::spawn_blocking(move || {
        ScryfallClient::with_base_url(&base_url)
            .unwrap()
            .fetch_card(BOLT_ID)
    })
    .await
    .unwrap();

    assert!(matches!(result, Err(DeckError::Parse(_))));
}

// ── fetch_image ──────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_image_success() {
    let mock_server = MockServer::start().await;

    let image_bytes = vec![0x89, 0x50, 0x4E, 0x47]; // PNG header bytes

    Mock::given(method("GET"))
        .and(path("/image.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(image_bytes.clone()))
        .mount(&mock_server)
        .await;

    let base_url = mock_server.uri();
    let url = format!("{}/image.png", base_url);
    let result = tokio::task::spawn_blocking(move || {
        ScryfallClient::with_base_url(&base_url)
            .unwrap()
            .fetch_image(&url)
    })
    .await
    .unwrap();

    assert_eq!(result.unwrap(), image_bytes);
}

#[tokio::test]
async fn fetch_image_404_returns_http_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let base_url = mock_server.uri();
    let url = format!("{}/missing.png", base_url);
    let result = tokio::task::spawn_blocking(move || {
        ScryfallClient::with_base_url(&base_url)
            .unwrap()
            .fetch_image(&url)
    })
    .await
    .unwrap();

    match result {
        Err(DeckError::HttpStatus(status)) => {
            assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
        }
        other => panic!("Expected DeckError::HttpStatus(404), got: {other:?}"),
    }
}

// Integration tests (require network access)
#[test]
#[ignore] // Run with: cargo test -- --ignored
fn fetch_card_live_integration() {
    let card = ScryfallClient::new().unwrap().fetch_card(BOLT_ID).unwrap();
    assert_eq!(card.id, BOLT_ID);
    assert!(card.image_uris.is_some());
}
