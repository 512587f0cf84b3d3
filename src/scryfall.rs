//! Scryfall API client for card data and card images
//!
//! Uses blocking reqwest; the pipeline fetches one card at a time.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::{DeckError, Result};

/// Public Scryfall API
pub const DEFAULT_API_URL: &str = "https://api.scryfall.com";

/// Image downloads give up after this long; card lookups never time out
pub const IMAGE_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("deckforge/", env!("CARGO_PKG_VERSION"));

/// Scryfall card response.
///
/// Only the fields needed for printing are kept; everything else in the
/// payload is ignored and anything missing falls back to its default.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ScryfallCard {
    pub id: String,
    pub name: String,
    pub layout: String,
    pub image_uris: Option<ImageUris>,
    /// For double-faced cards, images are in card_faces
    pub card_faces: Vec<CardFace>,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ImageUris {
    pub small: Option<String>,
    pub normal: Option<String>,
    pub large: Option<String>,
    pub png: Option<String>,
    pub art_crop: Option<String>,
    pub border_crop: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct CardFace {
    pub name: String,
    pub image_uris: Option<ImageUris>,
}

/// Scryfall API error response
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ScryfallError {
    pub status: u16,
    pub code: String,
    pub details: String,
}

/// Which of Scryfall's image variants to print from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageQuality {
    #[default]
    Normal,
    Large,
    Png,
}

impl ImageQuality {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageQuality::Normal => "normal",
            ImageQuality::Large => "large",
            ImageQuality::Png => "png",
        }
    }
}

impl fmt::Display for ImageQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageQuality {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Ok(ImageQuality::Normal),
            "large" => Ok(ImageQuality::Large),
            "png" => Ok(ImageQuality::Png),
            other => Err(format!(
                "unknown image quality '{other}' (expected normal, large or png)"
            )),
        }
    }
}

impl ImageUris {
    /// URL of the requested variant, if Scryfall provides one
    pub fn url(&self, quality: ImageQuality) -> Option<&str> {
        let url = match quality {
            ImageQuality::Normal => &self.normal,
            ImageQuality::Large => &self.large,
            ImageQuality::Png => &self.png,
        };
        url.as_deref().filter(|u| !u.is_empty())
    }
}

impl ScryfallCard {
    /// True when each face is printed on its own page
    pub fn is_multi_faced(&self) -> bool {
        !self.card_faces.is_empty()
    }

    /// Finds a face by exact name
    pub fn face(&self, name: &str) -> Option<&CardFace> {
        self.card_faces.iter().find(|face| face.name == name)
    }
}

/// Blocking client for the Scryfall REST API
pub struct ScryfallClient {
    base_url: String,
    http: Client,
    image_http: Client,
}

impl ScryfallClient {
    /// Client for the public Scryfall API
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_API_URL)
    }

    /// Client for a Scryfall-compatible API at `base_url`
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Option::<Duration>::None)
            .build()?;
        let image_http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(IMAGE_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url,
            http,
            image_http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch a card from Scryfall by its Scryfall ID
    pub fn fetch_card(&self, card_id: &str) -> Result<ScryfallCard> {
        let url = format!("{}/cards/{}", self.base_url, card_id);

        log::debug!("Fetching card from Scryfall: {}", url);

        let response = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()?;

        let status = response.status();
        if status == StatusCode::OK {
            let body = response.text()?;
            return Ok(serde_json::from_str(&body)?);
        }

        if status == StatusCode::NOT_FOUND {
            return Err(DeckError::CardNotFound(card_id.to_string()));
        }

        match response.json::<ScryfallError>() {
            Ok(error) if !error.details.is_empty() => Err(DeckError::ApiResponse {
                status: status.as_u16(),
                details: error.details,
            }),
            _ => Err(DeckError::HttpStatus(status)),
        }
    }

    /// Fetch card image bytes
    pub fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
        log::debug!("Fetching image: {}", url);

        let response = self
            .image_http
            .get(url)
            .header(ACCEPT, "image/*")
            .send()?;

        if response.status().is_success() {
            Ok(response.bytes()?.to_vec())
        } else {
            Err(DeckError::HttpStatus(response.status()))
        }
    }
}

#[cfg(test)]
#[path = "scryfall_tests.rs"]
mod tests;
