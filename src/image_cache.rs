//! On-disk cache for downloaded card images.
//!
//! One file per (card ID, face, quality). A file at the expected path is
//! always a hit; entries are never revalidated or expired.

use std::path::{Path, PathBuf};

use crate::error::{DeckError, Result};
use crate::scryfall::{ImageQuality, ImageUris, ScryfallClient};

/// Cache directory used when none is configured, relative to the working directory
pub const DEFAULT_CACHE_DIR: &str = ".card_cache";

const IMAGE_EXTENSION: &str = "jpg";

/// What to download: a card (or one face of it) at a given quality
#[derive(Debug, Clone, Copy)]
pub struct ImageRequest<'a> {
    pub card_id: &'a str,
    pub face_name: Option<&'a str>,
    /// Image URLs already known from card data; looked up on Scryfall when absent
    pub image_uris: Option<&'a ImageUris>,
    pub quality: ImageQuality,
}

impl<'a> ImageRequest<'a> {
    pub fn new(card_id: &'a str, quality: ImageQuality) -> Self {
        Self {
            card_id,
            face_name: None,
            image_uris: None,
            quality,
        }
    }

    pub fn face(mut self, face_name: &'a str) -> Self {
        self.face_name = Some(face_name);
        self
    }

    pub fn image_uris(mut self, uris: Option<&'a ImageUris>) -> Self {
        self.image_uris = uris;
        self
    }

    fn subject(&self) -> String {
        match self.face_name {
            Some(face) => format!("{} ({})", face, self.card_id),
            None => self.card_id.to_string(),
        }
    }
}

/// Persistent cache for card images
/// Stores images as files in the cache directory
#[derive(Debug, Clone)]
pub struct ImageCache {
    cache_dir: PathBuf,
}

impl ImageCache {
    /// Opens the cache at `cache_dir`, creating the directory if needed
    pub fn open(cache_dir: impl Into<PathBuf>) -> Result<Self> {
        let cache_dir = cache_dir.into();

        std::fs::create_dir_all(&cache_dir).map_err(|e| {
            DeckError::Cache(format!(
                "failed to create cache directory {}: {}",
                cache_dir.display(),
                e
            ))
        })?;

        log::info!("Image cache directory: {:?}", cache_dir);
        Ok(Self { cache_dir })
    }

    /// Get the cache directory path
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Cache key: card ID, sanitized face name when there is one, and quality
    pub fn cache_key(card_id: &str, face_name: Option<&str>, quality: ImageQuality) -> String {
        match face_name.filter(|name| !name.is_empty()) {
            Some(name) => format!("{}_{}_{}", card_id, sanitize_filename(name), quality),
            None => format!("{}_{}", card_id, quality),
        }
    }

    /// Get the full path for a cached image
    pub fn path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.{}", key, IMAGE_EXTENSION))
    }

    /// Check if an image is cached
    pub fn contains(&self, key: &str) -> bool {
        self.path(key).exists()
    }

    /// Store an image in the cache and return its path
    pub fn insert(&self, key: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path(key);
        // Write beside the final name first so an interrupted write never looks like a hit
        let partial = path.with_extension(format!("{}.part", IMAGE_EXTENSION));
        std::fs::write(&partial, bytes)?;
        std::fs::rename(&partial, &path)?;
        log::debug!("Cached image {}", key);
        Ok(path)
    }

    /// Returns the local path of the requested image, downloading it on a cache miss
    pub fn fetch_image(&self, client: &ScryfallClient, request: &ImageRequest<'_>) -> Result<PathBuf> {
        let key = Self::cache_key(request.card_id, request.face_name, request.quality);
        let path = self.path(&key);

        // Check cache first
        if path.exists() {
            log::debug!("Image cache hit for {}", key);
            return Ok(path);
        }

        log::info!("Image cache miss for {}, fetching from Scryfall", key);
        let url = resolve_image_url(client, request)?;
        let bytes = client.fetch_image(&url)?;

        self.insert(&key, &bytes)
    }
}

/// Picks the image URL from known card data, or looks the card up when there is none
fn resolve_image_url(client: &ScryfallClient, request: &ImageRequest<'_>) -> Result<String> {
    if let Some(url) = request.image_uris.and_then(|uris| uris.url(request.quality)) {
        return Ok(url.to_string());
    }

    log::debug!(
        "No {} image URL known for {}, looking the card up",
        request.quality,
        request.subject()
    );
    let card = client.fetch_card(request.card_id)?;

    let face_uris = request
        .face_name
        .and_then(|name| card.face(name))
        .and_then(|face| face.image_uris.as_ref());

    face_uris
        .or(card.image_uris.as_ref())
        .and_then(|uris| uris.url(request.quality))
        .map(str::to_string)
        .ok_or_else(|| DeckError::NoImageAvailable {
            card: request.subject(),
            quality: request.quality.to_string(),
        })
}

/// Makes a card name safe to use inside a file name
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ' ' | '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}
