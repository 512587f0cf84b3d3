//! Error types for deckforge

use thiserror::Error;

/// A per-card failure that was recovered from during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFailure {
    /// Card identifier or face name the failure is about
    pub subject: String,
    pub message: String,
}

impl CardFailure {
    pub fn new(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CardFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.subject, self.message)
    }
}

/// Unified error type for decklist, API, cache and PDF operations
#[derive(Debug, Error)]
pub enum DeckError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The decklist could not be read as CSV at all
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid CSV format at line {line}: expected 3 fields, got {got}")]
    InvalidFormat { line: usize, got: usize },

    #[error("invalid quantity '{value}' at line {line}")]
    InvalidQuantity { line: usize, value: String },

    #[error("quantity must be positive at line {line}, got {value}")]
    NonPositiveQuantity { line: usize, value: i64 },

    #[error("invalid Scryfall ID format '{id}' at line {line}")]
    InvalidCardId { line: usize, id: String },

    /// HTTP request failed (network error, timeout, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Scryfall answered with a structured error body
    #[error("Scryfall error {status}: {details}")]
    ApiResponse { status: u16, details: String },

    /// HTTP error status code
    #[error("HTTP error: {0}")]
    HttpStatus(reqwest::StatusCode),

    /// Card not found on Scryfall
    #[error("Card not found on Scryfall: {0}")]
    CardNotFound(String),

    /// No image of the requested quality for card
    #[error("No {quality} image available for card: {card}")]
    NoImageAvailable { card: String, quality: String },

    /// Image cache directory could not be prepared
    #[error("Cache error: {0}")]
    Cache(String),

    /// Image decoding or encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// PDF construction or serialization error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("invalid bleed {0}: must be a finite, non-negative number of millimeters")]
    InvalidBleed(f32),

    /// The assembler was handed nothing to write
    #[error("no pages to assemble")]
    EmptyDocument,

    /// Every entry failed, so the run produced no pages
    #[error("no pages generated ({} card error(s))", failures.len())]
    NoPages { failures: Vec<CardFailure> },
}

/// Result type alias for deckforge operations
pub type Result<T> = std::result::Result<T, DeckError>;
