//! deckforge - print-ready MTG deck PDFs
//!
//! Reads an Archidekt CSV export, fetches each card's artwork from Scryfall
//! (cached on disk), and writes one PDF page per physical card with a bleed
//! margin around it.

pub mod assemble;
pub mod config;
pub mod decklist;
pub mod error;
pub mod image_cache;
pub mod pipeline;
pub mod progress;
pub mod render;
pub mod scryfall;

// Re-exports for public API convenience
pub use config::Config;
pub use decklist::{
    calculate_total_operations, calculate_total_pages, parse_decklist, parse_decklist_file,
    Decklist, DecklistEntry,
};
pub use error::{CardFailure, DeckError, Result};
pub use image_cache::{ImageCache, ImageRequest};
pub use pipeline::{DeckPrinter, RunSummary};
pub use progress::{ConsoleReporter, QuietReporter, Reporter};
pub use render::{Page, PageGeometry, PageRenderer};
pub use scryfall::{ImageQuality, ScryfallCard, ScryfallClient};
