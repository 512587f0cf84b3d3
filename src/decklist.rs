//! Decklist parsing for Archidekt CSV exports.
//!
//! The export is headerless, one row per decklist line:
//! `quantity,"card name",scryfall_id`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;

use crate::error::{DeckError, Result};
use crate::scryfall::ScryfallCard;

lazy_static! {
    static ref SCRYFALL_ID: Regex =
        Regex::new(r"^[a-f0-9]{8}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{12}$")
            .expect("Scryfall ID pattern is valid");
}

const FIELDS_PER_ROW: usize = 3;

/// A single line of the decklist
#[derive(Debug, Clone, PartialEq)]
pub struct DecklistEntry {
    pub quantity: u32,
    /// Display name from the export, not used for lookups
    pub name: String,
    pub card_id: String,
    /// Card data from Scryfall, filled in once the entry has been resolved
    pub card: Option<ScryfallCard>,
}

impl DecklistEntry {
    pub fn new(quantity: u32, name: impl Into<String>, card_id: impl Into<String>) -> Self {
        Self {
            quantity,
            name: name.into(),
            card_id: card_id.into(),
            card: None,
        }
    }

    /// Number of printable pages this entry yields: one per face per copy
    pub fn page_count(&self) -> usize {
        let faces = match &self.card {
            Some(card) if !card.card_faces.is_empty() => card.card_faces.len(),
            _ => 1,
        };
        faces * self.quantity as usize
    }
}

/// Parsed decklist, entries in input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decklist {
    pub entries: Vec<DecklistEntry>,
}

impl Decklist {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Returns true if `id` has the 8-4-4-4-12 lowercase hex shape of a Scryfall ID
pub fn is_valid_card_id(id: &str) -> bool {
    SCRYFALL_ID.is_match(id)
}

/// Parses and validates a decklist CSV. Stops at the first invalid row.
pub fn parse_decklist<R: Read>(reader: R) -> Result<Decklist> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut decklist = Decklist::default();

    for (index, result) in rdr.records().enumerate() {
        let record = result?;
        let line = record
            .position()
            .map(|pos| pos.line() as usize)
            .unwrap_or(index + 1);

        if record.len() != FIELDS_PER_ROW {
            return Err(DeckError::InvalidFormat {
                line,
                got: record.len(),
            });
        }

        let quantity = parse_quantity(&record[0], line)?;

        let card_id = &record[2];
        if !is_valid_card_id(card_id) {
            return Err(DeckError::InvalidCardId {
                line,
                id: card_id.to_string(),
            });
        }

        debug!("Line {line}: {quantity}x {} ({card_id})", &record[1]);
        decklist
            .entries
            .push(DecklistEntry::new(quantity, &record[1], card_id));
    }

    info!("Parsed decklist with {} entries", decklist.len());
    Ok(decklist)
}

/// Opens `path` and parses it as a decklist
pub fn parse_decklist_file(path: impl AsRef<Path>) -> Result<Decklist> {
    let path = path.as_ref();
    debug!("Reading decklist from {}", path.display());
    let file = File::open(path)?;
    parse_decklist(file)
}

fn parse_quantity(raw: &str, line: usize) -> Result<u32> {
    let invalid = || DeckError::InvalidQuantity {
        line,
        value: raw.to_string(),
    };

    let value: i64 = raw.parse().map_err(|_| invalid())?;
    if value <= 0 {
        return Err(DeckError::NonPositiveQuantity { line, value });
    }
    u32::try_from(value).map_err(|_| invalid())
}

/// Total pages the decklist will print, counting every face of resolved multi-face cards
pub fn calculate_total_pages(decklist: &Decklist) -> usize {
    decklist.entries.iter().map(DecklistEntry::page_count).sum()
}

/// Progress steps for a run: a fetch and a render per entry, plus final assembly.
///
/// Based on the entry count before any card data is known, so multi-face cards
/// and quantities do not change it.
pub fn calculate_total_operations(decklist: &Decklist) -> usize {
    decklist.len() * 2 + 1
}

#[cfg(test)]
#[path = "decklist_tests.rs"]
mod tests;
