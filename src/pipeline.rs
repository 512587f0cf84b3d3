//! The deck printing run: fetch every card, render its pages, write the PDF.
//!
//! A card that cannot be fetched is skipped; a card whose image cannot be
//! fetched or decoded still gets a bleed-only page. Both are recorded in the
//! returned [`RunSummary`]. Only an empty result or a failed write aborts.

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::assemble::assemble;
use crate::config::Config;
use crate::decklist::{calculate_total_operations, calculate_total_pages, Decklist};
use crate::error::{CardFailure, DeckError, Result};
use crate::image_cache::{ImageCache, ImageRequest};
use crate::progress::Reporter;
use crate::render::{Page, PageRenderer};
use crate::scryfall::{ImageQuality, ImageUris, ScryfallCard, ScryfallClient};

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub output_path: PathBuf,
    pub pages_written: usize,
    /// Pages the resolved decklist calls for, counting every face
    pub expected_pages: usize,
    /// Cards that were skipped or printed without artwork
    pub failures: Vec<CardFailure>,
}

/// One printable side of a card
struct PageSource<'a> {
    label: &'a str,
    face_name: Option<&'a str>,
    image_uris: Option<&'a ImageUris>,
}

pub struct DeckPrinter {
    client: ScryfallClient,
    cache: ImageCache,
    renderer: PageRenderer,
    quality: ImageQuality,
    output_path: PathBuf,
}

impl DeckPrinter {
    pub fn new(
        client: ScryfallClient,
        cache: ImageCache,
        renderer: PageRenderer,
        quality: ImageQuality,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            client,
            cache,
            renderer,
            quality,
            output_path: output_path.into(),
        }
    }

    /// Validates `config` and sets up the client, cache directory and renderer
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let client = ScryfallClient::with_base_url(&config.api_url)?;
        let cache = ImageCache::open(&config.cache_dir)?;
        Ok(Self::new(
            client,
            cache,
            PageRenderer::new(config.geometry()),
            config.quality,
            &config.output_path,
        ))
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Prints `decklist` to the output path. Resolved card data is stored on each entry.
    pub fn generate(
        &self,
        decklist: &mut Decklist,
        reporter: &mut dyn Reporter,
    ) -> Result<RunSummary> {
        info!(
            "Generating PDF for {} decklist entries into {}",
            decklist.len(),
            self.output_path.display()
        );
        reporter.start(calculate_total_operations(decklist));

        let mut run = RunState {
            reporter,
            pages: Vec::new(),
            failures: Vec::new(),
        };

        for entry in decklist.entries.iter_mut() {
            run.reporter
                .advance(&format!("Fetching card: {}", entry.card_id));

            let card = match self.client.fetch_card(&entry.card_id) {
                Ok(card) => card,
                Err(e) => {
                    run.record(&entry.card_id, &e);
                    continue;
                }
            };

            let fallback_label = if entry.name.is_empty() {
                entry.card_id.as_str()
            } else {
                entry.name.as_str()
            };
            for source in page_sources(&card, fallback_label) {
                run.reporter
                    .advance(&format!("Generating page: {}", source.label));

                if let Some(page) = self.render_source(&entry.card_id, &source, &mut run) {
                    for _ in 0..entry.quantity {
                        run.pages.push(page.clone());
                    }
                }
            }

            entry.card = Some(card);
        }

        let RunState {
            reporter,
            pages,
            failures,
        } = run;

        if pages.is_empty() {
            return Err(DeckError::NoPages { failures });
        }

        reporter.advance("Assembling PDF");
        let pages_written = assemble(&pages, &self.output_path)?;
        reporter.finish(&self.output_path);

        info!(
            "Wrote {} page(s) with {} card error(s)",
            pages_written,
            failures.len()
        );

        Ok(RunSummary {
            output_path: self.output_path.clone(),
            pages_written,
            expected_pages: calculate_total_pages(decklist),
            failures,
        })
    }

    /// Renders one side of a card. `None` only if no page could be produced at all.
    fn render_source(
        &self,
        card_id: &str,
        source: &PageSource<'_>,
        run: &mut RunState<'_>,
    ) -> Option<Page> {
        let subject = format!("{} ({})", source.label, card_id);

        let mut request = ImageRequest::new(card_id, self.quality).image_uris(source.image_uris);
        if let Some(face) = source.face_name {
            request = request.face(face);
        }

        let rendered = match self.cache.fetch_image(&self.client, &request) {
            Ok(path) => self.renderer.render(&path).map(|rendered| {
                if let Some(e) = &rendered.artwork_error {
                    run.record(&subject, e);
                }
                rendered.page
            }),
            Err(e) => {
                run.record(&subject, &e);
                self.renderer.render_blank()
            }
        };

        match rendered {
            Ok(page) => Some(page),
            Err(e) => {
                run.record(&subject, &e);
                None
            }
        }
    }
}

/// Mutable state of a run in progress
struct RunState<'r> {
    reporter: &'r mut dyn Reporter,
    pages: Vec<Page>,
    failures: Vec<CardFailure>,
}

impl RunState<'_> {
    fn record(&mut self, subject: &str, error: &DeckError) {
        warn!("{}: {}", subject, error);
        let message = error.to_string();
        self.reporter.record_error(subject, &message);
        self.failures.push(CardFailure::new(subject, message));
    }
}

/// Faces of a multi-faced card, or the card itself.
///
/// A face without images of its own (split and adventure cards) prints the
/// card's top-level image, cached once under the card's key.
fn page_sources<'a>(card: &'a ScryfallCard, fallback_label: &'a str) -> Vec<PageSource<'a>> {
    if card.is_multi_faced() {
        card.card_faces
            .iter()
            .map(|face| match &face.image_uris {
                Some(uris) => PageSource {
                    label: &face.name,
                    face_name: Some(&face.name),
                    image_uris: Some(uris),
                },
                None => PageSource {
                    label: &face.name,
                    face_name: None,
                    image_uris: card.image_uris.as_ref(),
                },
            })
            .collect()
    } else {
        let label = if card.name.is_empty() {
            fallback_label
        } else {
            card.name.as_str()
        };
        vec![PageSource {
            label,
            face_name: None,
            image_uris: card.image_uris.as_ref(),
        }]
    }
}
