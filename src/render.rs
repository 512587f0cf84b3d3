//! Single-card page rendering.
//!
//! Every page is a standalone one-page PDF: a black bleed fill covering the
//! whole canvas, with the card artwork stretched over the card area inside it.

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use crate::error::{DeckError, Result};

/// MTG card width in mm
pub const CARD_WIDTH_MM: f32 = 63.0;
/// MTG card height in mm
pub const CARD_HEIGHT_MM: f32 = 88.0;
/// Bleed used when none is given on the command line
pub const DEFAULT_BLEED_MM: f32 = 3.0;

const POINTS_PER_MM: f32 = 72.0 / 25.4;
const ARTWORK_NAME: &str = "Im1";
/// Only used for non-JPEG sources
const CONVERTED_JPEG_QUALITY: u8 = 95;

pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Page size and artwork placement for a given bleed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub bleed_mm: f32,
}

impl PageGeometry {
    pub fn new(bleed_mm: f32) -> Self {
        Self { bleed_mm }
    }

    /// Total page width including bleed
    pub fn total_width_mm(&self) -> f32 {
        CARD_WIDTH_MM + 2.0 * self.bleed_mm
    }

    /// Total page height including bleed
    pub fn total_height_mm(&self) -> f32 {
        CARD_HEIGHT_MM + 2.0 * self.bleed_mm
    }

    /// Where the artwork's lower-left corner goes; the bleed is the same on every side
    pub fn image_position_mm(&self) -> (f32, f32) {
        (self.bleed_mm, self.bleed_mm)
    }

    /// `[0 0 width height]` in PDF points
    pub fn media_box_pt(&self) -> [f32; 4] {
        [
            0.0,
            0.0,
            mm_to_pt(self.total_width_mm()),
            mm_to_pt(self.total_height_mm()),
        ]
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::new(DEFAULT_BLEED_MM)
    }
}

/// Serialized one-page PDF
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    bytes: Vec<u8>,
}

impl Page {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// A rendered page plus the reason its artwork is missing, if it is
#[derive(Debug)]
pub struct RenderedPage {
    pub page: Page,
    pub artwork_error: Option<DeckError>,
}

/// Artwork ready for embedding as a DCTDecode image XObject
struct JpegArtwork {
    width: u32,
    height: u32,
    color_space: &'static str,
    data: Vec<u8>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PageRenderer {
    geometry: PageGeometry,
}

impl PageRenderer {
    pub fn new(geometry: PageGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    /// Renders a card page from the image at `artwork`.
    ///
    /// An image that cannot be read or decoded still produces a page (bleed
    /// only) and comes back as `artwork_error`. `Err` means the PDF itself
    /// could not be written.
    pub fn render(&self, artwork: &Path) -> Result<RenderedPage> {
        match load_artwork(artwork) {
            Ok(art) => Ok(RenderedPage {
                page: self.build_page(Some(&art))?,
                artwork_error: None,
            }),
            Err(e) => {
                log::warn!("Failed to load card image {}: {}", artwork.display(), e);
                Ok(RenderedPage {
                    page: self.build_page(None)?,
                    artwork_error: Some(e),
                })
            }
        }
    }

    /// A page with only the bleed fill, for cards whose image could not be fetched
    pub fn render_blank(&self) -> Result<Page> {
        self.build_page(None)
    }

    fn build_page(&self, artwork: Option<&JpegArtwork>) -> Result<Page> {
        let [_, _, width, height] = self.geometry.media_box_pt();

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut operations = Vec::new();

        // Fill bleed area with black background (same color as card border)
        if self.geometry.bleed_mm > 0.0 {
            operations.push(Operation::new("rg", vec![0.into(), 0.into(), 0.into()]));
            operations.push(Operation::new(
                "re",
                vec![0.into(), 0.into(), width.into(), height.into()],
            ));
            operations.push(Operation::new("f", vec![]));
        }

        let mut xobjects = lopdf::Dictionary::new();
        if let Some(art) = artwork {
            let image = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => i64::from(art.width),
                    "Height" => i64::from(art.height),
                    "ColorSpace" => art.color_space,
                    "BitsPerComponent" => 8,
                    "Filter" => "DCTDecode",
                },
                art.data.clone(),
            );
            let image_id = doc.add_object(image);
            xobjects.set(ARTWORK_NAME, image_id);

            // Scale the unit image square to exactly the card area, ignoring aspect ratio
            let (x, y) = self.geometry.image_position_mm();
            operations.push(Operation::new("q", vec![]));
            operations.push(Operation::new(
                "cm",
                vec![
                    mm_to_pt(CARD_WIDTH_MM).into(),
                    0.into(),
                    0.into(),
                    mm_to_pt(CARD_HEIGHT_MM).into(),
                    mm_to_pt(x).into(),
                    mm_to_pt(y).into(),
                ],
            ));
            operations.push(Operation::new(
                "Do",
                vec![Object::Name(ARTWORK_NAME.as_bytes().to_vec())],
            ));
            operations.push(Operation::new("Q", vec![]));
        }

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            "Contents" => content_id,
            "Resources" => dictionary! { "XObject" => xobjects },
        });

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        Ok(Page { bytes })
    }
}

/// Loads the cached image for embedding. JPEG files go in unchanged; anything
/// else (PNG downloads are cached under the same `.jpg` name) is converted.
fn load_artwork(path: &Path) -> Result<JpegArtwork> {
    let bytes = std::fs::read(path)?;
    let reader = ImageReader::new(Cursor::new(bytes.as_slice())).with_guessed_format()?;
    let format = reader.format();
    let image = reader.decode()?;
    let (width, height) = image.dimensions();

    if format == Some(ImageFormat::Jpeg) {
        let color_space = match &image {
            DynamicImage::ImageLuma8(_) => Some("DeviceGray"),
            DynamicImage::ImageRgb8(_) => Some("DeviceRGB"),
            _ => None,
        };
        if let Some(color_space) = color_space {
            return Ok(JpegArtwork {
                width,
                height,
                color_space,
                data: bytes,
            });
        }
    }

    log::debug!("Converting {} to JPEG for embedding", path.display());
    let mut data = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut data, CONVERTED_JPEG_QUALITY);
    DynamicImage::ImageRgb8(image.to_rgb8()).write_with_encoder(encoder)?;

    Ok(JpegArtwork {
        width,
        height,
        color_space: "DeviceRGB",
        data,
    })
}
