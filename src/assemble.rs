//! Merges rendered single-page PDFs into the output document.

use std::path::Path;

use lopdf::{dictionary, Document, Object, ObjectId};

use crate::error::{DeckError, Result};
use crate::render::Page;

/// Concatenates `pages` in order and writes the result to `output_path`,
/// replacing any existing file. Returns the number of pages written.
pub fn assemble(pages: &[Page], output_path: &Path) -> Result<usize> {
    let mut document = merge_pages(pages)?;
    let count = document.get_pages().len();

    log::info!("Writing {} page(s) to {}", count, output_path.display());
    document.save(output_path)?;

    Ok(count)
}

/// Builds one document from standalone page PDFs, keeping their order
pub fn merge_pages(pages: &[Page]) -> Result<Document> {
    if pages.is_empty() {
        return Err(DeckError::EmptyDocument);
    }

    let mut merged = Document::with_version("1.5");
    let mut kids: Vec<ObjectId> = Vec::new();
    let mut next_id = 1;

    for page in pages {
        let mut source = Document::load_mem(page.as_bytes())?;
        source.renumber_objects_with(next_id);
        next_id = source
            .objects
            .keys()
            .map(|(id, _)| *id)
            .max()
            .map_or(next_id, |max| max + 1);

        kids.extend(source.get_pages().into_values());

        // Each source brings its own catalog and page tree; only the pages and
        // what they reference are kept.
        for (id, object) in source.objects {
            if !is_dictionary_of_type(&object, b"Catalog") && !is_dictionary_of_type(&object, b"Pages")
            {
                merged.objects.insert(id, object);
            }
        }
    }

    merged.max_id = next_id - 1;
    let pages_id = merged.new_object_id();

    for kid in &kids {
        merged
            .get_object_mut(*kid)
            .and_then(Object::as_dict_mut)?
            .set("Parent", pages_id);
    }

    let count = kids.len() as i64;
    merged.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids.into_iter().map(Object::Reference).collect::<Vec<_>>(),
            "Count" => count,
        }),
    );

    let catalog_id = merged.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    merged.trailer.set("Root", catalog_id);

    log::debug!("Merged {} page(s)", count);
    Ok(merged)
}

fn is_dictionary_of_type(object: &Object, type_name: &[u8]) -> bool {
    match object {
        Object::Dictionary(dict) => {
            matches!(dict.get(b"Type"), Ok(Object::Name(name)) if name.as_slice() == type_name)
        }
        _ => false,
    }
}
