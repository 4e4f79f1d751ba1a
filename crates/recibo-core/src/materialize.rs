//! Materialization of the output PDF at its resolved path.
//!
//! PDF inputs are copied byte-for-byte; image inputs are decoded and wrapped
//! as a single-page PDF (JPEG stream behind a DCTDecode filter). The original
//! file is never moved or deleted.

use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use tracing::debug;

use crate::error::MaterializeError;

/// JPEG quality for image-to-PDF conversion.
const JPEG_QUALITY: u8 = 90;

/// True when the input should be copied as-is rather than converted.
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Produce the output PDF at `dest` from `source`.
///
/// Copy for PDFs, decode-and-convert for images. `dest` must already be
/// collision-free (see [`crate::naming::unique_pdf_path`]).
pub fn materialize(source: &Path, dest: &Path) -> Result<(), MaterializeError> {
    if is_pdf(source) {
        std::fs::copy(source, dest)?;
        debug!("Copied {} -> {}", source.display(), dest.display());
    } else {
        image_to_pdf(source, dest)?;
        debug!("Converted {} -> {}", source.display(), dest.display());
    }
    Ok(())
}

/// Decode an image file and write it as a one-page PDF.
fn image_to_pdf(source: &Path, dest: &Path) -> Result<(), MaterializeError> {
    let image = image::open(source)?;
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(MaterializeError::Image)?;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        },
        jpeg,
    ));

    // Page is sized to the image; the image fills the page exactly.
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(width as f32),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(height as f32),
                    Object::Integer(0),
                    Object::Integer(0),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().map_err(|e| MaterializeError::Pdf(e.to_string()))?,
    ));

    let resources_id = doc.add_object(dictionary! {
        "XObject" => dictionary! { "Im0" => image_id },
    });

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), (width as i64).into(), (height as i64).into()],
        "Contents" => content_id,
        "Resources" => resources_id,
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

    doc.save(dest).map_err(|e| MaterializeError::Pdf(e.to_string()))?;
    Ok(())
}
