//! Print job output as PDF
//!
//! Each sheet becomes one page whose MediaBox is the print surface. The page
//! bitmap is embedded as a Flate-compressed RGB image XObject.

use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use super::{PrintJob, PrintSheet};
use crate::types::{RenderError, Result};
use crate::watermark::Watermark;

const IMAGE_NAME: &str = "Im0";
const FONT_NAME: &str = "F1";
const GSTATE_NAME: &str = "GS1";

/// Write `job` to a PDF file at `path`, stamping `watermark` on every sheet
pub fn write_print_pdf(
    job: &PrintJob,
    watermark: Option<&Watermark>,
    path: impl AsRef<Path>,
) -> Result<()> {
    let bytes = print_pdf_bytes(job, watermark)?;
    std::fs::write(path.as_ref(), bytes)?;
    log::info!(
        "Wrote {} sheet(s) to {}",
        job.sheet_count(),
        path.as_ref().display()
    );
    Ok(())
}

/// Serialize `job` to PDF bytes
pub fn print_pdf_bytes(job: &PrintJob, watermark: Option<&Watermark>) -> Result<Vec<u8>> {
    let mut doc = build_document(job, watermark)?;
    let mut writer = Vec::new();
    doc.save_to(&mut writer)?;
    Ok(writer)
}

fn build_document(job: &PrintJob, watermark: Option<&Watermark>) -> Result<Document> {
    if job.sheets.is_empty() {
        return Err(RenderError::NothingToPrint);
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let sheet_width = job.surface.width_pt();
    let sheet_height = job.surface.height_pt();

    // Font and opacity state are shared by every sheet
    let overlay = watermark.filter(|w| w.is_visible()).map(|w| {
        let mut font = Dictionary::new();
        font.set("Type", Object::Name(b"Font".to_vec()));
        font.set("Subtype", Object::Name(b"Type1".to_vec()));
        font.set("BaseFont", Object::Name(b"Helvetica".to_vec()));
        font.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
        let font_id = doc.add_object(font);
        let gstate_id = doc.add_object(w.ext_gstate());
        (w, font_id, gstate_id)
    });

    let mut kids = Vec::with_capacity(job.sheets.len());
    for sheet in &job.sheets {
        let image_id = doc.add_object(image_xobject(sheet)?);

        let mut content = placement_command(sheet);
        let mut resources = Dictionary::new();
        resources.set(
            "XObject",
            Object::Dictionary(Dictionary::from_iter(vec![(
                IMAGE_NAME,
                Object::Reference(image_id),
            )])),
        );

        if let Some((watermark, font_id, gstate_id)) = overlay {
            content.push_str(&watermark.content_ops(
                sheet_width,
                sheet_height,
                FONT_NAME,
                GSTATE_NAME,
            ));
            resources.set(
                "Font",
                Object::Dictionary(Dictionary::from_iter(vec![(
                    FONT_NAME,
                    Object::Reference(font_id),
                )])),
            );
            resources.set(
                "ExtGState",
                Object::Dictionary(Dictionary::from_iter(vec![(
                    GSTATE_NAME,
                    Object::Reference(gstate_id),
                )])),
            );
        }

        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let mut page = Dictionary::new();
        page.set("Type", Object::Name(b"Page".to_vec()));
        page.set("Parent", Object::Reference(pages_id));
        page.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(sheet_width),
                Object::Real(sheet_height),
            ]),
        );
        page.set("Resources", Object::Dictionary(resources));
        page.set("Contents", Object::Reference(content_id));
        kids.push(Object::Reference(doc.add_object(page)));
    }

    let page_count = kids.len() as i64;
    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(page_count)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id: ObjectId = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    Ok(doc)
}

fn image_xobject(sheet: &PrintSheet) -> Result<Stream> {
    let image = &sheet.page.image;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(image.as_raw())?;
    let data = encoder.finish()?;

    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(image.width() as i64));
    dict.set("Height", Object::Integer(image.height() as i64));
    dict.set("ColorSpace", Object::Name(b"DeviceRGB".to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));
    dict.set("Filter", Object::Name(b"FlateDecode".to_vec()));

    Ok(Stream::new(dict, data).with_compression(false))
}

/// Image space is the unit square, so the transform is the placement itself
fn placement_command(sheet: &PrintSheet) -> String {
    let rect = &sheet.placement;
    format!(
        "q {} 0 0 {} {} {} cm /{} Do Q\n",
        rect.width, rect.height, rect.x, rect.y, IMAGE_NAME
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::print::PrintSurface;
    use crate::types::RenderedPage;
    use image::{Rgb, RgbImage};

    fn job(pages: usize) -> PrintJob {
        let pages = (0..pages).map(|i| {
            let image = RgbImage::from_pixel(8, 10, Rgb([200, 10, 10]));
            RenderedPage::new(i, image, 72, (8.0, 10.0))
        });
        PrintJob::layout(pages, PrintSurface::a4())
    }

    #[test]
    fn test_one_pdf_page_per_sheet() {
        let bytes = print_pdf_bytes(&job(3), None).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn test_image_stream_round_trips() {
        let doc = build_document(&job(1), None).unwrap();
        let image = doc
            .objects
            .values()
            .find_map(|o| match o {
                Object::Stream(s) if s.dict.has(b"BitsPerComponent") => Some(s.clone()),
                _ => None,
            })
            .unwrap();
        let raw = image.decompressed_content().unwrap();
        assert_eq!(raw.len(), 8 * 10 * 3);
        assert_eq!(&raw[..3], &[200, 10, 10]);
    }

    #[test]
    fn test_watermark_is_stamped() {
        let watermark = Watermark::default();
        let doc = build_document(&job(2), Some(&watermark)).unwrap();
        let stamped = doc
            .get_pages()
            .values()
            .filter(|id| {
                let content = doc.get_page_content(**id).unwrap();
                String::from_utf8_lossy(&content).contains("(Confidential) Tj")
            })
            .count();
        assert_eq!(stamped, 2);
    }

    #[test]
    fn test_disabled_watermark_is_not_stamped() {
        let doc = build_document(&job(1), Some(&Watermark::disabled())).unwrap();
        let id = *doc.get_pages().values().next().unwrap();
        let content = doc.get_page_content(id).unwrap();
        assert!(!String::from_utf8_lossy(&content).contains("Tj"));
    }

    #[test]
    fn test_empty_job_is_rejected() {
        assert!(matches!(
            print_pdf_bytes(&job(0), None),
            Err(RenderError::NothingToPrint)
        ));
    }
}
