//! lopdf-built PDF fixtures, shared with the render and runtime test suites

#![allow(dead_code)]

use lopdf::{Dictionary, Document, Object, Stream, StringFormat};

pub const A4_PT: (f32, f32) = (595.28, 841.89);
pub const LETTER_PT: (f32, f32) = (612.0, 792.0);

fn media_box((width, height): (f32, f32)) -> Object {
    Object::Array(vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Real(width),
        Object::Real(height),
    ])
}

/// Blank test PDF with one page per entry of `page_sizes` (points)
pub struct TestPdf {
    page_sizes: Vec<(f32, f32)>,
    inherited_media_box: bool,
    author: Option<String>,
}

impl TestPdf {
    pub fn new(page_sizes: &[(f32, f32)]) -> Self {
        Self {
            page_sizes: page_sizes.to_vec(),
            inherited_media_box: false,
            author: None,
        }
    }

    pub fn uniform(count: usize, size: (f32, f32)) -> Self {
        Self::new(&vec![size; count])
    }

    /// Put the first page's MediaBox on the page tree root instead of on
    /// every page
    pub fn inherited_media_box(mut self) -> Self {
        self.inherited_media_box = true;
        self
    }

    /// Add an info dictionary with `/Author` and a fixed `/CreationDate`
    pub fn author(mut self, author: &str) -> Self {
        self.author = Some(author.to_string());
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let mut kids = Vec::new();
        for size in &self.page_sizes {
            let content_id = doc.add_object(Stream::new(Dictionary::new(), b"q Q".to_vec()));
            let mut page = Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Page".to_vec())),
                ("Parent", Object::Reference(pages_id)),
                ("Resources", Object::Dictionary(Dictionary::new())),
                ("Contents", Object::Reference(content_id)),
            ]);
            if !self.inherited_media_box {
                page.set("MediaBox", media_box(*size));
            }
            kids.push(Object::Reference(doc.add_object(page)));
        }

        let mut pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(self.page_sizes.len() as i64)),
        ]);
        if self.inherited_media_box {
            if let Some(size) = self.page_sizes.first() {
                pages_dict.set("MediaBox", media_box(*size));
            }
        }
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        doc.trailer.set("Root", catalog_id);

        if let Some(author) = &self.author {
            let info_id = doc.add_object(Dictionary::from_iter(vec![
                (
                    "Author",
                    Object::String(author.as_bytes().to_vec(), StringFormat::Literal),
                ),
                (
                    "CreationDate",
                    Object::String(b"D:20240501093000".to_vec(), StringFormat::Literal),
                ),
            ]));
            doc.trailer.set("Info", info_id);
        }

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }
}

/// PDF with one page per entry of `page_sizes`, each carrying its own MediaBox
pub fn create_test_pdf(page_sizes: &[(f32, f32)]) -> Vec<u8> {
    TestPdf::new(page_sizes).build()
}
