//! Synthetic PDF fixtures shared by the integration tests.

#![allow(dead_code)]

use lopdf::{Dictionary, Object, Stream, StringFormat};

/// Builds small PDFs with labelled pages.
pub struct PdfBuilder {
    label: String,
    sizes: Vec<(i64, i64)>,
    title: Option<String>,
    annotations: bool,
    outline: bool,
    inherited_box: bool,
    broken_annotation: Option<usize>,
}

impl PdfBuilder {
    /// `count` Letter-sized pages labelled `label`.
    pub fn new(label: &str, count: usize) -> Self {
        Self {
            label: label.to_string(),
            sizes: vec![(612, 792); count],
            title: None,
            annotations: false,
            outline: false,
            inherited_box: false,
            broken_annotation: None,
        }
    }

    /// One page per size.
    pub fn with_sizes(label: &str, sizes: &[(i64, i64)]) -> Self {
        Self {
            sizes: sizes.to_vec(),
            ..Self::new(label, 0)
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn annotations(mut self) -> Self {
        self.annotations = true;
        self
    }

    pub fn outline(mut self) -> Self {
        self.outline = true;
        self
    }

    /// Append an annotation with a three-number `/Rect` to page `index`.
    pub fn broken_annotation(mut self, index: usize) -> Self {
        self.broken_annotation = Some(index);
        self
    }

    /// Put the MediaBox on the page tree node instead of each page.
    pub fn inherited_box(mut self) -> Self {
        self.inherited_box = true;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut doc = lopdf::Document::with_version("1.4");
        let pages_id = doc.new_object_id();

        let font = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Font".to_vec())),
            ("Subtype", Object::Name(b"Type1".to_vec())),
            ("BaseFont", Object::Name(b"Helvetica".to_vec())),
        ]));
        let resources = Dictionary::from_iter(vec![(
            "Font",
            Object::Dictionary(Dictionary::from_iter(vec![("F1", Object::Reference(font))])),
        )]);

        let mut kids = Vec::new();
        for (i, &(width, height)) in self.sizes.iter().enumerate() {
            let content = doc.add_object(Stream::new(
                Dictionary::new(),
                format!("BT /F1 12 Tf 72 72 Td ({}) Tj ET", page_marker(&self.label, i)).into_bytes(),
            ));

            let mut page = Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Page".to_vec())),
                ("Parent", Object::Reference(pages_id)),
                ("Contents", Object::Reference(content)),
            ]);
            if !self.inherited_box {
                page.set("MediaBox", media_box(width, height));
            }
            let mut annots = Vec::new();
            if self.annotations {
                annots.push(doc.add_object(Dictionary::from_iter(vec![
                    ("Type", Object::Name(b"Annot".to_vec())),
                    ("Subtype", Object::Name(b"Text".to_vec())),
                    (
                        "Rect",
                        Object::Array([20, 20, 60, 60].map(Object::Integer).to_vec()),
                    ),
                    ("Contents", Object::string_literal("note")),
                ])));
            }
            if self.broken_annotation == Some(i) {
                annots.push(doc.add_object(Dictionary::from_iter(vec![
                    ("Type", Object::Name(b"Annot".to_vec())),
                    ("Subtype", Object::Name(b"Square".to_vec())),
                    (
                        "Rect",
                        Object::Array([1, 2, 3].map(Object::Integer).to_vec()),
                    ),
                ])));
            }
            if !annots.is_empty() {
                page.set(
                    "Annots",
                    Object::Array(annots.into_iter().map(Object::Reference).collect()),
                );
            }
            kids.push(Object::Reference(doc.add_object(page)));
        }

        let mut pages = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(kids.len() as i64)),
            ("Kids", Object::Array(kids.clone())),
            ("Resources", Object::Dictionary(resources)),
        ]);
        if self.inherited_box {
            let (width, height) = self.sizes.first().copied().unwrap_or((612, 792));
            pages.set("MediaBox", media_box(width, height));
        }
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let mut catalog = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]);
        if self.outline && !kids.is_empty() {
            let outlines_id = doc.new_object_id();
            let item = doc.add_object(Dictionary::from_iter(vec![
                ("Title", Object::string_literal("Start")),
                ("Parent", Object::Reference(outlines_id)),
                (
                    "Dest",
                    Object::Array(vec![kids[0].clone(), Object::Name(b"Fit".to_vec())]),
                ),
            ]));
            doc.objects.insert(
                outlines_id,
                Object::Dictionary(Dictionary::from_iter(vec![
                    ("Type", Object::Name(b"Outlines".to_vec())),
                    ("First", Object::Reference(item)),
                    ("Last", Object::Reference(item)),
                    ("Count", Object::Integer(1)),
                ])),
            );
            catalog.set("Outlines", Object::Reference(outlines_id));
            catalog.set("PageMode", Object::Name(b"UseOutlines".to_vec()));
        }
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", Object::Reference(catalog_id));

        if let Some(ref title) = self.title {
            let info = doc.add_object(Dictionary::from_iter(vec![
                ("Title", Object::String(title.as_bytes().to_vec(), StringFormat::Literal)),
                ("Author", Object::string_literal("Test Author")),
                ("Subject", Object::string_literal("Testing")),
                ("Keywords", Object::string_literal("pdf, test")),
                ("Creator", Object::string_literal("fixture")),
                ("Producer", Object::string_literal("lopdf")),
                ("CreationDate", Object::string_literal("D:20200101000000Z")),
            ]));
            doc.trailer.set("Info", Object::Reference(info));
        }

        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        out
    }
}

/// Text drawn on page `index` (0-based) of a fixture labelled `label`.
pub fn page_marker(label: &str, index: usize) -> String {
    format!("{} page {}", label, index + 1)
}

fn media_box(width: i64, height: i64) -> Object {
    Object::Array([0, 0, width, height].map(Object::Integer).to_vec())
}

/// Decoded content stream of page `index` (0-based).
pub fn page_content(data: &[u8], index: usize) -> String {
    let doc = lopdf::Document::load_mem(data).unwrap();
    let page_id = *doc.get_pages().get(&(index as u32 + 1)).unwrap();
    String::from_utf8_lossy(&doc.get_page_content(page_id).unwrap()).into_owned()
}

/// `/Rect` of every annotation on page `index` (0-based).
pub fn annotation_rects(data: &[u8], index: usize) -> Vec<Vec<f32>> {
    let doc = lopdf::Document::load_mem(data).unwrap();
    let page_id = *doc.get_pages().get(&(index as u32 + 1)).unwrap();
    let page = doc.get_dictionary(page_id).unwrap();
    let Ok(annots) = page.get(b"Annots") else {
        return Vec::new();
    };
    annots
        .as_array()
        .unwrap()
        .iter()
        .map(|annot| {
            let annot = doc.get_dictionary(annot.as_reference().unwrap()).unwrap();
            annot
                .get(b"Rect")
                .unwrap()
                .as_array()
                .unwrap()
                .iter()
                .map(|v| v.as_float().unwrap())
                .collect()
        })
        .collect()
}

/// Page count via lopdf.
pub fn page_count(data: &[u8]) -> usize {
    lopdf::Document::load_mem(data).unwrap().get_pages().len()
}

/// Asserts a progress trace never decreases and ends at 100.
pub fn assert_progress(seen: &[u8]) {
    assert!(
        seen.windows(2).all(|w| w[0] <= w[1]),
        "progress went backwards: {:?}",
        seen
    );
    assert_eq!(seen.last(), Some(&100), "progress did not finish: {:?}", seen);
}
