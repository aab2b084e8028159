//! Integration tests for merging and splitting.

mod common;

use common::{assert_progress, page_content, page_count, page_marker, PdfBuilder};
use pdfops::{
    merge, merge_files, merge_with_progress, split, split_file, split_pages,
    split_with_progress, Document, Error, PageGeometry, PageSelection, SplitOptions,
};

#[test]
fn test_merge_concatenates_in_order() {
    let a = PdfBuilder::new("alpha", 2).build();
    let b = PdfBuilder::new("beta", 3).build();
    let c = PdfBuilder::new("gamma", 1).build();

    let merged = merge(&[a.clone(), b, c.clone()]).unwrap();
    assert_eq!(page_count(&merged), 6);

    assert_eq!(page_content(&merged, 0), page_content(&a, 0));
    assert_eq!(page_content(&merged, 5), page_content(&c, 0));

    let expected = [
        page_marker("alpha", 0),
        page_marker("alpha", 1),
        page_marker("beta", 0),
        page_marker("beta", 1),
        page_marker("beta", 2),
        page_marker("gamma", 0),
    ];
    for (i, marker) in expected.iter().enumerate() {
        assert!(page_content(&merged, i).contains(marker.as_str()), "page {}", i);
    }
}

#[test]
fn test_merge_materializes_inherited_attributes() {
    let a = PdfBuilder::with_sizes("alpha", &[(400, 500)]).inherited_box().build();
    let b = PdfBuilder::new("beta", 1).build();

    let merged = merge(&[a, b]).unwrap();
    let infos = Document::load(&merged).unwrap().page_infos().unwrap();
    assert_eq!(infos[0].geometry, PageGeometry::new(400.0, 500.0));
    assert_eq!(infos[1].geometry, PageGeometry::letter());

    let doc = lopdf::Document::load_mem(&merged).unwrap();
    for page_id in doc.get_pages().into_values() {
        let page = doc.get_dictionary(page_id).unwrap();
        assert!(page.has(b"Resources"));
    }
}

#[test]
fn test_merge_aborts_on_invalid_source() {
    let good = PdfBuilder::new("alpha", 2).build();
    let bad = b"this is not a pdf".to_vec();

    let mut seen = Vec::new();
    let mut sink = |p: u8| seen.push(p);
    let err = merge_with_progress(&[good.clone(), bad, good], &mut sink).unwrap_err();

    assert!(matches!(err, Error::Merge(_)));
    let message = err.to_string();
    assert!(message.starts_with("PDF merge failed:"));
    assert!(message.contains("document 2"));
    assert_eq!(seen, vec![30]);
}

#[test]
fn test_merge_progress_per_file() {
    let docs = [
        PdfBuilder::new("a", 1).build(),
        PdfBuilder::new("b", 4).build(),
        PdfBuilder::new("c", 2).build(),
    ];
    let mut seen = Vec::new();
    let mut sink = |p: u8| seen.push(p);
    merge_with_progress(&docs, &mut sink).unwrap();

    assert_eq!(seen, vec![30, 60, 90, 100]);
    assert_progress(&seen);
}

#[test]
fn test_merge_same_source_twice() {
    let a = PdfBuilder::new("alpha", 2).build();
    let merged = merge(&[a.clone(), a]).unwrap();
    assert_eq!(page_count(&merged), 4);
    assert!(page_content(&merged, 2).contains(&page_marker("alpha", 0)));
}

#[test]
fn test_split_yields_one_document_per_page() {
    let source = PdfBuilder::new("doc", 4).build();
    let pages = split(&source).unwrap();

    assert_eq!(pages.len(), 4);
    for (i, page) in pages.iter().enumerate() {
        assert_eq!(page_count(page), 1);
        assert!(page_content(page, 0).contains(&page_marker("doc", i)));
    }
    assert_eq!(page_content(&pages[2], 0), page_content(&source, 2));
}

#[test]
fn test_split_progress() {
    let source = PdfBuilder::new("doc", 4).build();
    let mut seen = Vec::new();
    let mut sink = |p: u8| seen.push(p);
    split_with_progress(&source, &mut sink).unwrap();

    assert_eq!(seen, vec![22, 45, 67, 90, 100]);
    assert_progress(&seen);
}

#[test]
fn test_split_with_selection() {
    let source = PdfBuilder::new("doc", 5).build();
    let options = SplitOptions::new().with_pages(PageSelection::parse("2,4-5").unwrap());
    let pages = split_pages(&source, &options).unwrap();

    let numbers: Vec<u32> = pages.iter().map(|p| p.number).collect();
    assert_eq!(numbers, vec![2, 4, 5]);
    assert!(page_content(&pages[0].data, 0).contains(&page_marker("doc", 1)));
}

#[test]
fn test_split_selection_out_of_range() {
    let source = PdfBuilder::new("doc", 2).build();
    let options = SplitOptions::new().with_pages(PageSelection::Pages(vec![1, 3]));
    let err = split_pages(&source, &options).unwrap_err();

    assert!(matches!(err, Error::Split(_)));
    assert!(err.to_string().contains("out of range"));
}

#[test]
fn test_split_keeps_inherited_geometry() {
    let source = PdfBuilder::with_sizes("doc", &[(300, 300), (300, 300)])
        .inherited_box()
        .build();
    let pages = split(&source).unwrap();
    for page in &pages {
        let infos = Document::load(page).unwrap().page_infos().unwrap();
        assert_eq!(infos[0].geometry, PageGeometry::new(300.0, 300.0));
    }
}

#[test]
fn test_split_drops_links_to_other_pages() {
    // The outline points at page 1; a split page of page 2 must not drag
    // page 1 along with it.
    let source = PdfBuilder::new("doc", 2).outline().annotations().build();
    let pages = split(&source).unwrap();
    assert_eq!(page_count(&pages[1]), 1);
    assert!(!page_content(&pages[1], 0).contains(&page_marker("doc", 0)));
}

#[test]
fn test_file_helpers() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.pdf");
    let b = dir.path().join("b.pdf");
    std::fs::write(&a, PdfBuilder::new("a", 2).build()).unwrap();
    std::fs::write(&b, PdfBuilder::new("b", 1).build()).unwrap();

    let merged = merge_files(&[&a, &b]).unwrap();
    assert_eq!(merged.name, "merged.pdf");
    assert_eq!(merged.mime_type(), "application/pdf");
    assert_eq!(page_count(&merged.data), 3);

    let blobs = split_file(&a, &SplitOptions::default()).unwrap();
    let names: Vec<&str> = blobs.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["a_page_1.pdf", "a_page_2.pdf"]);

    let out = dir.path().join("out");
    let written = blobs[1].write_to_dir(&out).unwrap();
    assert_eq!(page_count(&std::fs::read(written).unwrap()), 1);
}
