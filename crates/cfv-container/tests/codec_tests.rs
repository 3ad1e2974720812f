mod common;

use cfv_container::*;
use common::*;
use tempfile::TempDir;

#[test]
fn test_round_trip_arbitrary_bytes() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("blob.bin");
    let dest = dir.path().join("blob.myext");

    let bytes: Vec<u8> = (0..=255u8).cycle().take(4099).collect();
    std::fs::write(&source, &bytes).unwrap();

    let metadata = encode(&source, &dest).unwrap();
    assert_eq!(metadata.original_type, "bin");
    assert_eq!(metadata.file_name, "blob.bin");
    assert_eq!(metadata.orientation, None);
    assert_eq!(metadata.author, None);

    let container = decode(&dest).unwrap();
    assert_eq!(container.payload, bytes);
    assert_eq!(container.metadata, metadata);
}

#[test]
fn test_round_trip_empty_file() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("empty.txt");
    let dest = dir.path().join("empty.myext");
    std::fs::write(&source, b"").unwrap();

    encode(&source, &dest).unwrap();
    assert!(decode(&dest).unwrap().payload.is_empty());
}

#[test]
fn test_decode_is_repeatable() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("doc.pdf");
    let dest = dir.path().join("doc.myext");
    let pdf = TestPdf::uniform(2, A4_PT).inherited_media_box().build();
    std::fs::write(&source, pdf).unwrap();

    encode(&source, &dest).unwrap();
    let first = decode(&dest).unwrap();
    let second = decode(&dest).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_pdf_metadata_is_recorded() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("Report.PDF");
    let dest = dir.path().join("report.myext");
    let pdf = TestPdf::uniform(2, A4_PT)
        .inherited_media_box()
        .author("Jordan")
        .build();
    std::fs::write(&source, &pdf).unwrap();

    let metadata = encode(&source, &dest).unwrap();
    assert_eq!(metadata.original_type, "pdf");
    assert_eq!(metadata.file_name, "Report.PDF");
    assert_eq!(metadata.orientation, Some(Orientation::Portrait));
    assert_eq!(metadata.width.as_deref(), Some("21.00cm"));
    assert_eq!(metadata.height.as_deref(), Some("29.70cm"));
    assert_eq!(metadata.author.as_deref(), Some("Jordan"));
    assert_eq!(metadata.creation_date.as_deref(), Some("D:20240501093000"));

    let (width_cm, height_cm) = metadata.page_size_cm().unwrap();
    assert!((width_cm - 21.0).abs() < 0.01);
    assert!((height_cm - 29.7).abs() < 0.01);

    assert_eq!(decode(&dest).unwrap().payload, pdf);
}

#[test]
fn test_pdf_without_info_defaults_to_empty_strings() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("wide.pdf");
    let dest = dir.path().join("wide.myext");
    let landscape = (A4_PT.1, A4_PT.0);
    let pdf = TestPdf::uniform(1, landscape).inherited_media_box().build();
    std::fs::write(&source, pdf).unwrap();

    let metadata = encode(&source, &dest).unwrap();
    assert_eq!(metadata.orientation, Some(Orientation::Landscape));
    assert_eq!(metadata.author.as_deref(), Some(""));
    assert_eq!(metadata.creation_date.as_deref(), Some(""));
}

#[test]
fn test_unparseable_pdf_still_encodes() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("broken.pdf");
    let dest = dir.path().join("broken.myext");
    std::fs::write(&source, b"%PDF-1.4 garbage").unwrap();

    let metadata = encode(&source, &dest).unwrap();
    assert_eq!(metadata.original_type, "pdf");
    assert_eq!(metadata.width, None);
    assert_eq!(decode(&dest).unwrap().payload, b"%PDF-1.4 garbage");
}

#[test]
fn test_missing_source_is_source_read_error() {
    let dir = TempDir::new().unwrap();
    let result = encode(dir.path().join("absent.pdf"), dir.path().join("out.myext"));
    assert!(matches!(result, Err(ContainerError::SourceRead { .. })));
}

#[test]
fn test_unwritable_destination_is_encode_error() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("a.txt");
    std::fs::write(&source, b"abc").unwrap();

    let dest = dir.path().join("no-such-dir").join("a.myext");
    let result = encode(&source, &dest);
    assert!(matches!(result, Err(ContainerError::Encode { .. })));
}

#[test]
fn test_malformed_container_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.myext");
    std::fs::write(&path, r#"{"content": "aGVsbG8="}"#).unwrap();
    assert!(matches!(decode(&path), Err(ContainerError::Malformed(_))));
}

#[test]
fn test_extract_payload_writes_prefixed_file() {
    let dir = TempDir::new().unwrap();
    let container = Container {
        metadata: ContainerMetadata::new("txt", "../../escape.txt"),
        payload: b"payload".to_vec(),
    };

    let scratch = dir.path().join("scratch").join("extracted files");
    let output = extract_payload(&container, &scratch).unwrap();

    assert_eq!(output, scratch.join("extracted_escape.txt"));
    assert_eq!(std::fs::read(&output).unwrap(), b"payload");
}

#[test]
fn test_read_pdf_info_counts_pages() {
    let pdf = TestPdf::uniform(3, LETTER_PT).inherited_media_box().build();
    let info = read_pdf_info(&pdf).unwrap();
    assert_eq!(info.page_count, 3);
    assert_eq!(info.first_page_pt, Some((612.0, 792.0)));
}
