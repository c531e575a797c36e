//! Integration tests for image ingestion.
//!
//! Tests use generated PNG/JPEG files and check the embedded result and how
//! it lands in the configuration record.

use base64::Engine;
use image::GenericImageView;

use coach::draft::DraftEditor;
use coach::error::AdminError;
use coach::ingest::{IngestOptions, ImageRef, ingest_bytes, ingest_file, ingest_file_async};
use coach::model::ImageSlot;
use coach::store::{ConfigStore, MemoryStorage, SqliteStorage};

use crate::common::assertions::assert_jpeg_data_url;
use crate::common::fixtures::TestImages;

fn decode_data_url(data_url: &str) -> image::DynamicImage {
    let payload = data_url
        .strip_prefix("data:image/jpeg;base64,")
        .expect("not a JPEG data URL");
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .expect("invalid base64");
    image::load_from_memory_with_format(&bytes, image::ImageFormat::Jpeg).expect("invalid JPEG")
}

// ===== Scaling Tests =====

#[test]
fn test_wide_png_is_scaled_to_max_width() {
    let images = TestImages::new();
    let path = images.png("wide.png", 1600, 900);

    let embedded = ingest_file(&path, &IngestOptions::default()).unwrap();
    assert_eq!((embedded.width, embedded.height), (800, 450));
    assert_eq!((embedded.source_width, embedded.source_height), (1600, 900));
    assert!(embedded.was_resized());
    assert_jpeg_data_url(&embedded.data_url);

    let decoded = decode_data_url(&embedded.data_url);
    assert_eq!(decoded.dimensions(), (800, 450));
}

#[test]
fn test_small_jpeg_keeps_size() {
    let images = TestImages::new();
    let path = images.jpeg("small.jpg", 320, 480);

    let embedded = ingest_file(&path, &IngestOptions::default()).unwrap();
    assert_eq!((embedded.width, embedded.height), (320, 480));
    assert!(!embedded.was_resized());
    assert_eq!(decode_data_url(&embedded.data_url).dimensions(), (320, 480));
}

#[test]
fn test_exact_max_width_is_not_resized() {
    let bytes = TestImages::png_bytes(800, 10);
    let embedded = ingest_bytes(&bytes, &IngestOptions::default()).unwrap();
    assert_eq!((embedded.width, embedded.height), (800, 10));
}

#[test]
fn test_custom_options_apply() {
    let bytes = TestImages::png_bytes(1000, 500);
    let opts = IngestOptions {
        max_width: 200,
        jpeg_quality: 40,
    };
    let embedded = ingest_bytes(&bytes, &opts).unwrap();
    assert_eq!((embedded.width, embedded.height), (200, 100));
    assert!(matches!(
        ImageRef::classify(&embedded.data_url),
        ImageRef::Embedded { mime: "image/jpeg", bytes } if bytes == embedded.encoded_bytes
    ));
}

// ===== Failure Tests =====

#[test]
fn test_missing_file_reports_not_found() {
    let images = TestImages::new();
    let err = ingest_file(&images.path().join("nope.png"), &IngestOptions::default()).unwrap_err();
    assert!(matches!(err, AdminError::ImageNotFound { .. }));
}

#[test]
fn test_corrupt_file_reports_decode_error() {
    let images = TestImages::new();
    let path = images.corrupt("broken.png");
    let err = ingest_file(&path, &IngestOptions::default()).unwrap_err();
    assert!(matches!(err, AdminError::ImageDecode(_)));
    assert!(err.is_user_recoverable());
}

// ===== Record Tests =====

#[tokio::test]
async fn test_async_ingest_into_profile_slot() {
    let images = TestImages::new();
    let path = images.png("portrait.png", 1200, 1200);

    let embedded = ingest_file_async(path, IngestOptions::default()).await.unwrap();

    let mut store = ConfigStore::open(Box::new(MemoryStorage::new()));
    let mut draft = DraftEditor::new(&store);
    draft.set_image(ImageSlot::Profile, &embedded);
    draft.commit(&mut store).unwrap();

    assert_eq!(store.current().profile_image, embedded.data_url);
    assert!(matches!(
        ImageRef::classify(&store.current().profile_image),
        ImageRef::Embedded { .. }
    ));
}

#[test]
fn test_large_image_hits_storage_quota() {
    let images = TestImages::new();
    let path = images.png("hero.png", 800, 800);
    let embedded = ingest_file(
        &path,
        &IngestOptions {
            max_width: 800,
            jpeg_quality: 100,
        },
    )
    .unwrap();

    let storage = SqliteStorage::in_memory()
        .unwrap()
        .with_quota(Some(embedded.data_url.len() / 2));
    let mut store = ConfigStore::open(Box::new(storage));
    let mut draft = DraftEditor::new(&store);
    draft.set_image(ImageSlot::Hero, &embedded);

    let err = draft.commit(&mut store).unwrap_err();
    assert!(matches!(err, AdminError::StorageQuotaExceeded { .. }));
    assert_ne!(store.current().hero_image, embedded.data_url);
    assert!(draft.is_unsaved());
}
