//! Tests for archive and single-file ingestion into the queue.

mod common;

use dmg_quantize::PaletteMode;
use img2dmg::error::{ArchiveError, IngestError};
use img2dmg::models::JobStatus;
use img2dmg::services::ingest;
use pretty_assertions::assert_eq;

use common::{fixtures, TestQueue};

#[tokio::test]
async fn test_archive_of_two_pngs_adds_two_jobs() {
    let queue = TestQueue::new(PaletteMode::Dmg);
    let a = fixtures::solid_png(2, 2, [10, 10, 10, 255]);
    let b = fixtures::solid_png(3, 1, [200, 200, 200, 255]);
    let archive = fixtures::zip_of(&[
        ("a.png", a),
        ("nested/", vec![]),
        ("nested/b.png", b),
    ]);

    let ids = ingest(&queue, "batch.zip", archive).await.unwrap();
    assert_eq!(ids.len(), 2);

    queue.wait_idle().await;
    let views = queue.snapshot().await;
    let names: Vec<&str> = views.iter().map(|v| v.source_name.as_str()).collect();
    assert_eq!(names, vec!["a.png", "b.png"]);
    assert!(views.iter().all(|v| v.status == JobStatus::Done));
    assert_eq!(views[1].width, Some(3));
    queue.finish().await;
}

#[tokio::test]
async fn test_extension_match_is_case_insensitive() {
    let queue = TestQueue::new(PaletteMode::Dmg);
    let px = fixtures::solid_png(1, 1, [0, 0, 0, 255]);
    let archive = fixtures::zip_of(&[("A.PNG", px.clone()), ("b.png", px)]);

    let ids = ingest(&queue, "Upper.ZIP", archive).await.unwrap();
    assert_eq!(ids.len(), 2);
    queue.finish().await;
}

#[tokio::test]
async fn test_mixed_archive_adds_nothing() {
    let queue = TestQueue::new(PaletteMode::Dmg);
    let png = fixtures::solid_png(1, 1, [0, 0, 0, 255]);
    let jpg = fixtures::jpeg(1, 1, [0, 0, 0]);
    let archive = fixtures::zip_of(&[
        ("a.png", png.clone()),
        ("b.jpg", jpg),
        ("c.png", png),
    ]);

    let err = ingest(&queue, "mixed.zip", archive).await.unwrap_err();
    assert_eq!(
        err,
        IngestError::Archive(ArchiveError::MixedExtension {
            name: "b.jpg".into(),
            expected: "png".into(),
            found: "jpg".into(),
        })
    );
    assert!(queue.snapshot().await.is_empty());
    queue.finish().await;
}

#[tokio::test]
async fn test_empty_archive_is_rejected() {
    let queue = TestQueue::new(PaletteMode::Dmg);

    let err = ingest(&queue, "empty.zip", fixtures::zip_of(&[]))
        .await
        .unwrap_err();
    assert_eq!(err, IngestError::Archive(ArchiveError::Empty));

    let dirs_only = fixtures::zip_of(&[("a/", vec![]), ("a/b/", vec![])]);
    let err = ingest(&queue, "dirs.zip", dirs_only).await.unwrap_err();
    assert_eq!(err, IngestError::Archive(ArchiveError::Empty));

    let err = ingest(&queue, "zero.zip", vec![]).await.unwrap_err();
    assert_eq!(err, IngestError::Archive(ArchiveError::Empty));

    assert!(queue.snapshot().await.is_empty());
    queue.finish().await;
}

#[tokio::test]
async fn test_unsupported_first_entry_is_rejected() {
    let queue = TestQueue::new(PaletteMode::Dmg);
    let archive = fixtures::zip_of(&[("notes.txt", b"hello".to_vec())]);

    let err = ingest(&queue, "notes.zip", archive).await.unwrap_err();
    assert_eq!(
        err,
        IngestError::Archive(ArchiveError::UnsupportedExtension {
            name: "notes.txt".into(),
            extension: "txt".into(),
        })
    );
    queue.finish().await;
}

#[tokio::test]
async fn test_corrupt_archive_is_rejected() {
    let queue = TestQueue::new(PaletteMode::Dmg);

    let err = ingest(&queue, "junk.zip", b"not a zip".to_vec())
        .await
        .unwrap_err();
    assert!(
        matches!(err, IngestError::Archive(ArchiveError::Read(_))),
        "unexpected error: {err}"
    );
    assert!(queue.snapshot().await.is_empty());
    queue.finish().await;
}

#[tokio::test]
async fn test_unsupported_single_file() {
    let queue = TestQueue::new(PaletteMode::Dmg);

    let err = ingest(&queue, "anim.gif", vec![1, 2, 3]).await.unwrap_err();
    assert_eq!(
        err,
        IngestError::UnsupportedInput {
            name: "anim.gif".into()
        }
    );
    queue.finish().await;
}

#[tokio::test]
async fn test_ingest_path_reads_from_disk() {
    let queue = TestQueue::new(PaletteMode::Gray);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("photo.png");
    std::fs::write(&path, fixtures::solid_png(2, 2, [128, 128, 128, 255])).unwrap();

    let ids = img2dmg::services::ingest_path(&queue, &path).await.unwrap();
    assert_eq!(ids.len(), 1);

    let missing = dir.path().join("missing.png");
    let err = img2dmg::services::ingest_path(&queue, &missing)
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::Read { .. }), "unexpected error: {err}");
    queue.finish().await;
}
