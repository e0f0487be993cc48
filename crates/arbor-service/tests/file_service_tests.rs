mod common;

use std::time::Duration;

use bytes::Bytes;

use arbor_core::ErrorKind;
use arbor_core::traits::StorageProvider;
use arbor_entity::ParentFilter;
use arbor_storage::UrlSigner;

use common::Harness;

#[tokio::test]
async fn test_upload_download_round_trip() {
    let h = Harness::new();
    let alice = h.login("alice").await;
    let papers = h.folders.create_folder(&alice, "Papers", None).await.unwrap();

    let file = h
        .files
        .upload_file(
            &alice,
            "report.tex",
            Some(papers.id),
            Bytes::from_static(b"\\documentclass"),
        )
        .await
        .unwrap();
    assert_eq!(file.folder_id, Some(papers.id));
    assert!(file.storage_path.starts_with(&format!("alice/{}/", papers.id)));

    let (meta, data) = h.files.download_file(&alice, file.id).await.unwrap();
    assert_eq!(meta.id, file.id);
    assert_eq!(data, Bytes::from_static(b"\\documentclass"));
}

#[tokio::test]
async fn test_root_and_folder_scopes() {
    let h = Harness::new();
    let alice = h.login("alice").await;
    let papers = h.folders.create_folder(&alice, "Papers", None).await.unwrap();

    h.files
        .upload_file(&alice, "report.tex", None, Bytes::from_static(b"v1"))
        .await
        .unwrap();
    let err = h
        .files
        .upload_file(&alice, "report.tex", None, Bytes::from_static(b"v2"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    h.files
        .upload_file(&alice, "report.tex", Some(papers.id), Bytes::from_static(b"v3"))
        .await
        .unwrap();

    // The rejected upload left no blob behind.
    assert_eq!(h.blobs.len(), 2);

    let roots = h.files.list_files(&alice, ParentFilter::Root).await.unwrap();
    assert_eq!(roots.len(), 1);
    let all = h.files.list_files(&alice, ParentFilter::Any).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_upload_into_foreign_folder_is_not_found() {
    let h = Harness::new();
    let alice = h.login("alice").await;
    let bob = h.login("bob").await;
    let private = h.folders.create_folder(&alice, "Private", None).await.unwrap();

    let err = h
        .files
        .upload_file(&bob, "x.txt", Some(private.id), Bytes::from_static(b"x"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert!(h.blobs.is_empty());
}

#[tokio::test]
async fn test_rename_and_move_keep_content() {
    let h = Harness::new();
    let alice = h.login("alice").await;
    let archive = h.folders.create_folder(&alice, "Archive", None).await.unwrap();
    let file = h
        .files
        .upload_file(&alice, "draft.md", None, Bytes::from_static(b"# Draft"))
        .await
        .unwrap();

    let moved = h
        .files
        .rename_or_move_file(&alice, file.id, Some("final.md"), Some(Some(archive.id)))
        .await
        .unwrap();
    assert_eq!(moved.name, "final.md");
    assert_eq!(moved.folder_id, Some(archive.id));
    assert_eq!(moved.storage_path, file.storage_path);

    let back = h
        .files
        .rename_or_move_file(&alice, file.id, None, Some(None))
        .await
        .unwrap();
    assert!(back.folder_id.is_none());

    let (_, data) = h.files.download_file(&alice, file.id).await.unwrap();
    assert_eq!(data, Bytes::from_static(b"# Draft"));
}

#[tokio::test]
async fn test_replace_content_swaps_blob() {
    let h = Harness::new();
    let alice = h.login("alice").await;
    let file = h
        .files
        .upload_file(&alice, "notes.txt", None, Bytes::from_static(b"old"))
        .await
        .unwrap();

    let replaced = h
        .files
        .replace_content(&alice, file.id, Bytes::from_static(b"new"))
        .await
        .unwrap();
    assert_ne!(replaced.storage_path, file.storage_path);
    assert!(!h.blobs.exists(&file.storage_path).await.unwrap());
    assert_eq!(h.blobs.len(), 1);

    let (_, data) = h.files.download_file(&alice, file.id).await.unwrap();
    assert_eq!(data, Bytes::from_static(b"new"));
}

#[tokio::test]
async fn test_delete_removes_metadata_and_blob() {
    let h = Harness::new();
    let alice = h.login("alice").await;
    let file = h
        .files
        .upload_file(&alice, "tmp.bin", None, Bytes::from_static(b"\x00\x01"))
        .await
        .unwrap();

    let deleted = h.files.delete_file(&alice, file.id).await.unwrap();
    assert_eq!(deleted.id, file.id);
    assert!(h.blobs.is_empty());
    assert_eq!(
        h.files.get_file(&alice, file.id).await.unwrap_err().kind,
        ErrorKind::NotFound
    );
}

#[tokio::test]
async fn test_file_url_is_signed_and_owner_scoped() {
    let h = Harness::new();
    let alice = h.login("alice").await;
    let bob = h.login("bob").await;
    let file = h
        .files
        .upload_file(&alice, "a.pdf", None, Bytes::from_static(b"%PDF"))
        .await
        .unwrap();

    let signed = h
        .files
        .file_url(&alice, file.id, Some(Duration::from_secs(60)))
        .await
        .unwrap();
    let signer = UrlSigner::new("http://blobs.test", "test-secret");
    assert_eq!(signer.verify(&signed.url).unwrap(), file.storage_path);

    let err = h.files.file_url(&bob, file.id, None).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}
