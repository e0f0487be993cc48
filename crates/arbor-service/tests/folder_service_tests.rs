mod common;

use bytes::Bytes;

use arbor_core::ErrorKind;
use arbor_entity::ParentFilter;
use arbor_entity::folder::UpdateFolder;

use common::Harness;

#[tokio::test]
async fn test_create_trims_and_validates_names() {
    let h = Harness::new();
    let alice = h.login("alice").await;

    let docs = h.folders.create_folder(&alice, "  Docs  ", None).await.unwrap();
    assert_eq!(docs.name, "Docs");

    for bad in ["", "   ", "a/b", "..", "."] {
        let err = h.folders.create_folder(&alice, bad, None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation, "{bad:?}");
    }
}

#[tokio::test]
async fn test_trimmed_names_collide() {
    let h = Harness::new();
    let alice = h.login("alice").await;

    h.folders.create_folder(&alice, "Docs", None).await.unwrap();
    let err = h
        .folders
        .create_folder(&alice, " Docs ", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert!(err.public_message().contains("Docs"));
}

#[tokio::test]
async fn test_rename_and_move() {
    let h = Harness::new();
    let alice = h.login("alice").await;
    let a = h.folders.create_folder(&alice, "A", None).await.unwrap();
    let b = h.folders.create_folder(&alice, "B", None).await.unwrap();

    let moved = h
        .folders
        .rename_or_move_folder(
            &alice,
            b.id,
            UpdateFolder {
                name: Some(" B2 ".to_string()),
                parent_id: Some(Some(a.id)),
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.name, "B2");
    assert_eq!(moved.parent_id, Some(a.id));

    let err = h
        .folders
        .rename_or_move_folder(
            &alice,
            a.id,
            UpdateFolder {
                name: None,
                parent_id: Some(Some(b.id)),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Cycle);

    let children = h
        .folders
        .list_folders(&alice, ParentFilter::In(a.id))
        .await
        .unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].id, b.id);
}

#[tokio::test]
async fn test_delete_removes_cascaded_blobs() {
    let h = Harness::new();
    let alice = h.login("alice").await;
    let a = h.folders.create_folder(&alice, "A", None).await.unwrap();
    let b = h.folders.create_folder(&alice, "B", Some(a.id)).await.unwrap();
    let doc = h
        .files
        .upload_file(&alice, "doc.txt", Some(b.id), Bytes::from_static(b"doc"))
        .await
        .unwrap();
    let keep = h
        .files
        .upload_file(&alice, "keep.txt", None, Bytes::from_static(b"keep"))
        .await
        .unwrap();
    assert_eq!(h.blobs.len(), 2);

    let deleted = h.folders.delete_folder(&alice, a.id).await.unwrap();
    assert_eq!(deleted.removed_folders, 2);
    assert_eq!(deleted.removed_files, 1);

    assert_eq!(h.blobs.len(), 1);
    assert_eq!(
        h.files.get_file(&alice, doc.id).await.unwrap_err().kind,
        ErrorKind::NotFound
    );
    assert_eq!(
        h.folders.get_folder(&alice, b.id).await.unwrap_err().kind,
        ErrorKind::NotFound
    );
    assert!(h.files.get_file(&alice, keep.id).await.is_ok());
}

#[tokio::test]
async fn test_other_principal_cannot_touch_folder() {
    let h = Harness::new();
    let alice = h.login("alice").await;
    let bob = h.login("bob").await;
    let private = h.folders.create_folder(&alice, "Private", None).await.unwrap();

    let get = h.folders.get_folder(&bob, private.id).await.unwrap_err();
    let rename = h
        .folders
        .rename_or_move_folder(
            &bob,
            private.id,
            UpdateFolder {
                name: Some("Stolen".to_string()),
                parent_id: None,
            },
        )
        .await
        .unwrap_err();
    let delete = h.folders.delete_folder(&bob, private.id).await.unwrap_err();
    for err in [get, rename, delete] {
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.public_message(), "Folder not found");
    }

    assert!(
        h.folders
            .list_folders(&bob, ParentFilter::Any)
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(
        h.folders.get_folder(&alice, private.id).await.unwrap().name,
        "Private"
    );
}
