mod common;

use arbor_auth::Principal;
use arbor_core::ErrorKind;
use arbor_entity::user::UpdateUser;
use arbor_service::RequestContext;

use common::Harness;

#[tokio::test]
async fn test_registering_twice_keeps_one_record() {
    let h = Harness::new();
    let principal = Principal {
        id: "user-1".to_string(),
        email: Some("first@example.com".to_string()),
        full_name: Some("First".to_string()),
        avatar_url: None,
    };

    let first = h.registry.ensure_user(&principal).await.unwrap();
    assert!(first.created);

    let changed = Principal {
        email: Some("second@example.com".to_string()),
        ..principal.clone()
    };
    let second = h.registry.ensure_user(&changed).await.unwrap();
    assert!(!second.created);
    assert_eq!(second.user.email, "first@example.com");
    assert_eq!(second.user.created_at, first.user.created_at);
}

#[tokio::test]
async fn test_principal_without_email_is_rejected() {
    let h = Harness::new();
    let err = h
        .registry
        .ensure_user(&Principal::new("no-email"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = h
        .registry
        .ensure_user(&Principal::new("").with_email("x@example.com"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_unregistered_principal_cannot_create_folders() {
    let h = Harness::new();
    let stranger = RequestContext::for_user("stranger");
    let err = h
        .folders
        .create_folder(&stranger, "Docs", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_profile_update() {
    let h = Harness::new();
    let ctx = h.login("alice").await;

    let user = h
        .registry
        .update_profile(
            &ctx,
            UpdateUser {
                full_name: Some("Alice A.".to_string()),
                ..UpdateUser::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(user.full_name.as_deref(), Some("Alice A."));
    assert_eq!(h.registry.current_user(&ctx).await.unwrap().id, "alice");
}
