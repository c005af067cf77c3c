//! User repository against a live PostgreSQL

mod common;

use common::{create_user, test_storage, unique};
use content_store::{StoreError, User};

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_create_user_assigns_identity() {
    let storage = test_storage().await;

    let user = create_user(&storage).await;

    assert!(user.id > 0);
    assert!(user.created_at.timestamp() > 0);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_duplicate_username_is_unknown() {
    let storage = test_storage().await;
    let existing = create_user(&storage).await;

    let mut duplicate = User::new(
        existing.username.clone(),
        format!("{}@example.com", unique("other")),
        "hash",
    );
    let err = storage.users.create(&mut duplicate).await.unwrap_err();

    assert!(matches!(err, StoreError::Unknown(_)));
    assert_eq!(duplicate.id, 0);
}
