//! Account and session integration tests.
//!
//! Drives sign-up, sign-in, and sign-out against one store the way the
//! CLI does, and verifies the viewer the rest of the crate scopes by.

use ideabox::{Database, Viewer, auth};

fn store() -> Database {
    Database::in_memory().expect("failed to create in-memory database")
}

#[test]
fn sign_up_opens_a_session_immediately() {
    // Arrange
    let db = store();

    // Act
    let user = auth::sign_up(&db, "new@example.com", "secret1").expect("sign up");

    // Assert: no separate sign-in needed
    let current = auth::current_user(&db).expect("current user");
    assert_eq!(current.as_ref().map(|u| u.id), Some(user.id));
    assert_eq!(auth::viewer(&db).expect("viewer"), Viewer::User(user.id));
}

#[test]
fn duplicate_email_is_rejected() {
    let db = store();
    auth::sign_up(&db, "taken@example.com", "secret1").expect("sign up");

    let result = auth::sign_up(&db, "taken@example.com", "other-pass");

    let err = result.expect_err("duplicate must fail");
    assert!(err.is_user_error());
}

#[test]
fn email_case_does_not_create_a_second_account() {
    let db = store();
    auth::sign_up(&db, "person@example.com", "secret1").expect("sign up");

    let result = auth::sign_up(&db, "Person@Example.com", "secret2");
    assert!(result.is_err());
}

#[test]
fn sign_in_replaces_the_session() {
    // Arrange: two accounts
    let db = store();
    let alpha = auth::sign_up(&db, "alpha@example.com", "secret1").expect("sign up");
    let beta = auth::sign_up(&db, "beta@example.com", "secret2").expect("sign up");

    // Sign-up of beta left beta signed in
    assert_eq!(auth::viewer(&db).expect("viewer"), Viewer::User(beta.id));

    // Act
    let user = auth::sign_in(&db, "alpha@example.com", "secret1").expect("sign in");

    // Assert: single-session store, alpha is now current
    assert_eq!(user.id, alpha.id);
    assert_eq!(auth::viewer(&db).expect("viewer"), Viewer::User(alpha.id));
}

#[test]
fn wrong_password_is_rejected_without_detail() {
    let db = store();
    auth::sign_up(&db, "person@example.com", "secret1").expect("sign up");
    auth::sign_out(&db).expect("sign out");

    let result = auth::sign_in(&db, "person@example.com", "wrong");

    let err = result.expect_err("must fail");
    // Same message as an unknown account; no credential oracle
    assert_eq!(err.to_string(), "Invalid login credentials.");
    assert_eq!(auth::viewer(&db).expect("viewer"), Viewer::Anonymous);
}

#[test]
fn unknown_account_gets_the_same_message_as_wrong_password() {
    let db = store();

    let err = auth::sign_in(&db, "ghost@example.com", "whatever").expect_err("must fail");
    assert_eq!(err.to_string(), "Invalid login credentials.");
}

#[test]
fn sign_out_is_idempotent() {
    let db = store();
    auth::sign_up(&db, "person@example.com", "secret1").expect("sign up");

    auth::sign_out(&db).expect("first sign out");
    auth::sign_out(&db).expect("second sign out");

    assert_eq!(auth::viewer(&db).expect("viewer"), Viewer::Anonymous);
    assert!(auth::current_user(&db).expect("current user").is_none());
}

#[test]
fn short_password_is_rejected_at_sign_up() {
    let db = store();

    let result = auth::sign_up(&db, "person@example.com", "12345");

    let err = result.expect_err("must fail");
    assert!(err.is_user_error());
    // No account and no session were created
    assert!(auth::current_user(&db).expect("current user").is_none());
    assert!(auth::sign_in(&db, "person@example.com", "12345").is_err());
}

#[test]
fn malformed_email_is_rejected_at_sign_up() {
    let db = store();

    assert!(auth::sign_up(&db, "not-an-email", "secret1").is_err());
    assert!(auth::sign_up(&db, "  ", "secret1").is_err());
}
