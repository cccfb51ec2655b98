//! Local account and session management.
//!
//! Stands in for the hosted identity provider with the same consumed
//! surface: sign up, sign in, sign out, and current-user lookup. The
//! signed-in identity is persisted in a single-row session table so
//! successive invocations share it. Passwords are stored salted and
//! SHA-256 hashed; this is a local stub, not a hardened credential store.

use rusqlite::OptionalExtension;
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::UserId;

/// Minimum accepted password length, matching the hosted provider's rule.
const MIN_PASSWORD_LEN: usize = 6;

/// A signed-in user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
}

/// The identity a listing or mutation runs as.
///
/// Anonymous viewers see only public notes; authenticated viewers see
/// and mutate exactly their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Anonymous,
    User(UserId),
}

impl Viewer {
    /// Returns the user ID when signed in.
    pub fn user_id(self) -> Option<UserId> {
        match self {
            Viewer::Anonymous => None,
            Viewer::User(id) => Some(id),
        }
    }

    /// Returns the user ID or a sign-in-required error naming the
    /// attempted action.
    pub fn require(self, action: &'static str) -> Result<UserId> {
        self.user_id().ok_or(Error::SignInRequired(action))
    }
}

/// Creates an account and signs it in.
///
/// Rejects malformed emails, short passwords, and duplicate accounts
/// before touching the session.
pub fn sign_up(db: &Database, email: &str, password: &str) -> Result<User> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(Error::Auth("Please enter a valid email address.".into()));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(Error::Auth(format!(
            "Password should be at least {MIN_PASSWORD_LEN} characters."
        )));
    }

    let conn = db.connection();
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1 COLLATE NOCASE)",
        [email],
        |row| row.get(0),
    )?;
    if exists {
        return Err(Error::Auth(
            "An account with this email already exists.".into(),
        ));
    }

    let now = OffsetDateTime::now_utc();
    let salt = new_salt(email, now);
    let hash = hash_password(password, &salt);
    conn.execute(
        "INSERT INTO users (email, password_hash, salt, created_at) VALUES (?1, ?2, ?3, ?4)",
        (email, &hash, &salt, now.unix_timestamp()),
    )?;
    let id = UserId::new(conn.last_insert_rowid());

    let user = User {
        id,
        email: email.to_string(),
    };
    open_session(db, user.id)?;
    Ok(user)
}

/// Verifies credentials and opens a session.
pub fn sign_in(db: &Database, email: &str, password: &str) -> Result<User> {
    let conn = db.connection();
    let row: Option<(i64, String, String, String)> = conn
        .query_row(
            "SELECT id, email, password_hash, salt FROM users WHERE email = ?1 COLLATE NOCASE",
            [email.trim()],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )
        .optional()?;

    let Some((id, email, stored_hash, salt)) = row else {
        return Err(Error::Auth("Invalid login credentials.".into()));
    };
    if hash_password(password, &salt) != stored_hash {
        return Err(Error::Auth("Invalid login credentials.".into()));
    }

    let user = User {
        id: UserId::new(id),
        email,
    };
    open_session(db, user.id)?;
    Ok(user)
}

/// Closes the current session. Idempotent.
pub fn sign_out(db: &Database) -> Result<()> {
    db.connection().execute("DELETE FROM session", [])?;
    Ok(())
}

/// Returns the signed-in user, if any.
pub fn current_user(db: &Database) -> Result<Option<User>> {
    let row: Option<(i64, String)> = db
        .connection()
        .query_row(
            "SELECT u.id, u.email FROM session s JOIN users u ON u.id = s.user_id WHERE s.id = 1",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    Ok(row.map(|(id, email)| User {
        id: UserId::new(id),
        email,
    }))
}

/// Returns the current viewer identity: the signed-in user or Anonymous.
pub fn viewer(db: &Database) -> Result<Viewer> {
    Ok(match current_user(db)? {
        Some(user) => Viewer::User(user.id),
        None => Viewer::Anonymous,
    })
}

fn open_session(db: &Database, user_id: UserId) -> Result<()> {
    db.connection().execute(
        "INSERT OR REPLACE INTO session (id, user_id) VALUES (1, ?1)",
        [user_id.get()],
    )?;
    Ok(())
}

fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn new_salt(email: &str, now: OffsetDateTime) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.as_bytes());
    hasher.update(now.unix_timestamp_nanos().to_le_bytes());
    hex::encode(&hasher.finalize()[..16])
}
