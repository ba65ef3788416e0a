use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String, // Argon2 PHC string, never plaintext
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub deleted_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Fields to overwrite on update; `None` leaves the column alone.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

/// Photo record, also the wire shape of `GET /photo`.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Photo {
    pub id: i64,
    pub title: String,
    pub caption: String,
    pub photo_url: String,
    pub user_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub title: String,
    pub caption: String,
    pub photo_url: String,
    pub user_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct PhotoChanges {
    pub title: Option<String>,
    pub caption: Option<String>,
    pub photo_url: Option<String>,
    pub user_id: Option<i64>,
}
