//! Persistence seam for users and photos.
//!
//! Handlers only see [`Store`]; production wires in [`postgres::PgStore`].
//! Every read and write skips soft-deleted rows. Updates merge the fields
//! that are `Some` and bump `updated_at`. Deletes set `deleted_at`; both
//! report the number of rows touched, and touching nothing is not an error.

use async_trait::async_trait;

pub mod models;
pub mod postgres;

#[cfg(test)]
pub mod memory;

pub use models::{NewPhoto, NewUser, Photo, PhotoChanges, User, UserChanges};

#[async_trait]
pub trait Store: Send + Sync {
    async fn create_user(&self, user: NewUser) -> anyhow::Result<User>;
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn update_user(&self, id: i64, changes: UserChanges) -> anyhow::Result<u64>;
    async fn delete_user(&self, id: i64) -> anyhow::Result<u64>;

    async fn create_photo(&self, photo: NewPhoto) -> anyhow::Result<Photo>;
    async fn list_photos(&self) -> anyhow::Result<Vec<Photo>>;
    async fn update_photo(&self, id: i64, changes: PhotoChanges) -> anyhow::Result<u64>;
    async fn delete_photo(&self, id: i64) -> anyhow::Result<u64>;
}
