//! In-process [`Store`] for handler tests. Mirrors the Postgres contract:
//! unique email across all rows, soft delete, merge updates.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use time::OffsetDateTime;

use super::{NewPhoto, NewUser, Photo, PhotoChanges, Store, User, UserChanges};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    photos: Vec<(Photo, Option<OffsetDateTime>)>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    failing: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every operation errors, like a database that went away.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// All user rows, soft-deleted ones included.
    pub fn users(&self) -> Vec<User> {
        self.tables.lock().map(|t| t.users.clone()).unwrap_or_default()
    }

    fn lock(&self) -> anyhow::Result<MutexGuard<'_, Tables>> {
        if self.failing {
            anyhow::bail!("connection refused");
        }
        self.tables
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store poisoned"))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, user: NewUser) -> anyhow::Result<User> {
        let mut t = self.lock()?;
        if t.users.iter().any(|u| u.email == user.email) {
            anyhow::bail!("duplicate key value violates unique constraint \"users_email_key\"");
        }
        let now = OffsetDateTime::now_utc();
        let row = User {
            id: t.users.len() as i64 + 1,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        t.users.push(row.clone());
        Ok(row)
    }

    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let t = self.lock()?;
        Ok(t
            .users
            .iter()
            .find(|u| u.email == email && u.deleted_at.is_none())
            .cloned())
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> anyhow::Result<u64> {
        let mut t = self.lock()?;
        if let Some(email) = &changes.email {
            if t.users.iter().any(|u| u.id != id && &u.email == email) {
                anyhow::bail!("duplicate key value violates unique constraint \"users_email_key\"");
            }
        }
        let Some(user) = t
            .users
            .iter_mut()
            .find(|u| u.id == id && u.deleted_at.is_none())
        else {
            return Ok(0);
        };
        if let Some(v) = changes.username {
            user.username = v;
        }
        if let Some(v) = changes.email {
            user.email = v;
        }
        if let Some(v) = changes.password_hash {
            user.password_hash = v;
        }
        user.updated_at = OffsetDateTime::now_utc();
        Ok(1)
    }

    async fn delete_user(&self, id: i64) -> anyhow::Result<u64> {
        let mut t = self.lock()?;
        match t
            .users
            .iter_mut()
            .find(|u| u.id == id && u.deleted_at.is_none())
        {
            Some(user) => {
                user.deleted_at = Some(OffsetDateTime::now_utc());
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn create_photo(&self, photo: NewPhoto) -> anyhow::Result<Photo> {
        let mut t = self.lock()?;
        let now = OffsetDateTime::now_utc();
        let row = Photo {
            id: t.photos.len() as i64 + 1,
            title: photo.title,
            caption: photo.caption,
            photo_url: photo.photo_url,
            user_id: photo.user_id,
            created_at: now,
            updated_at: now,
        };
        t.photos.push((row.clone(), None));
        Ok(row)
    }

    async fn list_photos(&self) -> anyhow::Result<Vec<Photo>> {
        let t = self.lock()?;
        Ok(t
            .photos
            .iter()
            .filter(|(_, deleted)| deleted.is_none())
            .map(|(p, _)| p.clone())
            .collect())
    }

    async fn update_photo(&self, id: i64, changes: PhotoChanges) -> anyhow::Result<u64> {
        let mut t = self.lock()?;
        let Some((photo, _)) = t
            .photos
            .iter_mut()
            .find(|(p, deleted)| p.id == id && deleted.is_none())
        else {
            return Ok(0);
        };
        if let Some(v) = changes.title {
            photo.title = v;
        }
        if let Some(v) = changes.caption {
            photo.caption = v;
        }
        if let Some(v) = changes.photo_url {
            photo.photo_url = v;
        }
        if let Some(v) = changes.user_id {
            photo.user_id = v;
        }
        photo.updated_at = OffsetDateTime::now_utc();
        Ok(1)
    }

    async fn delete_photo(&self, id: i64) -> anyhow::Result<u64> {
        let mut t = self.lock()?;
        match t
            .photos
            .iter_mut()
            .find(|(p, deleted)| p.id == id && deleted.is_none())
        {
            Some((_, deleted)) => {
                *deleted = Some(OffsetDateTime::now_utc());
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
