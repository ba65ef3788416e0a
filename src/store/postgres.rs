use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use super::{NewPhoto, NewUser, Photo, PhotoChanges, Store, User, UserChanges};

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, user: NewUser) -> anyhow::Result<User> {
        let row = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, created_at, updated_at, deleted_at
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.db)
        .await
        .context("insert user")?;
        Ok(row)
    }

    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let row = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at, deleted_at
              FROM users
             WHERE email = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find user by email")?;
        Ok(row)
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> anyhow::Result<u64> {
        let done = sqlx::query(
            r#"
            UPDATE users
               SET username      = COALESCE($2, username),
                   email         = COALESCE($3, email),
                   password_hash = COALESCE($4, password_hash),
                   updated_at    = now()
             WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(changes.username)
        .bind(changes.email)
        .bind(changes.password_hash)
        .execute(&self.db)
        .await
        .context("update user")?;
        Ok(done.rows_affected())
    }

    async fn delete_user(&self, id: i64) -> anyhow::Result<u64> {
        let done = sqlx::query(
            r#"
            UPDATE users SET deleted_at = now()
             WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&self.db)
        .await
        .context("soft delete user")?;
        Ok(done.rows_affected())
    }

    async fn create_photo(&self, photo: NewPhoto) -> anyhow::Result<Photo> {
        let row = sqlx::query_as::<_, Photo>(
            r#"
            INSERT INTO photos (title, caption, photo_url, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, caption, photo_url, user_id, created_at, updated_at
            "#,
        )
        .bind(&photo.title)
        .bind(&photo.caption)
        .bind(&photo.photo_url)
        .bind(photo.user_id) // not checked against users
        .fetch_one(&self.db)
        .await
        .context("insert photo")?;
        Ok(row)
    }

    async fn list_photos(&self) -> anyhow::Result<Vec<Photo>> {
        let rows = sqlx::query_as::<_, Photo>(
            r#"
            SELECT id, title, caption, photo_url, user_id, created_at, updated_at
              FROM photos
             WHERE deleted_at IS NULL
             ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list photos")?;
        Ok(rows)
    }

    async fn update_photo(&self, id: i64, changes: PhotoChanges) -> anyhow::Result<u64> {
        let done = sqlx::query(
            r#"
            UPDATE photos
               SET title      = COALESCE($2, title),
                   caption    = COALESCE($3, caption),
                   photo_url  = COALESCE($4, photo_url),
                   user_id    = COALESCE($5, user_id),
                   updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.caption)
        .bind(changes.photo_url)
        .bind(changes.user_id)
        .execute(&self.db)
        .await
        .context("update photo")?;
        Ok(done.rows_affected())
    }

    async fn delete_photo(&self, id: i64) -> anyhow::Result<u64> {
        let done = sqlx::query(
            r#"
            UPDATE photos SET deleted_at = now()
             WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&self.db)
        .await
        .context("soft delete photo")?;
        Ok(done.rows_affected())
    }
}
