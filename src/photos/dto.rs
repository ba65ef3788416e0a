use serde::Deserialize;

use crate::store::{NewPhoto, PhotoChanges};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreatePhotoRequest {
    pub title: String,
    pub caption: String,
    pub photo_url: String,
    pub user_id: i64,
}

/// Partial photo for `PUT /photo/:photoId`. Absent or null fields are kept.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePhotoRequest {
    pub title: Option<String>,
    pub caption: Option<String>,
    pub photo_url: Option<String>,
    pub user_id: Option<i64>,
}

impl From<CreatePhotoRequest> for NewPhoto {
    fn from(r: CreatePhotoRequest) -> Self {
        Self {
            title: r.title,
            caption: r.caption,
            photo_url: r.photo_url,
            user_id: r.user_id,
        }
    }
}

impl From<UpdatePhotoRequest> for PhotoChanges {
    fn from(r: UpdatePhotoRequest) -> Self {
        Self {
            title: r.title,
            caption: r.caption,
            photo_url: r.photo_url,
            user_id: r.user_id,
        }
    }
}
