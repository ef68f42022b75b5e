// Flickr API response types.
// Defines structs for deserializing Flickr REST photo list responses.

use serde::Deserialize;

use crate::model::Item;

/// Top-level envelope; `stat` is "ok" or "fail".
#[derive(Debug, Clone, Deserialize)]
pub struct PhotosResponse {
    pub stat: String,
    pub photos: Option<PhotoList>,
    pub code: Option<u32>,
    pub message: Option<String>,
}

/// One page of a photo listing.
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoList {
    pub page: u32,
    pub pages: u32,
    #[serde(default)]
    pub photo: Vec<Photo>,
}

/// Photo record as returned with `extras=url_s`.
#[derive(Debug, Clone, Deserialize)]
pub struct Photo {
    pub id: String,
    pub url_s: Option<String>,
}

impl Photo {
    /// Convert to a feed item. Photos without a small-size URL cannot be shown.
    pub fn into_item(self) -> Option<Item> {
        let url = self.url_s?;
        Some(Item::new(self.id, url))
    }
}
