// Flickr API endpoint functions.
// Chooses the listing method per category and adapts responses to feed pages.

use async_trait::async_trait;
use tracing::debug;

use crate::cache::{FetchError, FetchedPage, PageFetcher};
use crate::model::{Category, Item};

use super::client::FlickrClient;
use super::types::{Photo, PhotoList, PhotosResponse};

/// API error codes Flickr uses for temporary outages.
const TRANSIENT_API_CODES: &[u32] = &[
    10,  // Search API is not currently available
    105, // Service currently unavailable
];

/// Method and extra query parameters for a category listing.
fn listing_params(category: &Category, page: u32) -> Vec<(&'static str, String)> {
    let mut params = vec![("page", page.to_string())];
    if category.is_all() {
        params.push(("method", "flickr.photos.getRecent".to_string()));
    } else {
        params.push(("method", "flickr.photos.search".to_string()));
        params.push(("text", category.to_string()));
    }
    params
}

/// Unwrap the envelope, classifying `stat: fail` responses.
fn into_photo_list(response: PhotosResponse) -> Result<PhotoList, FetchError> {
    if response.stat != "ok" {
        let code = response.code.unwrap_or_default();
        let reason = format!(
            "Flickr error {}: {}",
            code,
            response.message.unwrap_or_else(|| "unknown".to_string())
        );
        return Err(if TRANSIENT_API_CODES.contains(&code) {
            FetchError::Transient(reason)
        } else {
            FetchError::Permanent(reason)
        });
    }
    response
        .photos
        .ok_or_else(|| FetchError::Transient("Response is missing the photo list".to_string()))
}

fn into_fetched_page(list: PhotoList) -> FetchedPage {
    let items: Vec<Item> = list.photo.into_iter().filter_map(Photo::into_item).collect();
    FetchedPage {
        items,
        total_pages: list.pages.max(1),
    }
}

impl FlickrClient {
    /// Get one page of photos for a category.
    pub async fn get_photos(&self, category: &Category, page: u32) -> Result<PhotoList, FetchError> {
        let params = listing_params(category, page);
        let response = self.get_with_params(&params).await?;
        // A body that does not parse is treated as a glitch worth retrying
        let envelope: PhotosResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Transient(format!("Malformed response: {}", e)))?;
        into_photo_list(envelope)
    }
}

#[async_trait]
impl PageFetcher for FlickrClient {
    async fn fetch(&self, category: &Category, page: u32) -> Result<FetchedPage, FetchError> {
        if !self.supports(category) {
            return Err(FetchError::Permanent(format!(
                "Unknown category {:?}",
                category.as_str()
            )));
        }

        let list = self.get_photos(category, page).await?;
        debug!(
            %category,
            page,
            remote_page = list.page,
            total_pages = list.pages,
            photos = list.photo.len(),
            "Fetched Flickr page"
        );
        Ok(into_fetched_page(list))
    }
}
