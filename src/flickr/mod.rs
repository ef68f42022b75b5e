// Flickr API module.
// Provides the remote page fetcher backed by the Flickr REST API.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::{DEFAULT_PER_PAGE, DEFAULT_TIMEOUT, FlickrClient};
pub use types::{Photo, PhotoList, PhotosResponse};
