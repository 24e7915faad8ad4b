pub mod client;
pub mod error;
pub mod traits;

pub use client::HttpPlaceApi;
pub use error::ApiError;
pub use traits::PlaceApi;
