use crate::api::error::ApiError;
use crate::models::{Booking, NewBooking, NewReview, Place};
use async_trait::async_trait;

/// Remote booking API the controllers talk to
#[async_trait]
pub trait PlaceApi: Send + Sync {
    /// Fetch a place together with its reviews
    async fn get_place(&self, id: &str) -> Result<Place, ApiError>;

    /// Create a booking and return the stored record
    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, ApiError>;

    /// Attach a review to a place
    async fn add_review(&self, place_id: &str, review: &NewReview) -> Result<(), ApiError>;
}
