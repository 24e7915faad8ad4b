use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A review attached to a place. Only the rating is required; older
/// records may lack the display fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub review_name: String,
    pub rating: u8,
    #[serde(default)]
    pub review: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Rentable listing as served by the API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub description: String,
    pub price: i64,
    pub max_guests: u32,
    #[serde(default)]
    pub perks: Vec<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub extra_info: String,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Place {
    /// Mean of all review ratings, 0 when there are none
    pub fn average_rating(&self) -> f64 {
        if self.reviews.is_empty() {
            return 0.0;
        }
        let total: u32 = self.reviews.iter().map(|r| u32::from(r.rating)).sum();
        f64::from(total) / self.reviews.len() as f64
    }
}

/// Signed-in user as reported by the auth provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Body of `POST /bookings`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub no_of_guests: u32,
    pub name: String,
    pub phone: String,
    pub place: String,
    pub price: i64,
}

/// Booking record returned by the API; only the id is relied upon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub price: Option<i64>,
}

/// Body of `POST /places/add-review/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub rating: u8,
    pub review: String,
    pub review_name: String,
}
