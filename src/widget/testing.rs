//! Fakes for the controller collaborators.

use crate::api::{ApiError, PlaceApi};
use crate::models::{Booking, NewBooking, NewReview, Place, Review, User};
use crate::widget::collaborators::{AuthProvider, Notifier, ToastKind};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::StatusCode;
use std::sync::Mutex;

pub fn place(price: i64, max_guests: u32, ratings: &[u8]) -> Place {
    Place {
        id: "place-1".to_string(),
        title: "Lakeside cabin".to_string(),
        address: "12 Shore Lane, Nainital".to_string(),
        description: "Wooden cabin by the lake".to_string(),
        price,
        max_guests,
        perks: vec!["wifi".to_string(), "parking".to_string()],
        photos: vec!["cabin.jpg".to_string()],
        extra_info: "Check-in after 2pm".to_string(),
        reviews: ratings
            .iter()
            .enumerate()
            .map(|(i, rating)| Review {
                id: format!("r{}", i),
                review_name: format!("Guest {}", i),
                rating: *rating,
                review: "Nice".to_string(),
                created_at: Utc.with_ymd_and_hms(2024, 3, 1 + i as u32, 10, 0, 0).single(),
            })
            .collect(),
    }
}

#[derive(Default)]
pub struct FakeApi {
    pub place: Mutex<Option<Place>>,
    pub booking_id: Mutex<Option<String>>,
    pub review_error: Mutex<Option<Option<String>>>,
    pub fetches: Mutex<Vec<String>>,
    pub bookings: Mutex<Vec<NewBooking>>,
    pub reviews: Mutex<Vec<(String, NewReview)>>,
}

impl FakeApi {
    pub fn with_place(place: Place) -> Self {
        let api = Self::default();
        *api.place.lock().unwrap() = Some(place);
        api
    }

    pub fn booking_succeeds(&self, id: &str) {
        *self.booking_id.lock().unwrap() = Some(id.to_string());
    }

    pub fn review_fails(&self, message: Option<&str>) {
        *self.review_error.lock().unwrap() = Some(message.map(str::to_string));
    }

    pub fn call_count(&self) -> usize {
        self.fetches.lock().unwrap().len()
            + self.bookings.lock().unwrap().len()
            + self.reviews.lock().unwrap().len()
    }
}

fn server_error(message: Option<String>) -> ApiError {
    ApiError::Status {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message,
    }
}

#[async_trait]
impl PlaceApi for FakeApi {
    async fn get_place(&self, id: &str) -> Result<Place, ApiError> {
        self.fetches.lock().unwrap().push(id.to_string());
        self.place
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| server_error(Some("Place not found".to_string())))
    }

    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, ApiError> {
        self.bookings.lock().unwrap().push(booking.clone());
        match self.booking_id.lock().unwrap().clone() {
            Some(id) => Ok(Booking {
                id,
                price: Some(booking.price),
            }),
            None => Err(server_error(None)),
        }
    }

    async fn add_review(&self, place_id: &str, review: &NewReview) -> Result<(), ApiError> {
        self.reviews
            .lock()
            .unwrap()
            .push((place_id.to_string(), review.clone()));
        match self.review_error.lock().unwrap().clone() {
            Some(message) => Err(server_error(message)),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
pub struct FakeAuth {
    pub user: Mutex<Option<User>>,
}

impl FakeAuth {
    pub fn signed_in(name: &str) -> Self {
        let auth = Self::default();
        auth.sign_in(name);
        auth
    }

    pub fn sign_in(&self, name: &str) {
        *self.user.lock().unwrap() = Some(User {
            name: name.to_string(),
            email: None,
        });
    }
}

impl AuthProvider for FakeAuth {
    fn current_user(&self) -> Option<User> {
        self.user.lock().unwrap().clone()
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub toasts: Mutex<Vec<(ToastKind, String)>>,
}

impl RecordingNotifier {
    pub fn all(&self) -> Vec<(ToastKind, String)> {
        self.toasts.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<(ToastKind, String)> {
        self.toasts.lock().unwrap().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: ToastKind, message: &str) {
        self.toasts.lock().unwrap().push((kind, message.to_string()));
    }
}
