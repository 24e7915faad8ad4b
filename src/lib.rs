//! Booking and review controllers for a rental-place API.

pub mod api;
pub mod config;
pub mod models;
pub mod widget;
