use crate::models::Place;
use crate::widget::booking::{BookingDraft, ReviewDraft};
use thiserror::Error;

/// Input rejected before anything is sent. The messages are shown verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select valid dates")]
    InvalidDates,
    #[error("No. of guests can't be less than 1")]
    TooFewGuests,
    #[error("Allowed max. no. of guests: {max}")]
    TooManyGuests { max: u32 },
    #[error("Name can't be empty")]
    MissingName,
    #[error("Phone can't be empty")]
    MissingPhone,
    #[error("Please provide a rating.")]
    MissingRating,
    #[error("Please write a review.")]
    MissingReview,
    #[error("Please provide your name for the review.")]
    MissingReviewName,
    #[error("Total price is out of range")]
    PriceOutOfRange,
}

/// Nights times nightly price, `None` if it does not fit in an `i64`
pub fn stay_total(nights: i64, price: i64) -> Option<i64> {
    nights.checked_mul(price)
}

/// Check a booking draft against the place. Returns the number of nights and
/// the total price.
pub fn validate_booking(
    draft: &BookingDraft,
    place: &Place,
) -> Result<(i64, i64), ValidationError> {
    let nights = draft.nights();
    if nights < 1 {
        return Err(ValidationError::InvalidDates);
    }
    validate_guests(draft.guests, place.max_guests)?;
    if draft.name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }
    if draft.phone.trim().is_empty() {
        return Err(ValidationError::MissingPhone);
    }
    let total = stay_total(nights, place.price).ok_or(ValidationError::PriceOutOfRange)?;
    Ok((nights, total))
}

/// Guest bounds, checked independently of the dates
pub fn validate_guests(guests: u32, max_guests: u32) -> Result<(), ValidationError> {
    if guests < 1 {
        return Err(ValidationError::TooFewGuests);
    }
    if guests > max_guests {
        return Err(ValidationError::TooManyGuests { max: max_guests });
    }
    Ok(())
}

/// Check a review draft. Returns the chosen rating.
pub fn validate_review(draft: &ReviewDraft) -> Result<u8, ValidationError> {
    let rating = draft.rating.ok_or(ValidationError::MissingRating)?;
    if draft.review.trim().is_empty() {
        return Err(ValidationError::MissingReview);
    }
    if draft.review_name.trim().is_empty() {
        return Err(ValidationError::MissingReviewName);
    }
    Ok(rating)
}
