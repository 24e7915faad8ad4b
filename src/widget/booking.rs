use crate::api::{ApiError, PlaceApi};
use crate::models::{NewBooking, NewReview, Place, User};
use crate::widget::collaborators::{AuthProvider, Notifier, ToastKind};
use crate::widget::validation::{stay_total, validate_booking, validate_review, ValidationError};
use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info};

const BOOKING_FAILED: &str = "Something went wrong!";
const BOOKING_CONFIRMED: &str = "Congratulations! Enjoy your trip.";
const REVIEW_FAILED: &str = "Something went wrong while submitting your review.";
const REVIEW_THANKS: &str = "Thank you for your review!";

/// Highest star on the rating selector
pub const MAX_STARS: u8 = 5;

/// Selected stay, either end may still be open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Whole days between the two dates after dropping the time of day.
    /// 0 while either end is unset.
    pub fn nights(&self) -> i64 {
        match (self.from, self.to) {
            (Some(from), Some(to)) => (to.date_naive() - from.date_naive()).num_days(),
            _ => 0,
        }
    }
}

/// Reservation form as typed by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    pub range: DateRange,
    pub guests: u32,
    pub name: String,
    pub phone: String,
}

impl Default for BookingDraft {
    fn default() -> Self {
        Self {
            range: DateRange::default(),
            guests: 1,
            name: String::new(),
            phone: String::new(),
        }
    }
}

impl BookingDraft {
    pub fn nights(&self) -> i64 {
        self.range.nights()
    }
}

/// Review form as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewDraft {
    pub review_name: String,
    pub rating: Option<u8>,
    pub review: String,
}

/// Where the host view should navigate instead of showing the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    Login,
    Booking(String),
}

impl Redirect {
    pub fn path(&self) -> String {
        match self {
            Redirect::Login => "/login".to_string(),
            Redirect::Booking(id) => format!("/account/bookings/{}", id),
        }
    }
}

/// What a submit call ended up doing
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Nobody signed in, sent to the login page
    Redirected,
    /// Rejected locally, nothing was sent
    Invalid(ValidationError),
    Submitted,
    Failed(ApiError),
}

/// Booking and review form for a single place
pub struct BookingWidget {
    place: Arc<Place>,
    api: Arc<dyn PlaceApi>,
    auth: Arc<dyn AuthProvider>,
    notifier: Arc<dyn Notifier>,
    booking: BookingDraft,
    review: ReviewDraft,
    redirect: Option<Redirect>,
    user: Option<User>,
}

impl BookingWidget {
    pub fn new(
        place: Arc<Place>,
        api: Arc<dyn PlaceApi>,
        auth: Arc<dyn AuthProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let mut widget = Self {
            place,
            api,
            auth,
            notifier,
            booking: BookingDraft::default(),
            review: ReviewDraft::default(),
            redirect: None,
            user: None,
        };
        widget.sync_user();
        widget
    }

    /// Pick up the current user. When it changed to a signed-in user the
    /// contact name is replaced by the user's name. Hosts call this when the
    /// auth state changes; submits only check that someone is signed in.
    pub fn sync_user(&mut self) {
        let current = self.auth.current_user();
        if current == self.user {
            return;
        }
        if let Some(user) = &current {
            debug!(user = %user.name, "seeding contact name");
            self.booking.name = user.name.clone();
        }
        self.user = current;
    }

    pub fn place(&self) -> &Place {
        &self.place
    }

    pub fn booking_draft(&self) -> &BookingDraft {
        &self.booking
    }

    pub fn review_draft(&self) -> &ReviewDraft {
        &self.review
    }

    pub fn redirect(&self) -> Option<&Redirect> {
        self.redirect.as_ref()
    }

    pub fn set_date_range(&mut self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) {
        self.booking.range = DateRange { from, to };
    }

    pub fn set_guests(&mut self, guests: u32) {
        self.booking.guests = guests;
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.booking.name = name.into();
    }

    pub fn set_phone(&mut self, phone: impl Into<String>) {
        self.booking.phone = phone.into();
    }

    /// Star click; values outside 1..=5 land on the nearest star
    pub fn set_rating(&mut self, star: u8) {
        self.review.rating = Some(star.clamp(1, MAX_STARS));
    }

    pub fn set_review_name(&mut self, name: impl Into<String>) {
        self.review.review_name = name.into();
    }

    pub fn set_review(&mut self, review: impl Into<String>) {
        self.review.review = review.into();
    }

    pub fn nights(&self) -> i64 {
        self.booking.nights()
    }

    /// Price of the selected stay, 0 until a range is picked. `None` when
    /// the product overflows.
    pub fn total_price(&self) -> Option<i64> {
        stay_total(self.nights().max(0), self.place.price)
    }

    pub async fn submit_booking(&mut self) -> SubmitOutcome {
        if self.auth.current_user().is_none() {
            self.redirect = Some(Redirect::Login);
            return SubmitOutcome::Redirected;
        }

        let (nights, total) = match validate_booking(&self.booking, &self.place) {
            Ok(quote) => quote,
            Err(invalid) => return self.reject(invalid),
        };

        // The server receives the client-side total as-is.
        let (Some(check_in), Some(check_out)) = (self.booking.range.from, self.booking.range.to)
        else {
            return self.reject(ValidationError::InvalidDates);
        };
        let request = NewBooking {
            check_in,
            check_out,
            no_of_guests: self.booking.guests,
            name: self.booking.name.clone(),
            phone: self.booking.phone.clone(),
            place: self.place.id.clone(),
            price: total,
        };

        info!(place = %self.place.id, nights, price = request.price, "submitting booking");
        match self.api.create_booking(&request).await {
            Ok(booking) => {
                info!(booking = %booking.id, "booking created");
                self.redirect = Some(Redirect::Booking(booking.id));
                self.notifier.notify(ToastKind::Info, BOOKING_CONFIRMED);
                SubmitOutcome::Submitted
            }
            Err(e) => {
                error!("Booking failed: {}", e);
                self.notifier.notify(ToastKind::Error, BOOKING_FAILED);
                SubmitOutcome::Failed(e)
            }
        }
    }

    pub async fn submit_review(&mut self) -> SubmitOutcome {
        if self.auth.current_user().is_none() {
            self.redirect = Some(Redirect::Login);
            return SubmitOutcome::Redirected;
        }

        let rating = match validate_review(&self.review) {
            Ok(rating) => rating,
            Err(invalid) => return self.reject(invalid),
        };

        let request = NewReview {
            rating,
            review: self.review.review.trim().to_string(),
            review_name: self.review.review_name.trim().to_string(),
        };

        info!(place = %self.place.id, rating, "submitting review");
        match self.api.add_review(&self.place.id, &request).await {
            Ok(()) => {
                self.notifier.notify(ToastKind::Success, REVIEW_THANKS);
                self.review = ReviewDraft::default();
                SubmitOutcome::Submitted
            }
            Err(e) => {
                error!("Review submission failed: {}", e);
                let message = e.server_message().unwrap_or(REVIEW_FAILED).to_string();
                self.notifier.notify(ToastKind::Error, &message);
                SubmitOutcome::Failed(e)
            }
        }
    }

    fn reject(&self, invalid: ValidationError) -> SubmitOutcome {
        debug!(reason = %invalid, "input rejected");
        self.notifier.notify(ToastKind::Error, &invalid.to_string());
        SubmitOutcome::Invalid(invalid)
    }

    /// Current output: either a redirect or the form contents
    pub fn render(&self) -> WidgetView {
        if let Some(redirect) = &self.redirect {
            return WidgetView::Redirect(redirect.path());
        }

        let nights = self.nights();
        let mut book_label = "Book this place".to_string();
        if let Some(total) = self.total_price().filter(|_| nights > 0) {
            book_label.push_str(&format!(" ₹{}", total));
        }

        let mut stars = [false; MAX_STARS as usize];
        for (i, lit) in stars.iter_mut().enumerate() {
            *lit = self.review.rating.is_some_and(|r| usize::from(r) > i);
        }

        WidgetView::Form(FormView {
            price_per_night: self.place.price,
            check_in: self.booking.range.from.map(|d| d.date_naive()),
            check_out: self.booking.range.to.map(|d| d.date_naive()),
            guests: self.booking.guests,
            max_guests: self.place.max_guests,
            guest_placeholder: format!("Max. guests: {}", self.place.max_guests),
            name: self.booking.name.clone(),
            phone: self.booking.phone.clone(),
            nights,
            book_label,
            stars,
            review_name: self.review.review_name.clone(),
            review: self.review.review.clone(),
        })
    }
}

/// Rendered booking widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetView {
    Redirect(String),
    Form(FormView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub price_per_night: i64,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub guests: u32,
    pub max_guests: u32,
    pub guest_placeholder: String,
    pub name: String,
    pub phone: String,
    pub nights: i64,
    pub book_label: String,
    /// Lit state of stars 1 to 5
    pub stars: [bool; MAX_STARS as usize],
    pub review_name: String,
    pub review: String,
}

impl fmt::Display for WidgetView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let form = match self {
            WidgetView::Redirect(path) => return writeln!(f, "→ {}", path),
            WidgetView::Form(form) => form,
        };

        let date = |d: Option<NaiveDate>| d.map_or_else(|| "-".to_string(), |d| d.to_string());
        writeln!(f, "Price: ₹{} / per night", form.price_per_night)?;
        writeln!(f, "Dates: {} → {}", date(form.check_in), date(form.check_out))?;
        writeln!(f, "Number of guests: {} (1-{})", form.guests, form.max_guests)?;
        writeln!(f, "Your full name: {}", form.name)?;
        writeln!(f, "Phone number: {}", form.phone)?;
        writeln!(f, "[{}]", form.book_label)?;

        let stars: String = form.stars.iter().map(|lit| if *lit { '★' } else { '☆' }).collect();
        writeln!(f, "Rate your experience: {}", stars)?;
        writeln!(f, "Your Name (for review): {}", form.review_name)?;
        writeln!(f, "Write a review: {}", form.review)?;
        writeln!(f, "[Submit Review]")
    }
}
