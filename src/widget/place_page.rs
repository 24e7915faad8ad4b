use crate::api::PlaceApi;
use crate::models::Place;
use crate::widget::booking::{BookingWidget, WidgetView};
use crate::widget::collaborators::{AuthProvider, Notifier};
use reqwest::Url;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info};

const MAPS_URL: &str = "https://maps.google.com/";

/// Detail page for one place, hosting the booking widget
pub struct PlacePage {
    api: Arc<dyn PlaceApi>,
    auth: Arc<dyn AuthProvider>,
    notifier: Arc<dyn Notifier>,
    place: Option<Arc<Place>>,
    loading: bool,
    average_rating: f64,
    booking: Option<BookingWidget>,
}

impl PlacePage {
    pub fn new(
        api: Arc<dyn PlaceApi>,
        auth: Arc<dyn AuthProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api,
            auth,
            notifier,
            place: None,
            loading: false,
            average_rating: 0.0,
            booking: None,
        }
    }

    /// Fetch the place named by the route. Without an id nothing happens.
    /// Failures are logged only; the page keeps whatever it showed before.
    pub async fn load(&mut self, id: Option<&str>) {
        let Some(id) = id else {
            return;
        };

        self.loading = true;
        info!(place = id, "loading place");
        match self.api.get_place(id).await {
            Ok(place) => {
                let place = Arc::new(place);
                self.average_rating = place.average_rating();
                self.booking = Some(BookingWidget::new(
                    place.clone(),
                    self.api.clone(),
                    self.auth.clone(),
                    self.notifier.clone(),
                ));
                info!(
                    place = id,
                    reviews = place.reviews.len(),
                    average = self.average_rating,
                    "place loaded"
                );
                self.place = Some(place);
            }
            Err(e) => {
                error!("Error fetching place data: {}", e);
            }
        }
        self.loading = false;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn place(&self) -> Option<&Place> {
        self.place.as_deref()
    }

    pub fn average_rating(&self) -> f64 {
        self.average_rating
    }

    pub fn booking(&self) -> Option<&BookingWidget> {
        self.booking.as_ref()
    }

    pub fn booking_mut(&mut self) -> Option<&mut BookingWidget> {
        self.booking.as_mut()
    }

    pub fn render(&self) -> PageView {
        if self.loading {
            return PageView::Loading;
        }
        let (Some(place), Some(booking)) = (&self.place, &self.booking) else {
            return PageView::Empty;
        };

        PageView::Place(Box::new(PlaceView {
            title: place.title.clone(),
            address: place.address.clone(),
            map_url: map_url(&place.address),
            photos: place.photos.clone(),
            description: place.description.clone(),
            max_guests: place.max_guests,
            perks: place.perks.clone(),
            booking: booking.render(),
            average_rating: format!("{:.2}", self.average_rating),
            reviews: place
                .reviews
                .iter()
                .map(|r| ReviewView {
                    name: r.review_name.clone(),
                    rating: r.rating,
                    body: r.review.clone(),
                    date: r
                        .created_at
                        .map(|d| d.format("%-m/%-d/%Y").to_string())
                        .unwrap_or_default(),
                })
                .collect(),
            extra_info: place.extra_info.clone(),
        }))
    }
}

fn map_url(address: &str) -> String {
    Url::parse_with_params(MAPS_URL, &[("q", address)])
        .map(String::from)
        .unwrap_or_else(|_| MAPS_URL.to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageView {
    Loading,
    Empty,
    Place(Box<PlaceView>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaceView {
    pub title: String,
    pub address: String,
    pub map_url: String,
    pub photos: Vec<String>,
    pub description: String,
    pub max_guests: u32,
    pub perks: Vec<String>,
    pub booking: WidgetView,
    pub average_rating: String,
    pub reviews: Vec<ReviewView>,
    pub extra_info: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewView {
    pub name: String,
    pub rating: u8,
    pub body: String,
    pub date: String,
}

impl fmt::Display for PageView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = match self {
            PageView::Loading => return writeln!(f, "Loading..."),
            PageView::Empty => return Ok(()),
            PageView::Place(view) => view,
        };

        writeln!(f, "{}", view.title)?;
        writeln!(f, "{} ({})", view.address, view.map_url)?;
        for photo in &view.photos {
            writeln!(f, "  [photo] {}", photo)?;
        }
        writeln!(f)?;
        writeln!(f, "Description")?;
        writeln!(f, "{}", view.description)?;
        writeln!(f, "Max number of guests: {}", view.max_guests)?;
        if !view.perks.is_empty() {
            writeln!(f, "Perks: {}", view.perks.join(", "))?;
        }
        writeln!(f)?;
        write!(f, "{}", view.booking)?;
        writeln!(f)?;
        writeln!(f, "Overall Rating")?;
        writeln!(f, "{} ★", view.average_rating)?;
        writeln!(f)?;
        writeln!(f, "Reviews")?;
        if view.reviews.is_empty() {
            writeln!(f, "No reviews yet.")?;
        }
        for review in &view.reviews {
            writeln!(f, "{}", review.name)?;
            writeln!(f, "Rating: {} ★", review.rating)?;
            writeln!(f, "{}", review.body)?;
            writeln!(f, "{}", review.date)?;
        }
        writeln!(f)?;
        writeln!(f, "Extra Info")?;
        writeln!(f, "{}", view.extra_info)
    }
}
