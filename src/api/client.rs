use crate::api::error::ApiError;
use crate::api::traits::PlaceApi;
use crate::config::Settings;
use crate::models::{Booking, NewBooking, NewReview, Place};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Deserialize)]
struct PlaceEnvelope {
    place: Place,
}

#[derive(Deserialize)]
struct BookingEnvelope {
    booking: Booking,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// `PlaceApi` over HTTP
#[derive(Clone)]
pub struct HttpPlaceApi {
    client: Client,
    base_url: String,
}

impl HttpPlaceApi {
    /// Build a client from loaded settings
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &settings.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .context("API token is not a valid header value")?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(concat!("place-booker/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.api_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("API returned status: {}", status);
            return Err(error_from_body(status, &body));
        }

        debug!("Received {} bytes", body.len());
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Turn a failed response into an error, keeping the server's message
fn error_from_body(status: StatusCode, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty());
    ApiError::Status { status, message }
}

#[async_trait]
impl PlaceApi for HttpPlaceApi {
    #[tracing::instrument(skip(self), err)]
    async fn get_place(&self, id: &str) -> Result<Place, ApiError> {
        let response = self
            .client
            .get(self.endpoint(&format!("places/{}", id)))
            .send()
            .await?;

        let envelope: PlaceEnvelope = Self::read_json(response).await?;
        Ok(envelope.place)
    }

    #[tracing::instrument(skip(self, booking), fields(place = %booking.place), err)]
    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, ApiError> {
        let response = self
            .client
            .post(self.endpoint("bookings"))
            .json(booking)
            .send()
            .await?;

        let envelope: BookingEnvelope = Self::read_json(response).await?;
        Ok(envelope.booking)
    }

    #[tracing::instrument(skip(self, review), err)]
    async fn add_review(&self, place_id: &str, review: &NewReview) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.endpoint(&format!("places/add-review/{}", place_id)))
            .json(review)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!("API returned status: {}", status);
            return Err(error_from_body(status, &body));
        }
        review_accepted(&body)
    }
}

/// A 2xx with no body (e.g. 204) counts as stored; an explicit `null` or
/// `false` does not.
fn review_accepted(body: &str) -> Result<(), ApiError> {
    if body.trim().is_empty() {
        return Ok(());
    }
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    match value {
        serde_json::Value::Null | serde_json::Value::Bool(false) => {
            Err(ApiError::Decode("review was not accepted".to_string()))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one canned HTTP response on a local port. The handle yields the
    /// raw request that was received.
    async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&raw);
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text[..end]
                        .lines()
                        .find_map(|l| {
                            let (name, value) = l.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if raw.len() >= end + 4 + length {
                        break;
                    }
                }
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&raw).into_owned()
        });

        (format!("http://{}/api", addr), handle)
    }

    fn booking() -> NewBooking {
        NewBooking {
            check_in: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
            check_out: Utc.with_ymd_and_hms(2024, 5, 4, 0, 0, 0).unwrap(),
            no_of_guests: 2,
            name: "Asha".to_string(),
            phone: "98765".to_string(),
            place: "p1".to_string(),
            price: 300,
        }
    }

    fn review() -> NewReview {
        NewReview {
            rating: 4,
            review: "Quiet".to_string(),
            review_name: "Ravi".to_string(),
        }
    }

    fn settings(url: &str) -> Settings {
        Settings {
            api_url: url.to_string(),
            timeout_secs: 5,
            token: Some("secret".to_string()),
            user_name: None,
        }
    }

    #[test]
    fn endpoint_joins_without_double_slashes() {
        let api = HttpPlaceApi::new(&settings("http://localhost:4000/api/")).unwrap();
        assert_eq!(api.endpoint("/places/42"), "http://localhost:4000/api/places/42");
        assert_eq!(api.endpoint("bookings"), "http://localhost:4000/api/bookings");
    }

    #[test]
    fn rejects_token_with_newline() {
        let mut s = settings("http://localhost");
        s.token = Some("bad\ntoken".to_string());
        assert!(HttpPlaceApi::new(&s).is_err());
    }

    #[test]
    fn error_body_message_is_kept() {
        let err = error_from_body(StatusCode::UNPROCESSABLE_ENTITY, r#"{"message":"Rating must be 1-5"}"#);
        assert_eq!(err.server_message(), Some("Rating must be 1-5"));
    }

    #[test]
    fn error_body_without_message() {
        let err = error_from_body(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(err.server_message(), None);

        let err = error_from_body(StatusCode::BAD_REQUEST, r#"{"message":"  "}"#);
        assert_eq!(err.server_message(), None);
    }

    #[tokio::test]
    async fn get_place_unwraps_envelope() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"place":{"_id":"p1","title":"Cabin","price":100,"maxGuests":3,"reviews":[{"rating":5}]}}"#,
        )
        .await;
        let api = HttpPlaceApi::new(&settings(&url)).unwrap();

        let place = api.get_place("p1").await.unwrap();

        assert_eq!(place.id, "p1");
        assert_eq!(place.price, 100);
        assert_eq!(place.reviews.len(), 1);
        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/places/p1 HTTP/1.1"));
        assert!(request.to_lowercase().contains("authorization: bearer secret"));
    }

    #[tokio::test]
    async fn create_booking_returns_booking_id() {
        let (url, server) = serve_once(
            "201 Created",
            r#"{"booking":{"_id":"abc123","price":300,"place":"p1"}}"#,
        )
        .await;
        let api = HttpPlaceApi::new(&settings(&url)).unwrap();

        let created = api.create_booking(&booking()).await.unwrap();

        assert_eq!(created.id, "abc123");
        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/bookings HTTP/1.1"));
        assert!(request.contains(r#""noOfGuests":2"#));
        assert!(request.contains(r#""price":300"#));
    }

    #[tokio::test]
    async fn booking_without_envelope_is_a_decode_error() {
        let (url, _server) = serve_once("200 OK", r#"{"_id":"abc123"}"#).await;
        let api = HttpPlaceApi::new(&settings(&url)).unwrap();

        let err = api.create_booking(&booking()).await.unwrap_err();

        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn failed_status_carries_server_message() {
        let (url, _server) =
            serve_once("422 Unprocessable Entity", r#"{"message":"Dates already booked"}"#).await;
        let api = HttpPlaceApi::new(&settings(&url)).unwrap();

        let err = api.create_booking(&booking()).await.unwrap_err();

        match &err {
            ApiError::Status { status, .. } => assert_eq!(*status, StatusCode::UNPROCESSABLE_ENTITY),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(err.server_message(), Some("Dates already booked"));
    }

    #[tokio::test]
    async fn add_review_posts_to_place() {
        let (url, server) = serve_once("200 OK", r#"{"_id":"r9","rating":4}"#).await;
        let api = HttpPlaceApi::new(&settings(&url)).unwrap();

        api.add_review("p1", &review()).await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/places/add-review/p1 HTTP/1.1"));
        assert!(request.contains(r#""reviewName":"Ravi""#));
    }

    #[tokio::test]
    async fn add_review_null_body_is_rejected() {
        let (url, _server) = serve_once("200 OK", "null").await;
        let api = HttpPlaceApi::new(&settings(&url)).unwrap();

        let err = api.add_review("p1", &review()).await.unwrap_err();

        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn add_review_empty_success_is_accepted() {
        let (url, _server) = serve_once("200 OK", "").await;
        let api = HttpPlaceApi::new(&settings(&url)).unwrap();

        api.add_review("p1", &review()).await.unwrap();
    }

    #[tokio::test]
    async fn add_review_error_keeps_message() {
        let (url, _server) =
            serve_once("400 Bad Request", r#"{"message":"You already reviewed this place"}"#).await;
        let api = HttpPlaceApi::new(&settings(&url)).unwrap();

        let err = api.add_review("p1", &review()).await.unwrap_err();

        assert_eq!(err.server_message(), Some("You already reviewed this place"));
    }

    #[test]
    fn review_body_acceptance() {
        assert!(review_accepted("").is_ok());
        assert!(review_accepted("  ").is_ok());
        assert!(review_accepted(r#"{"ok":true}"#).is_ok());
        assert!(review_accepted("true").is_ok());
        assert!(review_accepted("null").is_err());
        assert!(review_accepted("false").is_err());
        assert!(review_accepted("<html>").is_err());
    }
}
