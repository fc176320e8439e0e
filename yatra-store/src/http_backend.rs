use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use yatra_core::trip::TripRequestForm;
use yatra_core::{BackendError, BackendResult, BookingBackend, HotelQuery, SessionToken};
use yatra_shared::models::{
    AuthResponse, BookingResponse, CategoriesResponse, CitiesResponse, Credentials,
    HotelListingResponse, Registration, SightseeingResponse,
};
use yatra_shared::CityId;

use crate::app_config::BackendConfig;

/// [`BookingBackend`] over the REST API.
#[derive(Debug, Clone)]
pub struct HttpBookingBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBookingBackend {
    pub fn new(config: &BackendConfig) -> BackendResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BackendError::Network(e.to_string()))?;

        Ok(Self::with_client(client, &config.base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn get(&self, path: &str, token: Option<&SessionToken>) -> RequestBuilder {
        authorize(self.client.get(self.url(path)), token)
    }

    fn post(&self, path: &str, token: Option<&SessionToken>) -> RequestBuilder {
        authorize(self.client.post(self.url(path)), token)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        request: RequestBuilder,
    ) -> BackendResult<T> {
        let response = request.send().await.map_err(|e| {
            tracing::error!(endpoint, error = %e, "Backend request failed");
            BackendError::Network(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        tracing::debug!(
            endpoint,
            status = status.as_u16(),
            bytes = body.len(),
            "Backend responded"
        );

        if !status.is_success() {
            let err = error_for_status(status, &body);
            tracing::warn!(
                endpoint,
                status = status.as_u16(),
                error = %err,
                "Backend returned an error"
            );
            return Err(err);
        }

        serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!(endpoint, error = %e, "Undecodable backend response");
            BackendError::Malformed(e.to_string())
        })
    }
}

fn authorize(request: RequestBuilder, token: Option<&SessionToken>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token.expose()),
        None => request,
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Maps a non-2xx response. 401 and 403 mean the session is gone; other
/// errors carry the backend's `message` when it sent one.
pub fn error_for_status(status: StatusCode, body: &[u8]) -> BackendError {
    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        return BackendError::Unauthorized;
    }

    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty());
    match message {
        Some(message) if status.is_client_error() => BackendError::Rejected(message),
        _ => BackendError::Status(status.as_u16()),
    }
}

#[async_trait]
impl BookingBackend for HttpBookingBackend {
    async fn categories(&self, token: Option<&SessionToken>) -> BackendResult<CategoriesResponse> {
        self.send_json("categories", self.get("categories", token)).await
    }

    async fn search_cities(
        &self,
        token: Option<&SessionToken>,
        query: &str,
    ) -> BackendResult<CitiesResponse> {
        let request = self.get("cities", token).query(&[("search", query)]);
        self.send_json("cities", request).await
    }

    async fn booking_details(
        &self,
        token: Option<&SessionToken>,
        form: &TripRequestForm,
    ) -> BackendResult<BookingResponse> {
        let request = self.post("booking", token).json(form);
        self.send_json("booking", request).await
    }

    async fn hotels(
        &self,
        token: Option<&SessionToken>,
        query: &HotelQuery,
    ) -> BackendResult<HotelListingResponse> {
        let request = self.get("change-hotel", token).query(&query.query_pairs());
        self.send_json("change-hotel", request).await
    }

    async fn sightseeing(
        &self,
        token: Option<&SessionToken>,
        city_id: CityId,
    ) -> BackendResult<SightseeingResponse> {
        let request = self
            .get("site-seeing", token)
            .query(&[("cityId", city_id.to_string())]);
        self.send_json("site-seeing", request).await
    }

    async fn login(&self, credentials: &Credentials) -> BackendResult<AuthResponse> {
        let request = self.post("login", None).json(credentials);
        self.send_json("login", request).await
    }

    async fn register(&self, registration: &Registration) -> BackendResult<AuthResponse> {
        let request = self.post("register", None).json(registration);
        self.send_json("register", request).await
    }
}
