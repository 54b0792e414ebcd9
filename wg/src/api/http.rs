//! HTTP gateway to the WanderGuide planning backend
//!
//! Implements [`TravelApi`] over a single reqwest client. Every call gets the
//! configured deadline, carries the stored bearer token when there is one,
//! and comes back as a categorized [`ApiError`] on failure. Nothing is
//! retried.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::{
    Activity, ActivityPreferences, ApiError, BudgetOptimization, BudgetRequest, ChatReply, ChatRequest,
    CulturalInsights, Flight, FlightSearch, HealthStatus, Hotel, HotelSearch, Itinerary, Recommendation,
    RestaurantQuery, TravelApi, TripRequest, WeatherForecast,
};
use crate::config::ApiConfig;
use crate::store::{self, KeyValueStore};

/// Forecast length when the caller does not ask for one
pub const DEFAULT_FORECAST_DAYS: u32 = 7;

/// reqwest-backed gateway
pub struct HttpGateway {
    base_url: String,
    http: Client,
    timeout: Duration,
    chat_timeout: Duration,
    store: Option<Arc<dyn KeyValueStore>>,
}

impl HttpGateway {
    /// Create a gateway from configuration
    ///
    /// `store` is consulted on every request for a bearer token.
    pub fn from_config(config: &ApiConfig, store: Option<Arc<dyn KeyValueStore>>) -> Result<Self, ApiError> {
        debug!(?config, "from_config: called");
        let timeout = config.timeout();

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            timeout,
            chat_timeout: config.chat_timeout(),
            store,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.store.as_deref().and_then(store::auth_token) {
            Some(token) => {
                debug!("authorize: attaching bearer token");
                request.bearer_auth(token)
            }
            None => request,
        }
    }

    fn transport_error(&self, err: reqwest::Error, timeout: Duration) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout(timeout)
        } else {
            ApiError::Network {
                base_url: self.base_url.clone(),
                message: err.to_string(),
            }
        }
    }

    /// Send a request and decode the JSON body
    ///
    /// All failures are logged here, once, with the operation name.
    async fn send(&self, op: &'static str, request: RequestBuilder, timeout: Duration) -> Result<Value, ApiError> {
        debug!(%op, "send: called");
        let result = self.send_inner(request.timeout(timeout), timeout).await;
        if let Err(e) = &result {
            warn!(%op, category = %e.category(), error = %e, "Backend request failed");
        }
        result
    }

    async fn send_inner(&self, request: RequestBuilder, timeout: Duration) -> Result<Value, ApiError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e, timeout))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e, timeout))?;

        if !status.is_success() {
            debug!(status = status.as_u16(), "send_inner: non-success status");
            return Err(ApiError::from_status(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| ApiError::InvalidResponse(format!("Body is not JSON: {}", e)))
    }

    async fn get(&self, op: &'static str, path: &str, query: &impl serde::Serialize) -> Result<Value, ApiError> {
        let request = self.http.get(self.url(path)).query(query);
        self.send(op, request, self.timeout).await
    }

    async fn post(&self, op: &'static str, path: &str, body: &impl serde::Serialize) -> Result<Value, ApiError> {
        let request = self.http.post(self.url(path)).json(body);
        self.send(op, request, self.timeout).await
    }
}

/// Pull `field` out of a response envelope
fn unwrap_envelope<T: DeserializeOwned>(mut value: Value, field: &str) -> Result<T, ApiError> {
    let inner = value
        .get_mut(field)
        .map(Value::take)
        .ok_or_else(|| ApiError::InvalidResponse(format!("Response has no '{}' field", field)))?;
    serde_json::from_value(inner).map_err(|e| ApiError::InvalidResponse(format!("Malformed '{}': {}", field, e)))
}

#[async_trait]
impl TravelApi for HttpGateway {
    async fn generate_itinerary(&self, trip: &TripRequest) -> Result<Itinerary, ApiError> {
        debug!(destination = %trip.destination, "generate_itinerary: called");
        let value = self.post("generate_itinerary", "/itinerary/generate", trip).await?;
        let itinerary: Itinerary = unwrap_envelope(value, "itinerary")?;
        if !itinerary.has_ordered_days() {
            warn!(days = itinerary.days.len(), "generate_itinerary: day numbers are not strictly ascending");
        }
        Ok(itinerary)
    }

    async fn search_flights(&self, search: &FlightSearch) -> Result<Vec<Flight>, ApiError> {
        debug!(origin = %search.origin, destination = %search.destination, "search_flights: called");
        let value = self.get("search_flights", "/bookings/flights", search).await?;
        unwrap_envelope(value, "flights")
    }

    async fn search_hotels(&self, search: &HotelSearch) -> Result<Vec<Hotel>, ApiError> {
        debug!(destination = %search.destination, "search_hotels: called");
        let value = self.get("search_hotels", "/bookings/hotels", search).await?;
        unwrap_envelope(value, "hotels")
    }

    async fn cultural_insights(&self, destination: &str) -> Result<CulturalInsights, ApiError> {
        debug!(%destination, "cultural_insights: called");
        let value = self
            .get(
                "cultural_insights",
                "/itinerary/cultural-insights",
                &[("destination", destination)],
            )
            .await?;
        unwrap_envelope(value, "insights")
    }

    async fn optimize_budget(
        &self,
        itinerary: &Itinerary,
        target_budget: f64,
    ) -> Result<BudgetOptimization, ApiError> {
        debug!(%target_budget, "optimize_budget: called");
        let body = BudgetRequest {
            itinerary,
            target_budget,
        };
        let value = self.post("optimize_budget", "/itinerary/optimize-budget", &body).await?;
        unwrap_envelope(value, "optimizations")
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError> {
        debug!(history = request.conversation_history.len(), "chat: called");
        let builder = self.http.post(self.url("/itinerary/chat")).json(request);
        let value = self.send("chat", builder, self.chat_timeout).await?;
        serde_json::from_value(value).map_err(|e| ApiError::InvalidResponse(format!("Malformed chat reply: {}", e)))
    }

    async fn search_activities(&self, destination: &str) -> Result<Vec<Activity>, ApiError> {
        debug!(%destination, "search_activities: called");
        let value = self
            .get("search_activities", "/bookings/activities", &[("destination", destination)])
            .await?;
        unwrap_envelope(value, "activities")
    }

    async fn activity_recommendations(
        &self,
        preferences: &ActivityPreferences,
    ) -> Result<Vec<Recommendation>, ApiError> {
        debug!(location = %preferences.location, "activity_recommendations: called");
        let value = self
            .post("activity_recommendations", "/recommendations/activities", preferences)
            .await?;
        unwrap_envelope(value, "recommendations")
    }

    async fn restaurants(&self, query: &RestaurantQuery) -> Result<Vec<Recommendation>, ApiError> {
        debug!(location = %query.location, "restaurants: called");
        let value = self.get("restaurants", "/recommendations/restaurants", query).await?;
        unwrap_envelope(value, "restaurants")
    }

    async fn weather_forecast(&self, destination: &str, days: u32) -> Result<Vec<WeatherForecast>, ApiError> {
        debug!(%destination, %days, "weather_forecast: called");
        let days = days.to_string();
        let value = self
            .get(
                "weather_forecast",
                "/weather/forecast",
                &[("destination", destination), ("days", days.as_str())],
            )
            .await?;
        unwrap_envelope(value, "forecast")
    }

    async fn health_check(&self) -> Result<HealthStatus, ApiError> {
        debug!("health_check: called");
        let request = self.http.get(self.url("/health"));
        let value = self.send("health_check", request, self.timeout).await?;
        serde_json::from_value(value).map_err(|e| ApiError::InvalidResponse(format!("Malformed health reply: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ErrorCategory;
    use crate::store::{AUTH_TOKEN_KEY, MemoryStore};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Accept one connection, capture the request, answer with `status` and `body`
    ///
    /// With `status` of `None` the connection is held open without answering.
    async fn serve_once(status: Option<u16>, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;

            match status {
                Some(code) => {
                    let response = format!(
                        "HTTP/1.1 {} Status\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        code,
                        body.len(),
                        body
                    );
                    socket.write_all(response.as_bytes()).await.unwrap();
                    socket.shutdown().await.ok();
                }
                None => {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                }
            }
            request
        });

        (format!("http://{}/api", addr), handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);

            let text = String::from_utf8_lossy(&data).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if data.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&data).to_string()
    }

    fn gateway(base_url: &str, timeout_ms: u64, store: Option<Arc<dyn KeyValueStore>>) -> HttpGateway {
        let config = ApiConfig {
            base_url: base_url.to_string(),
            timeout_ms,
            chat_timeout_ms: timeout_ms,
        };
        HttpGateway::from_config(&config, store).unwrap()
    }

    #[test]
    fn test_url_joining() {
        let gw = gateway("http://localhost:5000/api/", 1000, None);
        assert_eq!(gw.base_url(), "http://localhost:5000/api");
        assert_eq!(gw.url("/health"), "http://localhost:5000/api/health");
        assert_eq!(gw.url("bookings/flights"), "http://localhost:5000/api/bookings/flights");
    }

    #[test]
    fn test_unwrap_envelope() {
        let value = serde_json::json!({"success": true, "count": 0, "hotels": []});
        let hotels: Vec<Hotel> = unwrap_envelope(value, "hotels").unwrap();
        assert!(hotels.is_empty());

        let value = serde_json::json!({"success": true});
        let err = unwrap_envelope::<Vec<Hotel>>(value, "hotels").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Application);
    }

    #[tokio::test]
    async fn test_flights_query_and_bearer_token() {
        let (base, server) = serve_once(
            Some(200),
            r#"{"success": true, "count": 1, "flights": [{"id": "flight_1", "airline": "Pacific Air"}]}"#,
        )
        .await;

        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        store.set(AUTH_TOKEN_KEY, serde_json::json!("tok-123")).unwrap();
        let gw = gateway(&base, 5000, Some(store));

        let search = FlightSearch {
            origin: "NYC".to_string(),
            destination: "PAR".to_string(),
            departure_date: "2025-06-01".to_string(),
            return_date: None,
            passengers: Some(2),
        };
        let flights = gw.search_flights(&search).await.unwrap();
        assert_eq!(flights.len(), 1);
        assert_eq!(flights[0].airline, "Pacific Air");

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/bookings/flights?"));
        assert!(request.contains("origin=NYC"));
        assert!(request.contains("passengers=2"));
        assert!(!request.contains("return_date"));
        assert!(request.to_lowercase().contains("authorization: bearer tok-123"));
    }

    #[tokio::test]
    async fn test_no_token_no_authorization_header() {
        let (base, server) = serve_once(Some(200), r#"{"status": "healthy", "message": "up"}"#).await;
        let gw = gateway(&base, 5000, Some(Arc::new(MemoryStore::new())));

        let health = gw.health_check().await.unwrap();
        assert!(health.is_healthy());

        let request = server.await.unwrap();
        assert!(!request.to_lowercase().contains("authorization"));
    }

    #[tokio::test]
    async fn test_generate_posts_trip_and_unwraps_itinerary() {
        let (base, server) = serve_once(
            Some(200),
            r#"{"success": true, "itinerary": {"overview": "Paris", "itinerary": [{"day": 1, "title": "Arrive"}]}, "metadata": {}}"#,
        )
        .await;
        let gw = gateway(&base, 5000, None);

        let trip = TripRequest {
            destination: "Paris, France".to_string(),
            ..Default::default()
        };
        let itinerary = gw.generate_itinerary(&trip).await.unwrap();
        assert_eq!(itinerary.days.len(), 1);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/itinerary/generate"));
        assert!(request.contains("\"destination\":\"Paris, France\""));
        assert!(request.contains("\"duration\":5"));
    }

    #[tokio::test]
    async fn test_server_error_category() {
        let (base, _server) = serve_once(Some(500), r#"{"error": "Internal server error"}"#).await;
        let gw = gateway(&base, 5000, None);

        let err = gw.cultural_insights("Paris").await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Server);
    }

    #[tokio::test]
    async fn test_application_error_carries_backend_message() {
        let (base, _server) = serve_once(Some(400), r#"{"error": "Destination parameter required"}"#).await;
        let gw = gateway(&base, 5000, None);

        let err = gw.weather_forecast("", DEFAULT_FORECAST_DAYS).await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Application);
        assert_eq!(err.backend_message(), Some("Destination parameter required"));
    }

    #[tokio::test]
    async fn test_timeout_category() {
        let (base, _server) = serve_once(None, "").await;
        let gw = gateway(&base, 200, None);

        let err = gw.search_hotels(&HotelSearch::default()).await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Timeout);
    }

    #[tokio::test]
    async fn test_network_category_when_nothing_listens() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let gw = gateway(&format!("http://{}/api", addr), 2000, None);
        let err = gw.health_check().await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Network);
        assert!(err.to_string().contains(&addr.to_string()));
    }
}
