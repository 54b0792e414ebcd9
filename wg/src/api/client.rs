//! TravelApi trait definition

use async_trait::async_trait;
#[allow(unused_imports)]
use tracing::debug;

use super::{
    Activity, ActivityPreferences, ApiError, BudgetOptimization, ChatReply, ChatRequest, CulturalInsights, Flight,
    FlightSearch, HealthStatus, Hotel, HotelSearch, Itinerary, Recommendation, RestaurantQuery, TripRequest,
    WeatherForecast,
};

/// Every operation the planning backend offers
///
/// Calls are independent and never retried: a failure surfaces to the caller
/// immediately, already sorted into an [`ErrorCategory`](super::ErrorCategory).
#[async_trait]
pub trait TravelApi: Send + Sync {
    /// Generate a day-by-day itinerary for the trip
    async fn generate_itinerary(&self, trip: &TripRequest) -> Result<Itinerary, ApiError>;

    /// Search flight options, in the backend's order
    async fn search_flights(&self, search: &FlightSearch) -> Result<Vec<Flight>, ApiError>;

    /// Search hotel options, in the backend's order
    async fn search_hotels(&self, search: &HotelSearch) -> Result<Vec<Hotel>, ApiError>;

    /// Customs, etiquette and safety tips for a destination
    async fn cultural_insights(&self, destination: &str) -> Result<CulturalInsights, ApiError>;

    /// Ask for ways to fit an itinerary into a target budget
    async fn optimize_budget(&self, itinerary: &Itinerary, target_budget: f64)
    -> Result<BudgetOptimization, ApiError>;

    /// Talk to the trip assistant
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError>;

    /// Bookable experiences at a destination
    async fn search_activities(&self, destination: &str) -> Result<Vec<Activity>, ApiError>;

    /// Activity suggestions for a location and set of interests
    async fn activity_recommendations(&self, preferences: &ActivityPreferences)
    -> Result<Vec<Recommendation>, ApiError>;

    /// Restaurant suggestions
    async fn restaurants(&self, query: &RestaurantQuery) -> Result<Vec<Recommendation>, ApiError>;

    /// Daily forecast for the next `days` days
    async fn weather_forecast(&self, destination: &str, days: u32) -> Result<Vec<WeatherForecast>, ApiError>;

    /// Liveness probe
    async fn health_check(&self) -> Result<HealthStatus, ApiError>;
}
