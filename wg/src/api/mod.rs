//! Planning backend API
//!
//! The contract types the backend speaks, the [`TravelApi`] seam every other
//! module talks through, and the reqwest-backed [`HttpGateway`].

use std::sync::Arc;

use tracing::debug;

mod bookings;
pub mod client;
mod error;
pub mod http;
mod types;

pub use bookings::{
    Activity, Baggage, Flight, FlightAmenities, FlightEndpoint, FlightKind, FlightLeg, FlightPrice, Hotel,
    HotelLocation, HotelPolicies, HotelPrice, PriceBreakdown, RoomDetails,
};
pub use client::TravelApi;
pub use error::{ApiError, ErrorCategory};
pub use http::{DEFAULT_FORECAST_DAYS, HttpGateway};
pub use types::{
    ActivityPreferences, BudgetOptimization, BudgetRequest, ChatReply, ChatRequest, CostCut, CulturalInsights,
    DEFAULT_TRIP_DURATION, DayPlan, FlightSearch, HealthStatus, HistoryEntry, HotelSearch, INTEREST_OPTIONS,
    Itinerary, Recommendation, RestaurantQuery, Role, Temperature, TravelStyle, TripRequest, WeatherForecast,
};

use crate::config::ApiConfig;
use crate::store::KeyValueStore;

/// Create the gateway described by `config`
pub fn create_gateway(
    config: &ApiConfig,
    store: Option<Arc<dyn KeyValueStore>>,
) -> Result<Arc<dyn TravelApi>, ApiError> {
    debug!(base_url = %config.base_url, timeout_ms = config.timeout_ms, "create_gateway: called");
    Ok(Arc::new(HttpGateway::from_config(config, store)?))
}
