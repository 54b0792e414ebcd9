//! Request/response types for the WanderGuide backend
//!
//! These model the JSON the planning service speaks. Decoding is lenient:
//! fields the backend leaves out fall back to their defaults instead of
//! failing the whole response.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Trip length the backend assumes when the dates do not yield one
pub const DEFAULT_TRIP_DURATION: u32 = 5;

/// Travel style preference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelStyle {
    Budget,
    #[default]
    Balanced,
    Comfort,
    Luxury,
}

impl TravelStyle {
    pub const ALL: [TravelStyle; 4] = [
        TravelStyle::Budget,
        TravelStyle::Balanced,
        TravelStyle::Comfort,
        TravelStyle::Luxury,
    ];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            TravelStyle::Budget => "Budget Traveler",
            TravelStyle::Balanced => "Balanced",
            TravelStyle::Comfort => "Comfort",
            TravelStyle::Luxury => "Luxury",
        }
    }
}

impl fmt::Display for TravelStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TravelStyle::Budget => "budget",
            TravelStyle::Balanced => "balanced",
            TravelStyle::Comfort => "comfort",
            TravelStyle::Luxury => "luxury",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for TravelStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "budget" => Ok(Self::Budget),
            "balanced" => Ok(Self::Balanced),
            "comfort" => Ok(Self::Comfort),
            "luxury" => Ok(Self::Luxury),
            _ => Err(format!(
                "Unknown travel style: {}. Use: budget, balanced, comfort, or luxury",
                s
            )),
        }
    }
}

/// Interest categories offered by the planner
pub const INTEREST_OPTIONS: [&str; 8] = [
    "Culture & History",
    "Food & Dining",
    "Adventure",
    "Nature & Wildlife",
    "Beach & Relaxation",
    "Shopping",
    "Nightlife",
    "Photography",
];

/// Everything the user tells the planner about a trip
///
/// Accepts both snake_case and the camelCase keys older snapshots were
/// written with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripRequest {
    pub origin: String,
    pub destination: String,
    #[serde(alias = "departureDate")]
    pub departure_date: String,
    #[serde(alias = "returnDate")]
    pub return_date: String,
    pub travelers: u32,
    pub budget: f64,
    /// Trip length in days
    pub duration: u32,
    pub interests: BTreeSet<String>,
    #[serde(alias = "travelStyle")]
    pub travel_style: TravelStyle,
}

impl Default for TripRequest {
    fn default() -> Self {
        Self {
            origin: String::new(),
            destination: String::new(),
            departure_date: String::new(),
            return_date: String::new(),
            travelers: 2,
            budget: 2000.0,
            duration: DEFAULT_TRIP_DURATION,
            interests: BTreeSet::new(),
            travel_style: TravelStyle::default(),
        }
    }
}

impl TripRequest {
    /// Parse departure and return dates, if both are valid ISO dates
    pub fn parsed_dates(&self) -> Option<(NaiveDate, NaiveDate)> {
        let depart = NaiveDate::parse_from_str(self.departure_date.trim(), "%Y-%m-%d").ok()?;
        let ret = NaiveDate::parse_from_str(self.return_date.trim(), "%Y-%m-%d").ok()?;
        Some((depart, ret))
    }

    /// Number of nights between the dates, when they parse and are ordered
    pub fn nights(&self) -> Option<u32> {
        let (depart, ret) = self.parsed_dates()?;
        let days = (ret - depart).num_days();
        if days < 0 {
            debug!(%days, "TripRequest::nights: return precedes departure");
            return None;
        }
        u32::try_from(days).ok()
    }

    /// Flight search derived from this request
    pub fn flight_search(&self) -> FlightSearch {
        FlightSearch {
            origin: self.origin.clone(),
            destination: self.destination.clone(),
            departure_date: self.departure_date.clone(),
            return_date: non_empty(&self.return_date),
            passengers: Some(self.travelers),
        }
    }

    /// Hotel search derived from this request
    pub fn hotel_search(&self) -> HotelSearch {
        HotelSearch {
            destination: self.destination.clone(),
            check_in: self.departure_date.clone(),
            check_out: self.return_date.clone(),
            guests: Some(self.travelers),
            rooms: None,
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}

/// One day of an itinerary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayPlan {
    pub day: u32,
    pub title: String,
    pub morning: String,
    pub afternoon: String,
    pub evening: String,
    pub estimated_cost: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tips: Option<String>,
}

/// Day-by-day plan produced by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Itinerary {
    pub overview: String,
    pub total_estimated_cost: f64,
    #[serde(rename = "itinerary")]
    pub days: Vec<DayPlan>,
    pub packing_suggestions: Vec<String>,
    pub cultural_tips: Vec<String>,
}

impl Itinerary {
    /// Look up a day by its number
    pub fn day(&self, number: u32) -> Option<&DayPlan> {
        self.days.iter().find(|d| d.day == number)
    }

    /// True when day numbers are positive, unique and ascending
    pub fn has_ordered_days(&self) -> bool {
        self.days.first().is_none_or(|d| d.day > 0) && self.days.windows(2).all(|w| w[0].day < w[1].day)
    }

    /// Sum of the per-day estimates
    pub fn daily_cost_total(&self) -> f64 {
        self.days.iter().map(|d| d.estimated_cost).sum()
    }
}

/// Etiquette and practical tips for a destination
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CulturalInsights {
    pub customs: Vec<String>,
    pub etiquette: Vec<String>,
    pub basic_phrases: BTreeMap<String, String>,
    pub tipping_guide: String,
    pub safety_tips: Vec<String>,
    pub local_insights: Vec<String>,
}

/// Query for `/bookings/flights`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlightSearch {
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passengers: Option<u32>,
}

/// Query for `/bookings/hotels`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HotelSearch {
    pub destination: String,
    pub check_in: String,
    pub check_out: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guests: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rooms: Option<u32>,
}

/// Body for `/recommendations/activities`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActivityPreferences {
    pub location: String,
    pub preferences: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,
}

/// Query for `/recommendations/restaurants`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RestaurantQuery {
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
}

/// A suggested activity or restaurant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recommendation {
    pub name: String,
    pub description: String,
    pub duration: String,
    pub cost_estimate: String,
    pub best_time: String,
    pub indoor: bool,
}

/// Temperature range for a forecast day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Temperature {
    pub high: f64,
    pub low: f64,
    pub unit: String,
}

/// Forecast for a single day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherForecast {
    pub date: String,
    pub condition: String,
    pub temperature: Temperature,
    pub precipitation: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub icon: String,
}

/// Body for `/itinerary/optimize-budget`
#[derive(Debug, Clone, Serialize)]
pub struct BudgetRequest<'a> {
    pub itinerary: &'a Itinerary,
    pub target_budget: f64,
}

/// One category the backend suggests trimming
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostCut {
    pub category: String,
    pub current_cost: f64,
    pub suggested_cost: f64,
    pub suggestions: Vec<String>,
}

/// Budget optimization report
///
/// The backend answers with suggestions and totals; when it also returns a
/// reworked plan it lands in `itinerary`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetOptimization {
    pub optimizations: Vec<CostCut>,
    pub estimated_savings: f64,
    pub revised_total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub itinerary: Option<Itinerary>,
}

/// Chat message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A history entry sent along with a chat request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub itinerary_update: Option<Itinerary>,
}

/// Body for `/itinerary/chat`
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub trip_context: Option<TripRequest>,
    pub current_itinerary: Option<Itinerary>,
    pub conversation_history: Vec<HistoryEntry>,
}

/// Assistant reply, optionally carrying a full replacement itinerary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatReply {
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub itinerary_update: Option<Itinerary>,
}

/// Liveness probe result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy") || self.status.eq_ignore_ascii_case("ok")
    }
}
