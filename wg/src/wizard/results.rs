//! Submission results and render-time views over them

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::api::{CulturalInsights, Flight, Hotel, Itinerary};

/// Label shown next to the first listed option
pub const BEST_VALUE_LABEL: &str = "Best Value";

/// Everything one successful submission produced
///
/// Built only when all four calls succeed. Fields are read-only; a new
/// itinerary produces a new aggregate through [`TripResults::with_itinerary`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripResults {
    itinerary: Itinerary,
    flights: Vec<Flight>,
    hotels: Vec<Hotel>,
    cultural: CulturalInsights,
}

impl TripResults {
    pub fn new(itinerary: Itinerary, flights: Vec<Flight>, hotels: Vec<Hotel>, cultural: CulturalInsights) -> Self {
        Self {
            itinerary,
            flights,
            hotels,
            cultural,
        }
    }

    pub fn itinerary(&self) -> &Itinerary {
        &self.itinerary
    }

    /// Flights in server order
    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    /// Hotels in server order
    pub fn hotels(&self) -> &[Hotel] {
        &self.hotels
    }

    pub fn cultural(&self) -> &CulturalInsights {
        &self.cultural
    }

    /// Same bookings and insights around a replacement itinerary
    pub fn with_itinerary(&self, itinerary: Itinerary) -> Self {
        Self {
            itinerary,
            flights: self.flights.clone(),
            hotels: self.hotels.clone(),
            cultural: self.cultural.clone(),
        }
    }
}

/// Client-side flight ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlightSort {
    /// Cheapest first
    #[default]
    Price,
    /// Shortest total flying time first
    Duration,
    /// Highest rated first
    Rating,
}

impl FromStr for FlightSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "price" => Ok(Self::Price),
            "duration" => Ok(Self::Duration),
            "rating" => Ok(Self::Rating),
            _ => Err(format!("Unknown flight sort: {}. Use: price, duration, or rating", s)),
        }
    }
}

impl fmt::Display for FlightSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlightSort::Price => write!(f, "price"),
            FlightSort::Duration => write!(f, "duration"),
            FlightSort::Rating => write!(f, "rating"),
        }
    }
}

/// Client-side hotel ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HotelSort {
    /// Cheapest nightly rate first
    #[default]
    Price,
    /// Most stars first
    Rating,
}

impl FromStr for HotelSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "price" => Ok(Self::Price),
            "rating" => Ok(Self::Rating),
            _ => Err(format!("Unknown hotel sort: {}. Use: price or rating", s)),
        }
    }
}

impl fmt::Display for HotelSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HotelSort::Price => write!(f, "price"),
            HotelSort::Rating => write!(f, "rating"),
        }
    }
}

/// Flights re-ordered for display; ties keep server order
pub fn sort_flights(flights: &[Flight], key: FlightSort) -> Vec<&Flight> {
    let mut view: Vec<&Flight> = flights.iter().collect();
    match key {
        FlightSort::Price => view.sort_by(|a, b| a.price.amount.total_cmp(&b.price.amount)),
        FlightSort::Duration => view.sort_by_key(|f| f.total_minutes().unwrap_or(u32::MAX)),
        FlightSort::Rating => view.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
    }
    view
}

/// Hotels re-ordered for display; ties keep server order
pub fn sort_hotels(hotels: &[Hotel], key: HotelSort) -> Vec<&Hotel> {
    let mut view: Vec<&Hotel> = hotels.iter().collect();
    match key {
        HotelSort::Price => view.sort_by(|a, b| a.price.nightly_rate.total_cmp(&b.price.nightly_rate)),
        HotelSort::Rating => view.sort_by(|a, b| b.rating.cmp(&a.rating)),
    }
    view
}

/// Keep hotels with exactly `stars` stars; 0 keeps everything
pub fn filter_hotels_by_stars<'a>(hotels: &[&'a Hotel], stars: u8) -> Vec<&'a Hotel> {
    hotels
        .iter()
        .copied()
        .filter(|h| stars == 0 || h.rating == stars)
        .collect()
}

/// Label for the option at `index` in a displayed list
pub fn option_label(index: usize) -> Option<&'static str> {
    (index == 0).then_some(BEST_VALUE_LABEL)
}
