//! Booking search results: flights, hotels and bookable activities

use serde::{Deserialize, Serialize};

/// Whether a flight option includes the way back
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightKind {
    #[default]
    OneWay,
    RoundTrip,
}

/// Airport, time and terminal for one end of a leg
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightEndpoint {
    pub airport: String,
    pub time: String,
    pub terminal: String,
}

/// One direction of a flight option
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightLeg {
    pub departure: FlightEndpoint,
    pub arrival: FlightEndpoint,
    /// Human duration such as "7h 30m"
    pub duration: String,
    pub stops: u32,
    pub flight_number: String,
}

impl FlightLeg {
    /// Duration in minutes, parsed from strings like "7h 30m", "7h" or "45m"
    pub fn duration_minutes(&self) -> Option<u32> {
        parse_duration_minutes(&self.duration)
    }
}

fn parse_duration_minutes(text: &str) -> Option<u32> {
    let mut total = 0u32;
    let mut seen = false;
    for part in text.split_whitespace() {
        let (number, unit) = part.split_at(part.find(|c: char| !c.is_ascii_digit())?);
        let value: u32 = number.parse().ok()?;
        match unit {
            "h" => total = total.checked_add(value.checked_mul(60)?)?,
            "m" => total = total.checked_add(value)?,
            _ => return None,
        }
        seen = true;
    }
    if seen { Some(total) } else { None }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightPrice {
    pub amount: f64,
    pub currency: String,
    pub per_person: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightAmenities {
    pub wifi: bool,
    pub meals: bool,
    pub entertainment: bool,
    pub power_outlets: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Baggage {
    pub carry_on: String,
    pub checked: String,
}

/// A flight option returned by the booking search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Flight {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FlightKind,
    pub airline: String,
    pub airline_code: String,
    pub outbound: FlightLeg,
    #[serde(rename = "return", skip_serializing_if = "Option::is_none")]
    pub return_leg: Option<FlightLeg>,
    pub price: FlightPrice,
    pub amenities: FlightAmenities,
    pub baggage: Baggage,
    #[serde(rename = "class")]
    pub cabin_class: String,
    pub rating: f64,
    pub reviews: u32,
}

impl Flight {
    /// Outbound plus return flying time
    pub fn total_minutes(&self) -> Option<u32> {
        let outbound = self.outbound.duration_minutes()?;
        match &self.return_leg {
            Some(leg) => outbound.checked_add(leg.duration_minutes()?),
            None => Some(outbound),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotelLocation {
    pub address: String,
    pub district: String,
    pub distance_to_center: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceBreakdown {
    pub base_price: f64,
    pub taxes: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotelPrice {
    pub nightly_rate: f64,
    pub total: f64,
    pub currency: String,
    pub taxes_included: bool,
    pub breakdown: PriceBreakdown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomDetails {
    #[serde(rename = "type")]
    pub kind: String,
    pub size: String,
    pub bed_type: String,
    pub max_guests: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotelPolicies {
    pub check_in: String,
    pub check_out: String,
    pub cancellation: String,
    pub pets: bool,
}

/// A hotel option returned by the booking search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hotel {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Star rating
    pub rating: u8,
    pub review_score: f64,
    pub review_count: u32,
    pub location: HotelLocation,
    pub images: Vec<String>,
    pub price: HotelPrice,
    pub rooms_available: u32,
    pub amenities: Vec<String>,
    pub room_details: RoomDetails,
    pub policies: HotelPolicies,
    pub highlights: Vec<String>,
}

/// A bookable local experience
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Activity {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub duration: String,
    pub price: f64,
    pub currency: String,
    pub rating: f64,
    pub reviews: u32,
    pub includes: Vec<String>,
    pub availability: String,
    pub group_size: String,
    pub languages: Vec<String>,
}
