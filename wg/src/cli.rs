//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::wizard::{FlightSort, HotelSort};

/// WanderGuide - trip planner and travel assistant
#[derive(Parser)]
#[command(
    name = "wg",
    about = "Plan trips, search bookings and chat with a travel assistant",
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Plan a trip step by step
    Plan {
        /// Open the trip assistant once the plan is ready
        #[arg(long)]
        chat: bool,

        /// Flight ordering (price, duration, rating)
        #[arg(long, default_value = "price")]
        flight_sort: FlightSort,

        /// Hotel ordering (price, rating)
        #[arg(long, default_value = "price")]
        hotel_sort: HotelSort,

        /// Only show hotels with this many stars (0 for all)
        #[arg(long, default_value = "0")]
        stars: u8,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Chat with the trip assistant about the saved plan
    Chat,

    /// Show the saved itinerary
    Show {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Search flights
    Flights {
        /// Departure city or airport
        origin: String,

        /// Arrival city or airport
        destination: String,

        /// Departure date (YYYY-MM-DD)
        #[arg(short, long)]
        depart: String,

        /// Return date (YYYY-MM-DD); omit for one-way
        #[arg(short, long = "return")]
        return_date: Option<String>,

        /// Number of passengers
        #[arg(short, long)]
        passengers: Option<u32>,

        /// Ordering (price, duration, rating)
        #[arg(short, long, default_value = "price")]
        sort: FlightSort,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Search hotels
    Hotels {
        /// City to stay in
        destination: String,

        /// Check-in date (YYYY-MM-DD)
        #[arg(long)]
        check_in: String,

        /// Check-out date (YYYY-MM-DD)
        #[arg(long)]
        check_out: String,

        /// Number of guests
        #[arg(short, long)]
        guests: Option<u32>,

        /// Number of rooms
        #[arg(short, long)]
        rooms: Option<u32>,

        /// Ordering (price, rating)
        #[arg(short, long, default_value = "price")]
        sort: HotelSort,

        /// Only show hotels with this many stars (0 for all)
        #[arg(long, default_value = "0")]
        stars: u8,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List bookable activities, or suggestions when interests are given
    Activities {
        /// City to search
        destination: String,

        /// Interests to base suggestions on
        #[arg(short, long, value_delimiter = ',')]
        interests: Vec<String>,

        /// Expected weather, used with --interests
        #[arg(short, long)]
        weather: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Restaurant suggestions
    Restaurants {
        /// City to search
        location: String,

        /// Cuisine preference
        #[arg(long)]
        cuisine: Option<String>,

        /// Price level such as "budget" or "fine dining"
        #[arg(short, long)]
        budget: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Weather forecast
    Weather {
        /// City to forecast
        destination: String,

        /// Number of days
        #[arg(short, long)]
        days: Option<u32>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Customs, etiquette and phrases for a destination
    Insights {
        /// City or country
        destination: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Ask the backend to fit the saved itinerary into a budget
    Optimize {
        /// Target total budget
        #[arg(short, long)]
        target: f64,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Check that the backend is reachable
    Health,

    /// Manage the bearer token sent to the backend
    Token {
        #[command(subcommand)]
        command: TokenCommand,
    },
}

/// Token management subcommands
#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Store a token
    Set {
        /// Bearer token value
        token: String,
    },

    /// Remove the stored token
    Clear,
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wanderguide")
        .join("logs")
        .join("wanderguide.log")
}

/// Help text appended after the command list
pub fn generate_after_help() -> String {
    debug!("generate_after_help: called");
    let mut help = String::new();
    help.push_str("Backend: set WANDERGUIDE_API_URL or api.base-url in wanderguide.yml\n");
    help.push_str(&format!("Logs are written to: {}\n", get_log_path().display()));
    help
}

/// Output format for lookup commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
