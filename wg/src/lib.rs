//! WanderGuide - trip planning client core
//!
//! WanderGuide collects a trip request through a short wizard, hands it to a
//! remote planning service, and keeps the resulting itinerary up to date
//! through a conversational assistant. All planning itself happens on the
//! backend; this crate is the typed contract, the gateway, and the client
//! state around them.
//!
//! # Core Concepts
//!
//! - **One Gateway**: every backend call goes through [`api::TravelApi`]
//! - **Atomic Results**: a plan exists only when all four planning calls succeed
//! - **Append-only Chat**: the assistant log is never edited, one call in flight at most
//! - **Live Itinerary**: assistant updates replace the itinerary wholesale
//!
//! # Modules
//!
//! - [`api`] - Contract types, gateway trait and HTTP implementation
//! - [`wizard`] - Step machine and results aggregate
//! - [`chat`] - Trip assistant session
//! - [`persist`] - Live itinerary and its persisted copy
//! - [`store`] - Client-local key-value store
//! - [`notify`] - User-facing notices
//! - [`config`] - Configuration types and loading
//! - [`repl`] - Interactive terminal front-end
//! - [`cli`] - Command-line interface

pub mod api;
pub mod chat;
pub mod cli;
pub mod config;
pub mod notify;
pub mod persist;
pub mod repl;
pub mod store;
pub mod wizard;

// Re-export commonly used types
pub use api::{
    ApiError, ErrorCategory, HttpGateway, Itinerary, TravelApi, TravelStyle, TripRequest, create_gateway,
};
pub use chat::{ChatMessage, ChatSession, MessageId, SendOutcome};
pub use config::{ApiConfig, ChatConfig, Config, StorageConfig, WizardConfig};
pub use notify::{Notice, NoticeLevel, Notifier, RecordingNotifier};
pub use persist::LiveItinerary;
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
pub use wizard::{TripResults, TripWizard, WizardError, WizardStep};
