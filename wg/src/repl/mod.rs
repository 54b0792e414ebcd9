//! Interactive terminal front-end
//!
//! Prompts that drive the trip wizard, the assistant REPL, and the renderer
//! both of them print through.

mod chat;
pub mod render;
mod wizard;

pub use chat::ChatRepl;
pub use render::TerminalNotifier;
pub use wizard::WizardPrompter;

use std::sync::Arc;

use eyre::Result;
use tracing::{debug, info};

use crate::api::{Itinerary, TravelApi, TripRequest};
use crate::chat::ChatSession;
use crate::config::ChatConfig;
use crate::persist::LiveItinerary;

/// Run the assistant REPL against `live`
///
/// This is the entry point for `wg chat` and `wg plan --chat`. Returns the
/// itinerary as it stands when the user leaves.
pub async fn run_chat(
    api: Arc<dyn TravelApi>,
    trip: Option<TripRequest>,
    live: LiveItinerary,
    config: &ChatConfig,
) -> Result<Option<Itinerary>> {
    debug!(has_trip = trip.is_some(), "run_chat: called");
    let session = ChatSession::new(api, trip, live.clone(), config);
    let mut repl = ChatRepl::new(session);
    repl.run().await?;
    info!(messages = repl.session().len(), "Chat session ended");
    Ok(live.current())
}
