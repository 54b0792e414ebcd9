//! Trip assistant conversation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{debug, info, warn};

use super::{ChatMessage, MessageId};
use crate::api::{ChatRequest, ErrorCategory, HistoryEntry, Itinerary, Role, TravelApi, TripRequest};
use crate::config::ChatConfig;
use crate::persist::LiveItinerary;

/// Reply appended when the assistant cannot be reached
pub const FALLBACK_REPLY: &str = "I apologize, but I'm having trouble connecting right now. Please make sure the backend server is running and try again.";

/// Prompts offered before the conversation starts
pub const SUGGESTED_QUESTIONS: [&str; 5] = [
    "What are the best restaurants in the area?",
    "Can you add a museum visit to day 2?",
    "What's the weather like?",
    "Suggest some local activities",
    "Remove the evening activity from day 3",
];

/// Opening assistant message for a destination
pub fn greeting(destination: Option<&str>) -> String {
    let destination = destination
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or("your destination");
    format!(
        "Hello! I'm your personal travel assistant. I'm here to help you with anything related to your trip to {}. You can ask me about:\n\n\
         • Activities and attractions\n\
         • Restaurant recommendations\n\
         • Modifying your itinerary\n\
         • Local transportation\n\
         • Cultural tips and customs\n\
         • Budget adjustments\n\
         • Adding or removing activities\n\n\
         How can I help you today?",
        destination
    )
}

/// What happened to a message handed to [`ChatSession::send_message`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank text, or a call was already in flight; nothing was logged
    Ignored,
    /// The assistant answered
    Replied { itinerary_updated: bool },
    /// The call failed and the fallback reply was logged
    Fallback(ErrorCategory),
}

#[derive(Debug, Default)]
struct Transcript {
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl Transcript {
    fn append(&mut self, role: Role, content: String, itinerary_update: Option<Itinerary>) -> MessageId {
        self.next_id += 1;
        let id = MessageId::new(self.next_id);
        self.messages.push(ChatMessage {
            id,
            role,
            content,
            timestamp: Utc::now(),
            itinerary_update,
        });
        id
    }
}

/// Clears the busy flag on every exit path
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Append-only conversation with the trip assistant
///
/// At most one assistant call is outstanding at a time. Messages are never
/// edited or removed once logged.
pub struct ChatSession {
    api: Arc<dyn TravelApi>,
    trip: Option<TripRequest>,
    itinerary: LiveItinerary,
    history_window: usize,
    transcript: Mutex<Transcript>,
    busy: AtomicBool,
}

impl ChatSession {
    pub fn new(
        api: Arc<dyn TravelApi>,
        trip: Option<TripRequest>,
        itinerary: LiveItinerary,
        config: &ChatConfig,
    ) -> Self {
        debug!(history_window = config.history_window, "ChatSession::new: called");
        let mut transcript = Transcript::default();
        transcript.append(
            Role::Assistant,
            greeting(trip.as_ref().map(|t| t.destination.as_str())),
            None,
        );
        Self {
            api,
            trip,
            itinerary,
            history_window: config.history_window,
            transcript: Mutex::new(transcript),
            busy: AtomicBool::new(false),
        }
    }

    fn with_transcript<R>(&self, f: impl FnOnce(&mut Transcript) -> R) -> R {
        let mut guard = self.transcript.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }

    /// Snapshot of the log in order
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.with_transcript(|t| t.messages.clone())
    }

    pub fn len(&self) -> usize {
        self.with_transcript(|t| t.messages.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True while an assistant call is outstanding
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Live itinerary this session reads and replaces
    pub fn itinerary(&self) -> &LiveItinerary {
        &self.itinerary
    }

    /// Starter prompts, offered only until the first message is sent
    pub fn suggested_questions(&self) -> &'static [&'static str] {
        if self.len() <= 1 { &SUGGESTED_QUESTIONS } else { &[] }
    }

    /// Send `text` to the assistant and log both sides of the exchange
    ///
    /// The request carries the trip, the current itinerary and the most
    /// recent messages that preceded this one.
    pub async fn send_message(&self, text: &str) -> SendOutcome {
        debug!(len = text.len(), "send_message: called");
        let text = text.trim();
        if text.is_empty() {
            debug!("send_message: blank text ignored");
            return SendOutcome::Ignored;
        }
        let Some(_in_flight) = InFlight::acquire(&self.busy) else {
            debug!("send_message: call already in flight, ignored");
            return SendOutcome::Ignored;
        };

        let window = self.history_window;
        let conversation_history = self.with_transcript(|t| {
            let start = t.messages.len().saturating_sub(window);
            let history: Vec<HistoryEntry> = t.messages[start..].iter().map(ChatMessage::to_history_entry).collect();
            t.append(Role::User, text.to_string(), None);
            history
        });

        let request = ChatRequest {
            message: text.to_string(),
            trip_context: self.trip.clone(),
            current_itinerary: self.itinerary.current(),
            conversation_history,
        };

        match self.api.chat(&request).await {
            Ok(reply) => {
                let itinerary_updated = reply.itinerary_update.is_some();
                if let Some(itinerary) = &reply.itinerary_update {
                    info!(days = itinerary.days.len(), "Assistant replaced the itinerary");
                    self.itinerary.replace(itinerary.clone());
                }
                self.with_transcript(|t| t.append(Role::Assistant, reply.response, reply.itinerary_update));
                SendOutcome::Replied { itinerary_updated }
            }
            Err(err) => {
                warn!(category = %err.category(), error = %err, "Chat call failed");
                self.with_transcript(|t| t.append(Role::Assistant, FALLBACK_REPLY.to_string(), None));
                SendOutcome::Fallback(err.category())
            }
        }
    }
}
