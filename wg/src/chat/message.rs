//! Chat log entries

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{HistoryEntry, Itinerary, Role};

/// Session-local message id, strictly increasing in log order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(u64);

impl MessageId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg-{}", self.0)
    }
}

/// One turn in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Replacement itinerary the assistant sent with this reply
    pub itinerary_update: Option<Itinerary>,
}

impl ChatMessage {
    /// Shape sent back to the backend as conversation history
    pub fn to_history_entry(&self) -> HistoryEntry {
        HistoryEntry {
            id: self.id.to_string(),
            role: self.role,
            content: self.content.clone(),
            timestamp: self.timestamp,
            itinerary_update: self.itinerary_update.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_entry_keeps_fields() {
        let message = ChatMessage {
            id: MessageId::new(7),
            role: Role::User,
            content: "Add a museum to day 2".to_string(),
            timestamp: Utc::now(),
            itinerary_update: None,
        };

        let entry = message.to_history_entry();
        assert_eq!(entry.id, "msg-7");
        assert_eq!(entry.role, Role::User);
        assert_eq!(entry.content, message.content);
        assert_eq!(entry.timestamp, message.timestamp);

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["role"], "user");
        assert!(json.get("itineraryUpdate").is_none());
    }

    #[test]
    fn test_ids_order_numerically() {
        assert!(MessageId::new(2) < MessageId::new(10));
        assert_eq!(MessageId::new(10).value(), 10);
    }
}
