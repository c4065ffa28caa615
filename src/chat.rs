//! Message records and the append-only store behind the chat list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Avatar reference used for every built-in sender and participant.
pub const DEFAULT_AVATAR: &str = "/placeholder-user.jpg";

/// Content longer than this many characters is shown in the wide bubble.
pub const WIDE_CONTENT_THRESHOLD: usize = 80;

/// Sequence identifier of one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

/// Who wrote a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    pub name: String,
    pub avatar: String,
}

impl Sender {
    pub fn new(name: impl Into<String>, avatar: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avatar: avatar.into(),
        }
    }
}

/// One chat entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub user: Sender,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub is_sender: bool,
}

impl Message {
    /// Whether the content is long enough for the wide, whitespace-preserving bubble.
    pub fn is_wide(&self) -> bool {
        self.content.chars().count() > WIDE_CONTENT_THRESHOLD
    }
}

/// Ordered, append-only message sequence.
///
/// `revision` changes on every append and is what the auto-scroll effect
/// watches; identifiers come from a counter owned by the store, so they stay
/// unique even if the sequence is ever seeded from elsewhere.
#[derive(Debug, Clone)]
pub struct MessageStore {
    messages: Vec<Message>,
    next_id: u64,
    revision: u64,
}

impl MessageStore {
    pub fn new(seed: Vec<Message>) -> Self {
        let highest_seeded = seed.iter().map(|m| m.id.0).max().unwrap_or(0);
        let next_id = highest_seeded.max(seed.len() as u64) + 1;

        Self {
            messages: seed,
            next_id,
            revision: 0,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[cfg(test)]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn append(
        &mut self,
        user: Sender,
        content: String,
        timestamp: DateTime<Utc>,
        is_sender: bool,
    ) -> &Message {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.revision += 1;

        self.messages.push(Message {
            id,
            user,
            content,
            timestamp,
            is_sender,
        });

        tracing::debug!(id = id.0, total = self.messages.len(), "message appended");

        &self.messages[self.messages.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn message(id: u64, content: &str) -> Message {
        Message {
            id: MessageId(id),
            user: Sender::new("John Doe", DEFAULT_AVATAR),
            content: content.to_string(),
            timestamp: Utc.with_ymd_and_hms(2023, 7, 5, 12, 34, 56).unwrap(),
            is_sender: false,
        }
    }

    #[test]
    fn test_append_assigns_length_plus_one() {
        let mut store = MessageStore::new(vec![message(1, "a"), message(2, "b"), message(3, "c")]);
        let before = store.len();

        let appended = store.append(Sender::new("You", DEFAULT_AVATAR), "hello".into(), Utc::now(), true);

        assert_eq!(appended.id, MessageId(before as u64 + 1));
        assert!(appended.is_sender);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_ids_stay_unique_across_appends() {
        let mut store = MessageStore::new(Vec::new());
        let first = store.append(Sender::new("You", DEFAULT_AVATAR), "one".into(), Utc::now(), true).id;
        let second = store.append(Sender::new("You", DEFAULT_AVATAR), "one".into(), Utc::now(), true).id;

        assert_eq!(first, MessageId(1));
        assert_eq!(second, MessageId(2));
    }

    #[test]
    fn test_counter_skips_past_sparse_seed_ids() {
        let mut store = MessageStore::new(vec![message(7, "a")]);
        let id = store.append(Sender::new("You", DEFAULT_AVATAR), "x".into(), Utc::now(), true).id;
        assert_eq!(id, MessageId(8));
    }

    #[test]
    fn test_append_bumps_revision_and_keeps_order() {
        let mut store = MessageStore::new(vec![message(1, "first")]);
        assert_eq!(store.revision(), 0);

        store.append(Sender::new("You", DEFAULT_AVATAR), "second".into(), Utc::now(), true);

        assert_eq!(store.revision(), 1);
        let contents: Vec<&str> = store.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);
    }

    #[test]
    fn test_wide_boundary_is_strictly_greater_than_80() {
        assert!(!message(1, &"a".repeat(80)).is_wide());
        assert!(message(1, &"a".repeat(81)).is_wide());
    }

    #[test]
    fn test_wide_counts_characters_not_bytes() {
        assert!(!message(1, &"é".repeat(80)).is_wide());
    }

    #[test]
    fn test_timestamp_serializes_as_iso8601() {
        let json = serde_json::to_value(message(1, "hi")).unwrap();
        assert_eq!(json["timestamp"], "2023-07-05T12:34:56Z");
        assert_eq!(json["isSender"], false);
    }
}
