//! Where the initial conversation comes from and where new messages go.

use chrono::{TimeZone, Utc};

use crate::chat::{Message, MessageId, Sender, DEFAULT_AVATAR};

/// Supplies the opening message sequence and receives appended messages.
pub trait HistorySource {
    fn load(&self) -> Vec<Message>;

    fn record(&mut self, message: &Message);
}

/// Three canned messages; appended messages are not kept anywhere.
#[derive(Debug, Default)]
pub struct SampleHistory;

impl HistorySource for SampleHistory {
    fn load(&self) -> Vec<Message> {
        let seed = [
            (
                "John Doe",
                "Hey, how is it going? This is a very long message that should wrap to the next line if it takes up more than 30% of the screen width.",
                (12, 34, 56),
            ),
            (
                "Jane Smith",
                "Great, thanks for asking! This is another long message that should wrap to the next line if it takes up more than 30% of the screen width.",
                (12, 35, 1),
            ),
            (
                "Bob Johnson",
                "Doing well, how about you? This is a shorter message that should not wrap.",
                (12, 35, 10),
            ),
        ];

        seed.into_iter()
            .zip(1u64..)
            .map(|((name, content, (h, m, s)), id)| Message {
                id: MessageId(id),
                user: Sender::new(name, DEFAULT_AVATAR),
                content: content.to_string(),
                timestamp: Utc
                    .with_ymd_and_hms(2023, 7, 5, h, m, s)
                    .single()
                    .unwrap_or_default(),
                is_sender: false,
            })
            .collect()
    }

    fn record(&mut self, message: &Message) {
        tracing::trace!(id = message.id.0, "sample history does not persist messages");
    }
}
