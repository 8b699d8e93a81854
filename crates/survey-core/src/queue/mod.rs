//! Durable work queues.
//!
//! Publishing is at-least-once: messages stay queued until a consumer acks
//! them, and every un-acked message is handed out again on the next
//! [`MessageQueue::receive`]. Consumers therefore have to be idempotent.

use std::{fmt, str::FromStr};

use uuid::Uuid;

use crate::error::Result;

pub mod messages;
pub mod sqlite;

pub use messages::{TicketCreateMessage, TicketStateChangeMessage, TodoStateEntry};

/// The named queues, one per message kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueName {
    TicketCreate,
    TicketMutateState,
    NotificationSend,
    NotificationSendInvitation,
}

impl QueueName {
    pub const ALL: [QueueName; 4] = [
        QueueName::TicketCreate,
        QueueName::TicketMutateState,
        QueueName::NotificationSend,
        QueueName::NotificationSendInvitation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueueName::TicketCreate => "ticket_create",
            QueueName::TicketMutateState => "ticket_mutatestate",
            QueueName::NotificationSend => "notification_send",
            QueueName::NotificationSendInvitation => "notification_sendinvitation",
        }
    }
}

impl fmt::Display for QueueName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueueName {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        QueueName::ALL
            .into_iter()
            .find(|q| q.as_str() == s)
            .ok_or_else(|| format!("Unknown queue: {s}"))
    }
}

/// Delivery guarantees requested for a publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishOptions {
    /// Message must survive a broker restart
    pub persistent: bool,
    /// Fail instead of dropping when the queue does not exist
    pub mandatory: bool,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            persistent: true,
            mandatory: true,
        }
    }
}

/// A message handed to a consumer, pending ack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub delivery_id: i64,
    pub queue: QueueName,
    pub payload: Vec<u8>,
    /// How often the message was handed out, this delivery included
    pub attempts: u32,
}

impl Delivery {
    pub fn is_redelivery(&self) -> bool {
        self.attempts > 1
    }
}

/// A durable queue broker.
pub trait MessageQueue {
    /// Creates the queue if it does not exist yet.
    fn declare_queue(&self, queue: QueueName) -> Result<()>;

    /// Appends a message to `queue`.
    fn publish(&self, queue: QueueName, payload: &[u8], options: PublishOptions) -> Result<()>;

    /// Hands out up to `limit` un-acked messages in publish order.
    fn receive(&self, queue: QueueName, limit: usize) -> Result<Vec<Delivery>>;

    /// Removes a delivered message for good.
    fn ack(&self, delivery_id: i64) -> Result<()>;
}

/// Enqueues one ticket-create work item per participant.
///
/// Stops at the first failure. Items enqueued before it stay queued.
/// Returns the number of enqueued items.
pub fn enqueue_ticket_creations<Q: MessageQueue + ?Sized>(
    queue: &Q,
    catalog_id: Uuid,
    participant_ids: &[Uuid],
) -> Result<usize> {
    queue.declare_queue(QueueName::TicketCreate)?;

    for (sent, participant_id) in participant_ids.iter().enumerate() {
        let message = TicketCreateMessage {
            catalog_id,
            participant_id: *participant_id,
        };
        if let Err(e) = queue.publish(
            QueueName::TicketCreate,
            &messages::to_payload(&message)?,
            PublishOptions::default(),
        ) {
            log::error!(
                "Enqueued {sent} of {} ticket creations for catalog {catalog_id}: {e}",
                participant_ids.len()
            );
            return Err(e);
        }
    }
    Ok(participant_ids.len())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::error::SurveyError;

    /// In-memory broker that fails after a number of publishes.
    #[derive(Default)]
    struct FlakyQueue {
        published: RefCell<Vec<Vec<u8>>>,
        fail_after: Option<usize>,
    }

    impl MessageQueue for FlakyQueue {
        fn declare_queue(&self, _queue: QueueName) -> Result<()> {
            Ok(())
        }

        fn publish(&self, _queue: QueueName, payload: &[u8], _options: PublishOptions) -> Result<()> {
            let mut published = self.published.borrow_mut();
            if self.fail_after.is_some_and(|n| published.len() >= n) {
                return Err(SurveyError::Queue {
                    message: "connection reset".to_string(),
                });
            }
            published.push(payload.to_vec());
            Ok(())
        }

        fn receive(&self, _queue: QueueName, _limit: usize) -> Result<Vec<Delivery>> {
            Ok(Vec::new())
        }

        fn ack(&self, _delivery_id: i64) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_enqueue_one_item_per_participant() {
        let queue = FlakyQueue::default();
        let participants = [Uuid::new_v4(), Uuid::new_v4()];

        let count = enqueue_ticket_creations(&queue, Uuid::nil(), &participants).unwrap();

        assert_eq!(count, 2);
        let published = queue.published.borrow();
        let second: TicketCreateMessage = messages::from_payload(&published[1]).unwrap();
        assert_eq!(second.participant_id, participants[1]);
    }

    #[test]
    fn test_enqueue_failure_keeps_earlier_items() {
        let queue = FlakyQueue {
            fail_after: Some(1),
            ..Default::default()
        };
        let participants = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];

        let err = enqueue_ticket_creations(&queue, Uuid::nil(), &participants).unwrap_err();

        assert!(matches!(err, SurveyError::Queue { .. }));
        assert_eq!(queue.published.borrow().len(), 1);
    }

    #[test]
    fn test_queue_names() {
        assert_eq!(QueueName::TicketMutateState.to_string(), "ticket_mutatestate");
        assert_eq!(
            "notification_sendinvitation".parse::<QueueName>().unwrap(),
            QueueName::NotificationSendInvitation
        );
        assert!("tickets".parse::<QueueName>().is_err());
    }
}
