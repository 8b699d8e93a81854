//! Queue broker backed by the document store's database.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension};

use super::{Delivery, MessageQueue, PublishOptions, QueueName};
use crate::{
    db::Database,
    error::{DatabaseResultExt, Result, SurveyError},
};

const DECLARE_QUEUE_SQL: &str =
    "INSERT INTO queues (name, declared_at) VALUES (?1, ?2) ON CONFLICT(name) DO NOTHING";
const QUEUE_EXISTS_SQL: &str = "SELECT 1 FROM queues WHERE name = ?1";
const PUBLISH_SQL: &str =
    "INSERT INTO queue_messages (queue, payload, persistent, enqueued_at) VALUES (?1, ?2, ?3, ?4)";
const SELECT_PENDING_SQL: &str =
    "SELECT id, payload, attempts FROM queue_messages WHERE queue = ?1 ORDER BY id LIMIT ?2";
const MARK_DELIVERED_SQL: &str =
    "UPDATE queue_messages SET attempts = attempts + 1, delivered_at = ?1 WHERE id = ?2";
const ACK_SQL: &str = "DELETE FROM queue_messages WHERE id = ?1";
const PENDING_COUNT_SQL: &str = "SELECT COUNT(*) FROM queue_messages WHERE queue = ?1";

impl Database {
    /// Number of un-acked messages on `queue`.
    pub fn pending_messages(&self, queue: QueueName) -> Result<usize> {
        let count: i64 = self
            .connection()
            .query_row(PENDING_COUNT_SQL, params![queue.as_str()], |row| row.get(0))
            .db_context("Failed to count queued messages")?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

impl MessageQueue for Database {
    fn declare_queue(&self, queue: QueueName) -> Result<()> {
        self.connection()
            .execute(
                DECLARE_QUEUE_SQL,
                params![queue.as_str(), Timestamp::now().to_string()],
            )
            .db_context("Failed to declare queue")?;
        Ok(())
    }

    fn publish(&self, queue: QueueName, payload: &[u8], options: PublishOptions) -> Result<()> {
        let declared = self
            .connection()
            .query_row(QUEUE_EXISTS_SQL, params![queue.as_str()], |_| Ok(()))
            .optional()
            .db_context("Failed to look up queue")?
            .is_some();

        if !declared {
            if options.mandatory {
                log::error!("Mandatory message to undeclared queue {queue} was not routed");
                return Err(SurveyError::QueueNotRouted {
                    queue: queue.to_string(),
                });
            }
            log::warn!("Dropped message to undeclared queue {queue}");
            return Ok(());
        }

        self.connection()
            .execute(
                PUBLISH_SQL,
                params![
                    queue.as_str(),
                    payload,
                    options.persistent,
                    Timestamp::now().to_string()
                ],
            )
            .db_context("Failed to publish message")?;
        Ok(())
    }

    fn receive(&self, queue: QueueName, limit: usize) -> Result<Vec<Delivery>> {
        let mut stmt = self
            .connection()
            .prepare(SELECT_PENDING_SQL)
            .db_context("Failed to prepare queue read")?;
        let rows = stmt
            .query_map(
                params![queue.as_str(), i64::try_from(limit).unwrap_or(i64::MAX)],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, Vec<u8>>(1)?,
                        row.get::<_, i64>(2)?,
                    ))
                },
            )
            .db_context("Failed to read queue")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .db_context("Failed to read queued messages")?;

        let now = Timestamp::now().to_string();
        let mut deliveries = Vec::with_capacity(rows.len());
        for (delivery_id, payload, attempts) in rows {
            self.connection()
                .execute(MARK_DELIVERED_SQL, params![now, delivery_id])
                .db_context("Failed to mark message delivered")?;
            deliveries.push(Delivery {
                delivery_id,
                queue,
                payload,
                attempts: u32::try_from(attempts + 1).unwrap_or(u32::MAX),
            });
        }
        Ok(deliveries)
    }

    fn ack(&self, delivery_id: i64) -> Result<()> {
        let removed = self
            .connection()
            .execute(ACK_SQL, params![delivery_id])
            .db_context("Failed to ack message")?;
        if removed == 0 {
            return Err(SurveyError::Queue {
                message: format!("Unknown delivery {delivery_id}"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn create_test_db() -> (Database, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::new(temp_dir.path().join("queue.db")).unwrap();
        (db, temp_dir)
    }

    #[test]
    fn test_mandatory_publish_needs_declared_queue() {
        let (db, _dir) = create_test_db();

        let err = db
            .publish(QueueName::NotificationSend, b"{}", PublishOptions::default())
            .unwrap_err();
        assert!(matches!(err, SurveyError::QueueNotRouted { .. }));

        let optional = PublishOptions {
            mandatory: false,
            ..Default::default()
        };
        db.publish(QueueName::NotificationSend, b"{}", optional).unwrap();
        assert_eq!(db.pending_messages(QueueName::NotificationSend).unwrap(), 0);
    }

    #[test]
    fn test_unacked_messages_are_redelivered() {
        let (db, _dir) = create_test_db();
        db.declare_queue(QueueName::TicketCreate).unwrap();
        db.declare_queue(QueueName::TicketCreate).unwrap();
        db.publish(QueueName::TicketCreate, b"first", PublishOptions::default())
            .unwrap();
        db.publish(QueueName::TicketCreate, b"second", PublishOptions::default())
            .unwrap();

        let first = db.receive(QueueName::TicketCreate, 10).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].payload, b"first");
        assert!(!first[0].is_redelivery());

        db.ack(first[0].delivery_id).unwrap();

        let again = db.receive(QueueName::TicketCreate, 10).unwrap();
        assert_eq!(again.len(), 1);
        assert_eq!(again[0].payload, b"second");
        assert_eq!(again[0].attempts, 2);
        assert!(again[0].is_redelivery());
    }

    #[test]
    fn test_messages_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("queue.db");
        {
            let db = Database::new(&path).unwrap();
            db.declare_queue(QueueName::TicketMutateState).unwrap();
            db.publish(QueueName::TicketMutateState, b"x", PublishOptions::default())
                .unwrap();
        }
        let db = Database::new(&path).unwrap();
        assert_eq!(db.pending_messages(QueueName::TicketMutateState).unwrap(), 1);
        assert_eq!(db.receive(QueueName::TicketCreate, 5).unwrap().len(), 0);
    }

    #[test]
    fn test_ack_unknown_delivery_fails() {
        let (db, _dir) = create_test_db();
        assert!(matches!(db.ack(42), Err(SurveyError::Queue { .. })));
    }
}
