//! Draining a queue through a message handler.

use serde::{Deserialize, Serialize};

use crate::{
    db::Database,
    error::{ErrorKind, Result, SurveyError},
    queue::{MessageQueue, QueueName},
};

/// Counts of one consume run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumeReport {
    /// Deliveries handed out by the queue
    pub received: usize,
    /// Handled and acked
    pub processed: usize,
    /// Unprocessable, acked and dropped
    pub rejected: usize,
    /// Left on the queue for a later run
    pub deferred: usize,
}

/// How a failed delivery is dealt with.
enum Disposition {
    Reject,
    Defer,
    Abort,
}

fn disposition(err: &SurveyError) -> Disposition {
    match err {
        SurveyError::Serialization { .. } => Disposition::Reject,
        SurveyError::VersionConflict { .. } => Disposition::Defer,
        _ => match err.kind() {
            ErrorKind::Upstream => Disposition::Abort,
            _ => Disposition::Reject,
        },
    }
}

/// Hands up to `limit` deliveries of `queue` to `handle`.
///
/// Successful and unprocessable deliveries are acked. Version conflicts stay
/// queued. A store or queue failure stops the run and is returned; the
/// current and all later deliveries stay queued.
pub(crate) fn drain<F>(
    db: &mut Database,
    queue: QueueName,
    limit: usize,
    mut handle: F,
) -> Result<ConsumeReport>
where
    F: FnMut(&mut Database, &[u8]) -> Result<()>,
{
    let deliveries = db.receive(queue, limit)?;
    let mut report = ConsumeReport {
        received: deliveries.len(),
        ..Default::default()
    };

    for delivery in deliveries {
        if delivery.is_redelivery() {
            log::warn!(
                "Redelivered message {} on {queue} (attempt {})",
                delivery.delivery_id,
                delivery.attempts
            );
        }

        match handle(db, &delivery.payload) {
            Ok(()) => {
                db.ack(delivery.delivery_id)?;
                report.processed += 1;
            }
            Err(e) => match disposition(&e) {
                Disposition::Reject => {
                    log::error!(
                        "Rejected message {} on {queue}: {e} ({})",
                        delivery.delivery_id,
                        e.code()
                    );
                    db.ack(delivery.delivery_id)?;
                    report.rejected += 1;
                }
                Disposition::Defer => {
                    log::warn!("Deferred message {} on {queue}: {e}", delivery.delivery_id);
                    report.deferred += 1;
                }
                Disposition::Abort => {
                    log::error!(
                        "Stopped consuming {queue} at message {}: {e}",
                        delivery.delivery_id
                    );
                    return Err(e);
                }
            },
        }
    }

    Ok(report)
}
