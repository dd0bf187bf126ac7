use parley_storage::{DeliveryStatus, MessageRecord};

/// Rejection reason for an illegal delivery status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionRejection {
    /// Received messages never carry a delivery status.
    NotOutgoing,
    Regression {
        current: DeliveryStatus,
        attempted: DeliveryStatus,
    },
    Repeat(DeliveryStatus),
    Skip {
        current: DeliveryStatus,
        attempted: DeliveryStatus,
    },
}

/// One requested step through `sending -> sent -> delivered -> seen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryTransition {
    pub attempted: DeliveryStatus,
}

impl DeliveryTransition {
    pub const fn to(attempted: DeliveryStatus) -> Self {
        Self { attempted }
    }

    /// Accepts the step only when it is the immediate successor of the current status.
    pub fn apply(self, message: &MessageRecord) -> Result<DeliveryStatus, TransitionRejection> {
        if !message.is_sent {
            return Err(TransitionRejection::NotOutgoing);
        }

        // Outgoing records are created as `Sending`, so a missing status is treated the same.
        let current = message.status.unwrap_or(DeliveryStatus::Sending);
        let attempted = self.attempted;

        if attempted == current {
            return Err(TransitionRejection::Repeat(current));
        }
        if attempted < current {
            return Err(TransitionRejection::Regression { current, attempted });
        }
        if current.next() != Some(attempted) {
            return Err(TransitionRejection::Skip { current, attempted });
        }

        Ok(attempted)
    }
}
