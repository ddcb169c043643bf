//! Broadcast of registration and authentication outcomes.
//!
//! Delivery is at-most-once and in-memory: a receiver that falls more than
//! `capacity` events behind gets `RecvError::Lagged`. Emitting with no
//! subscribers is not an error.

use membership_core::{OrganisationId, UserId};
use tokio::sync::broadcast;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipEvent {
    Registered {
        user: UserId,
        organisation: Option<OrganisationId>,
    },
    NotRegistered {
        message: String,
    },
    Authenticated {
        user: UserId,
    },
    NotAuthenticated {
        message: String,
    },
}

#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<MembershipEvent>,
}

impl EventBus {
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Returns the number of receivers that got the event.
    pub fn emit(&self, event: MembershipEvent) -> usize {
        tracing::debug!(?event, "emitting membership event");
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MembershipEvent> {
        self.sender.subscribe()
    }
}
