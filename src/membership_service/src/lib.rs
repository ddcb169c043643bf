pub mod events;
pub mod helpers;
pub mod membership;
pub mod tracing;

pub use events::{EventBus, MembershipEvent};
pub use helpers::{configure_postgresql, get_postgres_pool};
pub use membership::{InMemoryMembership, Membership, PostgresMembership};
pub use crate::tracing::init_tracing;
