pub mod constants;
pub mod settings;

pub use constants::*;
pub use settings::{
    EventSettings, HashingSettings, MembershipSettings, PostgresSettings, RegistrationSettings,
};
