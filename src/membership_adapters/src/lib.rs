pub mod config;
pub mod hashing;
pub mod persistence;

pub use config::{
    EventSettings, HashingSettings, MembershipSettings, PostgresSettings, RegistrationSettings,
};
pub use hashing::Argon2PasswordHasher;
pub use persistence::{
    HashMapInviteStore, HashMapOrganisationStore, HashMapTeamStore, HashMapUserStore,
    PostgresInviteStore, PostgresOrganisationStore, PostgresTeamStore, PostgresUserStore,
};
