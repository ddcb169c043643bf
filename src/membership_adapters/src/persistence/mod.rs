pub mod hashmap_invite_store;
pub mod hashmap_organisation_store;
pub mod hashmap_team_store;
pub mod hashmap_user_store;
pub mod postgres_invite_store;
pub mod postgres_organisation_store;
pub mod postgres_team_store;
pub mod postgres_user_store;

mod postgres_errors;

pub use hashmap_invite_store::HashMapInviteStore;
pub use hashmap_organisation_store::HashMapOrganisationStore;
pub use hashmap_team_store::HashMapTeamStore;
pub use hashmap_user_store::HashMapUserStore;
pub use postgres_invite_store::PostgresInviteStore;
pub use postgres_organisation_store::PostgresOrganisationStore;
pub use postgres_team_store::PostgresTeamStore;
pub use postgres_user_store::PostgresUserStore;
