pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    display_name::DisplayName,
    email::Email,
    error::{DomainError, ErrorKind},
    ids::{InviteId, OrganisationId, TeamId, UserId},
    invite::{Invite, InviteType},
    organisation::Organisation,
    password::{Credentials, Password, PasswordDigest, Salt},
    team::{PermissionLevel, Team},
    timestamps::Timestamps,
    user::{User, UserStatus},
};

pub use ports::{
    repositories::{
        InviteSearch, InviteStore, OrganisationKey, OrganisationSearch, OrganisationStore,
        StoreError, TeamSearch, TeamStore, UserKey, UserSearch, UserStore,
        ensure_unique_organisation, ensure_unique_user,
    },
    services::{PasswordHashError, PasswordHasher},
};
