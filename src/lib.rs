//! # Membership - Identity and Organisation Library
//!
//! This is a facade crate that re-exports all public APIs from the membership components.
//! Use this crate to get registration, authentication and organisation management in one place.
//!
//! ## Usage
//!
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! membership = { path = "../membership" }
//! ```
//!
//! ## Structure
//!
//! - **Core domain types**: `User`, `Organisation`, `Team`, `Invite`, `DisplayName`, `Email`, etc.
//! - **Repository traits**: `UserStore`, `OrganisationStore`, `TeamStore`, `InviteStore`
//! - **Use cases**: `RegistrationSaga`, `AuthenticationUseCase`, per-entity commands and queries
//! - **Adapters**: `HashMapUserStore`, `PostgresUserStore`, `Argon2PasswordHasher`, settings
//! - **Service**: `Membership` - The main entry point

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use membership_core::*;
}

// Re-export most commonly used core types at the root level
pub use membership_core::{
    Credentials, DisplayName, DomainError, Email, ErrorKind, Invite, InviteId, InviteType,
    Organisation, OrganisationId, Password, PasswordDigest, PermissionLevel, Salt, Team, TeamId,
    Timestamps, User, UserId, UserStatus,
};

// ============================================================================
// Repository Traits (Ports)
// ============================================================================

/// Repository trait definitions
pub mod repositories {
    pub use membership_core::{
        InviteSearch, InviteStore, OrganisationKey, OrganisationSearch, OrganisationStore,
        StoreError, TeamSearch, TeamStore, UserKey, UserSearch, UserStore,
        ensure_unique_organisation, ensure_unique_user,
    };
}

pub use repositories::*;

pub use membership_core::{PasswordHashError, PasswordHasher};

// ============================================================================
// Use Cases (Application Layer)
// ============================================================================

/// Application use cases
pub mod use_cases {
    pub use membership_application::*;
}

// Re-export use cases at root level
pub use membership_application::{
    AuthenticationError, AuthenticationResult, AuthenticationUseCase, DisplayNameRegistry,
    INVALID_LOGIN_MESSAGE, InviteCommand, InviteQuery, LoginCredentials, OrganisationCommand,
    OrganisationQuery, REGISTRATION_SUCCESS_MESSAGE, RegistrationDetails, RegistrationError,
    RegistrationOptions, RegistrationResult, RegistrationSaga, RegistrationState,
    RollbackPolicy, TeamCommand, TeamQuery, UserCommand, UserQuery,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// Persistence implementations
    pub mod persistence {
        pub use membership_adapters::persistence::*;
    }

    /// Password hashing
    pub mod hashing {
        pub use membership_adapters::hashing::*;
    }

    /// Configuration
    pub mod config {
        pub use membership_adapters::config::*;
    }
}

// Re-export commonly used adapters at root level
pub use membership_adapters::{
    Argon2PasswordHasher, EventSettings, HashMapInviteStore, HashMapOrganisationStore,
    HashMapTeamStore, HashMapUserStore, HashingSettings, MembershipSettings, PostgresInviteStore,
    PostgresOrganisationStore, PostgresSettings, PostgresTeamStore, PostgresUserStore,
    RegistrationSettings,
};

// ============================================================================
// Membership Service (Main Entry Point)
// ============================================================================

/// Main membership service
pub use membership_service::{
    EventBus, InMemoryMembership, Membership, MembershipEvent, PostgresMembership,
    configure_postgresql, get_postgres_pool, init_tracing,
};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing repository traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};
