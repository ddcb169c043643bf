use membership_adapters::{
    Argon2PasswordHasher, HashMapInviteStore, HashMapOrganisationStore, HashMapTeamStore,
    HashMapUserStore, MembershipSettings, PostgresInviteStore, PostgresOrganisationStore,
    PostgresTeamStore, PostgresUserStore,
};
use membership_application::{
    AuthenticationError, AuthenticationResult, AuthenticationUseCase, InviteCommand, InviteQuery,
    LoginCredentials, OrganisationCommand, OrganisationQuery, RegistrationDetails,
    RegistrationResult, RegistrationSaga, TeamCommand, TeamQuery, UserCommand, UserQuery,
};
use membership_core::{
    InviteStore, OrganisationStore, PasswordHasher, StoreError, TeamStore, UserStore,
};
use sqlx::PgPool;
use tokio::sync::broadcast;

use crate::events::{EventBus, MembershipEvent};

pub type InMemoryMembership = Membership<
    HashMapUserStore,
    HashMapOrganisationStore,
    HashMapTeamStore,
    HashMapInviteStore,
    Argon2PasswordHasher,
>;

pub type PostgresMembership = Membership<
    PostgresUserStore,
    PostgresOrganisationStore,
    PostgresTeamStore,
    PostgresInviteStore,
    Argon2PasswordHasher,
>;

/// Single entry point to the membership module.
///
/// Owns the four stores and the hasher, runs registration and
/// authentication, and re-emits their outcomes as [`MembershipEvent`]s.
/// Command and query objects are handed out over clones of the same stores.
pub struct Membership<U, O, T, I, H>
where
    U: UserStore + Clone,
    O: OrganisationStore + Clone,
    T: TeamStore + Clone,
    I: InviteStore + Clone,
    H: PasswordHasher + Clone,
{
    user_store: U,
    organisation_store: O,
    team_store: T,
    invite_store: I,
    hasher: H,
    registration: RegistrationSaga<U, O, T, H>,
    authentication: AuthenticationUseCase<U, H>,
    events: EventBus,
}

impl InMemoryMembership {
    pub fn in_memory(settings: &MembershipSettings) -> Self {
        Membership::new(
            HashMapUserStore::default(),
            HashMapOrganisationStore::default(),
            HashMapTeamStore::default(),
            HashMapInviteStore::default(),
            Argon2PasswordHasher::new(settings.hashing.clone()),
            settings,
        )
    }
}

impl PostgresMembership {
    pub fn postgres(pool: PgPool, settings: &MembershipSettings) -> Self {
        Membership::new(
            PostgresUserStore::new(pool.clone()),
            PostgresOrganisationStore::new(pool.clone()),
            PostgresTeamStore::new(pool.clone()),
            PostgresInviteStore::new(pool),
            Argon2PasswordHasher::new(settings.hashing.clone()),
            settings,
        )
    }
}

impl<U, O, T, I, H> Membership<U, O, T, I, H>
where
    U: UserStore + Clone,
    O: OrganisationStore + Clone,
    T: TeamStore + Clone,
    I: InviteStore + Clone,
    H: PasswordHasher + Clone,
{
    pub fn new(
        user_store: U,
        organisation_store: O,
        team_store: T,
        invite_store: I,
        hasher: H,
        settings: &MembershipSettings,
    ) -> Self {
        let registration = RegistrationSaga::new(
            user_store.clone(),
            organisation_store.clone(),
            team_store.clone(),
            hasher.clone(),
            settings.registration_options(),
        );
        let authentication = AuthenticationUseCase::new(user_store.clone(), hasher.clone());

        Self {
            user_store,
            organisation_store,
            team_store,
            invite_store,
            hasher,
            registration,
            authentication,
            events: EventBus::with_capacity(settings.events.capacity),
        }
    }

    #[tracing::instrument(name = "Membership::register", skip_all)]
    pub async fn register(&self, details: RegistrationDetails) -> RegistrationResult {
        let result = self.registration.register(details).await;

        let event = match (&result.user, result.success) {
            (Some(user), true) => MembershipEvent::Registered {
                user: user.id,
                organisation: result.organisation.as_ref().map(|o| o.id),
            },
            _ => MembershipEvent::NotRegistered {
                message: result.message.clone(),
            },
        };
        self.events.emit(event);

        result
    }

    #[tracing::instrument(name = "Membership::authenticate", skip_all)]
    pub async fn authenticate(
        &self,
        credentials: LoginCredentials,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let result = self.authentication.execute(credentials).await;

        let event = match &result {
            Ok(AuthenticationResult {
                success: true,
                user: Some(user),
                ..
            }) => MembershipEvent::Authenticated { user: user.id },
            Ok(outcome) => MembershipEvent::NotAuthenticated {
                message: outcome.message.clone(),
            },
            Err(e) => MembershipEvent::NotAuthenticated {
                message: e.to_string(),
            },
        };
        self.events.emit(event);

        result
    }

    pub async fn check_display_name_exists(&self, display_name: &str) -> Result<bool, StoreError> {
        self.registration
            .check_display_name_exists(display_name)
            .await
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MembershipEvent> {
        self.events.subscribe()
    }

    pub fn user_command(&self) -> UserCommand<U, O, H> {
        UserCommand::new(
            self.user_store.clone(),
            self.organisation_store.clone(),
            self.hasher.clone(),
        )
    }

    pub fn user_query(&self) -> UserQuery<U> {
        UserQuery::new(self.user_store.clone())
    }

    pub fn organisation_command(&self) -> OrganisationCommand<O, T, U> {
        OrganisationCommand::new(
            self.organisation_store.clone(),
            self.team_store.clone(),
            self.user_store.clone(),
        )
    }

    pub fn organisation_query(&self) -> OrganisationQuery<O> {
        OrganisationQuery::new(self.organisation_store.clone())
    }

    pub fn team_command(&self) -> TeamCommand<T> {
        TeamCommand::new(self.team_store.clone())
    }

    pub fn team_query(&self) -> TeamQuery<T> {
        TeamQuery::new(self.team_store.clone())
    }

    pub fn invite_command(&self) -> InviteCommand<I> {
        InviteCommand::new(self.invite_store.clone())
    }

    pub fn invite_query(&self) -> InviteQuery<I> {
        InviteQuery::new(self.invite_store.clone())
    }
}
