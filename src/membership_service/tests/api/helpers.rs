use fake::Fake;
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::{SafeEmail, Username};
use membership_adapters::{HashingSettings, MembershipSettings};
use membership_application::{RegistrationDetails, RollbackPolicy};
use membership_core::{Organisation, Team, TeamId, User, UserId};
use membership_service::InMemoryMembership;
use secrecy::Secret;

pub const PASSWORD: &str = "correct horse battery staple";

pub struct TestApp {
    pub membership: InMemoryMembership,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_rollback(RollbackPolicy::Compensate)
    }

    pub fn with_rollback(rollback: RollbackPolicy) -> Self {
        let mut settings = MembershipSettings::default();
        settings.registration.rollback = rollback;
        settings.hashing = HashingSettings {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        };
        Self {
            membership: InMemoryMembership::in_memory(&settings),
        }
    }

    /// Registers a fresh user who founds a fresh organisation.
    pub async fn register_founder(&self) -> (User, Organisation) {
        let result = self.membership.register(founder_details()).await;
        assert!(result.success, "registration failed: {}", result.message);
        (result.user.unwrap(), result.organisation.unwrap())
    }

    pub async fn team(&self, id: &TeamId) -> Team {
        self.membership
            .team_query()
            .find_team_by_id(id)
            .await
            .unwrap()
            .expect("team exists")
    }

    pub async fn user(&self, id: &UserId) -> Option<User> {
        self.membership.user_query().find_user_by_id(id).await.unwrap()
    }
}

pub fn secret(value: &str) -> Secret<String> {
    Secret::new(value.to_string())
}

/// A display name no other call returns.
pub fn unique_name() -> String {
    let username: String = Username().fake();
    format!("{username}-{}", &UserId::new().to_string()[..8])
}

pub fn unique_email() -> String {
    let email: String = SafeEmail().fake();
    format!("{}.{email}", &UserId::new().to_string()[..8])
}

pub fn organisation_name() -> String {
    let company: String = CompanyName().fake();
    format!("{company} {}", &UserId::new().to_string()[..8])
}

pub fn member_details() -> RegistrationDetails {
    RegistrationDetails::new(unique_name(), unique_email(), secret(PASSWORD), secret(PASSWORD))
}

pub fn founder_details() -> RegistrationDetails {
    member_details().creating_organisation(organisation_name())
}
