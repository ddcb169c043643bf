use membership_application::{RegistrationDetails, RollbackPolicy};
use membership_core::{ErrorKind, OrganisationId, UserSearch};

use crate::helpers::{
    PASSWORD, TestApp, founder_details, member_details, organisation_name, secret, unique_email,
    unique_name,
};

#[tokio::test]
async fn test_register_creates_user_organisation_and_both_teams() {
    let app = TestApp::new();

    let (user, organisation) = app.register_founder().await;

    assert_eq!(user.sign_in_count, 1);
    assert!(user.last_login.is_some());
    let credentials = user.credentials.as_ref().expect("credentials stored");
    assert!(!credentials.salt.as_str().is_empty());
    assert_ne!(credentials.digest.expose(), PASSWORD);

    let owners = app.team(&organisation.owners).await;
    let members = app.team(&organisation.members).await;
    assert!(owners.has_member(&user.id));
    assert!(members.has_member(&user.id));
    assert_eq!(owners.permission_level.as_str(), "admin");
    assert_eq!(members.permission_level.as_str(), "read");

    assert_eq!(organisation.billing_email, user.email);
    assert_eq!(user.organisations, vec![organisation.id]);
    assert!(user.teams.contains(&organisation.owners));
    assert!(user.teams.contains(&organisation.members));

    let stored = app.user(&user.id).await.expect("user persisted");
    assert_eq!(stored.organisations, vec![organisation.id]);
}

#[tokio::test]
async fn test_mismatched_passwords_are_rejected_without_creating_a_user() {
    let app = TestApp::new();
    let email = unique_email();
    let details = RegistrationDetails::new(unique_name(), &email, secret(PASSWORD), secret("other"))
        .creating_organisation(organisation_name());

    let result = app.membership.register(details).await;

    assert!(!result.success);
    assert_eq!(result.message, "Password do not match");
    assert_eq!(result.error.map(|e| e.kind()), Some(ErrorKind::Validation));
    let users = app
        .membership
        .user_query()
        .search_users(&UserSearch::default())
        .await
        .unwrap();
    assert!(users.is_empty());
}

#[tokio::test]
async fn test_missing_required_fields_are_rejected() {
    let app = TestApp::new();
    let cases = [
        RegistrationDetails::new("", unique_email(), secret(PASSWORD), secret(PASSWORD)),
        RegistrationDetails::new(unique_name(), "", secret(PASSWORD), secret(PASSWORD)),
        RegistrationDetails::new(unique_name(), unique_email(), secret(""), secret("")),
    ];

    for details in cases {
        let result = app
            .membership
            .register(details.creating_organisation(organisation_name()))
            .await;
        assert!(!result.success);
        assert_eq!(result.message, "Email, username and password are required");
    }
}

#[tokio::test]
async fn test_second_registration_with_same_display_name_fails() {
    let app = TestApp::new();
    let first = founder_details();
    let display_name = first.display_name.clone();
    assert!(app.membership.register(first).await.success);

    let again = RegistrationDetails::new(display_name, unique_email(), secret("x"), secret("x"))
        .creating_organisation(organisation_name());
    let result = app.membership.register(again).await;

    assert!(!result.success);
    assert_eq!(result.message, "User already exists");
}

#[tokio::test]
async fn test_second_registration_with_same_email_fails() {
    let app = TestApp::new();
    let first = founder_details();
    let email = first.email.clone();
    assert!(app.membership.register(first).await.success);

    let again = RegistrationDetails::new(unique_name(), email, secret(PASSWORD), secret(PASSWORD))
        .creating_organisation(organisation_name());
    let result = app.membership.register(again).await;

    assert!(!result.success);
    assert_eq!(result.message, "User already exists");
}

#[tokio::test]
async fn test_second_registration_with_same_organisation_name_fails_and_rolls_back() {
    let app = TestApp::new();
    let (_, organisation) = app.register_founder().await;

    let details = member_details().creating_organisation(organisation.display_name.as_str());
    let display_name = details.display_name.clone();
    let result = app.membership.register(details).await;

    assert!(!result.success);
    assert_eq!(result.message, "Organisation already exists");
    assert!(!app
        .membership
        .check_display_name_exists(&display_name)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_without_rollback_the_rejected_user_remains() {
    let app = TestApp::with_rollback(RollbackPolicy::Disabled);
    let (_, organisation) = app.register_founder().await;

    let details = member_details().creating_organisation(organisation.display_name.as_str());
    let display_name = details.display_name.clone();
    let result = app.membership.register(details).await;

    assert!(!result.success);
    assert!(app
        .membership
        .check_display_name_exists(&display_name)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_invited_user_joins_members_team_only() {
    let app = TestApp::new();
    let (founder, organisation) = app.register_founder().await;
    let members_before = app.team(&organisation.members).await.members.len();

    let result = app
        .membership
        .register(member_details().invited_to(organisation.id))
        .await;

    assert!(result.success, "{}", result.message);
    let user = result.user.unwrap();
    assert_eq!(user.organisations, vec![organisation.id]);
    assert_eq!(user.teams, vec![organisation.members]);

    let members = app.team(&organisation.members).await;
    let owners = app.team(&organisation.owners).await;
    assert_eq!(members.members.len(), members_before + 1);
    assert!(members.has_member(&user.id));
    assert!(!owners.has_member(&user.id));
    assert_eq!(owners.members, vec![founder.id]);
}

#[tokio::test]
async fn test_invite_to_unknown_organisation_fails() {
    let app = TestApp::new();

    let result = app
        .membership
        .register(member_details().invited_to(OrganisationId::new()))
        .await;

    assert!(!result.success);
    assert_eq!(result.message, "Could not find organisation");
}

#[tokio::test]
async fn test_concurrent_registrations_for_one_name_leave_one_user() {
    let app = TestApp::new();
    let name = unique_name();
    let first = RegistrationDetails::new(&name, unique_email(), secret(PASSWORD), secret(PASSWORD))
        .creating_organisation(organisation_name());
    let second = RegistrationDetails::new(&name, unique_email(), secret(PASSWORD), secret(PASSWORD))
        .creating_organisation(organisation_name());

    let (a, b) = tokio::join!(app.membership.register(first), app.membership.register(second));

    assert_eq!(
        [a.success, b.success].iter().filter(|s| **s).count(),
        1,
        "exactly one registration wins: {} / {}",
        a.message,
        b.message
    );
    let users = app
        .membership
        .user_query()
        .search_users(&UserSearch {
            display_name_prefix: Some(name.clone()),
            ..UserSearch::default()
        })
        .await
        .unwrap();
    assert_eq!(users.len(), 1);
}
