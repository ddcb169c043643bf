use membership_application::LoginCredentials;
use membership_service::MembershipEvent;

use crate::helpers::{PASSWORD, TestApp, member_details, secret};

#[tokio::test]
async fn test_registration_outcomes_are_broadcast() {
    let app = TestApp::new();
    let mut events = app.membership.subscribe();

    let (user, organisation) = app.register_founder().await;
    let rejected = app
        .membership
        .register(member_details().creating_organisation(organisation.display_name.as_str()))
        .await;

    assert_eq!(
        events.recv().await.unwrap(),
        MembershipEvent::Registered {
            user: user.id,
            organisation: Some(organisation.id),
        }
    );
    assert_eq!(
        events.recv().await.unwrap(),
        MembershipEvent::NotRegistered {
            message: rejected.message,
        }
    );
}

#[tokio::test]
async fn test_authentication_outcomes_are_broadcast() {
    let app = TestApp::new();
    let (user, _) = app.register_founder().await;
    let mut events = app.membership.subscribe();

    app.membership
        .authenticate(LoginCredentials::new(user.display_name.as_str(), secret(PASSWORD)))
        .await
        .unwrap();
    app.membership
        .authenticate(LoginCredentials::new(user.display_name.as_str(), secret("wrong")))
        .await
        .unwrap();

    assert_eq!(
        events.recv().await.unwrap(),
        MembershipEvent::Authenticated { user: user.id }
    );
    assert_eq!(
        events.recv().await.unwrap(),
        MembershipEvent::NotAuthenticated {
            message: "Invalid login".to_string(),
        }
    );
}
