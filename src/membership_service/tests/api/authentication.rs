use membership_application::{INVALID_LOGIN_MESSAGE, LoginCredentials};

use crate::helpers::{PASSWORD, TestApp, secret, unique_name};

#[tokio::test]
async fn test_login_by_display_name_increments_sign_in_count() {
    let app = TestApp::new();
    let (user, _) = app.register_founder().await;
    assert_eq!(user.sign_in_count, 1);

    let result = app
        .membership
        .authenticate(LoginCredentials::new(
            user.display_name.as_str(),
            secret(PASSWORD),
        ))
        .await
        .unwrap();

    assert!(result.success);
    let authenticated = result.user.unwrap();
    assert_eq!(authenticated.id, user.id);
    assert_eq!(authenticated.sign_in_count, 2);
    assert!(authenticated.last_login >= user.last_login);
    assert_eq!(app.user(&user.id).await.unwrap().sign_in_count, 2);
}

#[tokio::test]
async fn test_login_by_email_succeeds() {
    let app = TestApp::new();
    let (user, _) = app.register_founder().await;

    let result = app
        .membership
        .authenticate(LoginCredentials::new(user.email.as_str(), secret(PASSWORD)))
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.user.map(|u| u.id), Some(user.id));
}

#[tokio::test]
async fn test_every_failed_login_reports_the_same_message() {
    let app = TestApp::new();
    let (user, _) = app.register_founder().await;
    let name = user.display_name.as_str();

    let attempts = [
        LoginCredentials::new("", secret(PASSWORD)),
        LoginCredentials::new(name, secret("")),
        LoginCredentials::new(name, secret("not the password")),
        LoginCredentials::new(unique_name(), secret(PASSWORD)),
    ];

    for credentials in attempts {
        let result = app.membership.authenticate(credentials).await.unwrap();
        assert!(!result.success);
        assert!(result.user.is_none());
        assert_eq!(result.message, INVALID_LOGIN_MESSAGE);
        assert_eq!(result.message, "Invalid login");
    }

    assert_eq!(app.user(&user.id).await.unwrap().sign_in_count, 1);
}
