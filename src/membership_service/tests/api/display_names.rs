use membership_application::{
    NewOrganisation, NewUser, OrganisationCommandError, UserCommandError, UserPatch,
};
use membership_core::{DisplayName, Email, ErrorKind, OrganisationKey, StoreError, UserKey};

use crate::helpers::{TestApp, unique_email, unique_name};

fn display_name(value: &str) -> DisplayName {
    DisplayName::parse(value).unwrap()
}

#[tokio::test]
async fn test_user_and_organisation_names_share_one_namespace() {
    let app = TestApp::new();
    let (user, organisation) = app.register_founder().await;

    assert!(app
        .membership
        .check_display_name_exists(user.display_name.as_str())
        .await
        .unwrap());
    assert!(app
        .membership
        .check_display_name_exists(organisation.display_name.as_str())
        .await
        .unwrap());
}

#[tokio::test]
async fn test_unused_and_blank_names_do_not_exist() {
    let app = TestApp::new();
    app.register_founder().await;

    assert!(!app
        .membership
        .check_display_name_exists(&unique_name())
        .await
        .unwrap());
    assert!(!app.membership.check_display_name_exists("  ").await.unwrap());
}

#[tokio::test]
async fn test_commands_keep_user_and_organisation_names_apart() {
    let app = TestApp::new();
    let acme = unique_name();
    let globex = unique_name();

    let user = app
        .membership
        .user_command()
        .create_user(NewUser::new(
            display_name(&acme),
            Email::parse(unique_email()).unwrap(),
        ))
        .await
        .unwrap();

    let error = app
        .membership
        .organisation_command()
        .create_organisation(
            NewOrganisation::new(display_name(&acme), Email::parse(unique_email()).unwrap()),
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        OrganisationCommandError::NotCreated(StoreError::AlreadyExists("displayName"))
    ));
    assert_eq!(error.kind(), ErrorKind::Conflict);

    let organisation = app
        .membership
        .organisation_command()
        .create_organisation(
            NewOrganisation::new(display_name(&globex), Email::parse(unique_email()).unwrap()),
            None,
        )
        .await
        .unwrap();

    let error = app
        .membership
        .user_command()
        .update_user(
            UserKey::Id(user.id),
            UserPatch {
                display_name: Some(display_name(&globex)),
                ..UserPatch::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        UserCommandError::NotUpdated(StoreError::AlreadyExists("displayName"))
    ));
    assert_eq!(error.kind(), ErrorKind::Conflict);

    let error = app
        .membership
        .organisation_command()
        .update_organisation(
            OrganisationKey::Id(organisation.id),
            membership_application::OrganisationPatch {
                display_name: Some(display_name(&acme)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Conflict);

    let error = app
        .membership
        .user_command()
        .create_user(NewUser::new(
            display_name(&globex),
            Email::parse(unique_email()).unwrap(),
        ))
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        UserCommandError::NotCreated(StoreError::AlreadyExists("displayName"))
    ));
}
