use membership_application::{NewTeam, OneOffInvite, OpenInvite, OrganisationPatch, UserPatch};
use membership_core::{InviteType, TeamSearch, UserKey};

use crate::helpers::{TestApp, unique_email};

#[tokio::test]
async fn test_finding_by_id_twice_returns_equal_data() {
    let app = TestApp::new();
    let (user, organisation) = app.register_founder().await;

    let users = app.membership.user_query();
    let first = users.find_user_by_id(&user.id).await.unwrap();
    let second = users.find_user_by_id(&user.id).await.unwrap();
    assert!(first.is_some());
    assert_eq!(first, second);

    let organisations = app.membership.organisation_query();
    let first = organisations
        .find_organisation_by_id(&organisation.id)
        .await
        .unwrap();
    let second = organisations
        .find_organisation_by_id(&organisation.id)
        .await
        .unwrap();
    assert!(first.is_some());
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_update_stamps_last_modified_and_keeps_created() {
    let app = TestApp::new();
    let (user, organisation) = app.register_founder().await;

    let updated = app
        .membership
        .user_command()
        .update_user(
            UserKey::Id(user.id),
            UserPatch {
                screen_name: Some("Ada".to_string()),
                ..UserPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.screen_name.as_deref(), Some("Ada"));
    assert_eq!(updated.timestamps.created, user.timestamps.created);
    assert!(updated.timestamps.last_modified >= user.timestamps.last_modified);

    let renamed = app
        .membership
        .organisation_command()
        .update_organisation(
            membership_core::OrganisationKey::Id(organisation.id),
            OrganisationPatch {
                title: Some("Acme Holdings".to_string()),
                ..OrganisationPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.id, organisation.id);
    assert_eq!(renamed.title.as_deref(), Some("Acme Holdings"));
}

#[tokio::test]
async fn test_deleting_a_missing_user_reports_not_found() {
    let app = TestApp::new();
    let (user, _) = app.register_founder().await;
    let users = app.membership.user_command();

    users.delete_user(UserKey::Id(user.id)).await.unwrap();
    let error = users.delete_user(UserKey::Id(user.id)).await.unwrap_err();

    assert_eq!(error.to_string(), "User to remove not found");
}

#[tokio::test]
async fn test_additional_team_is_listed_with_the_organisation() {
    let app = TestApp::new();
    let (user, organisation) = app.register_founder().await;

    let (organisation, team) = app
        .membership
        .organisation_command()
        .add_team(organisation.id, NewTeam::new("engineering"))
        .await
        .unwrap();
    assert!(organisation.teams.contains(&team.id));

    let teams = app.membership.team_command();
    teams.add_member(team.id, user.id).await.unwrap();
    let mine = app
        .membership
        .team_query()
        .search_teams(&TeamSearch {
            member: Some(user.id),
            ..TeamSearch::default()
        })
        .await
        .unwrap();
    assert_eq!(mine.len(), 3);

    teams.delete_team(team.id).await.unwrap();
    let listed = app
        .membership
        .team_query()
        .find_teams_by_organisation(&organisation.id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|t| t.id != team.id));
}

#[tokio::test]
async fn test_one_off_invite_reports_every_violation() {
    let app = TestApp::new();
    let (_, organisation) = app.register_founder().await;

    let error = app
        .membership
        .invite_command()
        .create_one_off_invite(OneOffInvite {
            organisation: organisation.id,
            inviter: None,
            email: Some("not-an-email".to_string()),
            message: None,
            expires: None,
        })
        .await
        .unwrap_err();

    assert_eq!(error.to_string(), "Invite not created");
    let source = std::error::Error::source(&error).unwrap().to_string();
    assert!(source.contains("Inviter is required."));
    assert!(source.contains("Email is required and must be a valid email."));
}

#[tokio::test]
async fn test_invites_are_listed_by_organisation() {
    let app = TestApp::new();
    let (founder, organisation) = app.register_founder().await;
    let invites = app.membership.invite_command();

    let single = invites
        .create_one_off_invite(OneOffInvite {
            organisation: organisation.id,
            inviter: Some(founder.id),
            email: Some(unique_email()),
            message: Some("Join us".to_string()),
            expires: None,
        })
        .await
        .unwrap();
    assert_eq!(single.invite_type, InviteType::Single);
    assert_eq!(single.max_times_used, 1);
    assert_eq!(single.status.as_deref(), Some("pending"));

    invites
        .create_open_invite(OpenInvite::new(organisation.id))
        .await
        .unwrap();

    let listed = app
        .membership
        .invite_query()
        .find_invites_by_organisation(&organisation.id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);

    let used = invites.use_invite(single.id).await.unwrap();
    assert_eq!(used.times_used, 1);
    assert!(!used.active);
    assert!(invites.use_invite(single.id).await.is_err());
}
