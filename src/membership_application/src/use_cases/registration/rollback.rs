use membership_core::{OrganisationKey, OrganisationStore, PasswordHasher, TeamStore, UserKey, UserStore};

use super::{RegistrationSaga, application::Application};

impl<U, O, T, H> RegistrationSaga<U, O, T, H>
where
    U: UserStore + Clone,
    O: OrganisationStore + Clone,
    T: TeamStore,
    H: PasswordHasher,
{
    /// Undoes what the run wrote, deepest child first: membership of a joined
    /// team, created teams, the organisation, then the user. Each delete only
    /// runs if the previous one succeeded. A failed delete is logged and the
    /// chain stops.
    #[tracing::instrument(name = "RegistrationSaga::rollback", skip_all)]
    pub(super) async fn rollback(&self, app: &mut Application) {
        let created = std::mem::take(&mut app.created);
        if created.is_empty() {
            return;
        }

        if let (Some(team_id), Some(user_id)) = (created.joined_team, created.user) {
            let detached = match self.team_store.get_team(&team_id).await {
                Ok(mut team) => {
                    team.remove_member(&user_id);
                    self.team_store.save_team(team).await.map(|_| ())
                }
                Err(e) => Err(e),
            };
            if let Err(e) = detached {
                tracing::warn!(error = %e, team = %team_id, "rollback stopped: could not detach user from team");
                return;
            }
        }

        for team_id in &created.teams {
            if let Err(e) = self.team_store.delete_team(team_id).await {
                tracing::warn!(error = %e, team = %team_id, "rollback stopped: could not delete team");
                return;
            }
        }

        if let Some(organisation_id) = created.organisation {
            let key = OrganisationKey::Id(organisation_id);
            if let Err(e) = self.organisation_store.delete_organisation(&key).await {
                tracing::warn!(error = %e, organisation = %organisation_id, "rollback stopped: could not delete organisation");
                return;
            }
        }

        if let Some(user_id) = created.user {
            if let Err(e) = self.user_store.delete_user(&UserKey::Id(user_id)).await {
                tracing::warn!(error = %e, user = %user_id, "rollback stopped: could not delete user");
                return;
            }
        }

        tracing::info!("registration rolled back");
    }
}
