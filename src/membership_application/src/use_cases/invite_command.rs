use chrono::{DateTime, Utc};
use membership_core::{
    Email, ErrorKind, Invite, InviteId, InviteStore, InviteType, OrganisationId, StoreError,
    UserId,
};

pub const PENDING_STATUS: &str = "pending";

/// Request for a single-use invite addressed to one email. The email is
/// raw input; it is checked together with the inviter.
#[derive(Debug, Clone)]
pub struct OneOffInvite {
    pub organisation: OrganisationId,
    pub inviter: Option<UserId>,
    pub email: Option<String>,
    pub message: Option<String>,
    pub expires: Option<DateTime<Utc>>,
}

/// Request for a shareable invite.
#[derive(Debug, Clone)]
pub struct OpenInvite {
    pub organisation: OrganisationId,
    pub inviter: Option<UserId>,
    pub message: Option<String>,
    pub expires: Option<DateTime<Utc>>,
    /// 0 means unlimited
    pub max_times_used: u32,
}

impl OpenInvite {
    pub fn new(organisation: OrganisationId) -> Self {
        Self {
            organisation,
            inviter: None,
            message: None,
            expires: None,
            max_times_used: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InvitePatch {
    pub email: Option<Email>,
    pub message: Option<String>,
    pub status: Option<String>,
    pub expires: Option<DateTime<Utc>>,
    pub active: Option<bool>,
    pub max_times_used: Option<u32>,
    pub invite_type: Option<InviteType>,
}

/// Every problem found with a one-off invite request, in one message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct InviteViolations(String);

impl InviteViolations {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InviteCommandError {
    #[error("Invite not created")]
    NotCreated(#[source] StoreError),
    #[error("Invite not created")]
    Rejected(#[source] InviteViolations),
    #[error("Invite not updated")]
    NotUpdated(#[source] StoreError),
    #[error("Invite not deleted")]
    NotDeleted(#[source] StoreError),
    #[error("Invite to remove not found")]
    NotFound,
    #[error("Invite is no longer usable")]
    Unusable,
}

impl InviteCommandError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotCreated(e) | Self::NotUpdated(e) | Self::NotDeleted(e) => e.kind(),
            Self::Rejected(_) => ErrorKind::Validation,
            Self::NotFound => ErrorKind::NotFound,
            Self::Unusable => ErrorKind::Policy,
        }
    }
}

pub struct InviteCommand<I>
where
    I: InviteStore,
{
    invite_store: I,
}

impl<I> InviteCommand<I>
where
    I: InviteStore,
{
    pub fn new(invite_store: I) -> Self {
        Self { invite_store }
    }

    /// Persists the invite as given. The store refuses invalid field
    /// combinations.
    #[tracing::instrument(name = "InviteCommand::create_invite", skip_all, fields(organisation = %invite.organisation))]
    pub async fn create_invite(&self, invite: Invite) -> Result<Invite, InviteCommandError> {
        self.invite_store
            .add_invite(invite)
            .await
            .map_err(InviteCommandError::NotCreated)
    }

    /// Forces status "pending", one use and type Single before checking the
    /// inviter and the email. All violations are reported together.
    #[tracing::instrument(name = "InviteCommand::create_one_off_invite", skip_all, fields(organisation = %request.organisation))]
    pub async fn create_one_off_invite(
        &self,
        request: OneOffInvite,
    ) -> Result<Invite, InviteCommandError> {
        let mut violations = String::new();
        if request.inviter.is_none() {
            violations.push_str("Inviter is required. ");
        }
        let email = request.email.and_then(|email| Email::parse(email).ok());
        if email.is_none() {
            violations.push_str("Email is required and must be a valid email. ");
        }
        if !violations.is_empty() {
            tracing::info!(%violations, "one-off invite rejected");
            return Err(InviteCommandError::Rejected(InviteViolations(violations)));
        }

        let mut invite = Invite::new(request.organisation);
        invite.inviter = request.inviter;
        invite.email = email;
        invite.message = request.message;
        invite.expires = request.expires;
        invite.status = Some(PENDING_STATUS.to_string());
        invite.max_times_used = 1;
        invite.invite_type = InviteType::Single;
        self.create_invite(invite).await
    }

    #[tracing::instrument(name = "InviteCommand::create_open_invite", skip_all, fields(organisation = %request.organisation))]
    pub async fn create_open_invite(&self, request: OpenInvite) -> Result<Invite, InviteCommandError> {
        let mut invite = Invite::new(request.organisation);
        invite.inviter = request.inviter;
        invite.message = request.message;
        invite.expires = request.expires;
        invite.max_times_used = request.max_times_used;
        invite.invite_type = InviteType::Open;
        self.create_invite(invite).await
    }

    #[tracing::instrument(name = "InviteCommand::update_invite", skip(self, patch))]
    pub async fn update_invite(
        &self,
        id: InviteId,
        patch: InvitePatch,
    ) -> Result<Invite, InviteCommandError> {
        let mut invite = self
            .invite_store
            .get_invite(&id)
            .await
            .map_err(InviteCommandError::NotUpdated)?;

        if patch.email.is_some() {
            invite.email = patch.email;
        }
        if patch.message.is_some() {
            invite.message = patch.message;
        }
        if patch.status.is_some() {
            invite.status = patch.status;
        }
        if patch.expires.is_some() {
            invite.expires = patch.expires;
        }
        if let Some(active) = patch.active {
            invite.active = active;
        }
        if let Some(max_times_used) = patch.max_times_used {
            invite.max_times_used = max_times_used;
        }
        if let Some(invite_type) = patch.invite_type {
            invite.invite_type = invite_type;
        }

        self.invite_store
            .save_invite(invite)
            .await
            .map_err(InviteCommandError::NotUpdated)
    }

    #[tracing::instrument(name = "InviteCommand::delete_invite", skip(self))]
    pub async fn delete_invite(&self, id: InviteId) -> Result<(), InviteCommandError> {
        match self.invite_store.delete_invite(&id).await {
            Ok(()) => Ok(()),
            Err(StoreError::NotFound) => Err(InviteCommandError::NotFound),
            Err(e) => Err(InviteCommandError::NotDeleted(e)),
        }
    }

    /// Counts one use of the invite. An invite that reaches its limit is
    /// deactivated.
    #[tracing::instrument(name = "InviteCommand::use_invite", skip(self))]
    pub async fn use_invite(&self, id: InviteId) -> Result<Invite, InviteCommandError> {
        let mut invite = self
            .invite_store
            .get_invite(&id)
            .await
            .map_err(InviteCommandError::NotUpdated)?;
        if !invite.is_usable(Utc::now()) {
            return Err(InviteCommandError::Unusable);
        }

        invite.record_use();
        if invite.max_times_used != 0 && invite.times_used >= invite.max_times_used {
            invite.active = false;
        }
        self.invite_store
            .save_invite(invite)
            .await
            .map_err(InviteCommandError::NotUpdated)
    }
}
