use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    email::Email,
    error::DomainError,
    ids::{InviteId, OrganisationId, UserId},
    timestamps::Timestamps,
};

/// `Single` invites target one email and are usable once; `Open` invites can
/// be shared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InviteType {
    Single,
    #[default]
    Open,
}

impl InviteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::Open => "Open",
        }
    }
}

impl FromStr for InviteType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Single" => Ok(Self::Single),
            "Open" => Ok(Self::Open),
            other => Err(DomainError::InvalidInviteType(other.to_string())),
        }
    }
}

impl fmt::Display for InviteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invite {
    pub id: InviteId,
    pub organisation: OrganisationId,
    pub inviter: Option<UserId>,
    pub email: Option<Email>,
    pub message: Option<String>,
    pub status: Option<String>,
    /// No longer usable after this instant
    pub expires: Option<DateTime<Utc>>,
    /// Open invites can be switched off with this
    pub active: bool,
    pub times_used: u32,
    /// 0 means unlimited
    pub max_times_used: u32,
    pub invite_type: InviteType,
    pub timestamps: Timestamps,
}

impl Invite {
    pub fn new(organisation: OrganisationId) -> Self {
        Self {
            id: InviteId::new(),
            organisation,
            inviter: None,
            email: None,
            message: None,
            status: None,
            expires: None,
            active: true,
            times_used: 0,
            max_times_used: 0,
            invite_type: InviteType::default(),
            timestamps: Timestamps::default(),
        }
    }

    /// Checks the field combinations a store must refuse to persist.
    pub fn validate(&self) -> Result<(), DomainError> {
        match self.invite_type {
            InviteType::Single => {
                if self.email.is_none() {
                    return Err(DomainError::SingleInviteRequiresEmail);
                }
                if self.max_times_used != 1 {
                    return Err(DomainError::SingleInviteMaxTimesUsed);
                }
                Ok(())
            }
            InviteType::Open => Ok(()),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires.is_some_and(|expires| expires <= now)
    }

    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.active
            && !self.is_expired(now)
            && (self.max_times_used == 0 || self.times_used < self.max_times_used)
    }

    /// Counts one use. Saturates on unlimited invites.
    pub fn record_use(&mut self) {
        self.times_used = self.times_used.saturating_add(1);
    }
}
