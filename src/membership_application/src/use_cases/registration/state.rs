/// States of one registration run.
///
/// ```text
/// Received -> Validated -> UserDoesNotExist -> UserCreated
///     UserCreated -> OrganisationDoesNotExist -> OrganisationReady   (create path)
///     UserCreated -> AddUserToOrg -> OrganisationReady               (invite path)
/// OrganisationReady -> Success
/// any non-terminal state -> Invalid
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationState {
    Received,
    Validated,
    UserDoesNotExist,
    UserCreated,
    OrganisationDoesNotExist,
    AddUserToOrg,
    OrganisationReady,
    Success,
    Invalid,
}

/// What the step run in a state reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step succeeded; follow the default edge.
    Advanced,
    /// The step succeeded and the application is an invite.
    Invited,
    /// The step failed.
    Rejected,
}

impl RegistrationState {
    pub const ALL: [RegistrationState; 9] = [
        Self::Received,
        Self::Validated,
        Self::UserDoesNotExist,
        Self::UserCreated,
        Self::OrganisationDoesNotExist,
        Self::AddUserToOrg,
        Self::OrganisationReady,
        Self::Success,
        Self::Invalid,
    ];

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Invalid)
    }

    /// The transition table. Terminal states absorb every outcome.
    pub fn next(self, outcome: StepOutcome) -> RegistrationState {
        use RegistrationState::*;

        match (self, outcome) {
            (Success | Invalid, _) => self,
            (_, StepOutcome::Rejected) => Invalid,
            (Received, _) => Validated,
            (Validated, _) => UserDoesNotExist,
            (UserDoesNotExist, _) => UserCreated,
            (UserCreated, StepOutcome::Invited) => AddUserToOrg,
            (UserCreated, StepOutcome::Advanced) => OrganisationDoesNotExist,
            (OrganisationDoesNotExist | AddUserToOrg, _) => OrganisationReady,
            (OrganisationReady, _) => Success,
        }
    }

    /// Every state reachable from `self` in one step.
    pub fn successors(self) -> Vec<RegistrationState> {
        let mut next: Vec<_> = [
            StepOutcome::Advanced,
            StepOutcome::Invited,
            StepOutcome::Rejected,
        ]
        .into_iter()
        .map(|outcome| self.next(outcome))
        .filter(|state| *state != self)
        .collect();
        next.dedup();
        next
    }
}
