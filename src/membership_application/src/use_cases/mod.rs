pub mod authentication;
pub mod display_names;
pub mod invite_command;
pub mod invite_query;
pub mod organisation_command;
pub mod organisation_query;
pub mod registration;
pub mod team_command;
pub mod team_query;
pub mod user_command;
pub mod user_query;

// Re-export for convenience
pub use authentication::{
    AuthenticationError, AuthenticationResult, AuthenticationUseCase, INVALID_LOGIN_MESSAGE,
    LoginCredentials,
};
pub use display_names::DisplayNameRegistry;
pub use invite_command::{
    InviteCommand, InviteCommandError, InvitePatch, InviteViolations, OneOffInvite, OpenInvite,
};
pub use invite_query::{InviteQuery, InviteQueryError};
pub use organisation_command::{
    NewOrganisation, OrganisationCommand, OrganisationCommandError, OrganisationPatch,
};
pub use organisation_query::{OrganisationQuery, OrganisationQueryError};
pub use registration::{
    REGISTRATION_SUCCESS_MESSAGE, RegistrationDetails, RegistrationError, RegistrationOptions,
    RegistrationResult, RegistrationSaga, RegistrationState, RollbackPolicy, StepOutcome,
};
pub use team_command::{NewTeam, TeamCommand, TeamCommandError, TeamPatch};
pub use team_query::{TeamQuery, TeamQueryError};
pub use user_command::{NewUser, UserCommand, UserCommandError, UserPatch};
pub use user_query::{UserQuery, UserQueryError};
