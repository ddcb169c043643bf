pub mod display_name;
pub mod email;
pub mod error;
pub mod ids;
pub mod invite;
pub mod organisation;
pub mod password;
pub mod team;
pub mod timestamps;
pub mod user;
