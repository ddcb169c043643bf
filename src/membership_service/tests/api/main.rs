mod authentication;
mod display_names;
mod entities;
mod events;
mod helpers;
mod registration;
