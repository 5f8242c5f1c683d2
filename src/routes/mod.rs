pub mod auth;
pub mod clubs;
pub mod members;
pub mod root;
