pub mod auth;
pub mod escopo;
pub mod papel;
