pub mod auth;
pub mod pledge;
pub mod project;
pub mod validation;
