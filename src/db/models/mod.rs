// Sub-modules organized by functional domain
pub mod api;
pub mod auth;
pub mod company;
pub mod pledge;
pub mod project;

pub use api::*;
pub use auth::*;
pub use company::*;
pub use pledge::*;
pub use project::*;
