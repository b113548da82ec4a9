pub mod auth_service;
pub mod context;
pub mod pledges_service;
pub mod projects_service;
pub mod shell;

pub use auth_service::AuthService;
pub use context::RequestContext;
pub use pledges_service::PledgesService;
pub use projects_service::ProjectsService;
pub use shell::{DashboardPage, DashboardShell};
