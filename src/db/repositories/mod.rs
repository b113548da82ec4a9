pub mod companies;
pub mod pledges;
pub mod projects;
pub mod users;

pub use companies::CompaniesRepo;
pub use pledges::PledgesRepo;
pub use projects::ProjectsRepo;
pub use users::UsersRepo;
