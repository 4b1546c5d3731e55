pub mod notify;
pub mod route;
