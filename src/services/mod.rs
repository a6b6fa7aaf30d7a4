pub mod auth;
pub mod clock;
pub mod init;
pub mod reports;
pub mod store;
