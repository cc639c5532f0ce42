pub mod balance;
pub mod dashboard;
pub mod login;
pub mod profile;
pub mod summary;
