pub mod interactions;
pub mod posts;
pub mod users;
