pub mod pastries;
pub mod users;
