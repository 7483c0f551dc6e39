pub mod follows;
pub mod likes;
pub mod pastries;
pub mod users;
