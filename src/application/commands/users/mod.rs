mod login;
mod logout;
mod password;
mod refresh;
mod register;
mod service;

pub use login::{LoginResult, LoginUserCommand};
pub use logout::LogoutCommand;
pub use refresh::{RefreshTokenCommand, hash_refresh_token};
pub use register::RegisterUserCommand;
pub use service::UserCommandService;
