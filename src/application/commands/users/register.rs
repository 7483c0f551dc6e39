use super::{UserCommandService, password::validate_password};
use crate::{
    application::{
        dto::UserDto,
        error::{ApplicationError, ApplicationResult},
    },
    domain::user::{Email, NewUser, PasswordHash, PhoneNumber, Username},
};

pub struct RegisterUserCommand {
    pub email: String,
    pub username: String,
    pub password: String,
    pub password_confirmation: String,
    pub phone: Option<String>,
}

impl UserCommandService {
    pub async fn register(&self, command: RegisterUserCommand) -> ApplicationResult<UserDto> {
        let email = Email::new(command.email)?;
        let username = Username::new(command.username)?;
        let phone = command.phone.map(PhoneNumber::new).transpose()?;
        validate_password(&command.password, &command.password_confirmation)?;

        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(ApplicationError::conflict("email already registered"));
        }
        if self.user_repo.find_by_username(&username).await?.is_some() {
            return Err(ApplicationError::conflict("username already taken"));
        }

        let hashed = self.password_hasher.hash(&command.password).await?;
        let user = self
            .user_repo
            .insert(NewUser {
                email,
                username,
                password_hash: PasswordHash::new(hashed)?,
                phone,
                created_at: self.clock.now(),
            })
            .await?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user.into())
    }
}
