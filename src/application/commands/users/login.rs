use super::UserCommandService;
use crate::{
    application::{
        dto::{AuthTokenDto, UserDto},
        error::{ApplicationError, ApplicationResult},
    },
    domain::user::{Email, User},
};

pub struct LoginUserCommand {
    pub email: String,
    pub password: String,
}

pub struct LoginResult {
    pub token: AuthTokenDto,
    pub user: UserDto,
}

impl UserCommandService {
    pub async fn login(&self, command: LoginUserCommand) -> ApplicationResult<LoginResult> {
        let user = self
            .find_and_authenticate_user(&command.email, &command.password)
            .await?;

        let token = self.issue_token_pair(&user).await?;
        tracing::info!(user_id = %user.id, "user logged in");

        Ok(LoginResult {
            token,
            user: user.into(),
        })
    }

    async fn find_and_authenticate_user(
        &self,
        email: &str,
        password: &str,
    ) -> ApplicationResult<User> {
        // A malformed address cannot belong to anyone; report it like an
        // unknown one.
        let email =
            Email::new(email).map_err(|_| ApplicationError::unauthorized("invalid credentials"))?;

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| ApplicationError::unauthorized("invalid credentials"))?;

        self.password_hasher
            .verify(password, user.password_hash.as_str())
            .await?;

        Ok(user)
    }
}
