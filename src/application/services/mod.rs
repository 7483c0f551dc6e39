// src/application/services/mod.rs
use std::sync::Arc;

use crate::{
    application::{
        ApplicationResult,
        commands::{
            follows::FollowCommandService, likes::LikeCommandService,
            pastries::PastryCommandService, users::UserCommandService,
        },
        dto::AuthenticatedUser,
        ports::{
            geolocation::GeolocationProvider,
            media_storage::MediaStorage,
            security::{PasswordHasher, TokenManager},
            time::Clock,
        },
        queries::{
            pastries::{PastryPresenter, PastryQueryService},
            users::UserQueryService,
        },
    },
    domain::{
        follow::FollowRepository,
        like::LikeRepository,
        pastry::{PastryReadRepository, PastryWriteRepository},
        user::{RefreshTokenRepository, UserRepository},
    },
};

/// Storage adapters the services are built on.
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub refresh_tokens: Arc<dyn RefreshTokenRepository>,
    pub pastry_write: Arc<dyn PastryWriteRepository>,
    pub pastry_read: Arc<dyn PastryReadRepository>,
    pub likes: Arc<dyn LikeRepository>,
    pub follows: Arc<dyn FollowRepository>,
}

/// Non-storage collaborators.
pub struct Ports {
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub token_manager: Arc<dyn TokenManager>,
    pub clock: Arc<dyn Clock>,
    pub geolocation: Arc<dyn GeolocationProvider>,
    pub media_storage: Arc<dyn MediaStorage>,
}

pub struct ApplicationServices {
    pub user_commands: Arc<UserCommandService>,
    pub user_queries: Arc<UserQueryService>,
    pub pastry_commands: Arc<PastryCommandService>,
    pub pastry_queries: Arc<PastryQueryService>,
    pub likes: Arc<LikeCommandService>,
    pub follows: Arc<FollowCommandService>,
    token_manager: Arc<dyn TokenManager>,
}

impl ApplicationServices {
    pub fn new(repos: Repositories, ports: Ports) -> Self {
        let user_commands = Arc::new(UserCommandService::new(
            Arc::clone(&repos.users),
            Arc::clone(&repos.refresh_tokens),
            Arc::clone(&ports.password_hasher),
            Arc::clone(&ports.token_manager),
            Arc::clone(&ports.clock),
        ));
        let user_queries = Arc::new(UserQueryService::new(
            Arc::clone(&repos.users),
            Arc::clone(&repos.follows),
        ));

        let presenter = Arc::new(PastryPresenter::new(
            Arc::clone(&ports.geolocation),
            Arc::clone(&ports.media_storage),
        ));
        let pastry_commands = Arc::new(PastryCommandService::new(
            Arc::clone(&repos.pastry_write),
            Arc::clone(&repos.pastry_read),
            Arc::clone(&ports.media_storage),
            Arc::clone(&presenter),
            Arc::clone(&ports.clock),
        ));
        let pastry_queries = Arc::new(PastryQueryService::new(
            Arc::clone(&repos.pastry_read),
            Arc::clone(&repos.likes),
            presenter,
        ));

        let likes = Arc::new(LikeCommandService::new(
            Arc::clone(&repos.likes),
            Arc::clone(&repos.pastry_read),
            Arc::clone(&ports.clock),
        ));
        let follows = Arc::new(FollowCommandService::new(
            Arc::clone(&repos.follows),
            Arc::clone(&repos.users),
            Arc::clone(&ports.clock),
        ));

        Self {
            user_commands,
            user_queries,
            pastry_commands,
            pastry_queries,
            likes,
            follows,
            token_manager: ports.token_manager,
        }
    }

    /// Resolve a raw bearer token into the caller's identity.
    pub async fn authenticate(&self, token: &str) -> ApplicationResult<AuthenticatedUser> {
        self.token_manager.authenticate(token).await
    }
}
