pub mod auth;
pub mod pagination;
pub mod pastries;
pub mod serde_time;
pub mod users;

pub use auth::{AuthTokenDto, AuthenticatedUser, IssuedToken, RefreshClaims, TokenSubject};
pub use pagination::CursorPage;
pub use pastries::{
    GeolocationDto, MediaDto, OwnerPastryDto, PastryDto, PastryView, PublicPastryDto,
};
pub use users::{UserDto, UserProfileDto};
