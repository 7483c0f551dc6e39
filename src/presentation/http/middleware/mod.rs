pub mod rate_limit;

pub use rate_limit::{AuthRateLimitLayer, auth_rate_limit_layer};
