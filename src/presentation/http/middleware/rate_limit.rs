// src/presentation/http/middleware/rate_limit.rs
use ::governor::middleware::StateInformationMiddleware;
use axum::body::Body;
use std::{sync::OnceLock, time::Duration};
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};

/// One credential attempt replenished every 100ms per client address.
const AUTH_REPLENISH_PERIOD: Duration = Duration::from_millis(100);
const AUTH_BURST: u32 = 20;

pub type AuthRateLimitLayer =
    GovernorLayer<SmartIpKeyExtractor, StateInformationMiddleware, Body>;

/// Shared limiter for the credential endpoints (register, login, refresh,
/// logout). Responses carry `x-ratelimit-*` headers; throttled requests get
/// 429 with `retry-after`.
pub fn auth_rate_limit_layer() -> AuthRateLimitLayer {
    static LIMITER: OnceLock<AuthRateLimitLayer> = OnceLock::new();

    LIMITER
        .get_or_init(|| {
            let config = GovernorConfigBuilder::default()
                .period(AUTH_REPLENISH_PERIOD)
                .burst_size(AUTH_BURST)
                .key_extractor(SmartIpKeyExtractor)
                .use_headers()
                .finish()
                .expect("auth rate limit period and burst are non-zero");

            GovernorLayer::new(config)
        })
        .clone()
}
