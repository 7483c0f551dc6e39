// src/infrastructure/security/token.rs
use crate::application::{
    dto::{AuthenticatedUser, IssuedToken, RefreshClaims, TokenSubject},
    error::{ApplicationError, ApplicationResult},
    ports::{security::TokenManager, time::Clock},
};
use async_trait::async_trait;
use biscuit_auth::{
    Authorizer, Biscuit, KeyPair, PrivateKey, PublicKey,
    builder::{Algorithm, AuthorizerBuilder, Term, date, fact},
};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, SystemTime},
};
use uuid::Uuid;

use super::claims::{parse_access_claims, parse_refresh_claims};

const ACCESS_CODE: &str = r#"
    user({uid}, {uname});
    issued_at({issued});
    expires_at({exp});
    token_type("access");
    check if time($now), $now >= {issued};
    check if time($now), $now <= {exp};
"#;

// Expiry of refresh tokens is judged against the stored record, so the
// token itself carries no time check.
const REFRESH_CODE: &str = r#"
    user({uid}, {uname});
    jti({jti});
    issued_at({issued});
    expires_at({exp});
    token_type("refresh");
"#;

#[derive(Clone)]
pub struct BiscuitTokenManager {
    root: Arc<KeyPair>,
    public: PublicKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl BiscuitTokenManager {
    pub fn new(
        private_key_hex: &str,
        access_ttl: Duration,
        refresh_ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> ApplicationResult<Self> {
        let private = PrivateKey::from_bytes_hex(private_key_hex, Algorithm::Ed25519)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        let keypair = KeyPair::from(&private);
        let public = keypair.public();

        Ok(Self {
            root: Arc::new(keypair),
            public,
            access_ttl,
            refresh_ttl,
            clock,
        })
    }

    fn window(&self, ttl: Duration) -> ApplicationResult<(DateTime<Utc>, DateTime<Utc>)> {
        let issued_at = self.clock.now();
        let ttl = ChronoDuration::from_std(ttl)
            .map_err(|_| ApplicationError::infrastructure("token ttl out of range"))?;
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| ApplicationError::infrastructure("token expiration overflow"))?;
        Ok((issued_at, expires_at))
    }

    fn issue(
        &self,
        code: &str,
        subject: &TokenSubject,
        ttl: Duration,
        extra: impl IntoIterator<Item = (&'static str, Term)>,
    ) -> ApplicationResult<IssuedToken> {
        let (issued_at, expires_at) = self.window(ttl)?;

        let mut params: HashMap<String, Term> = HashMap::new();
        params.insert("uid".to_string(), subject.user_id.to_string().into());
        params.insert("uname".to_string(), subject.username.clone().into());
        params.insert("issued".to_string(), SystemTime::from(issued_at).into());
        params.insert("exp".to_string(), SystemTime::from(expires_at).into());
        for (name, term) in extra {
            params.insert(name.to_string(), term);
        }

        let token = build_and_serialize_biscuit(code, params, self.root.as_ref())?;
        Ok(IssuedToken {
            token,
            issued_at,
            expires_at,
        })
    }

    /// Parse the token and run the authorizer with the given policy. Time
    /// checks embedded in the token see the same clock that issued it.
    fn authorize(&self, token: &str, policy: &str) -> ApplicationResult<Authorizer> {
        let biscuit = Biscuit::from_base64(token, self.public)
            .map_err(|err| ApplicationError::unauthorized(err.to_string()))?;
        let now = fact("time", &[date(&SystemTime::from(self.clock.now()))]);

        let mut authorizer = AuthorizerBuilder::new()
            .fact(now)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?
            .code(policy)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?
            .build(&biscuit)
            .map_err(|err| ApplicationError::unauthorized(err.to_string()))?;

        authorizer
            .authorize()
            .map_err(|err| ApplicationError::unauthorized(err.to_string()))?;

        Ok(authorizer)
    }
}

fn build_and_serialize_biscuit(
    code: &str,
    params: HashMap<String, Term>,
    root: &KeyPair,
) -> ApplicationResult<String> {
    let token = Biscuit::builder()
        .code_with_params(code, params, HashMap::new())
        .map_err(|err| ApplicationError::infrastructure(err.to_string()))?
        .build(root)
        .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

    token
        .seal()
        .map_err(|err| ApplicationError::infrastructure(err.to_string()))?
        .to_base64()
        .map_err(|err| ApplicationError::infrastructure(err.to_string()))
}

#[async_trait]
impl TokenManager for BiscuitTokenManager {
    async fn issue_access(&self, subject: &TokenSubject) -> ApplicationResult<IssuedToken> {
        self.issue(ACCESS_CODE, subject, self.access_ttl, [])
    }

    async fn issue_refresh(&self, subject: &TokenSubject) -> ApplicationResult<IssuedToken> {
        let jti: Term = Uuid::new_v4().to_string().into();
        self.issue(REFRESH_CODE, subject, self.refresh_ttl, [("jti", jti)])
    }

    async fn authenticate(&self, token: &str) -> ApplicationResult<AuthenticatedUser> {
        let authorizer = self.authorize(token, r#"allow if token_type("access");"#)?;
        let (facts, _, _, _) = authorizer.dump();
        parse_access_claims(facts)
    }

    async fn decode_refresh(&self, token: &str) -> ApplicationResult<RefreshClaims> {
        let authorizer = self.authorize(token, r#"allow if token_type("refresh");"#)?;
        let (facts, _, _, _) = authorizer.dump();
        parse_refresh_claims(facts)
    }
}
