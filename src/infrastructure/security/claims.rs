// src/infrastructure/security/claims.rs
use crate::application::{
    dto::{AuthenticatedUser, RefreshClaims},
    error::{ApplicationError, ApplicationResult},
};
use crate::domain::user::UserId;
use biscuit_auth::builder::{Fact, Predicate, Term};
use chrono::{DateTime, Utc};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub fn parse_access_claims(facts: Vec<Fact>) -> ApplicationResult<AuthenticatedUser> {
    let ctx = ClaimsContext::from_facts(facts);
    ctx.expect_type("access")?;

    Ok(AuthenticatedUser {
        id: ctx.user_id()?,
        username: ctx
            .username
            .clone()
            .ok_or_else(|| ApplicationError::unauthorized("missing username"))?,
        issued_at: ctx.timestamp(ctx.issued_at, "issued_at")?,
        expires_at: ctx.timestamp(ctx.expires_at, "expires_at")?,
    })
}

pub fn parse_refresh_claims(facts: Vec<Fact>) -> ApplicationResult<RefreshClaims> {
    let ctx = ClaimsContext::from_facts(facts);
    ctx.expect_type("refresh")?;
    if ctx.jti.is_none() {
        return Err(ApplicationError::unauthorized("missing token id"));
    }

    Ok(RefreshClaims {
        user_id: ctx.user_id()?,
        expires_at: ctx.timestamp(ctx.expires_at, "expires_at")?,
    })
}

#[derive(Default)]
struct ClaimsContext {
    user_id: Option<String>,
    username: Option<String>,
    token_type: Option<String>,
    jti: Option<String>,
    issued_at: Option<SystemTime>,
    expires_at: Option<SystemTime>,
}

impl ClaimsContext {
    fn from_facts(facts: Vec<Fact>) -> Self {
        let mut ctx = ClaimsContext::default();
        for fact in facts {
            ctx.apply_predicate(fact.predicate);
        }
        ctx
    }

    fn apply_predicate(&mut self, predicate: Predicate) {
        match (predicate.name.as_str(), predicate.terms.as_slice()) {
            ("user", [Term::Str(id), Term::Str(name)]) => {
                self.user_id = Some(id.clone());
                self.username = Some(name.clone());
            }
            ("token_type", [Term::Str(kind)]) => self.token_type = Some(kind.clone()),
            ("jti", [Term::Str(jti)]) => self.jti = Some(jti.clone()),
            ("issued_at", [Term::Date(seconds)]) => self.issued_at = Some(from_epoch(*seconds)),
            ("expires_at", [Term::Date(seconds)]) => self.expires_at = Some(from_epoch(*seconds)),
            _ => {}
        }
    }

    fn expect_type(&self, expected: &str) -> ApplicationResult<()> {
        match self.token_type.as_deref() {
            Some(kind) if kind == expected => Ok(()),
            _ => Err(ApplicationError::unauthorized(format!(
                "expected an {expected} token"
            ))),
        }
    }

    fn user_id(&self) -> ApplicationResult<UserId> {
        self.user_id
            .as_deref()
            .ok_or_else(|| ApplicationError::unauthorized("missing user id"))?
            .parse::<UserId>()
            .map_err(|_| ApplicationError::unauthorized("malformed user id"))
    }

    fn timestamp(
        &self,
        value: Option<SystemTime>,
        name: &str,
    ) -> ApplicationResult<DateTime<Utc>> {
        value
            .map(DateTime::<Utc>::from)
            .ok_or_else(|| ApplicationError::unauthorized(format!("missing {name}")))
    }
}

fn from_epoch(seconds: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(seconds)
}
