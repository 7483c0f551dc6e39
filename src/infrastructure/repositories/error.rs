use crate::domain::errors::DomainError;

const CNT_USER_EMAIL: &str = "users_email_key";
const CNT_USER_USERNAME: &str = "users_username_key";
const CNT_REFRESH_TOKEN_HASH: &str = "refresh_tokens_token_hash_key";
const CNT_PASTRY_OWNER: &str = "pastries_owner_id_fkey";
const CNT_PASTRY_PRICE_CHECK: &str = "pastries_price_non_negative_chk";
const CNT_LIKE: &str = "likes_pkey";
const CNT_FOLLOW: &str = "follows_pkey";
const CNT_FOLLOW_SELF_CHECK: &str = "follows_no_self_chk";

pub fn map_sqlx(err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(constraint) = db_err.constraint() {
                return match constraint {
                    CNT_USER_EMAIL => DomainError::Conflict("email already registered".into()),
                    CNT_USER_USERNAME => DomainError::Conflict("username already taken".into()),
                    CNT_REFRESH_TOKEN_HASH => {
                        DomainError::Conflict("refresh token already stored".into())
                    }
                    CNT_PASTRY_OWNER => DomainError::NotFound("owner not found".into()),
                    CNT_PASTRY_PRICE_CHECK => {
                        DomainError::Validation("price cannot be negative".into())
                    }
                    CNT_LIKE => DomainError::Conflict("pastry already liked".into()),
                    CNT_FOLLOW => DomainError::Conflict("already following this user".into()),
                    CNT_FOLLOW_SELF_CHECK => {
                        DomainError::Forbidden("cannot follow yourself".into())
                    }
                    other => map_by_code(db_err.code().as_deref()).unwrap_or_else(|| {
                        DomainError::Persistence(format!("database constraint violation: {other}"))
                    }),
                };
            }

            map_by_code(db_err.code().as_deref())
                .unwrap_or_else(|| DomainError::Persistence(db_err.message().to_string()))
        }
        sqlx::Error::RowNotFound => DomainError::NotFound("record not found".into()),
        _ => DomainError::Persistence(err.to_string()),
    }
}

fn map_by_code(code: Option<&str>) -> Option<DomainError> {
    match code? {
        "23505" => Some(DomainError::Conflict("unique constraint violated".into())),
        "23503" => Some(DomainError::NotFound("referenced record not found".into())),
        "23514" => Some(DomainError::Validation("check constraint violated".into())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlstate_codes_map_to_domain_categories() {
        assert!(matches!(map_by_code(Some("23505")), Some(DomainError::Conflict(_))));
        assert!(matches!(map_by_code(Some("23503")), Some(DomainError::NotFound(_))));
        assert!(matches!(map_by_code(Some("23514")), Some(DomainError::Validation(_))));
        assert!(map_by_code(Some("40001")).is_none());
        assert!(map_by_code(None).is_none());
    }

    #[test]
    fn non_database_errors_are_persistence_failures() {
        assert!(matches!(
            map_sqlx(sqlx::Error::PoolTimedOut),
            DomainError::Persistence(_)
        ));
        assert!(matches!(
            map_sqlx(sqlx::Error::RowNotFound),
            DomainError::NotFound(_)
        ));
    }
}
