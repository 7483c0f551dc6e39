// tests/auth_flow.rs
mod support;

use pastry_market::application::{
    commands::users::{LoginUserCommand, LogoutCommand, RefreshTokenCommand, RegisterUserCommand},
    error::ApplicationError,
};
use pastry_market::domain::user::UserId;
use support::{ACCESS_TTL, PASSWORD, REFRESH_TTL, TestApp};

fn registration(username: &str, password: &str, confirmation: &str) -> RegisterUserCommand {
    RegisterUserCommand {
        email: format!("{username}@example.com"),
        username: username.to_string(),
        password: password.to_string(),
        password_confirmation: confirmation.to_string(),
        phone: Some("+34 600 000 000".to_string()),
    }
}

#[tokio::test]
async fn register_returns_public_user() {
    let app = TestApp::new();
    let user = app
        .services
        .user_commands
        .register(registration("amelie", PASSWORD, PASSWORD))
        .await
        .unwrap();

    assert_eq!(user.username, "amelie");
    assert_eq!(user.email, "amelie@example.com");
    assert_eq!(app.store.refresh_token_count(), 0);
}

#[tokio::test]
async fn register_validates_input() {
    let app = TestApp::new();
    let commands = &app.services.user_commands;

    let mismatch = commands
        .register(registration("amelie", PASSWORD, "something else"))
        .await;
    assert!(matches!(mismatch, Err(ApplicationError::Validation(_))));

    let short = commands.register(registration("amelie", "abc", "abc")).await;
    assert!(matches!(short, Err(ApplicationError::Validation(_))));

    let mut bad_email = registration("amelie", PASSWORD, PASSWORD);
    bad_email.email = "not-an-email".into();
    let result = commands.register(bad_email).await;
    assert!(matches!(result, Err(ApplicationError::Validation(_))));
}

#[tokio::test]
async fn register_rejects_taken_email_and_username() {
    let app = TestApp::new();
    app.register("amelie").await;
    let commands = &app.services.user_commands;

    let mut same_email = registration("other", PASSWORD, PASSWORD);
    same_email.email = "amelie@example.com".into();
    assert!(matches!(
        commands.register(same_email).await,
        Err(ApplicationError::Conflict(_))
    ));

    let mut same_username = registration("amelie", PASSWORD, PASSWORD);
    same_username.email = "fresh@example.com".into();
    assert!(matches!(
        commands.register(same_username).await,
        Err(ApplicationError::Conflict(_))
    ));
}

#[tokio::test]
async fn login_issues_usable_tokens() {
    let app = TestApp::new();
    let session = app.sign_in("amelie").await;

    assert_eq!(session.login.user.username, "amelie");
    assert_eq!(session.login.token.token_type, "Bearer");
    assert!(session.login.token.expires_in > 0);
    assert_eq!(session.auth.id, UserId::from(session.user.id));
    assert_eq!(app.store.refresh_token_count(), 1);
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let app = TestApp::new();
    app.register("amelie").await;
    let commands = &app.services.user_commands;

    for (email, password) in [
        ("amelie@example.com", "wrong password"),
        ("nobody@example.com", PASSWORD),
        ("not-an-email", PASSWORD),
    ] {
        let result = commands
            .login(LoginUserCommand {
                email: email.into(),
                password: password.into(),
            })
            .await;
        assert!(
            matches!(result, Err(ApplicationError::Unauthorized(_))),
            "{email} / {password}"
        );
    }
}

#[tokio::test]
async fn refresh_rotates_and_old_token_is_spent() {
    let app = TestApp::new();
    let session = app.sign_in("amelie").await;
    let commands = &app.services.user_commands;

    let rotated = commands
        .refresh_token(RefreshTokenCommand {
            token: session.refresh_token().to_string(),
        })
        .await
        .unwrap();
    assert_ne!(rotated.refresh_token, session.refresh_token());
    assert_eq!(app.store.refresh_token_count(), 1);

    let auth = app.services.authenticate(&rotated.access_token).await.unwrap();
    assert_eq!(auth.id, session.auth.id);

    let reused = commands
        .refresh_token(RefreshTokenCommand {
            token: session.refresh_token().to_string(),
        })
        .await;
    assert!(matches!(reused, Err(ApplicationError::Unauthorized(_))));
}

#[tokio::test]
async fn access_token_is_not_a_refresh_token() {
    let app = TestApp::new();
    let session = app.sign_in("amelie").await;

    let result = app
        .services
        .user_commands
        .refresh_token(RefreshTokenCommand {
            token: session.access_token().to_string(),
        })
        .await;
    assert!(matches!(result, Err(ApplicationError::Unauthorized(_))));

    let as_access = app.services.authenticate(session.refresh_token()).await;
    assert!(matches!(as_access, Err(ApplicationError::Unauthorized(_))));
}

#[tokio::test]
async fn expired_refresh_record_is_rejected_and_removed() {
    let app = TestApp::new();
    let session = app.sign_in("amelie").await;
    app.clock
        .advance(chrono::Duration::from_std(REFRESH_TTL).unwrap() + chrono::Duration::minutes(1));

    let result = app
        .services
        .user_commands
        .refresh_token(RefreshTokenCommand {
            token: session.refresh_token().to_string(),
        })
        .await;
    assert!(matches!(result, Err(ApplicationError::Unauthorized(_))));
    assert_eq!(app.store.refresh_token_count(), 0);
}

#[tokio::test]
async fn access_token_expires_on_the_application_clock() {
    let app = TestApp::new();
    let session = app.sign_in("amelie").await;

    let ttl = chrono::Duration::from_std(ACCESS_TTL).unwrap();
    app.clock.advance(ttl - chrono::Duration::minutes(1));
    assert!(app.services.authenticate(session.access_token()).await.is_ok());

    app.clock.advance(chrono::Duration::minutes(2));
    let result = app.services.authenticate(session.access_token()).await;
    assert!(matches!(result, Err(ApplicationError::Unauthorized(_))));

    let rotated = app
        .services
        .user_commands
        .refresh_token(RefreshTokenCommand {
            token: session.refresh_token().to_string(),
        })
        .await
        .unwrap();
    assert!(app.services.authenticate(&rotated.access_token).await.is_ok());
}

#[tokio::test]
async fn logout_revokes_and_is_idempotent() {
    let app = TestApp::new();
    let session = app.sign_in("amelie").await;
    let commands = &app.services.user_commands;

    for _ in 0..2 {
        commands
            .logout(LogoutCommand {
                refresh_token: session.refresh_token().to_string(),
            })
            .await
            .unwrap();
    }
    assert_eq!(app.store.refresh_token_count(), 0);

    let result = commands
        .refresh_token(RefreshTokenCommand {
            token: session.refresh_token().to_string(),
        })
        .await;
    assert!(matches!(result, Err(ApplicationError::Unauthorized(_))));
}

#[tokio::test]
async fn purge_removes_only_expired_records() {
    let app = TestApp::new();
    app.sign_in("amelie").await;
    app.sign_in("bruno").await;
    let late = app.register("chloe").await;
    let commands = &app.services.user_commands;

    assert_eq!(commands.purge_expired_refresh_tokens().await.unwrap(), 0);

    app.clock
        .advance(chrono::Duration::from_std(REFRESH_TTL).unwrap() + chrono::Duration::seconds(1));
    commands
        .login(LoginUserCommand {
            email: late.email,
            password: PASSWORD.into(),
        })
        .await
        .unwrap();

    assert_eq!(commands.purge_expired_refresh_tokens().await.unwrap(), 2);
    assert_eq!(app.store.refresh_token_count(), 1);
}

#[tokio::test]
async fn garbage_bearer_token_is_unauthorized() {
    let app = TestApp::new();
    let result = app.services.authenticate("definitely-not-a-biscuit").await;
    assert!(matches!(result, Err(ApplicationError::Unauthorized(_))));
}
