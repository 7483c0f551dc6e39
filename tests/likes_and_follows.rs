// tests/likes_and_follows.rs
mod support;

use pastry_market::application::{
    error::ApplicationError,
    queries::pastries::GetPastryByIdQuery,
};
use pastry_market::domain::follow::FollowCounts;
use pastry_market::domain::pastry::PastryId;
use pastry_market::domain::user::UserId;
use support::{PastryBuilder, TestApp};

#[tokio::test]
async fn liking_updates_count_and_flag() {
    let app = TestApp::new();
    let owner = app.sign_in("baker").await;
    let fan = app.sign_in("fan").await;
    let pastry = PastryBuilder::new(owner.auth.id, "Canelé").build();
    app.store.seed_pastry(pastry.clone());

    app.services.likes.create_like(&fan.auth, pastry.id).await.unwrap();
    assert!(app.services.likes.is_liked(pastry.id, fan.auth.id).await.unwrap());

    let view = app
        .services
        .pastry_queries
        .find_by_id(Some(&fan.auth), GetPastryByIdQuery { id: pastry.id })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(view.pastry().like_count, 1);

    let again = app.services.likes.create_like(&fan.auth, pastry.id).await;
    assert!(matches!(again, Err(ApplicationError::Conflict(_))));

    app.services.likes.delete_like(&fan.auth, pastry.id).await.unwrap();
    assert!(!app.services.likes.is_liked(pastry.id, fan.auth.id).await.unwrap());
    assert_eq!(app.store.like_count(), 0);

    let not_liked = app.services.likes.delete_like(&fan.auth, pastry.id).await;
    assert!(matches!(not_liked, Err(ApplicationError::Conflict(_))));

    app.services.likes.create_like(&fan.auth, pastry.id).await.unwrap();
    assert!(app.services.likes.is_liked(pastry.id, fan.auth.id).await.unwrap());
    assert_eq!(app.store.like_count(), 1);
}

#[tokio::test]
async fn owners_cannot_like_their_own_listing() {
    let app = TestApp::new();
    let owner = app.sign_in("baker").await;
    let pastry = PastryBuilder::new(owner.auth.id, "Palmier").build();
    app.store.seed_pastry(pastry.clone());

    let liked = app.services.likes.create_like(&owner.auth, pastry.id).await;
    assert!(matches!(liked, Err(ApplicationError::Forbidden(_))));
    let unliked = app.services.likes.delete_like(&owner.auth, pastry.id).await;
    assert!(matches!(unliked, Err(ApplicationError::Forbidden(_))));
    assert_eq!(app.store.like_count(), 0);
}

#[tokio::test]
async fn owner_stays_forbidden_once_others_have_liked() {
    let app = TestApp::new();
    let owner = app.sign_in("baker").await;
    let fan = app.sign_in("fan").await;
    let pastry = PastryBuilder::new(owner.auth.id, "Kouign-amann").build();
    app.store.seed_pastry(pastry.clone());

    app.services.likes.create_like(&fan.auth, pastry.id).await.unwrap();

    let liked = app.services.likes.create_like(&owner.auth, pastry.id).await;
    assert!(matches!(liked, Err(ApplicationError::Forbidden(_))));
    let unliked = app.services.likes.delete_like(&owner.auth, pastry.id).await;
    assert!(matches!(unliked, Err(ApplicationError::Forbidden(_))));
    assert_eq!(app.store.like_count(), 1);
    assert!(!app.services.likes.is_liked(pastry.id, owner.auth.id).await.unwrap());
}

#[tokio::test]
async fn liking_a_missing_listing_is_not_found() {
    let app = TestApp::new();
    let fan = app.sign_in("fan").await;
    let result = app
        .services
        .likes
        .create_like(&fan.auth, PastryId::generate())
        .await;
    assert!(matches!(result, Err(ApplicationError::NotFound(_))));
}

#[tokio::test]
async fn follow_lifecycle_and_counts() {
    let app = TestApp::new();
    let alice = app.sign_in("alice").await;
    let bob = app.sign_in("bob").await;
    let follows = &app.services.follows;

    follows.follow(&alice.auth, bob.auth.id).await.unwrap();
    assert!(follows.is_following(alice.auth.id, bob.auth.id).await.unwrap());
    assert!(!follows.is_following(bob.auth.id, alice.auth.id).await.unwrap());
    assert_eq!(
        follows.counts(bob.auth.id).await.unwrap(),
        FollowCounts {
            followers: 1,
            following: 0
        }
    );

    let twice = follows.follow(&alice.auth, bob.auth.id).await;
    assert!(matches!(twice, Err(ApplicationError::Conflict(_))));

    let profile = app.services.user_queries.profile(&bob.auth).await.unwrap();
    assert_eq!(profile.followers, 1);
    assert_eq!(profile.following, 0);
    assert_eq!(profile.user.username, "bob");

    follows.unfollow(&alice.auth, bob.auth.id).await.unwrap();
    let again = follows.unfollow(&alice.auth, bob.auth.id).await;
    assert!(matches!(again, Err(ApplicationError::Conflict(_))));
}

#[tokio::test]
async fn removing_a_follower() {
    let app = TestApp::new();
    let alice = app.sign_in("alice").await;
    let bob = app.sign_in("bob").await;
    let follows = &app.services.follows;

    follows.follow(&bob.auth, alice.auth.id).await.unwrap();
    follows.unfollow_from_you(&alice.auth, bob.auth.id).await.unwrap();
    assert!(!follows.is_following(bob.auth.id, alice.auth.id).await.unwrap());

    let no_relation = follows.unfollow_from_you(&alice.auth, bob.auth.id).await;
    assert!(matches!(no_relation, Err(ApplicationError::Conflict(_))));
}

#[tokio::test]
async fn self_and_unknown_targets_are_rejected() {
    let app = TestApp::new();
    let alice = app.sign_in("alice").await;
    let follows = &app.services.follows;

    assert!(matches!(
        follows.follow(&alice.auth, alice.auth.id).await,
        Err(ApplicationError::Forbidden(_))
    ));
    assert!(matches!(
        follows.unfollow(&alice.auth, alice.auth.id).await,
        Err(ApplicationError::Forbidden(_))
    ));
    assert!(matches!(
        follows.unfollow_from_you(&alice.auth, alice.auth.id).await,
        Err(ApplicationError::Forbidden(_))
    ));
    assert!(matches!(
        follows.follow(&alice.auth, UserId::generate()).await,
        Err(ApplicationError::NotFound(_))
    ));
    assert!(matches!(
        follows.unfollow_from_you(&alice.auth, UserId::generate()).await,
        Err(ApplicationError::NotFound(_))
    ));
}
