// tests/support/memory.rs
// One in-memory store implementing every repository trait, so like counts and
// foreign keys behave like the database does.
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pastry_market::domain::errors::{DomainError, DomainResult};
use pastry_market::domain::follow::{Follow, FollowCounts, FollowRepository};
use pastry_market::domain::like::{Like, LikeRepository};
use pastry_market::domain::pastry::{
    MediaId, NewPastry, Pastry, PastryId, PastryMedia, PastryQuery, PastryReadRepository,
    PastryUpdate, PastryUpdateOutcome, PastryWriteRepository,
};
use pastry_market::domain::user::{
    Email, NewRefreshToken, NewUser, RefreshTokenRecord, RefreshTokenRepository, User, UserId,
    UserRepository, Username,
};
use uuid::Uuid;

#[derive(Default)]
struct State {
    users: Vec<User>,
    refresh_tokens: HashMap<String, RefreshTokenRecord>,
    pastries: Vec<Pastry>,
    likes: HashSet<Like>,
    follows: HashSet<Follow>,
}

impl State {
    fn hydrate(&self, pastry: &Pastry) -> Pastry {
        let mut pastry = pastry.clone();
        pastry.like_count = self
            .likes
            .iter()
            .filter(|like| like.pastry_id == pastry.id)
            .count() as u64;
        pastry
    }

    fn has_pastry(&self, id: PastryId) -> bool {
        self.pastries.iter().any(|pastry| pastry.id == id)
    }

    fn has_user(&self, id: UserId) -> bool {
        self.users.iter().any(|user| user.id == id)
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refresh_token_count(&self) -> usize {
        self.state.lock().unwrap().refresh_tokens.len()
    }

    pub fn like_count(&self) -> usize {
        self.state.lock().unwrap().likes.len()
    }

    /// Insert a fully formed listing, bypassing the service layer.
    pub fn seed_pastry(&self, pastry: Pastry) {
        self.state.lock().unwrap().pastries.push(pastry);
    }

    pub fn seed_user(&self, user: User) {
        self.state.lock().unwrap().users.push(user);
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, new_user: NewUser) -> DomainResult<User> {
        let mut state = self.state.lock().unwrap();
        if state.users.iter().any(|user| user.email == new_user.email) {
            return Err(DomainError::Conflict("email already registered".into()));
        }
        if state.users.iter().any(|user| user.username == new_user.username) {
            return Err(DomainError::Conflict("username already taken".into()));
        }
        let user = User {
            id: UserId::generate(),
            email: new_user.email,
            username: new_user.username,
            password_hash: new_user.password_hash,
            phone: new_user.phone,
            created_at: new_user.created_at,
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &Email) -> DomainResult<Option<User>> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|user| &user.email == email).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> DomainResult<Option<User>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .users
            .iter()
            .find(|user| &user.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> DomainResult<Option<User>> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|user| user.id == id).cloned())
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryStore {
    async fn insert(&self, token: NewRefreshToken) -> DomainResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.refresh_tokens.contains_key(&token.token_hash) {
            return Err(DomainError::Conflict("duplicate refresh token".into()));
        }
        state.refresh_tokens.insert(
            token.token_hash.clone(),
            RefreshTokenRecord {
                user_id: token.user_id,
                token_hash: token.token_hash,
                expires_at: token.expires_at,
                created_at: token.created_at,
            },
        );
        Ok(())
    }

    async fn find_by_hash(&self, token_hash: &str) -> DomainResult<Option<RefreshTokenRecord>> {
        let state = self.state.lock().unwrap();
        Ok(state.refresh_tokens.get(token_hash).cloned())
    }

    async fn rotate(&self, old_hash: &str, replacement: NewRefreshToken) -> DomainResult<bool> {
        let mut state = self.state.lock().unwrap();
        if state.refresh_tokens.remove(old_hash).is_none() {
            return Ok(false);
        }
        state.refresh_tokens.insert(
            replacement.token_hash.clone(),
            RefreshTokenRecord {
                user_id: replacement.user_id,
                token_hash: replacement.token_hash,
                expires_at: replacement.expires_at,
                created_at: replacement.created_at,
            },
        );
        Ok(true)
    }

    async fn delete_by_hash(&self, token_hash: &str) -> DomainResult<bool> {
        let mut state = self.state.lock().unwrap();
        Ok(state.refresh_tokens.remove(token_hash).is_some())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> DomainResult<u64> {
        let mut state = self.state.lock().unwrap();
        let before = state.refresh_tokens.len();
        state.refresh_tokens.retain(|_, record| !record.is_expired(now));
        Ok((before - state.refresh_tokens.len()) as u64)
    }
}

#[async_trait]
impl PastryWriteRepository for InMemoryStore {
    async fn create(&self, pastry: NewPastry) -> DomainResult<Pastry> {
        let mut state = self.state.lock().unwrap();
        if !state.has_user(pastry.owner_id) {
            return Err(DomainError::NotFound("owner not found".into()));
        }
        let created = Pastry {
            id: PastryId::generate(),
            owner_id: pastry.owner_id,
            name: pastry.name,
            description: pastry.description,
            price: pastry.price,
            unit: pastry.unit,
            categories: pastry.categories,
            contact_phone: pastry.contact_phone,
            geolocation: pastry.geolocation,
            media: pastry
                .media
                .into_iter()
                .map(|filename| PastryMedia {
                    id: MediaId::new(Uuid::new_v4()),
                    filename,
                })
                .collect(),
            created_at: pastry.created_at,
            updated_at: pastry.created_at,
            like_count: 0,
        };
        state.pastries.push(created.clone());
        Ok(created)
    }

    async fn update(&self, update: PastryUpdate) -> DomainResult<PastryUpdateOutcome> {
        let mut state = self.state.lock().unwrap();
        let pastry = state
            .pastries
            .iter_mut()
            .find(|pastry| pastry.id == update.id)
            .ok_or_else(|| DomainError::NotFound("pastry not found".into()))?;

        if let Some(name) = update.name {
            pastry.name = name;
        }
        if let Some(description) = update.description {
            pastry.description = description;
        }
        if let Some(price) = update.price {
            pastry.price = price;
        }
        if let Some(unit) = update.unit {
            pastry.unit = unit;
        }
        if let Some(categories) = update.categories {
            pastry.categories = categories;
        }
        if let Some(phone) = update.contact_phone {
            pastry.contact_phone = phone;
        }
        if let Some(point) = update.geolocation {
            pastry.geolocation = Some(point);
        }

        let mut removed_filenames = Vec::new();
        pastry.media.retain(|media| {
            if update.removed_media.contains(&media.id) {
                removed_filenames.push(media.filename.clone());
                false
            } else {
                true
            }
        });
        pastry
            .media
            .extend(update.added_media.into_iter().map(|filename| PastryMedia {
                id: MediaId::new(Uuid::new_v4()),
                filename,
            }));
        pastry.updated_at = update.updated_at;

        let snapshot = pastry.clone();
        Ok(PastryUpdateOutcome {
            pastry: state.hydrate(&snapshot),
            removed_filenames,
        })
    }
}

#[async_trait]
impl PastryReadRepository for InMemoryStore {
    async fn find_by_id(&self, id: PastryId) -> DomainResult<Option<Pastry>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .pastries
            .iter()
            .find(|pastry| pastry.id == id)
            .map(|pastry| state.hydrate(pastry)))
    }

    async fn search(&self, query: &PastryQuery) -> DomainResult<Vec<Pastry>> {
        let state = self.state.lock().unwrap();
        let rows: Vec<Pastry> = state
            .pastries
            .iter()
            .map(|pastry| state.hydrate(pastry))
            .collect();
        Ok(query.evaluate(rows))
    }

    async fn owner_of(&self, id: PastryId) -> DomainResult<Option<UserId>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .pastries
            .iter()
            .find(|pastry| pastry.id == id)
            .map(|pastry| pastry.owner_id))
    }
}

#[async_trait]
impl LikeRepository for InMemoryStore {
    async fn exists(&self, like: Like) -> DomainResult<bool> {
        Ok(self.state.lock().unwrap().likes.contains(&like))
    }

    async fn insert(&self, like: Like, _created_at: DateTime<Utc>) -> DomainResult<()> {
        let mut state = self.state.lock().unwrap();
        if !state.has_pastry(like.pastry_id) {
            return Err(DomainError::NotFound("pastry not found".into()));
        }
        if !state.likes.insert(like) {
            return Err(DomainError::Conflict("pastry already liked".into()));
        }
        Ok(())
    }

    async fn delete(&self, like: Like) -> DomainResult<bool> {
        Ok(self.state.lock().unwrap().likes.remove(&like))
    }

    async fn liked_among(
        &self,
        user_id: UserId,
        pastry_ids: &[PastryId],
    ) -> DomainResult<HashSet<PastryId>> {
        let state = self.state.lock().unwrap();
        Ok(pastry_ids
            .iter()
            .copied()
            .filter(|id| state.likes.contains(&Like::new(*id, user_id)))
            .collect())
    }
}

#[async_trait]
impl FollowRepository for InMemoryStore {
    async fn exists(&self, follow: Follow) -> DomainResult<bool> {
        Ok(self.state.lock().unwrap().follows.contains(&follow))
    }

    async fn insert(&self, follow: Follow, _created_at: DateTime<Utc>) -> DomainResult<()> {
        let mut state = self.state.lock().unwrap();
        if !state.has_user(follow.follower_id) || !state.has_user(follow.following_id) {
            return Err(DomainError::NotFound("user not found".into()));
        }
        if !state.follows.insert(follow) {
            return Err(DomainError::Conflict("already following".into()));
        }
        Ok(())
    }

    async fn delete(&self, follow: Follow) -> DomainResult<bool> {
        Ok(self.state.lock().unwrap().follows.remove(&follow))
    }

    async fn counts(&self, user_id: UserId) -> DomainResult<FollowCounts> {
        let state = self.state.lock().unwrap();
        Ok(FollowCounts {
            followers: state
                .follows
                .iter()
                .filter(|follow| follow.following_id == user_id)
                .count() as u64,
            following: state
                .follows
                .iter()
                .filter(|follow| follow.follower_id == user_id)
                .count() as u64,
        })
    }
}
