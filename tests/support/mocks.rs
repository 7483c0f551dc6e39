// tests/support/mocks.rs
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use pastry_market::application::{
    ApplicationResult,
    error::ApplicationError,
    ports::{
        geolocation::{GeolocationDetails, GeolocationLevel, GeolocationProvider},
        media_storage::{MediaStorage, MediaUpload},
        security::PasswordHasher,
        time::Clock,
    },
};
use pastry_market::domain::pastry::GeoPoint;

/// Start of every test timeline. Close to the wall clock because biscuit
/// access tokens are checked against real time.
pub static BASE_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

pub struct TestClock {
    now: Mutex<DateTime<Utc>>,
}

impl TestClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(*BASE_TIME),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Stores `hashed:<password>` so verification is a string comparison.
pub struct DummyPasswordHasher;

#[async_trait]
impl PasswordHasher for DummyPasswordHasher {
    async fn hash(&self, password: &str) -> ApplicationResult<String> {
        Ok(format!("hashed:{password}"))
    }

    async fn verify(&self, password: &str, expected_hash: &str) -> ApplicationResult<()> {
        if expected_hash == format!("hashed:{password}") {
            Ok(())
        } else {
            Err(ApplicationError::unauthorized("invalid credentials"))
        }
    }
}

/// Formats coordinates instead of calling a geocoder; can be switched to fail.
#[derive(Default)]
pub struct StubGeolocation {
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl StubGeolocation {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeolocationProvider for StubGeolocation {
    async fn lookup(
        &self,
        point: GeoPoint,
        level: GeolocationLevel,
    ) -> ApplicationResult<GeolocationDetails> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(ApplicationError::infrastructure("geocoder unavailable"));
        }
        Ok(GeolocationDetails {
            formatted: format!("{:.2}, {:.2} ({})", point.lat(), point.lng(), level.as_str()),
            city: Some("Testville".into()),
            ..GeolocationDetails::default()
        })
    }
}

/// Keeps stored filenames in memory.
#[derive(Default)]
pub struct MemoryMediaStorage {
    files: Mutex<Vec<String>>,
    counter: AtomicUsize,
    fail_after: Mutex<Option<usize>>,
}

impl MemoryMediaStorage {
    pub fn files(&self) -> Vec<String> {
        self.files.lock().unwrap().clone()
    }

    /// Make every `store` call after the first `count` successful ones fail.
    pub fn fail_after(&self, count: usize) {
        *self.fail_after.lock().unwrap() = Some(count);
    }
}

#[async_trait]
impl MediaStorage for MemoryMediaStorage {
    async fn store(&self, upload: MediaUpload) -> ApplicationResult<String> {
        let index = self.counter.fetch_add(1, Ordering::SeqCst);
        if let Some(limit) = *self.fail_after.lock().unwrap() {
            if index >= limit {
                return Err(ApplicationError::infrastructure("disk full"));
            }
        }
        let filename = format!("{index}-{}", upload.original_name);
        self.files.lock().unwrap().push(filename.clone());
        Ok(filename)
    }

    async fn remove(&self, filename: &str) -> ApplicationResult<()> {
        self.files.lock().unwrap().retain(|stored| stored != filename);
        Ok(())
    }

    fn public_url(&self, filename: &str) -> String {
        format!("/uploads/{filename}")
    }
}
