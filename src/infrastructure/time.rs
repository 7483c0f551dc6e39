use crate::application::ports::time::Clock;
use chrono::{DateTime, Utc};

/// Wall-clock time for production wiring.
#[derive(Default, Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
