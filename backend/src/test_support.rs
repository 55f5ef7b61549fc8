//! Shared test doubles for services and HTTP integration tests.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::UserRegistration;
use crate::domain::{
    EmailAddress, NewPassword, PersonName, User, UserProfile, UserService, Username,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryStore;
use crate::outbound::security::{Argon2PasswordHasher, HashCost};

/// Clock that only moves when told to, or by a fixed step on every read.
///
/// A non-zero step gives each created row a distinct timestamp so ordering
/// assertions are deterministic.
pub struct MutableClock {
    now: Mutex<DateTime<Utc>>,
    step: TimeDelta,
}

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
            step: TimeDelta::zero(),
        }
    }

    /// Clock that advances by `seconds` after every reading.
    pub fn stepping(now: DateTime<Utc>, seconds: i64) -> Self {
        Self {
            now: Mutex::new(now),
            step: TimeDelta::seconds(seconds),
        }
    }

    /// Clock starting at a fixed instant in 2024, stepping one second per read.
    pub fn fixed_start() -> Self {
        let start = match Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).single() {
            Some(start) => start,
            None => panic!("fixed start instant must be valid"),
        };
        Self::stepping(start, 1)
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.now.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let mut now = self.lock_clock();
        let current = *now;
        *now += self.step;
        current
    }
}

/// Argon2 with the smallest accepted cost, so tests hash in microseconds.
pub fn cheap_hasher() -> Argon2PasswordHasher {
    let cost = HashCost {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    };
    match Argon2PasswordHasher::new(cost) {
        Ok(hasher) => hasher,
        Err(err) => panic!("cheap argon2 parameters rejected: {err}"),
    }
}

/// HTTP state over a fresh [`InMemoryStore`], returning the store for seeding.
pub fn in_memory_state() -> (HttpState, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let state = HttpState::from_repositories(
        store.clone(),
        store.clone(),
        store.clone(),
        Arc::new(cheap_hasher()),
        Arc::new(MutableClock::fixed_start()),
    );
    (state, store)
}

/// Insert an administrator directly, as the `create-admin` tool does.
pub async fn seed_admin(store: &Arc<InMemoryStore>, username: &str, password: &str) -> User {
    let service = UserService::new(
        store.clone(),
        Arc::new(cheap_hasher()),
        Arc::new(MutableClock::fixed_start()),
    );
    let registration = match (
        Username::new(username),
        EmailAddress::new(format!("{username}@example.com")),
        NewPassword::confirm(password, password),
    ) {
        (Ok(username), Ok(email), Ok(password)) => UserRegistration {
            profile: UserProfile {
                username,
                email,
                name: PersonName::default(),
            },
            password,
        },
        _ => panic!("invalid admin fixture for {username}"),
    };
    match service.provision_admin(registration).await {
        Ok(user) => user,
        Err(err) => panic!("seeding admin failed: {err:?}"),
    }
}
