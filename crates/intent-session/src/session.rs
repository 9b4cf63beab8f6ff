use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Sessions idle longer than this are evicted on the next access.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Clone, Copy)]
struct Entry {
    active: bool,
    touched: Instant,
}

/// Per-user translator-mode store. The single lock serializes
/// read-then-write per request, so two concurrent requests for one user
/// cannot interleave a stale flag. Unknown users default to inactive.
#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    inner: Mutex<HashMap<String, Entry>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_active(&self, user_id: &str) -> bool {
        self.is_active_at(user_id, Instant::now())
    }

    pub fn set_active(&self, user_id: &str, active: bool) {
        self.set_active_at(user_id, active, Instant::now());
    }

    pub fn is_active_at(&self, user_id: &str, now: Instant) -> bool {
        let mut map = match self.inner.lock() {
            Ok(map) => map,
            Err(poisoned) => poisoned.into_inner(),
        };
        Self::evict(&mut map, self.ttl, now);
        match map.get_mut(user_id) {
            Some(entry) => {
                entry.touched = now;
                entry.active
            }
            None => false,
        }
    }

    pub fn set_active_at(&self, user_id: &str, active: bool, now: Instant) {
        let mut map = match self.inner.lock() {
            Ok(map) => map,
            Err(poisoned) => poisoned.into_inner(),
        };
        Self::evict(&mut map, self.ttl, now);
        map.insert(
            user_id.to_owned(),
            Entry {
                active,
                touched: now,
            },
        );
    }

    fn evict(map: &mut HashMap<String, Entry>, ttl: Duration, now: Instant) {
        map.retain(|_, entry| now.duration_since(entry.touched) < ttl);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        match self.inner.lock() {
            Ok(map) => map.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}
