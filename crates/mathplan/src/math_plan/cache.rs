//! TTL-based caching for computed math plans.

use super::processor::MathPlan;
use dashmap::DashMap;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::time::{Duration, Instant};

/// A student key derived from the student id, so raw ids never sit in the cache or the logs.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct StudentKey(String);

impl StudentKey {
    /// Hashes a student id. The first 16 bytes of the SHA-256 digest are kept as hex.
    pub fn from_student_id(student_id: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(student_id.trim().as_bytes());
        let result = hasher.finalize();
        Self(hex::encode(&result[..16]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only show first 8 chars for privacy
        write!(f, "{}...", &self.0[..8.min(self.0.len())])
    }
}

/// Cache key: one student considering one set of majors.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct PlanKey {
    pub student: StudentKey,
    /// Major ids, sorted and deduplicated
    pub majors: Vec<u32>,
}

impl PlanKey {
    pub fn new<I>(student: StudentKey, majors: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        let mut majors: Vec<u32> = majors.into_iter().collect();
        majors.sort_unstable();
        majors.dedup();
        Self { student, majors }
    }
}

impl fmt::Display for PlanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:?}", self.student, self.majors)
    }
}

#[derive(Clone)]
struct CachedPlan {
    plan: MathPlan,
    cached_at: Instant,
    ttl: Duration,
}

impl CachedPlan {
    fn is_expired(&self) -> bool {
        self.cached_at.elapsed() >= self.ttl
    }
}

/// Thread-safe cache for computed plans.
///
/// Uses DashMap for concurrent access without external locking.
pub struct PlanCache {
    entries: DashMap<PlanKey, CachedPlan>,
    default_ttl: Duration,
}

impl PlanCache {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            default_ttl,
        }
    }

    pub fn with_default_ttl() -> Self {
        Self::new(Self::DEFAULT_TTL)
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Gets a cached plan if it exists and hasn't expired.
    pub fn get(&self, key: &PlanKey) -> Option<MathPlan> {
        let entry = self.entries.get(key)?;
        if !entry.is_expired() {
            return Some(entry.plan.clone());
        }

        drop(entry);
        self.entries.remove(key);
        None
    }

    /// Inserts a plan with the default TTL.
    pub fn insert(&self, key: PlanKey, plan: MathPlan) {
        self.insert_with_ttl(key, plan, self.default_ttl);
    }

    pub fn insert_with_ttl(&self, key: PlanKey, plan: MathPlan, ttl: Duration) {
        self.entries.insert(
            key,
            CachedPlan {
                plan,
                cached_at: Instant::now(),
                ttl,
            },
        );
    }

    pub fn invalidate(&self, key: &PlanKey) {
        self.entries.remove(key);
    }

    /// Drops every plan cached for a student, whatever the majors.
    ///
    /// # Returns
    /// * `usize` - The number of entries removed
    pub fn invalidate_student(&self, student: &StudentKey) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| &key.student != student);
        before.saturating_sub(self.entries.len())
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of entries, including expired ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes expired entries.
    pub fn cleanup_expired(&self) {
        self.entries.retain(|_, entry| !entry.is_expired());
    }

    pub fn stats(&self) -> CacheStats {
        let mut total = 0;
        let mut expired = 0;

        for entry in self.entries.iter() {
            total += 1;
            if entry.is_expired() {
                expired += 1;
            }
        }

        CacheStats {
            total_entries: total,
            expired_entries: expired,
            active_entries: total - expired,
            default_ttl_secs: self.default_ttl.as_secs(),
        }
    }
}

impl Default for PlanCache {
    fn default() -> Self {
        Self::with_default_ttl()
    }
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub active_entries: usize,
    pub default_ttl_secs: u64,
}

mod hex {
    pub fn encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> MathPlan {
        MathPlan::default()
    }

    fn key(student: &str, majors: &[u32]) -> PlanKey {
        PlanKey::new(StudentKey::from_student_id(student), majors.iter().copied())
    }

    #[test]
    fn test_student_key_hashing() {
        let key1 = StudentKey::from_student_id("830123456");
        let key2 = StudentKey::from_student_id(" 830123456 ");
        let key3 = StudentKey::from_student_id("830654321");

        assert_eq!(key1, key2);
        assert_ne!(key1, key3);
        assert_eq!(key1.as_str().len(), 32);
        assert!(!key1.as_str().contains("830123456"));
    }

    #[test]
    fn test_student_key_display_is_truncated() {
        let key = StudentKey::from_student_id("830123456");
        let shown = key.to_string();
        assert_eq!(shown.len(), 11);
        assert!(shown.ends_with("..."));
        assert!(key.as_str().starts_with(&shown[..8]));
    }

    #[test]
    fn test_plan_key_ignores_major_order() {
        assert_eq!(key("s", &[12, 3, 3]), key("s", &[3, 12]));
        assert_ne!(key("s", &[3]), key("s", &[3, 12]));
    }

    #[test]
    fn test_insert_and_get() {
        let cache = PlanCache::default();
        assert!(cache.is_empty());

        cache.insert(key("a", &[1]), plan());
        assert!(cache.get(&key("a", &[1])).is_some());
        assert!(cache.get(&key("a", &[2])).is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_expired_entries() {
        let cache = PlanCache::default();
        cache.insert_with_ttl(key("a", &[1]), plan(), Duration::ZERO);
        cache.insert(key("b", &[1]), plan());

        let stats = cache.stats();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.expired_entries, 1);
        assert_eq!(stats.active_entries, 1);
        assert_eq!(stats.default_ttl_secs, 60);

        assert!(cache.get(&key("a", &[1])).is_none());
        assert_eq!(cache.len(), 1);

        cache.insert_with_ttl(key("c", &[1]), plan(), Duration::ZERO);
        cache.cleanup_expired();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidation() {
        let cache = PlanCache::default();
        cache.insert(key("a", &[1]), plan());
        cache.insert(key("a", &[2]), plan());
        cache.insert(key("b", &[1]), plan());

        cache.invalidate(&key("b", &[1]));
        assert_eq!(cache.len(), 2);

        assert_eq!(cache.invalidate_student(&StudentKey::from_student_id("a")), 2);
        assert!(cache.is_empty());

        cache.insert(key("a", &[1]), plan());
        cache.clear();
        assert!(cache.is_empty());
    }
}
