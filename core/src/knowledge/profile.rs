use std::num::NonZeroUsize;

use chrono::{DateTime, Utc};
use lru::LruCache;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Expert,
}

/// Per-user preferences used to tune context detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityProfile {
    pub user_id: String,
    pub skill_level: SkillLevel,
    pub preferred_languages: Vec<String>,
    pub detail_level: String,
    pub computed_at: DateTime<Utc>,
}

impl AbilityProfile {
    // Placeholder until a real analysis policy exists.
    fn placeholder(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            skill_level: SkillLevel::Intermediate,
            preferred_languages: Vec::new(),
            detail_level: "balanced".to_string(),
            computed_at: Utc::now(),
        }
    }
}

/// Bounded cache; a profile is treated as immutable once computed.
pub struct ProfileCache {
    entries: LruCache<String, AbilityProfile>,
}

impl ProfileCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    pub fn get_or_compute(&mut self, user_id: &str) -> AbilityProfile {
        if let Some(profile) = self.entries.get(user_id) {
            return profile.clone();
        }
        tracing::debug!(user_id, "computing ability profile");
        let profile = AbilityProfile::placeholder(user_id);
        self.entries.put(user_id.to_string(), profile.clone());
        profile
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ProfileCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileCache")
            .field("len", &self.entries.len())
            .field("cap", &self.entries.cap())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_is_computed_once() {
        let mut cache = ProfileCache::new(4);
        let first = cache.get_or_compute("alice");
        let second = cache.get_or_compute("alice");
        assert_eq!(first.computed_at, second.computed_at);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn cache_is_bounded() {
        let mut cache = ProfileCache::new(2);
        for user in ["a", "b", "c"] {
            cache.get_or_compute(user);
        }
        assert_eq!(cache.len(), 2);
        assert!(ProfileCache::new(0).is_empty());
    }
}
