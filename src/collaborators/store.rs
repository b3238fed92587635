//! In-memory "has seen onboarding" flag.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;

use super::OnboardingStore;
use crate::error::StoreError;

/// Settings key the flag is conventionally stored under.
pub const HAS_SEEN_ONBOARDING: &str = "hasSeenOnboarding";

#[derive(Debug, Default)]
pub struct MemoryStore {
    seen: AtomicBool,
    writes: AtomicU32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store for a returning user.
    pub fn seen() -> Self {
        Self {
            seen: AtomicBool::new(true),
            writes: AtomicU32::new(0),
        }
    }

    /// Number of times the flag was written.
    pub fn writes(&self) -> u32 {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OnboardingStore for MemoryStore {
    async fn has_seen_onboarding(&self) -> Result<bool, StoreError> {
        Ok(self.seen.load(Ordering::SeqCst))
    }

    async fn mark_seen_onboarding(&self) -> Result<(), StoreError> {
        self.seen.store(true, Ordering::SeqCst);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
