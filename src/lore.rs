//! Mocked lore/AI client
//!
//! No real inference: a request resolves ~500 ms later with canned text
//! picked by a seeded RNG. A busy flag suppresses overlapping requests
//! rather than queueing them; an in-flight request cannot be cancelled.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Simulated inference latency.
pub const RESOLVE_DELAY_MS: f64 = 500.0;

#[derive(Debug, Error, PartialEq)]
pub enum LoreError {
    #[error("missing API key")]
    MissingApiKey,
    #[error("a generation is already in flight")]
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoreKind {
    /// Backstory for a gym member
    Member,
    /// Flavor text for a facility room
    Facility,
}

/// A resolved generation: seed drives the portrait, text is the lore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoreResult {
    pub kind: LoreKind,
    pub avatar_seed: u64,
    pub text: String,
}

const MEMBER_TEMPLATES: [&str; 6] = [
    "{} joined after losing a bet and now holds the club plank record.",
    "{} only trains at dawn and claims the treadmills whisper encouragement.",
    "{} is here for the smoothies. The workouts are incidental.",
    "{} once deadlifted the front desk. Management asks them not to again.",
    "{} teaches the Tuesday spin class entirely in movie quotes.",
    "{} has never missed a leg day. Nobody has seen them use stairs.",
];

const MEMBER_NAMES: [&str; 8] = [
    "Marta", "Deshawn", "Ingrid", "Kofi", "Priya", "Sasha", "Tomas", "June",
];

const FACILITY_LINES: [&str; 4] = [
    "The pool is heated by the cardio room's collective effort.",
    "The yoga studio's fourth wall is rumored to be load-bearing chi.",
    "Locker 23 has been 'in use' since the club opened.",
    "The smoothie blender is older than the building and twice as loud.",
];

/// Deferred mock client. Call `request` on a user action, then `poll`
/// once per frame with the current clock.
pub struct MockLoreClient {
    api_key: Option<String>,
    rng: Pcg32,
    /// Deadline and kind of the in-flight request, if any.
    pending: Option<(f64, LoreKind)>,
}

impl MockLoreClient {
    pub fn new(api_key: Option<String>, seed: u64) -> Self {
        Self {
            api_key,
            rng: Pcg32::seed_from_u64(seed),
            pending: None,
        }
    }

    pub fn busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Start a generation. Presence-check on the key only; a second call
    /// while one is outstanding is dropped, not queued.
    pub fn request(&mut self, kind: LoreKind, now_ms: f64) -> Result<(), LoreError> {
        if self.api_key.as_deref().unwrap_or("").is_empty() {
            return Err(LoreError::MissingApiKey);
        }
        if self.pending.is_some() {
            return Err(LoreError::Busy);
        }
        self.pending = Some((now_ms + RESOLVE_DELAY_MS, kind));
        log::info!("Lore generation requested ({kind:?})");
        Ok(())
    }

    /// Resolve the pending request once its deadline passes.
    pub fn poll(&mut self, now_ms: f64) -> Option<LoreResult> {
        let (deadline, kind) = self.pending?;
        if now_ms < deadline {
            return None;
        }
        self.pending = None;
        let text = match kind {
            LoreKind::Member => {
                let name = MEMBER_NAMES[self.rng.random_range(0..MEMBER_NAMES.len())];
                let template =
                    MEMBER_TEMPLATES[self.rng.random_range(0..MEMBER_TEMPLATES.len())];
                template.replacen("{}", name, 1)
            }
            LoreKind::Facility => {
                FACILITY_LINES[self.rng.random_range(0..FACILITY_LINES.len())].to_string()
            }
        };
        Some(LoreResult {
            kind,
            avatar_seed: self.rng.random(),
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> MockLoreClient {
        MockLoreClient::new(Some("test-key".to_string()), 42)
    }

    #[test]
    fn test_resolves_after_fixed_delay() {
        let mut lore = client();
        lore.request(LoreKind::Member, 1000.0).unwrap();
        assert!(lore.poll(1000.0).is_none());
        assert!(lore.poll(1000.0 + RESOLVE_DELAY_MS - 1.0).is_none());
        let result = lore.poll(1000.0 + RESOLVE_DELAY_MS).unwrap();
        assert_eq!(result.kind, LoreKind::Member);
        assert!(!result.text.is_empty());
        assert!(!lore.busy());
    }

    #[test]
    fn test_second_request_suppressed_while_busy() {
        let mut lore = client();
        lore.request(LoreKind::Member, 0.0).unwrap();
        assert_eq!(
            lore.request(LoreKind::Facility, 1.0),
            Err(LoreError::Busy)
        );
        // The original request still resolves.
        let result = lore.poll(RESOLVE_DELAY_MS).unwrap();
        assert_eq!(result.kind, LoreKind::Member);
    }

    #[test]
    fn test_missing_key_rejected_up_front() {
        let mut lore = MockLoreClient::new(None, 1);
        assert_eq!(
            lore.request(LoreKind::Member, 0.0),
            Err(LoreError::MissingApiKey)
        );
        let mut lore = MockLoreClient::new(Some(String::new()), 1);
        assert_eq!(
            lore.request(LoreKind::Member, 0.0),
            Err(LoreError::MissingApiKey)
        );
    }

    #[test]
    fn test_member_text_uses_a_roster_name() {
        let mut lore = client();
        lore.request(LoreKind::Member, 0.0).unwrap();
        let result = lore.poll(RESOLVE_DELAY_MS).unwrap();
        assert!(MEMBER_NAMES.iter().any(|n| result.text.contains(n)));
    }
}
