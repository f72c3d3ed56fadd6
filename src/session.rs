//! Session state
//!
//! The aggregate the whole app shares: one slice per mini-game, the total
//! score, and the completed set. Slices reset to defaults on entry; the
//! total and the completed set only grow.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::games::basketball::BasketballSlice;
use crate::games::cardio::CardioSlice;
use crate::games::front_desk::FrontDeskSlice;
use crate::games::smoothie::SmoothieSlice;
use crate::games::swimming::SwimmingSlice;
use crate::games::workout::WorkoutSlice;
use crate::games::yoga::YogaSlice;

/// The seven mini-games.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum MiniGame {
    FrontDesk,
    Workout,
    Smoothie,
    Basketball,
    Swimming,
    Yoga,
    Cardio,
}

impl MiniGame {
    pub const ALL: [MiniGame; 7] = [
        MiniGame::FrontDesk,
        MiniGame::Workout,
        MiniGame::Smoothie,
        MiniGame::Basketball,
        MiniGame::Swimming,
        MiniGame::Yoga,
        MiniGame::Cardio,
    ];

    pub fn title(self) -> &'static str {
        match self {
            MiniGame::FrontDesk => "Front Desk",
            MiniGame::Workout => "Weight Room",
            MiniGame::Smoothie => "Smoothie Bar",
            MiniGame::Basketball => "Shootaround",
            MiniGame::Swimming => "Pool Laps",
            MiniGame::Yoga => "Yoga Studio",
            MiniGame::Cardio => "Cardio Class",
        }
    }

    /// Stable key used in save records and the score map.
    pub fn key(self) -> &'static str {
        match self {
            MiniGame::FrontDesk => "front_desk",
            MiniGame::Workout => "workout",
            MiniGame::Smoothie => "smoothie",
            MiniGame::Basketball => "basketball",
            MiniGame::Swimming => "swimming",
            MiniGame::Yoga => "yoga",
            MiniGame::Cardio => "cardio",
        }
    }
}

/// Which screen or game owns the current frame. Exactly one is active;
/// transitions only happen through the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Menu,
    Instructions,
    Map,
    Playing(MiniGame),
    Victory,
    Leaderboard,
    SaveLoad,
}

/// Everything the game remembers across screens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Base seed; per-entry slice seeds derive from it.
    pub seed: u64,
    /// Count of slice resets, mixed into derived seeds so every re-entry
    /// deals different rounds.
    pub resets: u64,
    pub front_desk: FrontDeskSlice,
    pub workout: WorkoutSlice,
    pub smoothie: SmoothieSlice,
    pub basketball: BasketballSlice,
    pub swimming: SwimmingSlice,
    pub yoga: YogaSlice,
    pub cardio: CardioSlice,
    /// Sum of completed mini-game final scores. Never decreases.
    pub total_score: u32,
    /// Finished mini-games. Never shrinks; replays do not duplicate.
    pub completed: BTreeSet<MiniGame>,
    /// Last banked final score per mini-game. Slices reset on entry, so
    /// the score of a finished run lives here, not in the slice.
    pub scores: BTreeMap<MiniGame, u32>,
    /// Anonymous backend session, assigned on first save.
    pub user_id: Option<String>,
    /// Leaderboard identity typed on the save screen.
    pub username: String,
}

impl Session {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            resets: 0,
            front_desk: FrontDeskSlice::with_seed(seed),
            workout: WorkoutSlice::default(),
            smoothie: SmoothieSlice::with_seed(seed ^ 0xA5A5),
            basketball: BasketballSlice::default(),
            swimming: SwimmingSlice::default(),
            yoga: YogaSlice::with_seed(seed ^ 0x5A5A),
            cardio: CardioSlice::with_seed(seed ^ 0x0FF0),
            total_score: 0,
            completed: BTreeSet::new(),
            scores: BTreeMap::new(),
            user_id: None,
            username: String::new(),
        }
    }

    /// Reset one game's slice to fresh defaults. Entering from the map
    /// always starts clean; there is no mid-game pause across map visits.
    pub fn reset_slice(&mut self, game: MiniGame) {
        self.resets += 1;
        let seed = self
            .seed
            .wrapping_add(self.resets.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        match game {
            MiniGame::FrontDesk => self.front_desk = FrontDeskSlice::with_seed(seed),
            MiniGame::Workout => self.workout = WorkoutSlice::default(),
            MiniGame::Smoothie => self.smoothie = SmoothieSlice::with_seed(seed),
            MiniGame::Basketball => self.basketball = BasketballSlice::default(),
            MiniGame::Swimming => self.swimming = SwimmingSlice::default(),
            MiniGame::Yoga => self.yoga = YogaSlice::with_seed(seed),
            MiniGame::Cardio => self.cardio = CardioSlice::with_seed(seed),
        }
    }

    /// Record a completion: the final score adds to the total (replays add
    /// again), the badge set stays deduplicated, and the banked per-game
    /// score takes the latest run.
    pub fn complete(&mut self, game: MiniGame, final_score: u32) {
        self.total_score += final_score;
        self.completed.insert(game);
        self.scores.insert(game, final_score);
    }

    pub fn all_complete(&self) -> bool {
        self.completed.len() == MiniGame::ALL.len()
    }

    /// Last banked per-game score, for the map labels and the save
    /// record's score map. Zero until the game has been completed once.
    pub fn score_of(&self, game: MiniGame) -> u32 {
        self.scores.get(&game).copied().unwrap_or(0)
    }

    /// Achievements derived from the current session, stored alongside
    /// saves for display.
    pub fn achievements(&self) -> Vec<String> {
        let mut list = Vec::new();
        if !self.completed.is_empty() {
            list.push("First Workout".to_string());
        }
        if self.completed.len() >= 3 {
            list.push("Regular".to_string());
        }
        if self.all_complete() {
            list.push("Full Membership".to_string());
        }
        if self.total_score >= 3000 {
            list.push("Overachiever".to_string());
        }
        if self.total_score >= 8000 {
            list.push("Gym Legend".to_string());
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_adds_score_and_badge() {
        let mut session = Session::new(1);
        session.complete(MiniGame::Workout, 900);
        assert_eq!(session.total_score, 900);
        assert!(session.completed.contains(&MiniGame::Workout));
    }

    #[test]
    fn test_replay_adds_score_but_not_badge() {
        let mut session = Session::new(1);
        session.complete(MiniGame::Yoga, 500);
        session.complete(MiniGame::Yoga, 400);
        assert_eq!(session.total_score, 900);
        assert_eq!(session.completed.len(), 1);
        // The banked per-game score tracks the latest run.
        assert_eq!(session.score_of(MiniGame::Yoga), 400);
    }

    #[test]
    fn test_banked_score_survives_slice_reset() {
        let mut session = Session::new(6);
        session.complete(MiniGame::Workout, 1200);
        session.reset_slice(MiniGame::Workout);
        assert_eq!(session.workout.final_score(), 0);
        assert_eq!(session.score_of(MiniGame::Workout), 1200);
    }

    #[test]
    fn test_reset_slice_returns_defaults_with_fresh_seed() {
        let mut session = Session::new(7);
        session.workout.reps = 9;
        session.reset_slice(MiniGame::Workout);
        assert_eq!(session.workout.reps, 0);

        let first_seed = {
            session.reset_slice(MiniGame::FrontDesk);
            session.front_desk.seed
        };
        session.reset_slice(MiniGame::FrontDesk);
        assert_ne!(session.front_desk.seed, first_seed);
    }

    #[test]
    fn test_all_complete_needs_all_seven() {
        let mut session = Session::new(2);
        for game in MiniGame::ALL.iter().take(6) {
            session.complete(*game, 100);
        }
        assert!(!session.all_complete());
        session.complete(MiniGame::Cardio, 100);
        assert!(session.all_complete());
    }

    #[test]
    fn test_achievement_tiers() {
        let mut session = Session::new(3);
        assert!(session.achievements().is_empty());
        session.complete(MiniGame::Workout, 3200);
        let list = session.achievements();
        assert!(list.contains(&"First Workout".to_string()));
        assert!(list.contains(&"Overachiever".to_string()));
        assert!(!list.contains(&"Full Membership".to_string()));
    }

    #[test]
    fn test_session_round_trips_through_json() {
        let mut session = Session::new(4);
        session.complete(MiniGame::Smoothie, 750);
        session.username = "casey".to_string();
        let json = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back.total_score, 750);
        assert_eq!(back.username, "casey");
        assert!(back.completed.contains(&MiniGame::Smoothie));
    }
}
