//! Gym Rush - a fitness-club arcade of seven mini-games
//!
//! Core modules:
//! - `games`: The seven mini-game cores (pure step functions, no I/O)
//! - `orchestrator`: Frame loop, mode transitions, effect routing
//! - `screens`: Menu, map, victory, leaderboard, and save/load screens
//! - `surface`: Platform-free 2D drawing trait (canvas-backed on wasm)
//! - `backend`: Save/leaderboard persistence behind a trait
//! - `lore`: Mocked member/facility text generation
//! - `particles`: Visual-only particle effects

pub mod audio;
pub mod avatar;
pub mod backend;
pub mod fps;
pub mod games;
pub mod input;
pub mod lore;
pub mod orchestrator;
pub mod particles;
pub mod route;
pub mod screens;
pub mod session;
pub mod settings;
pub mod surface;
pub mod ui;

pub use orchestrator::Orchestrator;
pub use session::{MiniGame, Mode, Session};
pub use settings::Settings;

/// Shared frame-loop constants
pub mod consts {
    /// Design-time logical viewport; real sizes come from the canvas.
    pub const DESIGN_WIDTH: f32 = 960.0;
    pub const DESIGN_HEIGHT: f32 = 600.0;

    /// Fallback dt for the very first animation frame.
    pub const FIRST_FRAME_DT: f32 = 1.0 / 60.0;
}
