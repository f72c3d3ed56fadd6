//! Non-gameplay screens: menu, instructions, map, victory, leaderboard,
//! save/load. Each renders itself and may issue one transition request;
//! the orchestrator applies it after the frame.

pub mod instructions;
pub mod leaderboard;
pub mod map;
pub mod menu;
pub mod save_load;
pub mod victory;

pub use leaderboard::LeaderboardState;
pub use map::MapState;
pub use menu::MenuState;
pub use save_load::SaveLoadState;

/// Per-screen retained state, owned by the orchestrator so screens stay
/// plain functions.
#[derive(Default)]
pub struct ScreenState {
    pub menu: MenuState,
    pub map: MapState,
    pub leaderboard: LeaderboardState,
    pub save_load: SaveLoadState,
}
