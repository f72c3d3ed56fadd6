//! Game settings and preferences
//!
//! Persisted separately from game saves in LocalStorage.

use serde::{Deserialize, Serialize};

/// Player preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Mute all sound effects
    pub muted: bool,
    /// Show FPS counter overlay
    pub show_fps: bool,
    /// Reduced motion (fewer particles, no starfield twinkle)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            muted: false,
            show_fps: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "gym_rush_settings";

    /// Particle spawn multiplier under reduced motion.
    pub fn particle_scale(&self) -> f32 {
        if self.reduced_motion { 0.3 } else { 1.0 }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip() {
        let settings = Settings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert!(!back.muted);
        assert!(!back.show_fps);
    }

    #[test]
    fn test_reduced_motion_scales_particles() {
        let mut settings = Settings::default();
        assert_eq!(settings.particle_scale(), 1.0);
        settings.reduced_motion = true;
        assert!(settings.particle_scale() < 1.0);
    }
}
