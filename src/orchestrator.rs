//! Frame orchestrator
//!
//! Owns the session, the mode, and every service, and runs one frame:
//! clear, poll services, step the active mode, route effects, draw
//! overlays. Mode handlers request transitions; the orchestrator applies
//! them after the frame so no handler ever mutates another's state. A
//! frame that errors rolls the session back to its pre-frame snapshot.

use glam::Vec2;
use thiserror::Error;

use crate::audio::{AudioManager, SoundEffect};
use crate::backend::Backend;
use crate::fps::FpsCounter;
use crate::games;
use crate::input::{InputState, KeyEdge};
use crate::lore::MockLoreClient;
use crate::particles::ParticleSystem;
use crate::screens;
use crate::session::{MiniGame, Mode, Session};
use crate::settings::Settings;
use crate::surface::{palette, Align, Surface};

/// Longest simulated step; tab-switch gaps collapse to this.
pub const MAX_DT: f32 = 0.1;

/// A mode handler's request, applied between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Goto(Mode),
    /// A mini-game's continue control was confirmed.
    Complete { game: MiniGame, score: u32 },
}

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("{game:?} state went non-finite")]
    CorruptSlice { game: MiniGame },
}

pub struct Orchestrator {
    pub mode: Mode,
    pub session: Session,
    pub settings: Settings,
    pub screens: screens::ScreenState,
    pub particles: ParticleSystem,
    pub audio: AudioManager,
    pub lore: MockLoreClient,
    backend: Box<dyn Backend>,
    fps: FpsCounter,
    frame: u64,
    mute_edge: KeyEdge,
}

impl Orchestrator {
    pub fn new(seed: u64, backend: Box<dyn Backend>, lore: MockLoreClient) -> Self {
        Self {
            mode: Mode::Menu,
            session: Session::new(seed),
            settings: Settings::load(),
            screens: screens::ScreenState::default(),
            particles: ParticleSystem::new(seed ^ 0xFACE),
            audio: AudioManager::new(),
            lore,
            backend,
            fps: FpsCounter::new(),
            frame: 0,
            mute_edge: KeyEdge::default(),
        }
    }

    /// Run one frame against the current input snapshot. `now_ms` is the
    /// platform clock in milliseconds.
    pub fn advance_frame(
        &mut self,
        surface: &mut dyn Surface,
        input: &mut InputState,
        dt: f32,
        now_ms: f64,
    ) {
        let dt = dt.clamp(0.0, MAX_DT);
        input.view = surface.size();
        self.fps.record(now_ms);
        surface.clear(palette::BG);

        // The save screen owns the keyboard for its text field.
        let mute_edge = self.mute_edge.rising(input.is_down("m"));
        if mute_edge && self.mode != Mode::SaveLoad {
            self.settings.muted = !self.settings.muted;
            self.audio.set_muted(self.settings.muted);
            self.settings.save();
        }
        if input.clicked {
            // Browsers gate audio on a gesture; the first click unlocks it.
            self.audio.resume();
        }

        if let Some(result) = self.lore.poll(now_ms) {
            self.audio.play(SoundEffect::Generate);
            self.screens.map.lore_card = Some(result);
            self.screens.map.lore_error = None;
        }

        self.particles.update(dt);

        let snapshot = self.session.clone();
        let outcome = self.run_mode(surface, input, dt, now_ms);
        let transition = match outcome {
            Ok(t) => t,
            Err(err) => {
                log::error!("Frame aborted, rolling session back: {err}");
                self.session = snapshot;
                Some(Transition::Goto(Mode::Map))
            }
        };
        if let Some(transition) = transition {
            self.apply(transition);
        }

        crate::particles::render(surface, &self.particles.particles);
        if self.settings.show_fps {
            surface.text(
                &format!("{} fps", self.fps.fps()),
                Vec2::new(surface.size().x - 8.0, surface.size().y - 8.0),
                12.0,
                palette::DIM,
                Align::Right,
            );
        }

        input.end_frame();
        self.frame += 1;
    }

    fn run_mode(
        &mut self,
        surface: &mut dyn Surface,
        input: &InputState,
        dt: f32,
        now_ms: f64,
    ) -> Result<Option<Transition>, FrameError> {
        match self.mode {
            Mode::Menu => Ok(screens::menu::frame(
                surface,
                input,
                &mut self.screens.menu,
                &self.settings,
                self.frame,
            )),
            Mode::Instructions => Ok(screens::instructions::frame(surface, input)),
            Mode::Map => Ok(screens::map::frame(
                surface,
                input,
                &mut self.screens.map,
                &self.session,
                &mut self.lore,
                now_ms,
            )),
            Mode::Playing(game) => self.run_game(surface, input, game, dt),
            Mode::Victory => Ok(screens::victory::frame(
                surface,
                input,
                &self.session,
                &mut self.particles,
                &self.settings,
                self.frame,
            )),
            Mode::Leaderboard => Ok(screens::leaderboard::frame(
                surface,
                input,
                &mut self.screens.leaderboard,
                &self.session,
                self.backend.as_mut(),
                now_ms,
            )),
            Mode::SaveLoad => Ok(screens::save_load::frame(
                surface,
                input,
                &mut self.screens.save_load,
                &mut self.session,
                self.backend.as_mut(),
            )),
        }
    }

    fn run_game(
        &mut self,
        surface: &mut dyn Surface,
        input: &InputState,
        game: MiniGame,
        dt: f32,
    ) -> Result<Option<Transition>, FrameError> {
        let effects = games::step_game(game, &mut self.session, input, dt);
        if !games::slice_is_sane(game, &self.session) {
            return Err(FrameError::CorruptSlice { game });
        }

        let scale = self.settings.particle_scale();
        for effect in effects {
            match effect {
                games::Effect::Particles {
                    pos,
                    color,
                    kind,
                    count,
                } => {
                    let count = ((count as f32 * scale).round() as usize).max(1);
                    self.particles.spawn_burst(pos, color, kind, count);
                }
                games::Effect::Sound(sound) => self.audio.play(sound),
            }
        }

        games::render_game(surface, game, &self.session, self.frame);

        if games::game_finished(game, &self.session)
            && input.clicked
            && games::continue_button(surface.size()).contains(input.pointer)
        {
            return Ok(Some(Transition::Complete {
                game,
                score: games::final_score(game, &self.session),
            }));
        }
        Ok(None)
    }

    fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::Goto(mode) => {
                if let Mode::Playing(game) = mode {
                    self.session.reset_slice(game);
                }
                if mode == Mode::Leaderboard {
                    self.screens.leaderboard.invalidate();
                }
                if mode != self.mode {
                    self.audio.play(SoundEffect::Click);
                }
                self.mode = mode;
            }
            Transition::Complete { game, score } => {
                self.session.complete(game, score);
                self.audio.play(SoundEffect::Win);
                self.mode = Mode::Map;
            }
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }
}
