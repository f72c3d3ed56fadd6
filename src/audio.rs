//! Audio system using the Web Audio API
//!
//! Procedurally generated beeps, no sound files. Native builds get a
//! silent stub with the same surface so game code never branches.

/// Per-event sound palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Generic UI click / tap
    Click,
    /// Correct badge match
    Match,
    /// Wrong badge or ingredient
    Mismatch,
    /// Workout rep counted
    Rep,
    /// Points scored (lap, smoothie, basket)
    Score,
    /// Clean basket, no rim
    Swish,
    /// Power stroke in the pool
    Splash,
    /// Swim stroke / ball launch
    Stroke,
    /// Yoga pose held
    Pose,
    /// Entered the cardio target band
    Zone,
    /// Mini-game won
    Win,
    /// Timer ran out
    Lose,
    /// Lore generation resolved
    Generate,
}

#[cfg(target_arch = "wasm32")]
mod imp {
    use super::SoundEffect;
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    pub struct AudioManager {
        ctx: Option<AudioContext>,
        muted: bool,
        volume: f32,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                muted: false,
                volume: 0.8,
            }
        }

        /// Resume audio context (required after user gesture).
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        pub fn muted(&self) -> bool {
            self.muted
        }

        /// Play a sound effect.
        pub fn play(&self, effect: SoundEffect) {
            if self.muted || self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            let vol = self.volume;

            match effect {
                SoundEffect::Click => self.blip(ctx, vol * 0.25, 500.0, 0.06, OscillatorType::Sine),
                SoundEffect::Rep => self.blip(ctx, vol * 0.35, 220.0, 0.1, OscillatorType::Triangle),
                SoundEffect::Stroke => {
                    self.sweep(ctx, vol * 0.3, 200.0, 420.0, 0.12, OscillatorType::Triangle)
                }
                SoundEffect::Zone => self.blip(ctx, vol * 0.3, 700.0, 0.1, OscillatorType::Sine),
                SoundEffect::Mismatch => {
                    self.sweep(ctx, vol * 0.35, 300.0, 110.0, 0.2, OscillatorType::Sawtooth)
                }
                SoundEffect::Match => self.chord(ctx, vol, &[600.0, 800.0], 0.06, 0.15),
                SoundEffect::Score => self.chord(ctx, vol, &[500.0, 700.0, 900.0], 0.07, 0.18),
                SoundEffect::Swish => {
                    self.sweep(ctx, vol * 0.3, 900.0, 300.0, 0.3, OscillatorType::Sine)
                }
                SoundEffect::Splash => {
                    self.sweep(ctx, vol * 0.4, 150.0, 60.0, 0.35, OscillatorType::Sawtooth)
                }
                SoundEffect::Pose => self.chord(ctx, vol, &[400.0, 500.0, 600.0], 0.1, 0.35),
                SoundEffect::Win => self.chord(ctx, vol, &[400.0, 500.0, 600.0, 800.0], 0.1, 0.4),
                SoundEffect::Lose => self.chord(ctx, vol, &[350.0, 300.0, 220.0], 0.18, 0.3),
                SoundEffect::Generate => {
                    self.sweep(ctx, vol * 0.25, 300.0, 900.0, 0.4, OscillatorType::Sine)
                }
            }
        }

        /// Create an oscillator with gain envelope.
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Single tone with an exponential fade-out.
        fn blip(
            &self,
            ctx: &AudioContext,
            vol: f32,
            freq: f32,
            dur: f64,
            osc_type: OscillatorType,
        ) {
            let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) else {
                return;
            };
            let t = ctx.current_time();
            gain.gain().set_value_at_time(vol, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + dur)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + dur + 0.05).ok();
        }

        /// Tone gliding between two frequencies.
        fn sweep(
            &self,
            ctx: &AudioContext,
            vol: f32,
            from: f32,
            to: f32,
            dur: f64,
            osc_type: OscillatorType,
        ) {
            let Some((osc, gain)) = self.create_osc(ctx, from, osc_type) else {
                return;
            };
            let t = ctx.current_time();
            gain.gain().set_value_at_time(vol, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + dur)
                .ok();
            osc.frequency().set_value_at_time(from, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(to, t + dur)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + dur + 0.05).ok();
        }

        /// Staggered tones, one oscillator each.
        fn chord(&self, ctx: &AudioContext, vol: f32, freqs: &[f32], stagger: f64, dur: f64) {
            for (i, freq) in freqs.iter().enumerate() {
                let delay = i as f64 * stagger;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.3, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + dur)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + dur + 0.05).ok();
                }
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use super::SoundEffect;

    /// Silent stub for native builds and tests.
    #[derive(Debug, Default)]
    pub struct AudioManager {
        muted: bool,
    }

    impl AudioManager {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn resume(&self) {}

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        pub fn muted(&self) -> bool {
            self.muted
        }

        pub fn play(&self, _effect: SoundEffect) {}
    }
}

pub use imp::AudioManager;
