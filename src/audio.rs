//! Sound cue playback using the Web Audio API
//!
//! Two procedurally generated one-shot cues - no audio assets. Playback is
//! fire-and-forget with no completion tracking, and a context that has not
//! been resumed by a user gesture makes every cue a silent no-op.

/// Sound cue kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Successful catch
    Hit,
    /// Mismatch at the catch plane
    Miss,
}

/// Audio manager for the game
pub struct AudioManager {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<web_sys::AudioContext>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = web_sys::AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self { ctx }
    }

    /// Resume the audio context (required after the first user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Play a cue. No-op while the context is suspended.
    pub fn play(&self, cue: Cue) {
        use web_sys::{AudioContextState, OscillatorType};

        let Some(ctx) = &self.ctx else { return };
        if ctx.state() == AudioContextState::Suspended {
            return;
        }

        let Ok(osc) = ctx.create_oscillator() else {
            return;
        };
        let Ok(gain) = ctx.create_gain() else { return };
        if osc.connect_with_audio_node(&gain).is_err() {
            return;
        }
        if gain.connect_with_audio_node(&ctx.destination()).is_err() {
            return;
        }

        let t = ctx.current_time();
        match cue {
            Cue::Hit => {
                // Descending sawtooth chirp
                osc.set_type(OscillatorType::Sawtooth);
                osc.frequency().set_value_at_time(480.0, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(240.0, t + 0.10)
                    .ok();
                gain.gain().set_value_at_time(0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.001, t + 0.10)
                    .ok();
            }
            Cue::Miss => {
                // Flat low square buzz
                osc.set_type(OscillatorType::Square);
                osc.frequency().set_value_at_time(120.0, t).ok();
                gain.gain().set_value_at_time(0.22, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.001, t + 0.22)
                    .ok();
            }
        }

        osc.start().ok();
        osc.stop_with_when(t + 0.24).ok();
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl AudioManager {
    pub fn new() -> Self {
        Self {}
    }

    pub fn resume(&self) {}

    pub fn play(&self, cue: Cue) {
        log::debug!("audio cue: {:?}", cue);
    }
}
