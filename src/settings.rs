//! Tunable configuration
//!
//! The full configuration the external settings surface owns. The game loop
//! holds only a read reference and re-reads it every tick, so edits apply
//! live, mid-run. Colors stay hex strings and rotations stay degrees here;
//! both convert to numeric/radian form only at the rendering boundary.
//!
//! Export is one-way: the structure serializes to indented JSON for display
//! and clipboard copy, and nothing in this system parses it back.

use serde::{Deserialize, Serialize};

/// Rotation in degrees, per axis
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RotationDeg {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationDeg {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameTuning {
    /// Base forward speed factor applied on reset
    pub speed: f32,
    /// Seconds between timed spawn calls
    pub spawn_frequency: f32,
    /// Tunnel auto-rotation in radians/second
    pub tunnel_rotation_speed: f32,
}

/// Post-processing bloom parameters, forwarded to the renderer untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloomConfig {
    pub enabled: bool,
    pub strength: f32,
    pub radius: f32,
    pub threshold: f32,
}

/// Outer hexagonal shell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShellConfig {
    pub enabled: bool,
    pub wireframe: bool,
    pub color: String,
    pub opacity: f32,
    pub rotation: RotationDeg,
}

/// Corner rails with additive glow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RailsConfig {
    pub enabled: bool,
    pub base_color: String,
    pub glow_color: String,
    pub rotation: RotationDeg,
}

/// Obstacle walls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallsConfig {
    pub enabled: bool,
    pub wireframe: bool,
    pub opacity: f32,
    pub rotation: RotationDeg,
}

/// Paddle geometry and banking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaddleConfig {
    pub color: String,
    /// Banking roll in radians, signed per side
    pub bank_angle: f32,
    /// Orbit radius of both paddles
    pub radius: f32,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub rotation: RotationDeg,
}

/// Cosmetic speed lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakConfig {
    pub enabled: bool,
    /// How many of the pooled streaks are live
    pub count: usize,
    pub color: String,
    pub opacity: f32,
}

/// Hit burst particles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleConfig {
    pub enabled: bool,
    /// Particles per burst
    pub count: usize,
}

/// The complete configuration snapshot, read fresh every tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub game: GameTuning,
    pub bloom: BloomConfig,
    pub shell: ShellConfig,
    pub rails: RailsConfig,
    pub walls: WallsConfig,
    pub paddles: PaddleConfig,
    pub streaks: StreakConfig,
    pub particles: ParticleConfig,
    /// Whole-world rotation in degrees
    pub rotation: RotationDeg,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            game: GameTuning {
                speed: 1.8,
                spawn_frequency: 0.42,
                tunnel_rotation_speed: 0.0,
            },
            bloom: BloomConfig {
                enabled: true,
                strength: 3.0,
                radius: 0.8,
                threshold: 0.1,
            },
            shell: ShellConfig {
                enabled: true,
                wireframe: true,
                color: "#224c97".into(),
                opacity: 0.51,
                rotation: RotationDeg::new(0.0, 180.0, 0.0),
            },
            rails: RailsConfig {
                enabled: true,
                base_color: "#6f4c9a".into(),
                glow_color: "#d039cb".into(),
                rotation: RotationDeg::default(),
            },
            walls: WallsConfig {
                enabled: true,
                wireframe: true,
                opacity: 0.89,
                rotation: RotationDeg::default(),
            },
            paddles: PaddleConfig {
                color: "#ffffff".into(),
                bank_angle: 0.4,
                radius: 30.0,
                width: 3.9,
                height: 5.0,
                depth: 15.0,
                rotation: RotationDeg::new(0.0, 0.0, 30.0),
            },
            streaks: StreakConfig {
                enabled: true,
                count: 400,
                color: "#66d8ff".into(),
                opacity: 0.35,
            },
            particles: ParticleConfig {
                enabled: true,
                count: 100,
            },
            rotation: RotationDeg::new(0.0, 0.0, -30.0),
        }
    }
}

impl Config {
    /// Serialize for the read-only settings export view
    pub fn export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Copy exported settings to the system clipboard. Fire-and-forget: the
/// outcome is reported to `on_done` as a display label only and never
/// reaches game logic.
#[cfg(target_arch = "wasm32")]
pub fn copy_to_clipboard(text: &str, on_done: impl FnOnce(&'static str) + 'static) {
    use wasm_bindgen_futures::JsFuture;

    let Some(window) = web_sys::window() else {
        on_done("Failed to copy");
        return;
    };
    let promise = window.navigator().clipboard().write_text(text);
    wasm_bindgen_futures::spawn_local(async move {
        match JsFuture::from(promise).await {
            Ok(_) => on_done("Copied!"),
            Err(_) => {
                log::warn!("clipboard write rejected");
                on_done("Failed to copy");
            }
        }
    });
}
