//! Run state and pooled entities
//!
//! Everything the game loop owns for the lifetime of one session lives here:
//! the score/combo/speed run state, the obstacle and particle pools, paddle
//! angles and the cosmetic streak field. The configuration is NOT part of
//! this state; it is owned externally and read fresh every tick.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::settings::Config;
use crate::sim::pool::SlotPool;
use crate::sim::stance::Stance;
use crate::lerp;

/// A wall segment scrolling toward the catch plane
#[derive(Debug, Clone, Default)]
pub struct Obstacle {
    /// Track slot around the tunnel cross-section (0-5)
    pub track: usize,
    /// Stance the player must hold when this wall crosses the catch plane
    pub stance: Stance,
    /// Depth along the travel axis
    pub z: f32,
    /// Set on first catch-band crossing; guards against double resolution
    pub resolved: bool,
}

/// A transient burst particle
#[derive(Debug, Clone, Default)]
pub struct Particle {
    pub pos: Vec3,
    pub vel: Vec3,
    /// Remaining lifetime in seconds; render opacity is derived from this
    pub life: f32,
    /// Burst color (0xRRGGBB)
    pub color: u32,
}

/// A cosmetic speed line scrolling with the tunnel
#[derive(Debug, Clone, Default)]
pub struct Streak {
    pub pos: Vec3,
}

/// Left or right paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Banking sign: the paddles bank in opposite directions
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }

    /// Target angle for this side under the given stance
    pub fn target_angle(self, stance: Stance) -> f32 {
        match self {
            Side::Left => stance.def().left_angle,
            Side::Right => stance.def().right_angle,
        }
    }
}

/// One paddle; the angle persists across frames for smooth interpolation
#[derive(Debug, Clone)]
pub struct Paddle {
    /// Current angle in radians
    pub angle: f32,
}

impl Paddle {
    /// Interpolate toward `target` by `factor`, always sweeping the short way
    /// around: a raw delta above half a turn is unwrapped before the lerp.
    pub fn approach(&mut self, target: f32, factor: f32) {
        use std::f32::consts::{PI, TAU};
        if (target - self.angle).abs() > PI {
            self.angle += if target > self.angle { TAU } else { -TAU };
        }
        self.angle = lerp(self.angle, target, factor);
    }

    /// Derived world position on the catch plane
    pub fn position(&self, radius: f32) -> Vec3 {
        Vec3::new(
            radius * self.angle.cos(),
            radius * self.angle.sin(),
            CATCH_Z,
        )
    }

    /// Derived roll: tangent to the tunnel wall plus banking into the turn
    pub fn roll(&self, side: Side, bank_angle: f32) -> f32 {
        let bank = bank_angle * side.sign() * self.angle.cos().signum();
        self.angle + std::f32::consts::FRAC_PI_2 + bank
    }
}

/// State published to the UI boundary, emitted on change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HudState {
    pub score: u64,
    pub combo: u32,
    /// Stance index (0 TOP, 1 MID, 2 LOW)
    pub stance: u8,
    pub over: bool,
}

/// One-shot feedback emitted by a tick, consumed by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Successful catch: play the hit cue, pop the HUD counters
    Hit { score: u64, combo: u32 },
    /// Mismatch at the catch plane: play the miss cue; the run is over
    Miss,
}

/// Complete session state, owned by the game loop driver
pub struct GameState {
    pub score: u64,
    /// Consecutive-hit counter; resets to 0 only via [`GameState::reset`]
    pub combo: u32,
    pub stance: Stance,
    /// Forward speed factor; grows by a fixed increment per successful catch
    pub speed: f32,
    /// Screen shake magnitude, decays over time
    pub shake: f32,
    /// Game-over flag; monotonic within a session, cleared only by reset
    pub over: bool,
    /// Tunnel roll accumulated from the auto-rotation setting (cosmetic)
    pub tunnel_angle: f32,
    /// Left and right paddles, indexed by [`Side`]
    pub paddles: [Paddle; 2],
    pub obstacles: SlotPool<Obstacle>,
    pub particles: SlotPool<Particle>,
    /// Fixed streak field; settings enable the first N
    pub streaks: Vec<Streak>,
    /// Cursor into the spawn pattern, wraps mod the pattern length
    pub pattern_index: usize,
    /// Seconds accumulated toward the next timed spawn
    pub spawn_timer: f32,
    /// Session seed, for reproducing a run
    pub seed: u64,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a session and run the initial reset
    pub fn new(seed: u64, cfg: &Config) -> Self {
        let mut state = Self {
            score: 0,
            combo: 0,
            stance: Stance::Mid,
            speed: cfg.game.speed,
            shake: 0.0,
            over: false,
            tunnel_angle: 0.0,
            paddles: [Paddle { angle: 0.0 }, Paddle { angle: 0.0 }],
            obstacles: SlotPool::new(OBSTACLE_POOL),
            particles: SlotPool::new(PARTICLE_POOL),
            streaks: vec![Streak::default(); STREAK_POOL],
            pattern_index: 0,
            spawn_timer: 0.0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
        };
        state.reset(cfg);
        state
    }

    /// Start a fresh run: zero the counters, return every pooled entity,
    /// snap the paddles to the MID targets and pre-populate the tunnel.
    pub fn reset(&mut self, cfg: &Config) {
        self.score = 0;
        self.combo = 0;
        self.stance = Stance::Mid;
        self.speed = cfg.game.speed;
        self.shake = 0.0;
        self.over = false;
        self.obstacles.clear();
        self.particles.clear();
        self.pattern_index = 0;
        self.spawn_timer = 0.0;
        for side in [Side::Left, Side::Right] {
            self.paddle_mut(side).angle = side.target_angle(Stance::Mid);
        }
        crate::sim::spawn::prefill(self);
        log::debug!(
            "reset: {} obstacles pre-spawned",
            self.obstacles.active_count()
        );
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        &self.paddles[side as usize]
    }

    pub fn paddle_mut(&mut self, side: Side) -> &mut Paddle {
        &mut self.paddles[side as usize]
    }

    /// Snapshot for the UI boundary
    pub fn hud(&self) -> HudState {
        HudState {
            score: self.score,
            combo: self.combo,
            stance: self.stance.index() as u8,
            over: self.over,
        }
    }

    /// Emit a particle burst at `origin`. Each particle gets a random
    /// velocity and lifetime; exhausted slots are skipped silently.
    pub fn spawn_burst(&mut self, origin: Vec3, color: u32, count: usize) {
        for _ in 0..count {
            let vel = Vec3::new(
                self.rng.random_range(-20.0..20.0),
                self.rng.random_range(-20.0..20.0),
                self.rng.random_range(-20.0..20.0),
            );
            let life = self.rng.random_range(0.2..1.0);
            let Some(p) = self.particles.acquire() else {
                break;
            };
            p.pos = origin;
            p.vel = vel;
            p.life = life;
            p.color = color;
        }
    }
}
