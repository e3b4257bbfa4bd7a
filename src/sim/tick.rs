//! Per-frame simulation step
//!
//! One externally driven tick per display refresh. All state mutation runs
//! synchronously inside `tick` and completes before the next tick; input and
//! resize handlers never touch the state directly, they enqueue intents into
//! a [`TickInput`] consumed at the start of the following tick.
//!
//! The configuration is re-read on every call, so settings changes apply
//! live, mid-run.

use rand::Rng;

use crate::consts::*;
use crate::settings::Config;
use crate::sim::spawn;
use crate::sim::state::{GameEvent, GameState, Side};

/// Intents queued between ticks (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Cycle the stance one step up
    pub stance_up: bool,
    /// Cycle the stance one step down
    pub stance_down: bool,
    /// Any other key press; starts a fresh run while game-over is active
    pub restart: bool,
}

impl TickInput {
    pub fn any(&self) -> bool {
        self.stance_up || self.stance_down || self.restart
    }
}

/// Advance the session by one frame of at most [`MAX_FRAME_DT`] seconds.
/// Returns the feedback events the driver turns into cues and HUD pops.
pub fn tick(state: &mut GameState, input: &TickInput, cfg: &Config, dt: f32) -> Vec<GameEvent> {
    let dt = dt.min(MAX_FRAME_DT);
    let mut events = Vec::new();

    // Consume queued intents. While game-over is active any key restarts;
    // otherwise the arrows cycle the stance with no debounce.
    if state.over {
        if input.any() {
            state.reset(cfg);
            return events;
        }
    } else {
        if input.stance_up {
            state.stance = state.stance.up();
        }
        if input.stance_down {
            state.stance = state.stance.down();
        }
    }

    // Paddles keep settling toward the stance targets in every state
    for side in [Side::Left, Side::Right] {
        let target = side.target_angle(state.stance);
        state.paddle_mut(side).approach(target, PADDLE_LERP);
    }

    if !state.over {
        state.tunnel_angle += dt * cfg.game.tunnel_rotation_speed;
        advance_streaks(state, cfg, dt);
        advance_obstacles(state, cfg, dt, &mut events);

        // Timed spawning, density-capped. The timer resets on the call, not
        // on configuration changes mid-interval.
        state.spawn_timer += dt;
        if state.spawn_timer > cfg.game.spawn_frequency
            && state.obstacles.active_count() < MAX_ACTIVE_OBSTACLES
        {
            state.spawn_timer = 0.0;
            spawn::spawn(state);
        }

        if state.shake > 0.0 {
            state.shake = (state.shake - dt * SHAKE_DECAY).max(0.0);
        }
    }

    // Particle decay is cosmetic and runs regardless of game state
    for p in state.particles.iter_active_mut() {
        p.pos += p.vel * dt;
        p.life -= dt;
    }
    state.particles.release_where(|p| p.life <= 0.0);

    events
}

/// Move every active obstacle toward the player and resolve catch-band
/// crossings exactly once each. Walls past the despawn depth go back to the
/// pool whether they were survived or not.
fn advance_obstacles(
    state: &mut GameState,
    cfg: &Config,
    dt: f32,
    events: &mut Vec<GameEvent>,
) {
    let scroll = dt * SCROLL_BASE * state.speed;

    let mut crossings = Vec::new();
    for wall in state.obstacles.iter_active_mut() {
        wall.z += scroll;
        if !wall.resolved
            && wall.z > CATCH_Z - CATCH_BAND_HALF
            && wall.z < CATCH_Z + CATCH_BAND_HALF
        {
            wall.resolved = true;
            crossings.push(wall.stance);
        }
    }

    for stance in crossings {
        if stance == state.stance {
            state.combo += 1;
            state.score += u64::from(10 + state.combo);
            state.speed += SPEED_PER_HIT;
            state.shake = SHAKE_PEAK;
            events.push(GameEvent::Hit {
                score: state.score,
                combo: state.combo,
            });
            if cfg.particles.enabled {
                let color = stance.def().color;
                for side in [Side::Left, Side::Right] {
                    let origin = state.paddle(side).position(cfg.paddles.radius);
                    state.spawn_burst(origin, color, cfg.particles.count);
                }
            }
        } else {
            state.over = true;
            events.push(GameEvent::Miss);
            log::info!("run over: score {} combo {}", state.score, state.combo);
        }
    }

    state.obstacles.release_where(|w| w.z > DESPAWN_Z);
}

/// Scroll the cosmetic streak field and rescatter lines that pass the catch
/// plane back near the shell wall at a random depth.
fn advance_streaks(state: &mut GameState, cfg: &Config, dt: f32) {
    let scroll = dt * SCROLL_BASE * state.speed * STREAK_SCROLL_FACTOR;
    let count = cfg.streaks.count.min(state.streaks.len());

    for i in 0..count {
        state.streaks[i].pos.z += scroll;
        if state.streaks[i].pos.z > CATCH_Z {
            let theta = state.rng.random_range(0.0..std::f32::consts::TAU);
            let r = HEX_RADIUS * 0.94 + state.rng.random_range(0.0..2.2);
            let depth = SPAWN_Z - state.rng.random_range(0.0..200.0);
            state.streaks[i].pos =
                glam::Vec3::new(r * theta.cos(), r * theta.sin(), depth);
        }
    }
}
