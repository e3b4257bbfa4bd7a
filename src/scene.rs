//! Scene-graph capability boundary
//!
//! The core never talks to a concrete renderer. It drives this minimal
//! mutation surface - create objects, set transforms and material
//! properties, render a frame - and any graphics binding implementing it can
//! present the game. Colors arrive here as the hex strings the settings
//! carry and rotations as degrees; this module is the boundary where both
//! become numeric.
//!
//! [`SceneView`] owns the node layout and re-applies every
//! configuration-driven property each frame, decoupled from game state.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::settings::{Config, RotationDeg};
use crate::sim::{GameState, Side};
use crate::{lerp, track_angle};

pub type NodeId = u32;

/// What a created object is, so bindings can pick geometry per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Group,
    Shell,
    Rail,
    RailGlow,
    Paddle,
    Wall,
    Streak,
    Particle,
}

/// Minimal scene mutation surface
pub trait Scene {
    fn create(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId;
    fn set_transform(&mut self, node: NodeId, position: Vec3, rotation: Vec3);
    fn set_scale(&mut self, node: NodeId, scale: Vec3);
    fn set_color(&mut self, node: NodeId, rgb: u32);
    fn set_opacity(&mut self, node: NodeId, opacity: f32);
    fn set_visible(&mut self, node: NodeId, visible: bool);
    fn set_wireframe(&mut self, node: NodeId, wireframe: bool);
    /// Post-processing bloom, forwarded from the settings untouched
    fn set_bloom(&mut self, enabled: bool, strength: f32, radius: f32, threshold: f32);
    /// Viewport change; recomputes projection only, no gameplay effect
    fn resize(&mut self, width: u32, height: u32);
    fn render_frame(&mut self);
}

/// Parse a `#rrggbb` hex triple; white on malformed input
pub fn parse_hex_color(s: &str) -> u32 {
    let hex = s.strip_prefix('#').unwrap_or(s);
    u32::from_str_radix(hex, 16).unwrap_or(0xffffff)
}

/// Component-wise blend of two packed colors
fn mix_color(a: u32, b: u32, t: f32) -> u32 {
    let chan = |shift: u32| {
        let ca = ((a >> shift) & 0xff) as f32;
        let cb = ((b >> shift) & 0xff) as f32;
        (lerp(ca, cb, t) as u32) & 0xff
    };
    (chan(16) << 16) | (chan(8) << 8) | chan(0)
}

fn euler_rad(r: &RotationDeg) -> Vec3 {
    Vec3::new(r.x.to_radians(), r.y.to_radians(), r.z.to_radians())
}

/// The fixed node layout for one game session, plus the logic that maps the
/// simulation state and live configuration onto it every frame.
pub struct SceneView {
    world: NodeId,
    tunnel: NodeId,
    shell: NodeId,
    rails_group: NodeId,
    rails: [NodeId; TRACK_COUNT],
    rail_glows: [NodeId; TRACK_COUNT],
    walls_group: NodeId,
    walls: Vec<NodeId>,
    streaks: Vec<NodeId>,
    paddles_group: NodeId,
    paddles: [NodeId; 2],
    particles: Vec<NodeId>,
    /// Current world offset, persisted for shake settling
    world_offset: Vec3,
    /// Cosmetic jitter only; gameplay never reads this
    rng: Pcg32,
}

impl SceneView {
    /// Create the whole node hierarchy. Pool-backed entities get one node
    /// per slot so the slot index doubles as the node lookup.
    pub fn build(scene: &mut dyn Scene) -> Self {
        let world = scene.create(NodeKind::Group, None);
        let tunnel = scene.create(NodeKind::Group, Some(world));

        let shell = scene.create(NodeKind::Shell, Some(tunnel));

        let rails_group = scene.create(NodeKind::Group, Some(tunnel));
        let mut rails = [0; TRACK_COUNT];
        let mut rail_glows = [0; TRACK_COUNT];
        for track in 0..TRACK_COUNT {
            let a = track_angle(track);
            let pos = Vec3::new(HEX_RADIUS * a.cos(), HEX_RADIUS * a.sin(), 0.0);
            let rot = Vec3::new(0.0, 0.0, a + std::f32::consts::FRAC_PI_2);
            rails[track] = scene.create(NodeKind::Rail, Some(rails_group));
            rail_glows[track] = scene.create(NodeKind::RailGlow, Some(rails_group));
            scene.set_transform(rails[track], pos, rot);
            scene.set_transform(rail_glows[track], pos, rot);
        }

        let walls_group = scene.create(NodeKind::Group, Some(tunnel));
        let walls = (0..OBSTACLE_POOL)
            .map(|_| scene.create(NodeKind::Wall, Some(walls_group)))
            .collect();

        let streaks = (0..STREAK_POOL)
            .map(|_| scene.create(NodeKind::Streak, Some(tunnel)))
            .collect();

        let paddles_group = scene.create(NodeKind::Group, Some(world));
        let paddles = [
            scene.create(NodeKind::Paddle, Some(paddles_group)),
            scene.create(NodeKind::Paddle, Some(paddles_group)),
        ];

        let particles = (0..PARTICLE_POOL)
            .map(|_| scene.create(NodeKind::Particle, Some(world)))
            .collect();

        Self {
            world,
            tunnel,
            shell,
            rails_group,
            rails,
            rail_glows,
            walls_group,
            walls,
            streaks,
            paddles_group,
            paddles,
            particles,
            world_offset: Vec3::ZERO,
            rng: Pcg32::seed_from_u64(0x5eed),
        }
    }

    /// Push the current state and configuration into the scene. Everything
    /// configuration-driven is reapplied unconditionally so settings edits
    /// show up the same frame.
    pub fn apply(&mut self, scene: &mut dyn Scene, state: &GameState, cfg: &Config) {
        scene.set_bloom(
            cfg.bloom.enabled,
            cfg.bloom.strength,
            cfg.bloom.radius,
            cfg.bloom.threshold,
        );

        // Shake jitters the whole world; frozen on game over mid-decay
        if !state.over {
            if state.shake > 0.0 {
                self.world_offset = Vec3::new(
                    self.rng.random_range(-0.5..0.5) * state.shake,
                    self.rng.random_range(-0.5..0.5) * state.shake,
                    0.0,
                );
            } else {
                self.world_offset = self.world_offset.lerp(Vec3::ZERO, 0.15);
            }
        }
        scene.set_transform(self.world, self.world_offset, euler_rad(&cfg.rotation));
        scene.set_transform(
            self.tunnel,
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, state.tunnel_angle),
        );

        // Shell
        scene.set_visible(self.shell, cfg.shell.enabled);
        scene.set_wireframe(self.shell, cfg.shell.wireframe);
        scene.set_color(self.shell, parse_hex_color(&cfg.shell.color));
        scene.set_opacity(self.shell, cfg.shell.opacity);
        scene.set_transform(self.shell, Vec3::ZERO, euler_rad(&cfg.shell.rotation));

        // Rails
        scene.set_transform(self.rails_group, Vec3::ZERO, euler_rad(&cfg.rails.rotation));
        let base = parse_hex_color(&cfg.rails.base_color);
        let glow = parse_hex_color(&cfg.rails.glow_color);
        for track in 0..TRACK_COUNT {
            scene.set_visible(self.rails[track], cfg.rails.enabled);
            scene.set_color(self.rails[track], base);
            scene.set_visible(self.rail_glows[track], cfg.rails.enabled);
            scene.set_color(self.rail_glows[track], glow);
            scene.set_opacity(self.rail_glows[track], 0.4);
        }

        // Paddles carry a blend of the configured color and the stance color
        scene.set_transform(
            self.paddles_group,
            Vec3::ZERO,
            euler_rad(&cfg.paddles.rotation),
        );
        let tint = mix_color(
            parse_hex_color(&cfg.paddles.color),
            state.stance.def().color,
            0.5,
        );
        let scale = Vec3::new(cfg.paddles.width, cfg.paddles.height, cfg.paddles.depth);
        for (node, side) in self.paddles.into_iter().zip([Side::Left, Side::Right]) {
            let paddle = state.paddle(side);
            scene.set_scale(node, scale);
            scene.set_color(node, tint);
            scene.set_transform(
                node,
                paddle.position(cfg.paddles.radius),
                Vec3::new(0.0, 0.0, paddle.roll(side, cfg.paddles.bank_angle)),
            );
        }

        // Walls mirror the obstacle pool slot-for-slot
        scene.set_transform(self.walls_group, Vec3::ZERO, euler_rad(&cfg.walls.rotation));
        for (i, node) in self.walls.iter().copied().enumerate() {
            match state.obstacles.get(i) {
                Some(wall) => {
                    let a = track_angle(wall.track);
                    scene.set_visible(node, cfg.walls.enabled);
                    scene.set_transform(
                        node,
                        Vec3::new(HEX_RADIUS * a.cos(), HEX_RADIUS * a.sin(), wall.z),
                        Vec3::new(0.0, 0.0, a),
                    );
                    scene.set_color(node, wall.stance.def().color);
                    scene.set_opacity(node, cfg.walls.opacity);
                    scene.set_wireframe(node, cfg.walls.wireframe);
                }
                None => scene.set_visible(node, false),
            }
        }

        // Streaks: the settings enable the first N of the fixed pool
        let streak_color = parse_hex_color(&cfg.streaks.color);
        for (i, node) in self.streaks.iter().copied().enumerate() {
            let live = cfg.streaks.enabled && i < cfg.streaks.count;
            scene.set_visible(node, live);
            if live {
                scene.set_transform(node, state.streaks[i].pos, Vec3::ZERO);
                scene.set_color(node, streak_color);
                scene.set_opacity(node, cfg.streaks.opacity);
            }
        }

        // Particles fade out with their remaining lifetime
        for (i, node) in self.particles.iter().copied().enumerate() {
            match state.particles.get(i) {
                Some(p) => {
                    scene.set_visible(node, true);
                    scene.set_transform(node, p.pos, Vec3::ZERO);
                    scene.set_color(node, p.color);
                    scene.set_opacity(node, p.life.clamp(0.0, 1.0));
                }
                None => scene.set_visible(node, false),
            }
        }
    }
}

/// A [`Scene`] that records every mutation instead of drawing. Backs the
/// tests and the native headless mode.
#[derive(Debug, Default)]
pub struct RecordingScene {
    pub nodes: Vec<NodeRecord>,
    pub bloom: Option<(bool, f32, f32, f32)>,
    pub size: Option<(u32, u32)>,
    pub frames: u32,
}

#[derive(Debug, Clone)]
pub struct NodeRecord {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
    pub color: u32,
    pub opacity: f32,
    pub visible: bool,
    pub wireframe: bool,
}

impl RecordingScene {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&mut self, id: NodeId) -> &mut NodeRecord {
        &mut self.nodes[id as usize]
    }
}

impl Scene for RecordingScene {
    fn create(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(NodeRecord {
            kind,
            parent,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            color: 0xffffff,
            opacity: 1.0,
            visible: true,
            wireframe: false,
        });
        id
    }

    fn set_transform(&mut self, node: NodeId, position: Vec3, rotation: Vec3) {
        let n = self.node(node);
        n.position = position;
        n.rotation = rotation;
    }

    fn set_scale(&mut self, node: NodeId, scale: Vec3) {
        self.node(node).scale = scale;
    }

    fn set_color(&mut self, node: NodeId, rgb: u32) {
        self.node(node).color = rgb;
    }

    fn set_opacity(&mut self, node: NodeId, opacity: f32) {
        self.node(node).opacity = opacity;
    }

    fn set_visible(&mut self, node: NodeId, visible: bool) {
        self.node(node).visible = visible;
    }

    fn set_wireframe(&mut self, node: NodeId, wireframe: bool) {
        self.node(node).wireframe = wireframe;
    }

    fn set_bloom(&mut self, enabled: bool, strength: f32, radius: f32, threshold: f32) {
        self.bloom = Some((enabled, strength, radius, threshold));
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = Some((width, height));
    }

    fn render_frame(&mut self) {
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Stance;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#224c97"), 0x224c97);
        assert_eq!(parse_hex_color("ff00aa"), 0xff00aa);
        assert_eq!(parse_hex_color("not-a-color"), 0xffffff);
    }

    #[test]
    fn test_mix_color_midpoint() {
        assert_eq!(mix_color(0xffffff, 0x00ffff, 0.5), 0x7fffff);
        assert_eq!(mix_color(0x000000, 0xff0000, 0.5), 0x7f0000);
    }

    #[test]
    fn test_wall_nodes_mirror_the_pool() {
        let cfg = Config::default();
        let state = GameState::new(5, &cfg);
        let mut scene = RecordingScene::new();
        let mut view = SceneView::build(&mut scene);
        view.apply(&mut scene, &state, &cfg);

        let visible_walls = scene
            .nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Wall && n.visible)
            .count();
        assert_eq!(visible_walls, state.obstacles.active_count());

        // Every visible wall is tinted with its stance color
        let stance_colors = [
            Stance::Top.def().color,
            Stance::Mid.def().color,
            Stance::Low.def().color,
        ];
        for n in scene.nodes.iter().filter(|n| n.kind == NodeKind::Wall && n.visible) {
            assert!(stance_colors.contains(&n.color));
            assert_eq!(n.opacity, cfg.walls.opacity);
        }
    }

    #[test]
    fn test_rotations_convert_to_radians_at_the_boundary() {
        let cfg = Config::default();
        let state = GameState::new(5, &cfg);
        let mut scene = RecordingScene::new();
        let mut view = SceneView::build(&mut scene);
        view.apply(&mut scene, &state, &cfg);

        // Default world rotation is -30 degrees around z
        let world = &scene.nodes[view.world as usize];
        assert!((world.rotation.z - (-30.0f32).to_radians()).abs() < 1e-6);
        // Default shell rotation is 180 degrees around y
        let shell = &scene.nodes[view.shell as usize];
        assert!((shell.rotation.y - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn test_streak_count_gates_visibility() {
        let mut cfg = Config::default();
        cfg.streaks.count = 10;
        let state = GameState::new(5, &cfg);
        let mut scene = RecordingScene::new();
        let mut view = SceneView::build(&mut scene);
        view.apply(&mut scene, &state, &cfg);

        let visible = scene
            .nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Streak && n.visible)
            .count();
        assert_eq!(visible, 10);

        cfg.streaks.enabled = false;
        view.apply(&mut scene, &state, &cfg);
        let visible = scene
            .nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Streak && n.visible)
            .count();
        assert_eq!(visible, 0);
    }

    #[test]
    fn test_paddle_tint_blends_config_and_stance() {
        let cfg = Config::default();
        let state = GameState::new(5, &cfg);
        let mut scene = RecordingScene::new();
        let mut view = SceneView::build(&mut scene);
        view.apply(&mut scene, &state, &cfg);

        // White paddles blended half-way toward MID cyan
        for n in scene.nodes.iter().filter(|n| n.kind == NodeKind::Paddle) {
            assert_eq!(n.color, 0x7fffff);
            assert_eq!(
                n.scale,
                Vec3::new(cfg.paddles.width, cfg.paddles.height, cfg.paddles.depth)
            );
        }
    }

    #[test]
    fn test_bloom_forwarded() {
        let cfg = Config::default();
        let state = GameState::new(5, &cfg);
        let mut scene = RecordingScene::new();
        let mut view = SceneView::build(&mut scene);
        view.apply(&mut scene, &state, &cfg);
        assert_eq!(scene.bloom, Some((true, 3.0, 0.8, 0.1)));
    }
}
