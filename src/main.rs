//! Hex Rush entry point
//!
//! Handles platform wiring: input listeners enqueue intents for the next
//! tick, a frame callback drives the simulation, and HUD state is published
//! to the page on change. Rendering goes through whatever [`Scene`] binding
//! gets attached; without one the game still runs headless.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::KeyboardEvent;

    use hex_rush::Config;
    use hex_rush::audio::{AudioManager, Cue};
    use hex_rush::scene::{Scene, SceneView};
    use hex_rush::settings;
    use hex_rush::sim::{GameEvent, GameState, HudState, TickInput, tick};

    /// Game instance holding all session state
    struct Game {
        state: GameState,
        cfg: Config,
        input: TickInput,
        audio: AudioManager,
        scene: Option<(Box<dyn Scene>, SceneView)>,
        last_hud: HudState,
        last_time: f64,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let cfg = Config::default();
            let state = GameState::new(seed, &cfg);
            let last_hud = state.hud();
            Self {
                state,
                cfg,
                input: TickInput::default(),
                audio: AudioManager::new(),
                scene: None,
                last_hud,
                last_time: 0.0,
            }
        }

        /// Register a renderer binding. The node hierarchy is built once;
        /// every frame after that only mutates it.
        #[allow(dead_code)]
        fn attach_scene(&mut self, mut scene: Box<dyn Scene>) {
            let view = SceneView::build(scene.as_mut());
            self.scene = Some((scene, view));
        }

        /// One animation frame: consume intents, advance the sim, emit
        /// feedback, publish state and draw.
        fn frame(&mut self, now_ms: f64) {
            let dt = if self.last_time > 0.0 {
                ((now_ms - self.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            self.last_time = now_ms;

            let input = std::mem::take(&mut self.input);
            let events = tick(&mut self.state, &input, &self.cfg, dt);

            let mut hit = false;
            for event in &events {
                match event {
                    GameEvent::Hit { .. } => {
                        hit = true;
                        self.audio.play(Cue::Hit);
                    }
                    GameEvent::Miss => self.audio.play(Cue::Miss),
                }
            }
            self.publish_hud(hit);

            if let Some((scene, view)) = &mut self.scene {
                view.apply(scene.as_mut(), &self.state, &self.cfg);
                scene.render_frame();
            }
        }

        /// Push score/combo/stance/over into the DOM, only on change. A hit
        /// pops the counters for one frame.
        fn publish_hud(&mut self, hit: bool) {
            let hud = self.state.hud();
            let changed = hud != self.last_hud;
            self.last_hud = hud;

            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let counters = [("score", hud.score.to_string()), ("combo", hud.combo.to_string())];
            for (id, text) in counters {
                if let Some(el) = document.get_element_by_id(id) {
                    if changed {
                        el.set_text_content(Some(&text));
                    }
                    let _ = if hit {
                        el.class_list().add_1("pop")
                    } else {
                        el.class_list().remove_1("pop")
                    };
                }
            }
            if changed {
                if let Some(el) = document.get_element_by_id("stance") {
                    let name = hex_rush::sim::STANCE_DEFS[hud.stance as usize].name;
                    el.set_text_content(Some(name));
                }
                if let Some(el) = document.get_element_by_id("game-over") {
                    let _ = el.class_list().toggle_with_force("visible", hud.over);
                }
            }
        }
    }

    fn request_animation_frame(f: &Closure<dyn FnMut(f64)>) {
        web_sys::window()
            .expect("no window")
            .request_animation_frame(f.as_ref().unchecked_ref())
            .expect("requestAnimationFrame failed");
    }

    fn setup_input(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        // Key presses only enqueue intents; the next tick consumes them
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                match event.key().as_str() {
                    "ArrowUp" => g.input.stance_up = true,
                    "ArrowDown" => g.input.stance_down = true,
                    _ => g.input.restart = true,
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resize touches the viewport only, never gameplay
        {
            let game = game.clone();
            let window_for_size = window.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let w = window_for_size
                    .inner_width()
                    .ok()
                    .and_then(|v| v.as_f64())
                    .unwrap_or(0.0) as u32;
                let h = window_for_size
                    .inner_height()
                    .ok()
                    .and_then(|v| v.as_f64())
                    .unwrap_or(0.0) as u32;
                if let Some((scene, _)) = &mut game.borrow_mut().scene {
                    scene.resize(w, h);
                }
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// One-way settings export: serialize the live configuration and copy
    /// it to the clipboard. Failure only changes the status label.
    fn setup_export(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(btn) = document.get_element_by_id("export-settings") else {
            return;
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let json = match game.borrow().cfg.export_json() {
                Ok(json) => json,
                Err(err) => {
                    log::error!("settings export failed: {err}");
                    return;
                }
            };
            settings::copy_to_clipboard(&json, |label| {
                if let Some(el) = web_sys::window()
                    .and_then(|w| w.document())
                    .and_then(|d| d.get_element_by_id("export-status"))
                {
                    el.set_text_content(Some(label));
                }
            });
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    pub fn run() {
        console_log::init_with_level(log::Level::Info).ok();
        console_error_panic_hook::set_once();

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Hex Rush started with seed {seed}");

        setup_input(game.clone());
        setup_export(game.clone());

        // Frame loop; torn down with the page, together with everything the
        // game owns
        let handle: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> =
            Rc::new(RefCell::new(None));
        let handle_inner = handle.clone();
        *handle.borrow_mut() = Some(Closure::new(move |now: f64| {
            game.borrow_mut().frame(now);
            request_animation_frame(handle_inner.borrow().as_ref().expect("frame closure"));
        }));
        request_animation_frame(handle.borrow().as_ref().expect("frame closure"));
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use hex_rush::Config;
    use hex_rush::scene::{RecordingScene, Scene, SceneView};
    use hex_rush::sim::{GameEvent, GameState, TickInput, tick};

    env_logger::init();
    log::info!("Hex Rush (native) starting...");

    // Headless demo: a simple autopilot plays against the recording scene
    // at a fixed 60 Hz for up to 30 seconds.
    let cfg = Config::default();
    let mut state = GameState::new(7, &cfg);
    let mut scene = RecordingScene::new();
    let mut view = SceneView::build(&mut scene);

    let dt = 1.0 / 60.0;
    for _ in 0..(60 * 30) {
        // Hold the stance of the closest wall still waiting to be resolved
        let target = state
            .obstacles
            .iter_active()
            .filter(|w| !w.resolved)
            .max_by(|a, b| a.z.partial_cmp(&b.z).unwrap_or(std::cmp::Ordering::Equal))
            .map(|w| w.stance);

        let mut input = TickInput::default();
        if let Some(target) = target {
            if state.stance.down() == target {
                input.stance_down = true;
            } else if state.stance.up() == target {
                input.stance_up = true;
            }
        }

        for event in tick(&mut state, &input, &cfg, dt) {
            match event {
                GameEvent::Hit { score, combo } => log::info!("hit: score {score} combo {combo}"),
                GameEvent::Miss => log::info!("miss"),
            }
        }
        view.apply(&mut scene, &state, &cfg);
        scene.render_frame();

        if state.over {
            break;
        }
    }

    println!(
        "demo finished: score {} combo {} over {} ({} frames rendered)",
        state.score, state.combo, state.over, scene.frames
    );
}
