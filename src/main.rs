//! Dodge Stick entry point
//!
//! Handles platform-specific initialization and runs the game loop.

use std::cell::RefCell;
use std::rc::Rc;

use dodge_stick::consts::*;
use dodge_stick::sim::GamePhase;
use dodge_stick::{Joystick, JoystickSettings};
use glam::Vec2;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Joystick output waiting for the next simulation tick
#[derive(Debug, Default)]
struct StickSignal {
    velocity: Option<Vec2>,
    released: bool,
}

impl StickSignal {
    /// Move the pending signal into the tick input
    fn drain_into(&mut self, input: &mut dodge_stick::sim::TickInput) {
        if let Some(velocity) = self.velocity.take() {
            input.stick_velocity = Some(velocity);
        }
        if std::mem::take(&mut self.released) {
            input.stick_released = true;
        }
    }
}

/// The game's joystick, reporting into `signal`
fn build_joystick(
    signal: Rc<RefCell<StickSignal>>,
) -> Result<Joystick, dodge_stick::control::JoystickError> {
    let on_change = signal.clone();
    let on_end = signal;
    let settings = JoystickSettings::new(JOYSTICK_SIZE, JOYSTICK_SIZE, MAX_SPEED)
        .on_start(|| log::info!("Joystick started"))
        .on_change(move |event| {
            log::trace!(
                "Joystick {} power {:.2} angle {:.2}",
                event.direction,
                event.power,
                event.angle
            );
            on_change.borrow_mut().velocity = Some(event.velocity);
        })
        .on_end(move || {
            log::info!("Joystick ended");
            on_end.borrow_mut().released = true;
        });
    Joystick::new(settings)
}

/// Whether the "Play again?" prompt is showing.
///
/// Shown on every game over until the player answers "No"; the dismissal
/// only lasts until the phase changes.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
#[derive(Debug, Default)]
struct PlayAgainPrompt {
    dismissed: bool,
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
impl PlayAgainPrompt {
    fn visible(&self, phase: GamePhase) -> bool {
        phase == GamePhase::GameOver && !self.dismissed
    }

    fn dismiss(&mut self) {
        self.dismissed = true;
    }

    fn phase_changed(&mut self) {
        self.dismissed = false;
    }
}

/// Bottom-left placement with a margin
fn joystick_anchor(joystick: &Joystick, screen: Vec2) -> Vec2 {
    Vec2::new(
        joystick.width() / 2.0 + JOYSTICK_MARGIN,
        screen.y - joystick.height() / 2.0 - JOYSTICK_MARGIN,
    )
}

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use super::{PlayAgainPrompt, StickSignal, build_joystick, joystick_anchor};
    use dodge_stick::audio::{AudioManager, SoundEffect};
    use dodge_stick::consts::*;
    use dodge_stick::platform::PointerBinding;
    use dodge_stick::renderer::{CanvasRenderer, draw_scene};
    use dodge_stick::sim::{GamePhase, GameState, TickInput, advance_phase, tick};
    use dodge_stick::{Joystick, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: Option<CanvasRenderer>,
        joystick: Rc<RefCell<Joystick>>,
        stick: Rc<RefCell<StickSignal>>,
        audio: AudioManager,
        settings: Settings,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        last_phase: GamePhase,
        play_again: PlayAgainPrompt,
        /// Unbinds the joystick's pointer listeners when dropped
        _pointer: Option<PointerBinding>,
    }

    impl Game {
        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            self.stick.borrow_mut().drain_into(&mut self.input);

            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.state, &input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.clear_one_shots();
            }

            for event in self.state.drain_events() {
                self.audio.play(SoundEffect::for_event(&event));
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }

            let phase = self.state.phase;
            if phase != self.last_phase {
                if phase == GamePhase::Playing && self.last_phase == GamePhase::Start {
                    self.audio.play(SoundEffect::Start);
                }
                self.play_again.phase_changed();
                self.last_phase = phase;
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(renderer) = self.renderer.as_mut() {
                renderer.clear();
                draw_scene(
                    &self.state,
                    &self.joystick.borrow(),
                    renderer,
                    self.settings.hit_flash,
                );
            }
        }

        /// Canvas size changed
        fn resize(&mut self, canvas: &HtmlCanvasElement) {
            if let Some(renderer) = self.renderer.as_mut() {
                renderer.resize(canvas);
                let size = renderer.size;
                self.state.set_arena(size);
                let mut joystick = self.joystick.borrow_mut();
                let anchor = joystick_anchor(&joystick, size);
                joystick.set_position(anchor);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.display_score().to_string()));
            }

            if let Some(el) = document.get_element_by_id("hud-fps") {
                let class = if self.settings.show_fps { "hud-item" } else { "hud-item hidden" };
                let _ = el.set_attribute("class", class);
                if let Some(val) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                    val.set_text_content(Some(&self.fps.to_string()));
                }
            }

            let phase = self.state.phase;
            let show = |id: &str, visible: bool| {
                if let Some(el) = document.get_element_by_id(id) {
                    let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
                }
            };
            show("start-btn", phase == GamePhase::Start);
            show("play-btn", phase == GamePhase::Paused);
            show("pause-btn", phase == GamePhase::Playing);
            show("game-over", phase == GamePhase::GameOver);
            show("play-again", self.play_again.visible(phase));
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&JsValue::from_str(&e.to_string()));
        }

        log::info!("Dodge Stick starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;

        let renderer = CanvasRenderer::new(&canvas, window.device_pixel_ratio())?;
        let size = renderer.size;

        let seed = js_sys::Date::now() as u64;
        let settings = Settings::load();
        let stick = Rc::new(RefCell::new(StickSignal::default()));
        let mut joystick =
            build_joystick(stick.clone()).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let anchor = joystick_anchor(&joystick, size);
        joystick.set_position(anchor);
        let joystick = Rc::new(RefCell::new(joystick));

        let game = Rc::new(RefCell::new(Game {
            state: GameState::new(seed, size),
            renderer: Some(renderer),
            joystick: joystick.clone(),
            stick,
            audio: AudioManager::new(&settings),
            settings,
            accumulator: 0.0,
            last_time: 0.0,
            input: TickInput::default(),
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
            last_phase: GamePhase::Start,
            play_again: PlayAgainPrompt::default(),
            _pointer: None,
        }));

        log::info!("Game initialized with seed: {}", seed);

        game.borrow_mut()._pointer = Some(PointerBinding::bind(&canvas, joystick)?);

        setup_keyboard(game.clone())?;
        setup_buttons(game.clone());
        setup_resize(&canvas, game.clone())?;
        setup_auto_pause(game.clone())?;

        request_animation_frame(game);

        log::info!("Dodge Stick running!");
        Ok(())
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowUp" => g.input.up = true,
                    "ArrowDown" => g.input.down = true,
                    "ArrowLeft" => g.input.left = true,
                    "ArrowRight" => g.input.right = true,
                    "Enter" => {
                        g.input.advance = true;
                        g.audio.resume();
                    }
                    "m" | "M" => {
                        let muted = g.settings.toggle_muted();
                        let settings = g.settings.clone();
                        g.audio.apply_settings(&settings);
                        settings.save();
                        log::info!("Muted: {}", muted);
                    }
                    "f" | "F" => {
                        g.settings.toggle_show_fps();
                        g.settings.save();
                    }
                    _ => return,
                }
                event.prevent_default();
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowUp" => g.input.up = false,
                    "ArrowDown" => g.input.down = false,
                    "ArrowLeft" => g.input.left = false,
                    "ArrowRight" => g.input.right = false,
                    _ => {}
                }
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    /// Wire a DOM button to a game action
    fn on_click(id: &str, game: Rc<RefCell<Game>>, action: fn(&mut Game)) {
        let Some(btn) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        else {
            log::warn!("Button #{} not found", id);
            return;
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let mut g = game.borrow_mut();
            g.audio.resume();
            action(&mut g);
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        on_click("start-btn", game.clone(), |g| {
            if g.state.phase == GamePhase::Start {
                advance_phase(&mut g.state);
            }
        });
        on_click("pause-btn", game.clone(), |g| {
            if g.state.phase == GamePhase::Playing {
                advance_phase(&mut g.state);
            }
        });
        on_click("play-btn", game.clone(), |g| {
            if g.state.phase == GamePhase::Paused {
                advance_phase(&mut g.state);
            }
        });
        on_click("play-again-yes", game.clone(), |g| g.state.restart());
        on_click("play-again-no", game, |g| g.play_again.dismiss());
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize(&canvas);
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.state.phase == GamePhase::Playing {
                    advance_phase(&mut g.state);
                    log::info!("Auto-paused (window blur)");
                }
                if g.settings.mute_on_blur {
                    let settings = g.settings.clone();
                    g.audio.set_muted(true, &settings);
                }
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                let settings = g.settings.clone();
                g.audio.apply_settings(&settings);
            });
            window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Dodge Stick (native) starting...");
    log::info!("Native mode is headless - serve the wasm build for the playable version");

    if let Err(e) = run_headless_demo() {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive one scripted joystick gesture through the simulation
#[cfg(not(target_arch = "wasm32"))]
fn run_headless_demo() -> Result<(), dodge_stick::control::JoystickError> {
    use dodge_stick::sim::{GameState, TickInput, advance_phase, tick};

    let arena = Vec2::new(800.0, 600.0);
    let stick = Rc::new(RefCell::new(StickSignal::default()));
    let mut joystick = build_joystick(stick.clone())?;
    let anchor = joystick_anchor(&joystick, arena);
    joystick.set_position(anchor);

    let mut state = GameState::new(42, arena);
    advance_phase(&mut state);
    let mut input = TickInput::default();

    joystick.handle(dodge_stick::control::PointerInput::Press(anchor));
    for step in 1..=6 {
        let point = anchor + Vec2::new(step as f32 * 12.0, -(step as f32) * 4.0);
        if let Some(event) = joystick.drag_to(joystick.to_local(point)) {
            println!(
                "drag {:>2}: direction {:<12} power {:.2} velocity ({:.2}, {:.2})",
                step, event.direction, event.power, event.velocity.x, event.velocity.y
            );
        }
        stick.borrow_mut().drain_into(&mut input);
        tick(&mut state, &input);
        input.clear_one_shots();
    }
    joystick.handle(dodge_stick::control::PointerInput::Release);

    for _ in 0..60 {
        stick.borrow_mut().drain_into(&mut input);
        tick(&mut state, &input);
        input.clear_one_shots();
    }

    println!(
        "after {} ticks: player at ({:.1}, {:.1}), score {}",
        state.time_ticks,
        state.player.pos.x,
        state.player.pos.y,
        state.display_score()
    );
    Ok(())
}
