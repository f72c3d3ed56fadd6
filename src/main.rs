//! Gym Rush entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use gym_rush::backend::LocalStorageBackend;
    use gym_rush::consts::FIRST_FRAME_DT;
    use gym_rush::input::InputState;
    use gym_rush::lore::MockLoreClient;
    use gym_rush::route::{self, Route};
    use gym_rush::surface::{palette, Align, CanvasSurface, Rect, Surface};
    use gym_rush::{avatar, Orchestrator};

    /// Everything the frame loop touches, behind one Rc.
    struct Game {
        orchestrator: Orchestrator,
        surface: CanvasSurface,
        input: InputState,
        last_time: f64,
    }

    fn pointer_from_event(
        game: &mut Game,
        canvas: &HtmlCanvasElement,
        client_x: f32,
        client_y: f32,
    ) {
        let rect = canvas.get_bounding_client_rect();
        let logical = game.surface.size();
        game.input.set_pointer_from_client(
            Vec2::new(client_x, client_y),
            Vec2::new(rect.left() as f32, rect.top() as f32),
            Vec2::new(rect.width() as f32, rect.height() as f32),
            logical,
        );
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Gym Rush starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let surface = CanvasSurface::new(canvas.clone()).expect("no 2d context");

        match route::current() {
            Route::Game => {}
            Route::Avatars => {
                run_avatar_preview(surface);
                return;
            }
            Route::NotFound => {
                run_not_found(surface);
                return;
            }
        }

        let seed = js_sys::Date::now() as u64;
        // The key is read from the page so the mock stays swappable for a
        // real service without a rebuild.
        let api_key = canvas.get_attribute("data-lore-key");
        let lore = MockLoreClient::new(api_key, seed.rotate_left(17));
        let orchestrator = Orchestrator::new(seed, Box::new(LocalStorageBackend::new()), lore);
        log::info!("Session seed: {seed}");

        let game = Rc::new(RefCell::new(Game {
            orchestrator,
            surface,
            input: InputState::new(),
            last_time: 0.0,
        }));

        setup_input_handlers(&canvas, game.clone());
        setup_resize_handler(game.clone());
        request_animation_frame(game);

        log::info!("Gym Rush running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                pointer_from_event(
                    &mut g,
                    &canvas_clone,
                    event.client_x() as f32,
                    event.client_y() as f32,
                );
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse down / up
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                pointer_from_event(
                    &mut g,
                    &canvas_clone,
                    event.client_x() as f32,
                    event.client_y() as f32,
                );
                g.input.clicked = true;
                g.input.pointer_down = true;
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.pointer_down = false;
            });
            let _ = canvas
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start / move / end map onto the same pointer state
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    pointer_from_event(
                        &mut g,
                        &canvas_clone,
                        touch.client_x() as f32,
                        touch.client_y() as f32,
                    );
                    g.input.clicked = true;
                    g.input.pointer_down = true;
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    pointer_from_event(
                        &mut g,
                        &canvas_clone,
                        touch.client_x() as f32,
                        touch.client_y() as f32,
                    );
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().input.pointer_down = false;
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard on the window so the canvas never needs focus
        {
            let game = game.clone();
            let window = web_sys::window().expect("no window");
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                // Keep arrows and space from scrolling the page.
                if matches!(key.as_str(), "ArrowLeft" | "ArrowRight" | " ") {
                    event.prevent_default();
                }
                let mut g = game.borrow_mut();
                g.input.key_down(&key);
                g.input.record_typed(&key);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let window = web_sys::window().expect("no window");
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().surface.fit_to_element();
        });
        let _ = window
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| {
            frame(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                FIRST_FRAME_DT
            };
            g.last_time = time;

            let Game {
                orchestrator,
                surface,
                input,
                ..
            } = &mut *g;
            orchestrator.advance_frame(surface, input, dt, time);
        }
        request_animation_frame(game);
    }

    /// Static grid of generated portraits, for eyeballing the palette.
    fn run_avatar_preview(mut surface: CanvasSurface) {
        let view = surface.size();
        surface.clear(palette::BG);
        surface.text(
            "Avatar preview",
            Vec2::new(view.x / 2.0, 40.0),
            24.0,
            palette::INK,
            Align::Center,
        );
        let cell = 84.0;
        let cols = ((view.x - 40.0) / cell).max(1.0) as u64;
        for i in 0..cols * 5 {
            let rect = Rect::new(
                20.0 + (i % cols) as f32 * cell,
                70.0 + (i / cols) as f32 * cell,
                cell - 12.0,
                cell - 12.0,
            );
            avatar::draw_avatar(&mut surface, rect, i.wrapping_mul(0x9E37_79B9));
        }
    }

    fn run_not_found(mut surface: CanvasSurface) {
        let view = surface.size();
        surface.clear(palette::BG);
        surface.text(
            "404 - this room is members only",
            Vec2::new(view.x / 2.0, view.y / 2.0),
            26.0,
            palette::ACCENT,
            Align::Center,
        );
        surface.text(
            "Head back to #/ for the gym floor",
            Vec2::new(view.x / 2.0, view.y / 2.0 + 34.0),
            16.0,
            palette::DIM,
            Align::Center,
        );
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use gym_rush::backend::MemoryBackend;
    use gym_rush::input::InputState;
    use gym_rush::lore::MockLoreClient;
    use gym_rush::surface::NullSurface;
    use gym_rush::{MiniGame, Mode, Orchestrator};

    env_logger::init();
    log::info!("Gym Rush (native) starting headless smoke run...");

    let mut orchestrator = Orchestrator::new(
        12345,
        Box::new(MemoryBackend::new()),
        MockLoreClient::new(Some("local".to_string()), 12345),
    );
    orchestrator.mode = Mode::Playing(MiniGame::Workout);

    // Simulate a player alternating A and D at 60 Hz until the set is done.
    let mut surface = NullSurface::new(960.0, 600.0);
    let mut input = InputState::new();
    let mut now_ms = 0.0;
    for i in 0..2000u32 {
        let key = if i % 2 == 0 { "a" } else { "d" };
        if i % 4 < 2 {
            input.key_down(key);
        } else {
            input.key_up(if i % 2 == 0 { "a" } else { "d" });
        }
        now_ms += 1000.0 / 60.0;
        orchestrator.advance_frame(&mut surface, &mut input, 1.0 / 60.0, now_ms);
        if gym_rush::games::game_finished(MiniGame::Workout, &orchestrator.session) {
            break;
        }
    }

    let score = gym_rush::games::final_score(MiniGame::Workout, &orchestrator.session);
    log::info!(
        "Smoke run done after {} frames: workout score {}",
        orchestrator.frame_count(),
        score
    );
    println!("workout smoke run: score {score}");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
