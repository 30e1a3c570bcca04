//! Loza platformer entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::convert::FromWasmAbi;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, Element, EventTarget, HtmlCanvasElement,
        HtmlImageElement, KeyboardEvent, MouseEvent, TouchEvent, Window,
    };

    use loza_platformer::assets::{AssetCatalog, AssetKey, ImageHandle};
    use loza_platformer::audio::web::HtmlAudioCue;
    use loza_platformer::consts::*;
    use loza_platformer::platform::{Control, InputState, Viewport};
    use loza_platformer::renderer::{DrawCommand, DrawList, TextAlign, css_rgba};
    use loza_platformer::sim::{GameEvent, GameState};
    use loza_platformer::{App, Settings, Tuning};

    const AMBIENT_SRC: &str = "assets/bg-music.mp3";
    const VICTORY_SRC: &str = "assets/victory.mp3";
    const FONT_FAMILY: &str = "\"Press Start 2P\", monospace";

    /// Loaded `<img>` element
    struct WebImage(HtmlImageElement);

    impl ImageHandle for WebImage {
        fn width(&self) -> f32 {
            self.0.natural_width() as f32
        }

        fn height(&self) -> f32 {
            self.0.natural_height() as f32
        }
    }

    /// DOM overlays around the canvas
    struct Ui {
        play_hint: Option<Element>,
        win_modal: Option<Element>,
    }

    impl Ui {
        fn find(document: &Document) -> Self {
            Self {
                play_hint: document.get_element_by_id("playHint"),
                win_modal: document.get_element_by_id("winModal"),
            }
        }

        fn show_play_hint(&self, visible: bool) {
            set_hidden(self.play_hint.as_ref(), !visible);
        }

        fn show_win_modal(&self, visible: bool) {
            set_hidden(self.win_modal.as_ref(), !visible);
        }
    }

    fn set_hidden(element: Option<&Element>, hidden: bool) {
        if let Some(element) = element {
            let classes = element.class_list();
            let _ = if hidden {
                classes.add_1("hidden")
            } else {
                classes.remove_1("hidden")
            };
        }
    }

    /// Game instance holding all state
    struct Game {
        app: App<HtmlAudioCue>,
        input: InputState,
        assets: AssetCatalog<WebImage>,
        ctx: CanvasRenderingContext2d,
        ui: Ui,
        /// A frame callback is scheduled
        running: bool,
    }

    impl Game {
        fn update(&mut self, time: f64) {
            let Game { app, input, .. } = self;
            let events = app.frame(time, input);
            if events.contains(&GameEvent::Won) {
                self.ui.show_win_modal(true);
            }
            self.ui.show_play_hint(self.app.soundtrack.needs_gesture());
        }

        fn render(&self, time: f64) {
            let list = self.app.scene(&self.assets, time);
            paint(&self.ctx, &list, &self.assets);
        }

        fn restart(&mut self, now: f64) {
            self.ui.show_win_modal(false);
            self.app.restart(now, &mut self.input);
            self.ui.show_play_hint(self.app.soundtrack.needs_gesture());
        }
    }

    fn paint(ctx: &CanvasRenderingContext2d, list: &DrawList, assets: &AssetCatalog<WebImage>) {
        ctx.set_image_smoothing_enabled(false);
        ctx.clear_rect(0.0, 0.0, CANVAS_W as f64, CANVAS_H as f64);

        for command in &list.commands {
            match command {
                DrawCommand::Sprite { key, dest, flip_x } => {
                    let Some(image) = assets.get(*key) else {
                        continue;
                    };
                    let (w, h) = (dest.w as f64, dest.h as f64);
                    if *flip_x {
                        ctx.save();
                        let _ = ctx.translate((dest.x + dest.w) as f64, dest.y as f64);
                        let _ = ctx.scale(-1.0, 1.0);
                        let _ = ctx
                            .draw_image_with_html_image_element_and_dw_and_dh(&image.0, 0.0, 0.0, w, h);
                        ctx.restore();
                    } else {
                        let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                            &image.0,
                            dest.x as f64,
                            dest.y as f64,
                            w,
                            h,
                        );
                    }
                }
                DrawCommand::Solid { color, dest } => {
                    ctx.set_fill_style_str(&css_rgba(*color));
                    ctx.fill_rect(dest.x as f64, dest.y as f64, dest.w as f64, dest.h as f64);
                }
                DrawCommand::Text {
                    text,
                    pos,
                    size_px,
                    color,
                    align,
                } => {
                    ctx.set_fill_style_str(&css_rgba(*color));
                    ctx.set_font(&format!("{}px {}", size_px, FONT_FAMILY));
                    ctx.set_text_align(match align {
                        TextAlign::Left => "left",
                        TextAlign::Center => "center",
                    });
                    let _ = ctx.fill_text(text, pos.x as f64, pos.y as f64);
                }
            }
        }
    }

    fn now(window: &Window) -> f64 {
        window.performance().map(|p| p.now()).unwrap_or(0.0)
    }

    /// Logical resolution stays fixed; only the CSS size follows the window
    fn fit_canvas(window: &Window, canvas: &HtmlCanvasElement) {
        let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(CANVAS_W as f64);
        let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(CANVAS_H as f64);
        let viewport = Viewport::fit(width as f32, height as f32);

        let (logical_w, logical_h) = viewport.logical_size();
        canvas.set_width(logical_w);
        canvas.set_height(logical_h);
        let (css_w, css_h) = viewport.css_size();
        let style = canvas.style();
        let _ = style.set_property("width", &format!("{}px", css_w));
        let _ = style.set_property("height", &format!("{}px", css_h));
    }

    fn listen<E>(target: &EventTarget, event: &str, handler: impl FnMut(E) + 'static)
    where
        E: FromWasmAbi + 'static,
    {
        let closure = Closure::<dyn FnMut(E)>::new(handler);
        let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(err) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&JsValue::from_str(&err.to_string()));
        }
        log::info!("Loza starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game")
            .ok_or_else(|| JsValue::from_str("no #game canvas"))?
            .dyn_into()?;
        fit_canvas(&window, &canvas);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let touch_controls = settings.touch_controls;
        let app = App::new(
            GameState::new(seed).with_tuning(Tuning::load()),
            HtmlAudioCue::looping(AMBIENT_SRC)?,
            HtmlAudioCue::looping(VICTORY_SRC)?,
            settings,
        );
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            app,
            input: InputState::new(),
            assets: AssetCatalog::new(),
            ctx,
            ui: Ui::find(&document),
            running: false,
        }));

        load_images(game.clone())?;
        setup_keyboard(&window, game.clone());
        setup_buttons(&document, game.clone(), touch_controls);
        setup_play_hint(&document, game.clone());
        setup_play_again(&document, game.clone());
        setup_focus(&window, game.clone());
        {
            let window_clone = window.clone();
            listen(&window, "resize", move |_event: web_sys::Event| {
                fit_canvas(&window_clone, &canvas);
            });
        }

        {
            let mut g = game.borrow_mut();
            g.app.start();
            let needs_gesture = g.app.soundtrack.needs_gesture();
            g.ui.show_play_hint(needs_gesture);
            g.running = true;
        }
        request_animation_frame(game);

        log::info!("Loza running!");
        Ok(())
    }

    /// Fire off every image load; the game starts without waiting
    fn load_images(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        for key in AssetKey::ALL {
            let image = HtmlImageElement::new()?;

            let onload = {
                let game = game.clone();
                let image = image.clone();
                Closure::<dyn FnMut()>::new(move || {
                    let mut g = game.borrow_mut();
                    g.assets.mark_loaded(key, WebImage(image.clone()));
                    report_if_settled(&g.assets);
                })
            };
            image.set_onload(Some(onload.as_ref().unchecked_ref()));
            onload.forget();

            let onerror = {
                let game = game.clone();
                Closure::<dyn FnMut()>::new(move || {
                    let mut g = game.borrow_mut();
                    g.assets.mark_failed(key);
                    report_if_settled(&g.assets);
                })
            };
            image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
            onerror.forget();

            image.set_src(key.path());
        }
        Ok(())
    }

    /// Log the catalog summary once the last image settles
    fn report_if_settled(assets: &AssetCatalog<WebImage>) {
        let readiness = assets.readiness();
        if readiness.settled() {
            log::info!(
                "Images settled: {} loaded, {} failed",
                readiness.loaded, readiness.failed
            );
        }
    }

    fn setup_keyboard(window: &Window, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            listen(window, "keydown", move |event: KeyboardEvent| {
                let key = event.key();
                let mut g = game.borrow_mut();
                if (key == "m" || key == "M") && !event.repeat() {
                    let mut settings = g.app.settings().clone();
                    settings.toggle_mute();
                    settings.save();
                    g.app.set_settings(settings);
                    return;
                }
                if g.input.key_down(&key, event.repeat()) {
                    event.prevent_default();
                }
            });
        }
        listen(window, "keyup", move |event: KeyboardEvent| {
            game.borrow_mut().input.key_up(&event.key());
        });
    }

    /// On-screen arrows for touch devices (mouse works too)
    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>, enabled: bool) {
        for control in [Control::Left, Control::Right, Control::Jump] {
            let Some(button) = document.get_element_by_id(control.button_id()) else {
                continue;
            };
            if !enabled {
                set_hidden(Some(&button), true);
                continue;
            }

            {
                let game = game.clone();
                listen(&button, "touchstart", move |event: TouchEvent| {
                    event.prevent_default();
                    game.borrow_mut().input.press(control);
                });
            }
            for name in ["touchend", "touchcancel"] {
                let game = game.clone();
                listen(&button, name, move |_event: TouchEvent| {
                    game.borrow_mut().input.release(control);
                });
            }
            {
                let game = game.clone();
                listen(&button, "mousedown", move |_event: MouseEvent| {
                    game.borrow_mut().input.press(control);
                });
            }
            for name in ["mouseup", "mouseleave"] {
                let game = game.clone();
                listen(&button, name, move |_event: MouseEvent| {
                    game.borrow_mut().input.release(control);
                });
            }
        }
    }

    /// "Tap for music" after the browser refused autoplay
    fn setup_play_hint(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(button) = document.get_element_by_id("playHint") {
            listen(&button, "click", move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.app.soundtrack.retry();
                let needs_gesture = g.app.soundtrack.needs_gesture();
                g.ui.show_play_hint(needs_gesture);
            });
        }
    }

    fn setup_play_again(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(button) = document.get_element_by_id("playAgain") {
            listen(&button, "click", move |_event: MouseEvent| {
                let resume_loop = {
                    let mut g = game.borrow_mut();
                    let time = web_sys::window().map(|w| now(&w)).unwrap_or(0.0);
                    g.restart(time);
                    let idle = !g.running;
                    g.running = true;
                    idle
                };
                if resume_loop {
                    request_animation_frame(game.clone());
                }
            });
        }
    }

    fn setup_focus(window: &Window, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            listen(window, "blur", move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                let Game { app, input, .. } = &mut *g;
                app.blur(input);
                log::debug!("Window blurred, input released");
            });
        }
        listen(window, "focus", move |_event: web_sys::FocusEvent| {
            let time = web_sys::window().map(|w| now(&w)).unwrap_or(0.0);
            game.borrow_mut().app.focus(time);
        });
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_going = {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render(time);
            g.running = g.app.wants_frame();
            g.running
        };

        if keep_going {
            request_animation_frame(game);
        }
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
    log::info!("Loza (native) starting...");
    log::info!("Native mode runs a headless smoke run - build for wasm32 to play");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    autopilot(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Smoke run: hold right and hop whenever grounded, logging what happens
///
/// It makes no attempt to dodge hazards, so it usually stalls at the first
/// pill and keeps getting reset. Success is the loop running to the frame
/// cap without a panic, not reaching the heart.
#[cfg(not(target_arch = "wasm32"))]
fn autopilot(seed: u64) {
    use loza_platformer::audio::SilentCue;
    use loza_platformer::consts::FRAME_DT;
    use loza_platformer::platform::{Control, InputState};
    use loza_platformer::sim::{GameEvent, GameState};
    use loza_platformer::{App, Settings, Tuning};

    const MAX_FRAMES: u32 = 60 * 120;

    let mut app = App::new(
        GameState::new(seed).with_tuning(Tuning::load()),
        SilentCue::new("ambient"),
        SilentCue::new("victory"),
        Settings::default(),
    );
    app.start();

    let mut input = InputState::new();
    input.press(Control::Right);
    let mut resets = 0;

    for frame in 0..MAX_FRAMES {
        if app.state.player.grounded {
            input.release(Control::Jump);
            input.press(Control::Jump);
        }

        let now_ms = frame as f64 * FRAME_DT as f64 * 1000.0;
        for event in app.frame(now_ms, &mut input) {
            match event {
                GameEvent::PlayerReset { cause } => {
                    resets += 1;
                    log::info!("Frame {}: reset ({:?})", frame, cause);
                }
                other => log::info!("Frame {}: {:?}", frame, other),
            }
        }
        if !app.wants_frame() {
            println!("Reached the heart after {} frames and {} resets", frame, resets);
            return;
        }
    }

    let player = &app.state.player;
    println!(
        "Smoke run finished at x = {:.0} ({} resets, camera at {:.0})",
        player.pos.x, resets, app.state.camera.offset_x
    );
}
