//! Browser glue: canvases, strip image, audio cues, keyboard trigger, bet/credit
//! display and the `requestAnimationFrame` loop driving the [`SlotMachine`].

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, HtmlAudioElement, HtmlCanvasElement, HtmlElement,
    HtmlImageElement, HtmlInputElement, window,
};

use crate::config::SpinnerConfig;
use crate::rng::{self, RandomSource};
use crate::session::RoundOutcome;
use crate::spinner::{MachineEvent, SlotMachine, StartOutcome};
use crate::sprite::VerticalSprite;

const WELCOME_TEXT: &str = "Welcome";
const VOLUME_UP_HTML: &str = "<i class='fas fa-volume-up'></i>";
const VOLUME_OFF_HTML: &str = "<i class='fas fa-volume-off'></i>";

/// Destination canvas of one reel.
struct ReelView {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

/// Spin / win / lose sound cues sharing one mute switch.
struct AudioCues {
    spinning: HtmlAudioElement,
    win: HtmlAudioElement,
    lose: HtmlAudioElement,
}

impl AudioCues {
    fn new(cfg: &SpinnerConfig) -> Result<Self, JsValue> {
        let spinning = HtmlAudioElement::new_with_src(&cfg.audio_spinning)?;
        spinning.set_loop(true);
        Ok(Self {
            spinning,
            win: HtmlAudioElement::new_with_src(&cfg.audio_win)?,
            lose: HtmlAudioElement::new_with_src(&cfg.audio_lose)?,
        })
    }

    fn all(&self) -> [&HtmlAudioElement; 3] {
        [&self.spinning, &self.win, &self.lose]
    }

    /// Stop and rewind every cue.
    fn rewind(&self) {
        for a in self.all() {
            a.pause().ok();
            a.load();
        }
    }

    /// Toggle mute; returns the new muted state.
    fn toggle_mute(&self) -> bool {
        let muted = !self.spinning.muted();
        for a in self.all() {
            a.set_muted(muted);
        }
        muted
    }
}

/// Runtime game state.
struct GameState {
    config: SpinnerConfig,
    machine: SlotMachine,
    views: Vec<ReelView>,
    image: HtmlImageElement,
    audio: Option<AudioCues>,
    rng: Box<dyn RandomSource>,
}

thread_local! {
    static GAME_STATE: RefCell<Option<GameState>> = const { RefCell::new(None) };
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

pub fn start(config: SpinnerConfig) -> Result<(), JsValue> {
    // One machine per page: its listeners and frame loop live until unload
    if GAME_STATE.with(|cell| cell.borrow().is_some()) {
        log::warn!("start ignored: the spinner is already running");
        return Ok(());
    }
    config.validate().map_err(|e| JsValue::from_str(&e.to_string()))?;
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let mut views = Vec::with_capacity(config.reel_count());
    for id in &config.canvas_ids {
        views.push(reel_view(&doc, id, config.frame_width, config.frame_height)?);
    }

    let image = HtmlImageElement::new()?;
    // Render the first frame of every reel once the strip is loaded
    {
        let closure = Closure::wrap(Box::new(move || {
            GAME_STATE.with(|cell| {
                if let Some(state) = cell.borrow().as_ref() {
                    render_reels(state);
                }
            });
        }) as Box<dyn FnMut()>);
        image.set_onload(Some(closure.as_ref().unchecked_ref()));
        closure.forget();
    }

    let audio = match AudioCues::new(&config) {
        Ok(a) => Some(a),
        Err(err) => {
            log::warn!("audio unavailable: {:?}", err);
            None
        }
    };

    let machine = SlotMachine::new(&config);
    show_credits(&doc, &config, machine.session().credits(), machine.session().credit_tone().css_color());
    if let Some(input) = element::<HtmlInputElement>(&doc, &config.bet_input_id) {
        input.set_value(&machine.session().bet().to_string());
    }

    let image_src = config.image_src.clone();
    let volume_id = config.volume_id.clone();
    GAME_STATE.with(|b| {
        b.replace(Some(GameState {
            config,
            machine,
            views,
            image: image.clone(),
            audio,
            rng: rng::default_source(),
        }))
    });
    image.set_src(&image_src);

    // Enter / Space spins
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            let key = evt.key();
            if key != "Enter" && key != " " {
                return;
            }
            GAME_STATE.with(|cell| {
                if let Some(state) = cell.borrow_mut().as_mut() {
                    request_spin(state);
                }
            });
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Volume icon toggles mute on every cue
    if let Some(icon) = element::<HtmlElement>(&doc, &volume_id) {
        icon.style().set_property("cursor", "pointer")?;
        let icon_click = icon.clone();
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            GAME_STATE.with(|cell| {
                if let Some(audio) = cell.borrow().as_ref().and_then(|s| s.audio.as_ref()) {
                    let muted = audio.toggle_mute();
                    icon_click.set_inner_html(if muted { VOLUME_OFF_HTML } else { VOLUME_UP_HTML });
                }
            });
        }) as Box<dyn FnMut(_)>);
        icon.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    log::info!("dread spinner ready");
    start_game_loop();
    Ok(())
}

/// Start a round from the page's bet field. Returns true if reels were scheduled.
pub fn spin() -> bool {
    GAME_STATE.with(|cell| match cell.borrow_mut().as_mut() {
        Some(state) => request_spin(state),
        None => false,
    })
}

pub fn is_ready() -> bool {
    GAME_STATE.with(|cell| cell.borrow().as_ref().map(|s| s.machine.is_ready()).unwrap_or(false))
}

fn reel_view(doc: &Document, id: &str, width: u32, height: u32) -> Result<ReelView, JsValue> {
    // Create / reuse the canvas for this reel
    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id(id) {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id(id);
        let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;
        body.append_child(&c)?;
        c
    };
    canvas.set_width(width);
    canvas.set_height(height);
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;
    Ok(ReelView { canvas, ctx })
}

fn element<T: JsCast>(doc: &Document, id: &str) -> Option<T> {
    doc.get_element_by_id(id).and_then(|el| el.dyn_into::<T>().ok())
}

fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

fn request_spin(state: &mut GameState) -> bool {
    let Some(doc) = window().and_then(|w| w.document()) else {
        return false;
    };
    let bet_input = element::<HtmlInputElement>(&doc, &state.config.bet_input_id)
        .map(|i| i.value())
        .unwrap_or_else(|| state.machine.session().bet().to_string());

    match state.machine.start_round_from_input(&bet_input, state.rng.as_mut(), now_ms()) {
        Ok((StartOutcome::Started, _)) => {
            set_text(&doc, &state.config.result_id, WELCOME_TEXT);
            if let Some(audio) = &state.audio {
                audio.rewind();
                play_later(&audio.spinning, state.config.spin_audio_delay_ms);
            }
            true
        }
        Ok((StartOutcome::Busy, _)) => false,
        Err(err) => {
            log::warn!("spin rejected: {}", err);
            set_text(&doc, &state.config.result_id, &format!("Invalid bet: {}", err));
            false
        }
    }
}

fn start_game_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        GAME_STATE.with(|state_cell| {
            if let Some(state) = state_cell.borrow_mut().as_mut() {
                game_tick(state, ts);
            }
        });
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

fn game_tick(state: &mut GameState, now: f64) {
    let events = state.machine.frame(now);
    let moving = state.machine.reels().iter().any(|r| r.sprite().is_running());
    if moving || !events.is_empty() {
        render_reels(state);
    }
    for event in events {
        if let MachineEvent::RoundResolved(outcome) = event {
            on_round_resolved(state, &outcome);
        }
    }
}

fn on_round_resolved(state: &GameState, outcome: &RoundOutcome) {
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };
    set_text(&doc, &state.config.result_id, &outcome.name);
    show_credits(&doc, &state.config, outcome.credits, state.machine.session().credit_tone().css_color());
    if let Some(audio) = &state.audio {
        audio.spinning.pause().ok();
        let cue = if outcome.win { &audio.win } else { &audio.lose };
        play_later(cue, state.config.result_audio_delay_ms);
    }
}

fn render_reels(state: &GameState) {
    for (view, reel) in state.views.iter().zip(state.machine.reels()) {
        render_reel(view, &state.image, reel.sprite());
    }
}

fn render_reel(view: &ReelView, image: &HtmlImageElement, sprite: &VerticalSprite) {
    let w = view.canvas.width() as f64;
    let h = view.canvas.height() as f64;
    view.ctx.clear_rect(0.0, 0.0, w, h);
    let src = sprite.source_rect();
    view.ctx
        .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
            image, src.x, src.y, src.width, src.height, 0.0, 0.0, w, h,
        )
        .ok();
}

fn show_credits(doc: &Document, cfg: &SpinnerConfig, credits: i64, color: &str) {
    if let Some(el) = element::<HtmlElement>(doc, &cfg.credit_id) {
        el.set_text_content(Some(&credits.to_string()));
        el.style().set_property("color", color).ok();
    }
}

fn set_text(doc: &Document, id: &str, text: &str) {
    if let Some(el) = doc.get_element_by_id(id) {
        el.set_text_content(Some(text));
    }
}

fn play_later(audio: &HtmlAudioElement, delay_ms: i32) {
    let audio = audio.clone();
    let cb = Closure::once_into_js(move || {
        let _ = audio.play();
    });
    if let Some(w) = window() {
        let _ = w.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), delay_ms);
    }
}
