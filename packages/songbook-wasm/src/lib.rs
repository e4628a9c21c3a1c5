use serde::Serialize;
use songbook::autoscroll::{AutoScroll, Viewport};
use songbook::clock::ManualClock;
use songbook::controller::Preview;
use songbook::keyboard::{self, KeyEvent, SearchTarget, ShortcutContext};
use songbook::lexer;
use songbook::{Settings, SongbookError};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_ok() {
        log::info!("songbook WASM module initialized");
    }
}

#[derive(Serialize)]
struct RenderError {
    message: String,
    line: Option<usize>,
}

fn error_to_render_error(e: SongbookError) -> RenderError {
    match e {
        SongbookError::StructureError { line, message } => RenderError {
            message,
            line: Some(line),
        },
        SongbookError::SettingsError(msg) => RenderError {
            message: msg,
            line: None,
        },
    }
}

fn to_js_error(e: SongbookError) -> JsValue {
    let error = error_to_render_error(e);
    match serde_json::to_string(&error) {
        Ok(json) => JsValue::from_str(&json),
        Err(_) => JsValue::from_str(&error.message),
    }
}

/// Settings from a JS object; `undefined` or `null` means defaults
fn settings_from_js(settings: JsValue) -> Result<Settings, JsValue> {
    if settings.is_undefined() || settings.is_null() {
        return Ok(Settings::default());
    }
    serde_wasm_bindgen::from_value(settings)
        .map_err(|e| to_js_error(SongbookError::SettingsError(e.to_string())))
}

/// Render ChordPro source to styled HTML with validation
#[wasm_bindgen]
pub fn render_song(source: &str, settings: JsValue) -> Result<String, JsValue> {
    let settings = settings_from_js(settings)?;
    songbook::render_song(source, &settings).map_err(to_js_error)
}

/// Render ChordPro source to styled HTML without structure validation
#[wasm_bindgen]
pub fn render_song_unchecked(source: &str, settings: JsValue) -> Result<String, JsValue> {
    let settings = settings_from_js(settings)?;
    songbook::render_song_unchecked(source, &settings).map_err(to_js_error)
}

/// Render ChordPro source, falling back to an error panel. Never fails.
#[wasm_bindgen]
pub fn render_song_or_error_panel(source: &str, settings: JsValue) -> String {
    match settings_from_js(settings) {
        Ok(settings) => songbook::render_song_or_error_panel(source, &settings),
        Err(_) => songbook::render_song_or_error_panel(source, &Settings::default()),
    }
}

/// The styled render tree and metadata as a JS object
#[wasm_bindgen]
pub fn render_tree(source: &str, settings: JsValue) -> Result<JsValue, JsValue> {
    let settings = settings_from_js(settings)?;
    let song = songbook::render_tree(source, &settings).map_err(to_js_error)?;
    serde_wasm_bindgen::to_value(&song).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Lint ChordPro source and return diagnostics as a JSON array
#[wasm_bindgen]
pub fn lint(source: &str) -> String {
    let diagnostics = songbook::lint(source);
    serde_json::to_string(&diagnostics).unwrap_or_else(|_| "[]".to_string())
}

/// Editor highlight spans for one line as a JSON array of
/// `{ "range": { "start", "end" }, "kind" }` byte ranges
#[wasm_bindgen]
pub fn highlight(line: &str) -> String {
    serde_json::to_string(&lexer::highlight(line)).unwrap_or_else(|_| "[]".to_string())
}

/// Action name for a `keydown` event, or `undefined` when the key is not a
/// shortcut. `event` is a plain object with `key`, the modifier flags and a
/// `target` describing the focused element.
#[wasm_bindgen]
pub fn shortcut_for_key(event: JsValue, is_fullscreen: bool) -> Option<String> {
    let event: KeyEvent = serde_wasm_bindgen::from_value(event).ok()?;
    let action = keyboard::shortcut_for(&event, ShortcutContext { is_fullscreen })?;
    serde_json::to_value(action)
        .ok()
        .and_then(|value| value.as_str().map(str::to_string))
}

/// External search URL for a song; `target` is `google`, `youtube` or `spotify`
#[wasm_bindgen]
pub fn search_url(target: &str, title: &str, artist: Option<String>) -> Option<String> {
    let target = match target.to_lowercase().as_str() {
        "google" => SearchTarget::Google,
        "youtube" => SearchTarget::YouTube,
        "spotify" => SearchTarget::Spotify,
        _ => return None,
    };
    Some(keyboard::search_url(target, title, artist.as_deref()))
}

/// Auto-scroll for one song container. The page owns the real element and
/// the timer; it passes in the time and element metrics, and writes back the
/// `scrollTop` this returns.
#[wasm_bindgen]
pub struct ScrollSession {
    clock: Rc<ManualClock>,
    viewport: Rc<RefCell<Viewport>>,
    engine: AutoScroll<Viewport, Rc<ManualClock>>,
}

#[wasm_bindgen]
impl ScrollSession {
    #[wasm_bindgen(constructor)]
    pub fn new(speed: f64) -> ScrollSession {
        let clock = Rc::new(ManualClock::new());
        let viewport = Rc::new(RefCell::new(Viewport::default()));
        let engine = AutoScroll::new(&viewport, Rc::clone(&clock), speed);
        ScrollSession {
            clock,
            viewport,
            engine,
        }
    }

    /// Sync the container's current metrics before driving the engine
    pub fn set_metrics(&mut self, scroll_top: f64, scroll_height: f64, client_height: f64) {
        let mut viewport = self.viewport.borrow_mut();
        viewport.scroll_height = scroll_height;
        viewport.client_height = client_height;
        viewport.scroll_top = scroll_top;
    }

    pub fn start(&mut self, now_ms: f64) -> f64 {
        self.set_time(now_ms);
        self.engine.start();
        self.scroll_top()
    }

    pub fn stop(&mut self) {
        self.engine.stop();
    }

    pub fn toggle(&mut self, now_ms: f64) -> f64 {
        self.set_time(now_ms);
        self.engine.toggle();
        self.scroll_top()
    }

    /// Run everything due by `now_ms` and return the new `scrollTop`
    pub fn advance_to(&mut self, now_ms: f64) -> f64 {
        self.set_time(now_ms);
        self.engine.poll();
        self.scroll_top()
    }

    /// Report a wheel or touch-move event
    pub fn manual_scroll(&mut self, now_ms: f64) {
        self.set_time(now_ms);
        self.engine.manual_scroll();
    }

    pub fn increase_speed(&mut self) -> f64 {
        self.engine.increase_speed()
    }

    pub fn decrease_speed(&mut self) -> f64 {
        self.engine.decrease_speed()
    }

    pub fn set_speed(&mut self, speed: f64) -> f64 {
        self.engine.set_speed(speed)
    }

    #[wasm_bindgen(getter)]
    pub fn speed(&self) -> f64 {
        self.engine.speed()
    }

    #[wasm_bindgen(getter)]
    pub fn is_scrolling(&self) -> bool {
        self.engine.is_scrolling()
    }

    #[wasm_bindgen(getter)]
    pub fn scroll_top(&self) -> f64 {
        self.viewport.borrow().scroll_top
    }

    /// When the page should call `advance_to` next, in ms
    pub fn next_deadline_ms(&self) -> Option<f64> {
        self.engine
            .next_deadline()
            .map(|deadline| deadline.as_secs_f64() * 1000.0)
    }
}

impl ScrollSession {
    fn set_time(&self, now_ms: f64) {
        if let Some(now) = clock_time(now_ms) {
            self.clock.set(now);
        }
    }
}

/// Debounced editor preview. The page reports each edit and polls with the
/// current time; `poll` returns HTML once the editor has been quiet for 300 ms.
#[wasm_bindgen]
pub struct PreviewSession {
    clock: Rc<ManualClock>,
    preview: Preview<Rc<ManualClock>>,
}

#[wasm_bindgen]
impl PreviewSession {
    #[wasm_bindgen(constructor)]
    pub fn new(settings: JsValue) -> Result<PreviewSession, JsValue> {
        let settings = settings_from_js(settings)?;
        let clock = Rc::new(ManualClock::new());
        let preview = Preview::new(settings, Rc::clone(&clock));
        Ok(PreviewSession { clock, preview })
    }

    pub fn set_settings(&mut self, settings: JsValue) -> Result<(), JsValue> {
        self.preview.set_settings(settings_from_js(settings)?);
        Ok(())
    }

    pub fn edit(&mut self, source: String, now_ms: f64) {
        self.set_time(now_ms);
        self.preview.edit(source);
    }

    /// HTML for the latest edit once its quiet period is over
    pub fn poll(&mut self, now_ms: f64) -> Option<String> {
        self.set_time(now_ms);
        self.preview.poll()
    }

    pub fn flush(&mut self) -> Option<String> {
        self.preview.flush()
    }

    #[wasm_bindgen(getter)]
    pub fn is_pending(&self) -> bool {
        self.preview.is_pending()
    }
}

impl PreviewSession {
    fn set_time(&self, now_ms: f64) {
        if let Some(now) = clock_time(now_ms) {
            self.clock.set(now);
        }
    }
}

/// A page timestamp as clock time; negative, NaN and out-of-range values are
/// ignored
fn clock_time(now_ms: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(now_ms / 1000.0).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_time_ignores_unusable_timestamps() {
        assert_eq!(clock_time(1500.0), Some(Duration::from_millis(1500)));
        assert_eq!(clock_time(0.0), Some(Duration::ZERO));
        assert_eq!(clock_time(-1.0), None);
        assert_eq!(clock_time(f64::NAN), None);
        assert_eq!(clock_time(f64::INFINITY), None);
        assert_eq!(clock_time(1e300), None);
    }

    #[test]
    fn test_highlight_is_json() {
        let json = highlight("[C]la");
        assert_eq!(json, r#"[{"range":{"start":0,"end":3},"kind":"chord"}]"#);
        assert_eq!(highlight(""), "[]");
    }
}
