//! # Song View
//!
//! [`SongView`] is the state behind one on-screen song: the settings
//! snapshot, the rendered tree of the current song and the auto-scroll engine
//! bound to its container. It changes only through its methods:
//!
//! - [`load_song`](SongView::load_song) stops and drops the previous engine
//!   before anything about the new song is built. Section problems are
//!   returned and logged, but the song is still shown.
//! - [`apply`](SongView::apply) runs one [`Action`]; settings actions restyle
//!   the existing tree, scroll actions drive the engine, and the rest come
//!   back as [`HostRequest`]s for the application to carry out
//! - [`handle_key`](SongView::handle_key) is `apply` behind the key table
//!
//! Dropping the view drops the engine and with it any pending tick or resume.
//!
//! [`Preview`] is the editor side: edits go through a 300 ms
//! [`Debouncer`] and only the last one in a burst is rendered.

use crate::ast::Metadata;
use crate::autoscroll::{AutoScroll, ScrollContainer, ScrollState};
use crate::clock::Clock;
use crate::debounce::Debouncer;
use crate::html::{error_panel, to_html};
use crate::keyboard::{search_url, shortcut_for, Action, KeyEvent, SearchTarget, ShortcutContext};
use crate::parser::parse;
use crate::render::{render, RenderedSong};
use crate::semantic::Diagnostic;
use crate::settings::{clamp_scroll_speed, Settings, SCROLL_SPEED_STEP};
use crate::style::apply_styles;
use crate::{render_song_or_error_panel, warn_structure_problems};
use log::{debug, warn};
use std::cell::RefCell;
use std::rc::Rc;

/// Something only the host application can do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostRequest {
    ToggleFullscreen,
    RandomSong,
    FocusSearch,
    OpenUrl(String),
}

pub struct SongView<S: ScrollContainer, C: Clock + Clone> {
    settings: Settings,
    clock: C,
    source: Option<String>,
    song: Option<RenderedSong>,
    engine: Option<AutoScroll<S, C>>,
    is_fullscreen: bool,
}

impl<S: ScrollContainer, C: Clock + Clone> SongView<S, C> {
    pub fn new(settings: Settings, clock: C) -> Self {
        Self {
            settings,
            clock,
            source: None,
            song: None,
            engine: None,
            is_fullscreen: false,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.song.as_ref().map(|song| &song.metadata)
    }

    pub fn is_fullscreen(&self) -> bool {
        self.is_fullscreen
    }

    pub fn set_fullscreen(&mut self, is_fullscreen: bool) {
        self.is_fullscreen = is_fullscreen;
    }

    /// Replace the host's settings snapshot
    pub fn set_settings(&mut self, settings: Settings) {
        if let Some(engine) = &mut self.engine {
            engine.set_speed(settings.scroll_speed);
        }
        self.settings = settings;
    }

    /// Replace the current song and bind a fresh engine to its container.
    /// Returns the song's structure diagnostics; the song is shown either way.
    pub fn load_song(&mut self, source: &str, container: &Rc<RefCell<S>>) -> Vec<Diagnostic> {
        if let Some(mut engine) = self.engine.take() {
            engine.stop();
        }

        let song = parse(source);
        let diagnostics = warn_structure_problems(&song);
        let rendered = render(&song);
        debug!(
            "loaded song {:?} ({} rows)",
            rendered.metadata.title,
            rendered.rows().count()
        );

        self.source = Some(source.to_string());
        self.song = Some(rendered);
        self.engine = Some(AutoScroll::new(
            container,
            self.clock.clone(),
            self.settings.scroll_speed,
        ));
        diagnostics
    }

    /// Drop the current song and its engine
    pub fn unload(&mut self) {
        self.engine = None;
        self.song = None;
        self.source = None;
    }

    /// The current song styled with the current settings
    pub fn styled(&self) -> Option<RenderedSong> {
        self.song
            .as_ref()
            .map(|song| apply_styles(song.clone(), &self.settings))
    }

    /// HTML for the current song, or an error panel with its source when the
    /// settings snapshot is unusable
    pub fn html(&self) -> Option<String> {
        let source = self.source.as_deref()?;
        match self.settings.validate() {
            Ok(()) => self.styled().map(|song| to_html(&song)),
            Err(e) => {
                warn!("failed to render song: {}", e);
                Some(error_panel(&e.to_string(), source))
            }
        }
    }

    pub fn scroll_state(&self) -> Option<ScrollState> {
        self.engine.as_ref().map(|engine| engine.state())
    }

    /// Fire any due auto-scroll tick or resume
    pub fn poll(&mut self) {
        if let Some(engine) = &mut self.engine {
            engine.poll();
        }
    }

    /// Report a wheel or touch-move event on the song container
    pub fn manual_scroll(&mut self) {
        if let Some(engine) = &mut self.engine {
            engine.manual_scroll();
        }
    }

    pub fn handle_key(&mut self, event: &KeyEvent) -> Option<(Action, Option<HostRequest>)> {
        let context = ShortcutContext {
            is_fullscreen: self.is_fullscreen,
        };
        let action = shortcut_for(event, context)?;
        Some((action, self.apply(action)))
    }

    pub fn apply(&mut self, action: Action) -> Option<HostRequest> {
        match action {
            Action::ToggleAutoScroll => {
                if let Some(engine) = &mut self.engine {
                    engine.toggle();
                }
                None
            }
            Action::IncreaseScrollSpeed => {
                self.set_scroll_speed(self.settings.scroll_speed + SCROLL_SPEED_STEP);
                None
            }
            Action::DecreaseScrollSpeed => {
                self.set_scroll_speed(self.settings.scroll_speed - SCROLL_SPEED_STEP);
                None
            }
            Action::IncreaseFontSize => {
                self.settings.increase_font_size();
                None
            }
            Action::DecreaseFontSize => {
                self.settings.decrease_font_size();
                None
            }
            Action::ToggleChords => {
                self.settings.toggle_chords();
                None
            }
            Action::ToggleFullscreen => Some(HostRequest::ToggleFullscreen),
            Action::RandomSong => Some(HostRequest::RandomSong),
            Action::FocusSearch => Some(HostRequest::FocusSearch),
            Action::OpenGoogle | Action::OpenYouTube | Action::OpenSpotify => {
                let target = SearchTarget::for_action(action)?;
                let metadata = self.metadata()?;
                let title = metadata.title.as_deref()?;
                Some(HostRequest::OpenUrl(search_url(
                    target,
                    title,
                    metadata.artist.as_deref(),
                )))
            }
        }
    }

    fn set_scroll_speed(&mut self, speed: f64) {
        self.settings.scroll_speed = match &mut self.engine {
            Some(engine) => engine.set_speed(speed),
            None => clamp_scroll_speed(speed),
        };
    }
}

/// Debounced editor preview
pub struct Preview<C: Clock> {
    settings: Settings,
    pending: Debouncer<String, C>,
}

impl<C: Clock> Preview<C> {
    pub fn new(settings: Settings, clock: C) -> Self {
        Self {
            settings,
            pending: Debouncer::new(clock),
        }
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Record an edit; it is rendered once the editor has been quiet long enough
    pub fn edit(&mut self, source: impl Into<String>) {
        self.pending.push(source.into());
    }

    /// HTML for the latest edit, once its quiet period is over
    pub fn poll(&mut self) -> Option<String> {
        let source = self.pending.poll()?;
        Some(render_song_or_error_panel(&source, &self.settings))
    }

    /// Render the latest edit now, skipping the wait
    pub fn flush(&mut self) -> Option<String> {
        let source = self.pending.flush()?;
        Some(render_song_or_error_panel(&source, &self.settings))
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_pending()
    }
}
