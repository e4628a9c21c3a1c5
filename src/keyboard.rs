//! # Keyboard Shortcuts
//!
//! Maps key presses to song-view [`Action`]s. [`shortcut_for`] is the pure
//! key table; [`KeyboardShortcuts`] is a registry of callbacks the host binds
//! per action and feeds every `keydown` through.
//!
//! | Key            | Action                                         |
//! |----------------|------------------------------------------------|
//! | space          | toggle auto-scroll                             |
//! | `]` / `[`      | scroll speed up / down                         |
//! | `+` `=` `u`    | font size up                                   |
//! | `-` `_` `i`    | font size down                                 |
//! | `c`            | toggle chords                                  |
//! | `f`            | fullscreen (outside fullscreen, or with Shift) |
//! | `r`            | random song                                    |
//! | `g` `y` `s`    | Google / YouTube / Spotify search              |
//! | `/`            | focus search (no modifier, search not focused) |
//! | `Escape`       | leave fullscreen                               |
//!
//! Nothing fires while the target is a text-entry surface: `input`,
//! `textarea` or any content-editable element.

use log::debug;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The element a key event was dispatched on
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventTarget {
    pub tag_name: String,
    pub is_content_editable: bool,
    /// Raw `contentEditable` attribute value, if any
    pub content_editable: Option<String>,
    /// True when the target is the global search field
    pub is_search_field: bool,
}

impl EventTarget {
    pub fn element(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            ..Self::default()
        }
    }

    pub fn body() -> Self {
        Self::element("BODY")
    }

    /// Whether typing here should go to the element rather than to shortcuts
    pub fn is_text_entry(&self) -> bool {
        let tag = self.tag_name.to_ascii_uppercase();
        tag == "INPUT"
            || tag == "TEXTAREA"
            || self.is_content_editable
            || self.content_editable.as_deref() == Some("true")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyEvent {
    pub key: String,
    pub shift_key: bool,
    pub ctrl_key: bool,
    pub alt_key: bool,
    pub meta_key: bool,
    pub target: EventTarget,
}

impl KeyEvent {
    pub fn new(key: &str, target: EventTarget) -> Self {
        Self {
            key: key.to_string(),
            target,
            ..Self::default()
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift_key = true;
        self
    }

    pub fn has_modifier(&self) -> bool {
        self.shift_key || self.ctrl_key || self.alt_key || self.meta_key
    }
}

/// Page state the key table depends on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShortcutContext {
    pub is_fullscreen: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    ToggleFullscreen,
    ToggleAutoScroll,
    IncreaseFontSize,
    DecreaseFontSize,
    IncreaseScrollSpeed,
    DecreaseScrollSpeed,
    ToggleChords,
    RandomSong,
    FocusSearch,
    OpenGoogle,
    OpenYouTube,
    OpenSpotify,
}

/// Look up the action for a key event, if it has one
pub fn shortcut_for(event: &KeyEvent, context: ShortcutContext) -> Option<Action> {
    if event.target.is_text_entry() {
        return None;
    }

    let key = event.key.to_lowercase();
    match key.as_str() {
        "f" if !context.is_fullscreen || event.shift_key => Some(Action::ToggleFullscreen),
        " " => Some(Action::ToggleAutoScroll),
        "+" | "=" | "u" => Some(Action::IncreaseFontSize),
        "-" | "_" | "i" => Some(Action::DecreaseFontSize),
        "]" => Some(Action::IncreaseScrollSpeed),
        "[" => Some(Action::DecreaseScrollSpeed),
        "c" => Some(Action::ToggleChords),
        "r" => Some(Action::RandomSong),
        "g" => Some(Action::OpenGoogle),
        "y" => Some(Action::OpenYouTube),
        "s" => Some(Action::OpenSpotify),
        "/" if !event.target.is_search_field && !event.has_modifier() => Some(Action::FocusSearch),
        "escape" if context.is_fullscreen => Some(Action::ToggleFullscreen),
        _ => None,
    }
}

/// Result of dispatching one key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub action: Option<Action>,
    /// The host should call `preventDefault` on the event
    pub prevent_default: bool,
}

impl Dispatch {
    const PASS_THROUGH: Dispatch = Dispatch {
        action: None,
        prevent_default: false,
    };
}

/// Callbacks bound to actions
pub struct KeyboardShortcuts {
    handlers: HashMap<Action, Box<dyn FnMut()>>,
    enabled: bool,
}

impl Default for KeyboardShortcuts {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyboardShortcuts {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            enabled: true,
        }
    }

    /// Bind a callback, replacing any previous one for the action
    pub fn bind(&mut self, action: Action, handler: impl FnMut() + 'static) -> &mut Self {
        self.handlers.insert(action, Box::new(handler));
        self
    }

    pub fn unbind(&mut self, action: Action) {
        self.handlers.remove(&action);
    }

    pub fn is_bound(&self, action: Action) -> bool {
        self.handlers.contains_key(&action)
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Run the callback for a key event. Keys without a bound callback are
    /// passed through untouched.
    pub fn dispatch(&mut self, event: &KeyEvent, context: ShortcutContext) -> Dispatch {
        if !self.enabled {
            return Dispatch::PASS_THROUGH;
        }
        let Some(action) = shortcut_for(event, context) else {
            return Dispatch::PASS_THROUGH;
        };
        match self.handlers.get_mut(&action) {
            Some(handler) => {
                debug!("shortcut {:?} -> {:?}", event.key, action);
                handler();
                Dispatch {
                    action: Some(action),
                    prevent_default: true,
                }
            }
            None => Dispatch::PASS_THROUGH,
        }
    }
}

/// External services a song can be looked up on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTarget {
    Google,
    YouTube,
    Spotify,
}

impl SearchTarget {
    pub fn for_action(action: Action) -> Option<Self> {
        match action {
            Action::OpenGoogle => Some(SearchTarget::Google),
            Action::OpenYouTube => Some(SearchTarget::YouTube),
            Action::OpenSpotify => Some(SearchTarget::Spotify),
            _ => None,
        }
    }
}

/// Search query for a song: its title, followed by the artist if known
pub fn search_query(title: &str, artist: Option<&str>) -> String {
    match artist {
        Some(artist) if !artist.is_empty() => format!("{} {}", title, artist),
        _ => title.to_string(),
    }
}

/// Everything but `A-Z a-z 0-9 - _ . ! ~ * ' ( )` is escaped
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn search_url(target: SearchTarget, title: &str, artist: Option<&str>) -> String {
    let query = utf8_percent_encode(&search_query(title, artist), URI_COMPONENT).to_string();
    match target {
        SearchTarget::Google => format!("https://www.google.com/search?q={}", query),
        SearchTarget::YouTube => format!("https://www.youtube.com/results?search_query={}", query),
        SearchTarget::Spotify => format!("https://open.spotify.com/search/{}", query),
    }
}
