//! Platform-agnostic media element seam
//!
//! Abstracts the page's `<audio>`/`<video>` elements so players and
//! carousels can run against the DOM in a browser and against plain
//! structs in tests.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Identity of a registered media element
///
/// Assigned by [`MediaRegistry::register`](crate::MediaRegistry::register).
/// The coordinator compares identities, never element contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MediaId(u64);

impl MediaId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "media#{}", self.0)
    }
}

/// Kind of media element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Audio,
    Video,
}

/// Lifecycle notifications delivered by the platform
///
/// Events carry no payload: handlers read time and duration back from
/// the element, the same way the platform exposes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaEvent {
    /// Duration became known
    LoadedMetadata,
    /// Enough data buffered to render the current frame
    LoadedData,
    /// Playback position moved
    TimeUpdate,
    /// Playback started
    Play,
    /// Playback paused (user action or coordinator)
    Pause,
    /// Reached end of media
    Ended,
    /// Load or decode failure
    Error,
}

/// A page media element
///
/// `play` and `pause` are requests: the platform confirms them later with
/// [`MediaEvent::Play`]/[`MediaEvent::Pause`]. Both may be rejected.
pub trait MediaElement {
    /// Audio or video
    fn kind(&self) -> MediaKind;

    /// Whether the element is currently paused
    fn is_paused(&self) -> bool;

    /// Request playback start
    fn play(&mut self) -> Result<()>;

    /// Request pause
    fn pause(&mut self) -> Result<()>;

    /// Current playback position in seconds
    fn current_time(&self) -> f64;

    /// Move the playback position
    fn set_current_time(&mut self, seconds: f64);

    /// Media duration in seconds, `None` until metadata is loaded
    fn duration(&self) -> Option<f64>;

    /// Output volume (0.0-1.0)
    fn volume(&self) -> f64;

    /// Set output volume (0.0-1.0)
    fn set_volume(&mut self, volume: f64);

    /// Assign a new source URL
    fn set_source(&mut self, url: &str);

    /// Assign or remove the poster image (video only)
    fn set_poster(&mut self, poster: Option<&str>);

    /// Reload the element after a source change
    fn load(&mut self);

    /// Ask the platform to keep playback inline (no fullscreen takeover)
    fn set_inline_playback(&mut self) {}

    /// Silent play then pause, used to pass the platform's autoplay gate
    ///
    /// The pause must wait for the platform to confirm `play`. The default
    /// suits elements whose `play` takes effect immediately.
    fn unlock_playback(&mut self) -> Result<()> {
        self.play()?;
        self.pause()
    }
}

/// Shared handle to a page media element
///
/// The page runs on a single event loop, so handles are `Rc<RefCell<_>>`.
pub type MediaHandle = Rc<RefCell<dyn MediaElement>>;
