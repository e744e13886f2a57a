//! Modal carousels (image and video lightboxes)
//!
//! A carousel owns an immutable catalog and, while open, exactly one
//! session with its modal surface. Navigation wraps in both directions.
//! The video variant sequences every source change through
//! [`VideoSequencer`] so playback only starts once the new source has
//! buffered.

use crate::coordinator::MediaRegistry;
use crate::element::{MediaEvent, MediaHandle, MediaId};
use crate::item::{Catalog, MediaItem};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, trace, warn};

/// Alt text for images without a title
pub const DEFAULT_ALT: &str = "Detail";

/// Lightbox flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CarouselKind {
    Image,
    Video,
}

/// Keys a carousel reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Key::Escape,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            _ => Key::Other,
        }
    }
}

/// Where a click on the modal landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The modal surface itself, i.e. the backdrop
    Surface,
    /// Anything inside the content box
    Content,
}

/// Why a modal was dismissed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DismissReason {
    CloseControl,
    Backdrop,
    NativeCancel,
    Escape,
}

/// Result of an open request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// In-page modal mounted
    Opened,
    /// No native modal support, source opened in a new browsing context
    External,
    /// Item does not exist, has no source, or the modal failed to mount
    NotOpenable,
}

/// Page-level services a modal needs
pub trait ModalHost {
    /// Whether the platform can present a native modal surface
    fn supports_native_modal(&self) -> bool;

    /// Open a URL in a new browsing context
    fn open_external(&mut self, url: &str);

    /// Create and attach a fresh modal surface
    fn mount(&mut self, kind: CarouselKind) -> crate::Result<Box<dyn ModalSurface>>;

    /// Lock or restore body scrolling
    fn set_scroll_locked(&mut self, locked: bool);

    /// Install the global keyboard listener
    fn attach_key_listener(&mut self);

    /// Remove the global keyboard listener
    fn detach_key_listener(&mut self);
}

/// One mounted modal surface
pub trait ModalSurface {
    /// Show or hide (not merely disable) the previous/next controls
    fn set_navigation_visible(&mut self, visible: bool);

    fn set_counter(&mut self, text: &str);

    /// Title region; `None` hides it
    fn set_title(&mut self, title: Option<&str>);

    /// Image variant render
    fn show_image(&mut self, src: &str, alt: &str);

    /// Video element of a video surface
    fn video(&self) -> Option<MediaHandle>;

    /// Present the surface modally
    fn show_modal(&mut self);

    /// Platform close; fails when the surface is already closed
    fn close_native(&mut self) -> crate::Result<()>;

    /// Detach the surface from the document
    fn remove(&mut self);
}

/// Shared page host
pub type SharedModalHost = Rc<RefCell<dyn ModalHost>>;

/// Phases of a carousel video source change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoPhase {
    Idle,
    /// New source assigned, reload not issued yet
    SourceSet,
    /// Reload issued, waiting for enough data
    BufferingForPlayback,
    Playing,
}

/// Inputs of the video sequencer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoInput {
    SourceAssigned,
    ReloadIssued,
    EnoughData,
    Stopped,
}

/// Side effect requested by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoAction {
    /// Broadcast exclusivity, then start playback
    StartPlayback,
}

/// Load-before-play state machine for the modal video
///
/// `EnoughData` only starts playback from `BufferingForPlayback`, so it
/// fires once per source change and stale notifications are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoSequencer {
    phase: VideoPhase,
}

impl Default for VideoSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoSequencer {
    pub fn new() -> Self {
        Self {
            phase: VideoPhase::Idle,
        }
    }

    pub fn phase(&self) -> VideoPhase {
        self.phase
    }

    /// Apply one input
    pub fn transition(&mut self, input: VideoInput) -> Option<VideoAction> {
        let (next, action) = match (self.phase, input) {
            (_, VideoInput::SourceAssigned) => (VideoPhase::SourceSet, None),
            (VideoPhase::SourceSet, VideoInput::ReloadIssued) => {
                (VideoPhase::BufferingForPlayback, None)
            }
            (VideoPhase::BufferingForPlayback, VideoInput::EnoughData) => {
                (VideoPhase::Playing, Some(VideoAction::StartPlayback))
            }
            (_, VideoInput::Stopped) => (VideoPhase::Idle, None),
            (phase, _) => (phase, None),
        };

        if next != self.phase {
            trace!(from = ?self.phase, to = ?next, "Video sequencer transition");
        }
        self.phase = next;
        action
    }
}

/// State of an open carousel
#[derive(Debug, Clone)]
pub struct CarouselSession {
    items: Rc<[MediaItem]>,
    current_index: usize,
    total: usize,
}

impl CarouselSession {
    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn current_item(&self) -> &MediaItem {
        &self.items[self.current_index]
    }

    /// `index + 1 / total`
    pub fn counter_text(&self) -> String {
        format!("{} / {}", self.current_index + 1, self.total)
    }

    /// Wrapped index after moving by `delta`
    pub fn wrapped(&self, delta: isize) -> usize {
        wrap_index(self.current_index, delta, self.total)
    }
}

/// `(index + delta) mod total`, always in range; 0 when `total == 0`
pub fn wrap_index(index: usize, delta: isize, total: usize) -> usize {
    if total == 0 {
        return 0;
    }
    let total = total as isize;
    (index as isize + delta).rem_euclid(total) as usize
}

struct ModalVideo {
    id: MediaId,
    handle: MediaHandle,
    sequencer: VideoSequencer,
}

struct OpenModal {
    session: CarouselSession,
    surface: Box<dyn ModalSurface>,
    video: Option<ModalVideo>,
}

/// Image or video lightbox
pub struct Carousel {
    kind: CarouselKind,
    catalog: Catalog,
    items: Rc<[MediaItem]>,
    host: SharedModalHost,
    registry: Rc<MediaRegistry>,
    open: Option<OpenModal>,
}

impl Carousel {
    /// Create a lightbox; declines for an empty catalog
    pub fn new(
        kind: CarouselKind,
        catalog: Catalog,
        host: SharedModalHost,
        registry: &Rc<MediaRegistry>,
    ) -> Option<Self> {
        if catalog.is_empty() {
            debug!(?kind, "No openable lightbox items, not wiring");
            return None;
        }

        let items: Rc<[MediaItem]> = catalog.items().to_vec().into();
        Some(Self {
            kind,
            catalog,
            items,
            host,
            registry: Rc::clone(registry),
            open: None,
        })
    }

    pub fn kind(&self) -> CarouselKind {
        self.kind
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Active session, if the modal is mounted
    pub fn session(&self) -> Option<&CarouselSession> {
        self.open.as_ref().map(|open| &open.session)
    }

    /// Identity of the modal video while a video session is open
    pub fn video_id(&self) -> Option<MediaId> {
        self.open
            .as_ref()
            .and_then(|open| open.video.as_ref())
            .map(|video| video.id)
    }

    /// Sequencer phase of the modal video
    pub fn video_phase(&self) -> Option<VideoPhase> {
        self.open
            .as_ref()
            .and_then(|open| open.video.as_ref())
            .map(|video| video.sequencer.phase())
    }

    /// Open the item behind the trigger at markup `position`
    pub fn open_trigger(&mut self, position: usize) -> OpenOutcome {
        match self.catalog.index_for_trigger(position) {
            Some(index) => self.open(index),
            None => OpenOutcome::NotOpenable,
        }
    }

    /// Open the modal at `start_index`
    ///
    /// An already open session is closed first.
    pub fn open(&mut self, start_index: usize) -> OpenOutcome {
        let Some(item) = self.items.get(start_index) else {
            return OpenOutcome::NotOpenable;
        };

        if !self.host.borrow().supports_native_modal() {
            debug!(src = item.source_url(), "No native modal support, opening source directly");
            self.host.borrow_mut().open_external(item.source_url());
            return OpenOutcome::External;
        }

        if self.open.is_some() {
            debug!(kind = ?self.kind, "Closing previous lightbox session before reopening");
            self.close();
        }

        self.registry.pause_all_except(None);

        let mut surface = {
            let mut host = self.host.borrow_mut();
            let surface = match host.mount(self.kind) {
                Ok(surface) => surface,
                Err(e) => {
                    warn!(kind = ?self.kind, error = %e, "Failed to mount lightbox");
                    return OpenOutcome::NotOpenable;
                }
            };
            host.set_scroll_locked(true);
            host.attach_key_listener();
            surface
        };

        let total = self.items.len();
        surface.set_navigation_visible(total > 1);

        let video = match self.kind {
            CarouselKind::Video => surface.video().map(|handle| ModalVideo {
                id: self.registry.register(&handle),
                handle,
                sequencer: VideoSequencer::new(),
            }),
            CarouselKind::Image => None,
        };

        self.open = Some(OpenModal {
            session: CarouselSession {
                items: Rc::clone(&self.items),
                current_index: start_index,
                total,
            },
            surface,
            video,
        });

        self.render(start_index);
        if let Some(open) = self.open.as_mut() {
            open.surface.show_modal();
        }

        debug!(kind = ?self.kind, index = start_index, total, "Lightbox opened");
        OpenOutcome::Opened
    }

    /// Move by `delta` with wrap-around
    ///
    /// Returns false when closed or when there is nothing to navigate.
    pub fn step(&mut self, delta: isize) -> bool {
        let Some(open) = self.open.as_ref() else {
            return false;
        };
        if open.session.total <= 1 {
            return false;
        }

        let next = open.session.wrapped(delta);
        self.render(next);
        true
    }

    /// Global key press; returns whether it was handled
    pub fn handle_key(&mut self, key: Key) -> bool {
        if self.open.is_none() {
            return false;
        }

        match key {
            Key::Escape => self.dismiss(DismissReason::Escape),
            Key::ArrowLeft => self.step(-1),
            Key::ArrowRight => self.step(1),
            Key::Other => false,
        }
    }

    /// Click on the modal; only the backdrop dismisses
    pub fn handle_click(&mut self, target: ClickTarget) -> bool {
        match target {
            ClickTarget::Surface => self.dismiss(DismissReason::Backdrop),
            ClickTarget::Content => false,
        }
    }

    /// Native dismiss signal; the caller must prevent its default action
    pub fn handle_cancel(&mut self) -> bool {
        self.dismiss(DismissReason::NativeCancel)
    }

    /// Close through any dismissal path
    pub fn dismiss(&mut self, reason: DismissReason) -> bool {
        let closed = self.close();
        if closed {
            debug!(kind = ?self.kind, ?reason, "Lightbox dismissed");
        }
        closed
    }

    /// Tear down the open session; idempotent
    pub fn close(&mut self) -> bool {
        let Some(mut open) = self.open.take() else {
            return false;
        };

        if let Some(video) = open.video.as_mut() {
            video.sequencer.transition(VideoInput::Stopped);
            if let Err(e) = video.handle.borrow_mut().pause() {
                trace!(error = %e, "Modal video refused to pause");
            }
            self.registry.unregister(video.id);
        }

        if let Err(e) = open.surface.close_native() {
            trace!(error = %e, "Ignoring close of an already closed modal");
        }
        open.surface.remove();

        let mut host = self.host.borrow_mut();
        host.set_scroll_locked(false);
        host.detach_key_listener();
        true
    }

    /// Lifecycle event of the modal video; returns whether it belonged here
    pub fn handle_media_event(&mut self, id: MediaId, event: MediaEvent) -> bool {
        let Some(video) = self
            .open
            .as_mut()
            .and_then(|open| open.video.as_mut())
            .filter(|video| video.id == id)
        else {
            return false;
        };

        match event {
            MediaEvent::LoadedData => {
                if video.sequencer.transition(VideoInput::EnoughData)
                    == Some(VideoAction::StartPlayback)
                {
                    self.registry.pause_all_except(Some(id));
                    let started = video.handle.borrow_mut().play();
                    if let Err(e) = started {
                        debug!(error = %e, "Video autoplay blocked");
                    }
                }
            }
            MediaEvent::Play => {
                self.registry.pause_all_except(Some(id));
            }
            MediaEvent::Error => debug!(%id, "Modal video failed to load"),
            _ => {}
        }
        true
    }

    fn render(&mut self, index: usize) {
        let Some(open) = self.open.as_mut() else {
            return;
        };
        let Some(item) = self.items.get(index) else {
            return;
        };

        open.session.current_index = index;

        match self.kind {
            CarouselKind::Image => {
                open.surface
                    .show_image(item.source_url(), item.title().unwrap_or(DEFAULT_ALT));
            }
            CarouselKind::Video => {
                if let Some(video) = open.video.as_mut() {
                    load_video(video, item);
                }
            }
        }

        open.surface.set_title(item.title());
        open.surface.set_counter(&open.session.counter_text());
    }
}

/// Pause, assign, reload; playback resumes on `LoadedData`
fn load_video(video: &mut ModalVideo, item: &MediaItem) {
    let mut element = video.handle.borrow_mut();

    if let Err(e) = element.pause() {
        trace!(error = %e, "Modal video refused to pause before source change");
    }

    video.sequencer.transition(VideoInput::SourceAssigned);
    element.set_source(item.source_url());
    element.set_poster(item.poster_url());
    element.load();
    video.sequencer.transition(VideoInput::ReloadIssued);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_index_wraps_both_ways() {
        assert_eq!(wrap_index(0, -1, 4), 3);
        assert_eq!(wrap_index(3, 1, 4), 0);
        assert_eq!(wrap_index(1, 1, 4), 2);
        assert_eq!(wrap_index(2, -9, 4), 1);
        assert_eq!(wrap_index(0, 5, 0), 0);
    }

    #[test]
    fn sequencer_runs_linear_path() {
        let mut seq = VideoSequencer::new();
        assert_eq!(seq.phase(), VideoPhase::Idle);

        assert_eq!(seq.transition(VideoInput::SourceAssigned), None);
        assert_eq!(seq.phase(), VideoPhase::SourceSet);

        assert_eq!(seq.transition(VideoInput::ReloadIssued), None);
        assert_eq!(seq.phase(), VideoPhase::BufferingForPlayback);

        assert_eq!(
            seq.transition(VideoInput::EnoughData),
            Some(VideoAction::StartPlayback)
        );
        assert_eq!(seq.phase(), VideoPhase::Playing);
    }

    #[test]
    fn enough_data_fires_once() {
        let mut seq = VideoSequencer::new();
        seq.transition(VideoInput::SourceAssigned);
        seq.transition(VideoInput::ReloadIssued);
        seq.transition(VideoInput::EnoughData);

        assert_eq!(seq.transition(VideoInput::EnoughData), None);
        assert_eq!(seq.phase(), VideoPhase::Playing);
    }

    #[test]
    fn stale_data_before_reload_is_ignored() {
        let mut seq = VideoSequencer::new();
        assert_eq!(seq.transition(VideoInput::EnoughData), None);

        seq.transition(VideoInput::SourceAssigned);
        assert_eq!(seq.transition(VideoInput::EnoughData), None);
        assert_eq!(seq.phase(), VideoPhase::SourceSet);
    }

    #[test]
    fn new_source_rearms_from_playing() {
        let mut seq = VideoSequencer::new();
        seq.transition(VideoInput::SourceAssigned);
        seq.transition(VideoInput::ReloadIssued);
        seq.transition(VideoInput::EnoughData);

        seq.transition(VideoInput::SourceAssigned);
        seq.transition(VideoInput::ReloadIssued);
        assert_eq!(
            seq.transition(VideoInput::EnoughData),
            Some(VideoAction::StartPlayback)
        );
    }

    #[test]
    fn stop_returns_to_idle() {
        let mut seq = VideoSequencer::new();
        seq.transition(VideoInput::SourceAssigned);
        seq.transition(VideoInput::ReloadIssued);
        seq.transition(VideoInput::Stopped);

        assert_eq!(seq.phase(), VideoPhase::Idle);
        assert_eq!(seq.transition(VideoInput::EnoughData), None);
    }

    #[test]
    fn key_names() {
        assert_eq!(Key::from_name("Escape"), Key::Escape);
        assert_eq!(Key::from_name("ArrowLeft"), Key::ArrowLeft);
        assert_eq!(Key::from_name("ArrowRight"), Key::ArrowRight);
        assert_eq!(Key::from_name("Enter"), Key::Other);
    }
}
