//! Page bootstrap
//!
//! [`SITE_INIT`] guards wiring against repeated script evaluation.
//! [`Site`] owns every media component of the page and routes platform
//! events to them.

use crate::carousel::{Carousel, CarouselKind, Key, OpenOutcome, SharedModalHost};
use crate::coordinator::MediaRegistry;
use crate::element::{MediaEvent, MediaHandle, MediaId};
use crate::item::{Catalog, RawItemAttributes};
use crate::player::{AudioPlayer, HeroParts, PlayerTexts, TrackParts};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Run-once guard
pub struct InitGuard {
    done: AtomicBool,
}

impl InitGuard {
    pub const fn new() -> Self {
        Self {
            done: AtomicBool::new(false),
        }
    }

    /// Run `init` unless it already ran; returns whether it ran now
    pub fn run_once<F: FnOnce()>(&self, init: F) -> bool {
        if self
            .done
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        init();
        true
    }

    pub fn is_initialized(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }
}

impl Default for InitGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide guard used by the page entry point
pub static SITE_INIT: InitGuard = InitGuard::new();

/// Everything the page markup provides
pub struct SiteParts {
    pub hero: Option<HeroParts>,
    pub tracks: Vec<TrackParts>,
    /// `[data-gallery]` triggers in markup order
    pub gallery: Vec<RawItemAttributes>,
    /// `[data-video]` triggers in markup order
    pub videos: Vec<RawItemAttributes>,
    /// Required for the lightboxes; without it they are not wired
    pub modal_host: Option<SharedModalHost>,
    pub texts: PlayerTexts,
    /// Page `<audio>`/`<video>` elements no player wraps
    pub loose_media: Vec<MediaHandle>,
}

impl Default for SiteParts {
    fn default() -> Self {
        Self {
            hero: None,
            tracks: Vec::new(),
            gallery: Vec::new(),
            videos: Vec::new(),
            modal_host: None,
            texts: PlayerTexts::default(),
            loose_media: Vec::new(),
        }
    }
}

/// Wired page
pub struct Site {
    registry: Rc<MediaRegistry>,
    hero: Option<AudioPlayer>,
    tracks: Vec<AudioPlayer>,
    gallery: Option<Carousel>,
    videos: Option<Carousel>,
    /// Registered only so the exclusivity rule reaches them
    loose: Vec<(MediaId, MediaHandle)>,
}

impl Site {
    /// Wire every component whose markup is complete
    pub fn wire(parts: SiteParts) -> Self {
        let registry = Rc::new(MediaRegistry::new());

        let hero = parts
            .hero
            .and_then(|hero| AudioPlayer::hero(hero, &registry, parts.texts.clone()));

        let tracks: Vec<AudioPlayer> = parts
            .tracks
            .into_iter()
            .filter_map(|track| AudioPlayer::track(track, &registry, parts.texts.clone()))
            .collect();

        let (gallery, videos) = match parts.modal_host {
            Some(host) => (
                Carousel::new(
                    CarouselKind::Image,
                    Catalog::from_raw(parts.gallery),
                    Rc::clone(&host),
                    &registry,
                ),
                Carousel::new(CarouselKind::Video, Catalog::from_raw(parts.videos), host, &registry),
            ),
            None => (None, None),
        };

        let loose: Vec<(MediaId, MediaHandle)> = parts
            .loose_media
            .into_iter()
            .map(|handle| (registry.register(&handle), handle))
            .collect();

        info!(
            hero = hero.is_some(),
            tracks = tracks.len(),
            gallery = gallery.is_some(),
            videos = videos.is_some(),
            loose = loose.len(),
            "Media components wired"
        );

        Self {
            registry,
            hero,
            tracks,
            gallery,
            videos,
            loose,
        }
    }

    pub fn registry(&self) -> &Rc<MediaRegistry> {
        &self.registry
    }

    pub fn hero(&self) -> Option<&AudioPlayer> {
        self.hero.as_ref()
    }

    pub fn hero_mut(&mut self) -> Option<&mut AudioPlayer> {
        self.hero.as_mut()
    }

    pub fn tracks(&self) -> &[AudioPlayer] {
        &self.tracks
    }

    pub fn track_mut(&mut self, index: usize) -> Option<&mut AudioPlayer> {
        self.tracks.get_mut(index)
    }

    pub fn gallery(&self) -> Option<&Carousel> {
        self.gallery.as_ref()
    }

    pub fn gallery_mut(&mut self) -> Option<&mut Carousel> {
        self.gallery.as_mut()
    }

    pub fn videos(&self) -> Option<&Carousel> {
        self.videos.as_ref()
    }

    pub fn videos_mut(&mut self) -> Option<&mut Carousel> {
        self.videos.as_mut()
    }

    /// Identities of the registered elements no player wraps, in markup order
    pub fn loose_media_ids(&self) -> Vec<MediaId> {
        self.loose.iter().map(|(id, _)| *id).collect()
    }

    /// Player owning the element `id`
    pub fn player_mut(&mut self, id: MediaId) -> Option<&mut AudioPlayer> {
        self.hero
            .iter_mut()
            .chain(self.tracks.iter_mut())
            .find(|player| player.id() == id)
    }

    /// Deliver a lifecycle event of element `id`
    pub fn dispatch(&mut self, id: MediaId, event: MediaEvent) {
        if let Some(player) = self.player_mut(id) {
            player.handle_event(event);
            return;
        }

        if self.loose.iter().any(|(loose_id, _)| *loose_id == id) {
            if event == MediaEvent::Play {
                self.registry.pause_all_except(Some(id));
            }
            return;
        }

        let handled = self
            .videos
            .as_mut()
            .is_some_and(|videos| videos.handle_media_event(id, event));
        if !handled {
            debug!(%id, ?event, "Event for unknown media element");
        }
    }

    /// Open the gallery at trigger `position`, closing an open video modal
    pub fn open_gallery(&mut self, position: usize) -> OpenOutcome {
        if let Some(videos) = self.videos.as_mut() {
            videos.close();
        }
        self.gallery
            .as_mut()
            .map_or(OpenOutcome::NotOpenable, |gallery| gallery.open_trigger(position))
    }

    /// Open the video lightbox at trigger `position`, closing an open gallery
    pub fn open_video(&mut self, position: usize) -> OpenOutcome {
        if let Some(gallery) = self.gallery.as_mut() {
            gallery.close();
        }
        self.videos
            .as_mut()
            .map_or(OpenOutcome::NotOpenable, |videos| videos.open_trigger(position))
    }

    /// Global key press, routed to whichever modal is open
    pub fn handle_key(&mut self, key: Key) -> bool {
        self.gallery
            .iter_mut()
            .chain(self.videos.iter_mut())
            .find(|carousel| carousel.is_open())
            .is_some_and(|carousel| carousel.handle_key(key))
    }

    /// First pointer-down or key-down anywhere on the page
    pub fn first_gesture(&mut self) {
        if let Some(hero) = self.hero.as_mut() {
            hero.unlock();
        }
    }
}
