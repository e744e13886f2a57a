//! Inline audio players
//!
//! One state machine drives both the hero player (with volume control and
//! first-gesture unlock) and the per-track card players.

use crate::coordinator::MediaRegistry;
use crate::element::{MediaEvent, MediaHandle, MediaId};
use crate::time::{format_time, usable_duration};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::debug;

/// Default hero volume when the control carries no value
pub const DEFAULT_VOLUME: f64 = 0.8;

/// Which instantiation of the player this is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerVariant {
    /// Page hero: volume control, labelled button, first-gesture unlock
    Hero,
    /// Catalog track card
    Track,
}

/// Player lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerStatus {
    /// Waiting for metadata
    Idle,
    /// Duration known, never started
    Ready,
    Playing,
    Paused,
    Ended,
    /// Load/decode failure, terminal
    Errored,
}

/// Observable state of one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub status: PlayerStatus,
    pub is_playing: bool,
    pub current_time: f64,
    pub duration: Option<f64>,
    /// Hero only
    pub volume: Option<f64>,
    pub errored: bool,
}

impl PlayerState {
    fn new(volume: Option<f64>) -> Self {
        Self {
            status: PlayerStatus::Idle,
            is_playing: false,
            current_time: 0.0,
            duration: None,
            volume,
            errored: false,
        }
    }
}

/// Localized player texts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerTexts {
    pub play_icon: String,
    pub pause_icon: String,
    pub play_label: String,
    pub pause_label: String,
    /// Replaces the hero button label after a failure
    pub hero_error_label: String,
    /// Hero error slot text
    pub hero_error_annotation: String,
    /// Inline annotation appended to a failed track card
    pub track_error_annotation: String,
    /// Duration text of a failed track card
    pub unknown_duration: String,
}

impl Default for PlayerTexts {
    fn default() -> Self {
        Self {
            play_icon: "▶".into(),
            pause_icon: "❚❚".into(),
            play_label: "Přehrát ukázku".into(),
            pause_label: "Pauza".into(),
            hero_error_label: "Soubor nejde přehrát.".into(),
            hero_error_annotation: "Audio není dostupné.".into(),
            track_error_annotation: "Soubor se nepodařilo načíst.".into(),
            unknown_duration: "—".into(),
        }
    }
}

/// Play/pause button presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affordance<'a> {
    pub playing: bool,
    pub icon: &'a str,
    /// Hero only
    pub label: Option<&'a str>,
}

/// Controls and displays bound to one player
pub trait PlayerView {
    /// Icon, label, `aria-pressed` and the card's "now playing" class
    fn render_affordance(&mut self, affordance: &Affordance<'_>);

    /// Replace the button label (hero)
    fn set_label(&mut self, _text: &str) {}

    fn set_current_text(&mut self, text: &str);

    fn set_duration_text(&mut self, text: &str);

    /// Seek control position in percent
    fn set_seek_position(&mut self, percent: f64);

    fn set_seek_enabled(&mut self, enabled: bool);

    fn set_play_enabled(&mut self, enabled: bool);

    /// Whether an error annotation is already displayed
    fn has_error_annotation(&self) -> bool;

    /// Display the inline error annotation
    fn show_error(&mut self, message: &str);
}

/// Markup parts of the hero player
///
/// `None` marks a part missing from the page.
pub struct HeroParts {
    pub element: Option<MediaHandle>,
    pub view: Option<Box<dyn PlayerView>>,
    /// Raw value of the volume control
    pub volume_control: Option<String>,
}

/// Markup parts of a track card
pub struct TrackParts {
    pub element: Option<MediaHandle>,
    pub view: Option<Box<dyn PlayerView>>,
}

/// Inline audio player
pub struct AudioPlayer {
    id: MediaId,
    variant: PlayerVariant,
    element: MediaHandle,
    view: Box<dyn PlayerView>,
    registry: Rc<MediaRegistry>,
    texts: PlayerTexts,
    state: PlayerState,
    unlocked: bool,
}

impl AudioPlayer {
    /// Wire the hero player; declines when any required part is missing
    pub fn hero(parts: HeroParts, registry: &Rc<MediaRegistry>, texts: PlayerTexts) -> Option<Self> {
        let (Some(element), Some(view), Some(volume_control)) =
            (parts.element, parts.view, parts.volume_control)
        else {
            debug!("Hero player markup incomplete, not wiring");
            return None;
        };

        let volume = parse_volume(&volume_control).unwrap_or(DEFAULT_VOLUME);
        let player = Self::attach(PlayerVariant::Hero, element, view, registry, texts, Some(volume));
        player.element.borrow_mut().set_volume(volume);
        Some(player)
    }

    /// Wire one track card; declines when any required part is missing
    pub fn track(parts: TrackParts, registry: &Rc<MediaRegistry>, texts: PlayerTexts) -> Option<Self> {
        let (Some(element), Some(view)) = (parts.element, parts.view) else {
            debug!("Track card markup incomplete, not wiring");
            return None;
        };

        Some(Self::attach(PlayerVariant::Track, element, view, registry, texts, None))
    }

    fn attach(
        variant: PlayerVariant,
        element: MediaHandle,
        view: Box<dyn PlayerView>,
        registry: &Rc<MediaRegistry>,
        texts: PlayerTexts,
        volume: Option<f64>,
    ) -> Self {
        let id = registry.register(&element);
        element.borrow_mut().set_inline_playback();

        let mut player = Self {
            id,
            variant,
            element,
            view,
            registry: Rc::clone(registry),
            texts,
            state: PlayerState::new(volume),
            unlocked: false,
        };

        player.view.set_seek_enabled(false);
        player.render_playing(false);
        player
    }

    pub fn id(&self) -> MediaId {
        self.id
    }

    pub fn variant(&self) -> PlayerVariant {
        self.variant
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    /// React to a lifecycle event of the player's own element
    pub fn handle_event(&mut self, event: MediaEvent) {
        if self.state.errored {
            // Errored is terminal
            if event == MediaEvent::Error {
                self.fail();
            }
            return;
        }

        match event {
            MediaEvent::LoadedMetadata => {
                let duration = self.element.borrow().duration();
                self.state.duration = duration;
                self.view.set_duration_text(&format_time(duration));
                self.view.set_seek_enabled(true);
                if self.state.status == PlayerStatus::Idle {
                    self.state.status = PlayerStatus::Ready;
                }
            }
            MediaEvent::TimeUpdate => self.refresh_position(),
            MediaEvent::Play => {
                self.state.status = PlayerStatus::Playing;
                self.render_playing(true);
                self.registry.pause_all_except(Some(self.id));
            }
            MediaEvent::Pause => {
                if self.state.status == PlayerStatus::Playing {
                    self.state.status = PlayerStatus::Paused;
                }
                self.render_playing(false);
            }
            MediaEvent::Ended => {
                self.state.status = PlayerStatus::Ended;
                self.render_playing(false);
            }
            MediaEvent::Error => self.fail(),
            MediaEvent::LoadedData => {}
        }
    }

    /// Play/pause button
    ///
    /// Starting broadcasts exclusivity first. A rejected start (autoplay
    /// policy) is only logged.
    pub fn toggle(&mut self) {
        if self.state.errored {
            return;
        }

        let paused = self.element.borrow().is_paused();
        if paused {
            self.registry.pause_all_except(Some(self.id));
            let started = self.element.borrow_mut().play();
            if let Err(e) = started {
                debug!(player = %self.id, error = %e, "Audio play blocked");
            }
        } else {
            let paused = self.element.borrow_mut().pause();
            if let Err(e) = paused {
                debug!(player = %self.id, error = %e, "Audio pause rejected");
            }
        }
    }

    /// Seek control input, `percent` in 0-100
    ///
    /// No-op until the duration is known.
    pub fn seek(&mut self, percent: f64) {
        if self.state.errored || !percent.is_finite() {
            return;
        }

        let mut element = self.element.borrow_mut();
        let Some(duration) = usable_duration(element.duration()) else {
            return;
        };

        let target = (percent.clamp(0.0, 100.0) / 100.0) * duration;
        element.set_current_time(target);
        self.state.current_time = target;
    }

    /// Volume control input (hero only), raw control value
    ///
    /// Unparsable input is ignored; values are clamped to 0.0-1.0.
    pub fn set_volume(&mut self, raw: &str) {
        if self.variant != PlayerVariant::Hero {
            return;
        }

        let Some(volume) = parse_volume(raw) else {
            debug!(value = raw, "Ignoring unparsable volume value");
            return;
        };

        self.element.borrow_mut().set_volume(volume);
        self.state.volume = Some(volume);
    }

    /// First user gesture anywhere on the page (hero only, once)
    ///
    /// Runs a silent play/pause cycle so later programmatic starts pass
    /// the platform's autoplay gate. Failures are ignored.
    pub fn unlock(&mut self) {
        if self.variant != PlayerVariant::Hero || self.unlocked {
            return;
        }
        self.unlocked = true;

        let unlocked = self.element.borrow_mut().unlock_playback();
        if let Err(e) = unlocked {
            debug!(player = %self.id, error = %e, "Autoplay unlock refused");
        }
    }

    /// Whether the first-gesture unlock already ran
    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    fn refresh_position(&mut self) {
        let (current, duration) = {
            let element = self.element.borrow();
            (element.current_time(), element.duration())
        };

        self.state.current_time = current;
        self.view.set_current_text(&format_time(Some(current)));

        if let Some(duration) = usable_duration(duration) {
            let mut percent = (current / duration) * 100.0;
            if self.variant == PlayerVariant::Hero {
                percent = (percent * 100.0).round() / 100.0;
            }
            self.view.set_seek_position(percent);
        }
    }

    fn fail(&mut self) {
        let first = !self.state.errored;
        self.state.errored = true;
        self.state.status = PlayerStatus::Errored;

        if first {
            self.state.is_playing = false;
            self.render_playing(false);
        }

        self.view.set_play_enabled(false);
        self.view.set_seek_enabled(false);

        match self.variant {
            PlayerVariant::Hero => {
                self.view.set_label(&self.texts.hero_error_label);
                if !self.view.has_error_annotation() {
                    self.view.show_error(&self.texts.hero_error_annotation);
                }
            }
            PlayerVariant::Track => {
                self.view.set_duration_text(&self.texts.unknown_duration);
                if !self.view.has_error_annotation() {
                    self.view.show_error(&self.texts.track_error_annotation);
                }
            }
        }
    }

    fn render_playing(&mut self, playing: bool) {
        self.state.is_playing = playing;

        let texts = &self.texts;
        let icon = if playing { &texts.pause_icon } else { &texts.play_icon };
        let label = match self.variant {
            PlayerVariant::Hero if playing => Some(texts.pause_label.as_str()),
            PlayerVariant::Hero => Some(texts.play_label.as_str()),
            PlayerVariant::Track => None,
        };

        self.view.render_affordance(&Affordance {
            playing,
            icon,
            label,
        });
    }
}

fn parse_volume(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 1.0))
}
