//! Shared in-memory page doubles for integration tests
#![allow(dead_code)]

use ksn_media::{
    Affordance, CarouselKind, HeroParts, MediaElement, MediaError, MediaEvent, MediaHandle,
    MediaId, MediaKind, ModalHost, ModalSurface, PlayerView, RawItemAttributes, SharedModalHost,
    Site, TrackParts,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Ordered record of side effects across every double
pub type Timeline = Rc<RefCell<Vec<String>>>;

pub fn timeline() -> Timeline {
    Rc::new(RefCell::new(Vec::new()))
}

// ===== Media element =====

pub struct FakeMedia {
    pub name: String,
    pub kind: MediaKind,
    pub paused: bool,
    pub refuse_play: bool,
    pub current_time: f64,
    pub duration: Option<f64>,
    pub volume: f64,
    pub source: Option<String>,
    pub poster: Option<String>,
    pub inline: bool,
    /// Events the platform would deliver next
    pub pending: Vec<MediaEvent>,
    timeline: Timeline,
}

impl FakeMedia {
    pub fn new(name: &str, kind: MediaKind, timeline: &Timeline) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            name: name.to_string(),
            kind,
            paused: true,
            refuse_play: false,
            current_time: 0.0,
            duration: None,
            volume: 1.0,
            source: None,
            poster: None,
            inline: false,
            pending: Vec::new(),
            timeline: Rc::clone(timeline),
        }))
    }

    fn record(&self, op: &str) {
        self.timeline
            .borrow_mut()
            .push(format!("{}:{}", self.name, op));
    }
}

pub fn handle(media: &Rc<RefCell<FakeMedia>>) -> MediaHandle {
    media.clone()
}

impl MediaElement for FakeMedia {
    fn kind(&self) -> MediaKind {
        self.kind
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn play(&mut self) -> ksn_media::Result<()> {
        self.record("play");
        if self.refuse_play {
            return Err(MediaError::PlayRejected("NotAllowedError".into()));
        }
        if self.paused {
            self.paused = false;
            self.pending.push(MediaEvent::Play);
        }
        Ok(())
    }

    fn pause(&mut self) -> ksn_media::Result<()> {
        self.record("pause");
        if !self.paused {
            self.paused = true;
            self.pending.push(MediaEvent::Pause);
        }
        Ok(())
    }

    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.current_time = seconds;
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
    }

    fn set_source(&mut self, url: &str) {
        self.record(&format!("src={url}"));
        self.source = Some(url.to_string());
    }

    fn set_poster(&mut self, poster: Option<&str>) {
        self.record(&format!("poster={}", poster.unwrap_or("-")));
        self.poster = poster.map(str::to_string);
    }

    fn load(&mut self) {
        self.record("load");
    }

    fn set_inline_playback(&mut self) {
        self.inline = true;
    }

    fn unlock_playback(&mut self) -> ksn_media::Result<()> {
        self.record("unlock");
        self.play()?;
        self.pause()
    }
}

// ===== Player view =====

#[derive(Debug, Default)]
pub struct ViewLog {
    pub playing: bool,
    pub icon: String,
    pub label: Option<String>,
    pub current: String,
    pub duration: String,
    pub seek_position: Option<f64>,
    pub seek_enabled: Option<bool>,
    pub play_enabled: Option<bool>,
    pub errors: Vec<String>,
    pub renders: usize,
}

pub struct RecordingView {
    pub log: Rc<RefCell<ViewLog>>,
}

impl RecordingView {
    pub fn new() -> (Box<dyn PlayerView>, Rc<RefCell<ViewLog>>) {
        let log = Rc::new(RefCell::new(ViewLog::default()));
        (
            Box::new(Self {
                log: Rc::clone(&log),
            }),
            log,
        )
    }
}

impl PlayerView for RecordingView {
    fn render_affordance(&mut self, affordance: &Affordance<'_>) {
        let mut log = self.log.borrow_mut();
        log.playing = affordance.playing;
        log.icon = affordance.icon.to_string();
        log.label = affordance.label.map(str::to_string);
        log.renders += 1;
    }

    fn set_label(&mut self, text: &str) {
        self.log.borrow_mut().label = Some(text.to_string());
    }

    fn set_current_text(&mut self, text: &str) {
        self.log.borrow_mut().current = text.to_string();
    }

    fn set_duration_text(&mut self, text: &str) {
        self.log.borrow_mut().duration = text.to_string();
    }

    fn set_seek_position(&mut self, percent: f64) {
        self.log.borrow_mut().seek_position = Some(percent);
    }

    fn set_seek_enabled(&mut self, enabled: bool) {
        self.log.borrow_mut().seek_enabled = Some(enabled);
    }

    fn set_play_enabled(&mut self, enabled: bool) {
        self.log.borrow_mut().play_enabled = Some(enabled);
    }

    fn has_error_annotation(&self) -> bool {
        !self.log.borrow().errors.is_empty()
    }

    fn show_error(&mut self, message: &str) {
        self.log.borrow_mut().errors.push(message.to_string());
    }
}

// ===== Modal host =====

#[derive(Debug, Default)]
pub struct SurfaceLog {
    pub kind: Option<CarouselKind>,
    pub nav_visible: Option<bool>,
    pub counter: String,
    pub title: Option<String>,
    pub title_hidden: bool,
    pub image: Option<(String, String)>,
    pub shown: bool,
    pub native_closed: bool,
    pub removed: bool,
}

pub struct FakeSurface {
    log: Rc<RefCell<SurfaceLog>>,
    video: Option<Rc<RefCell<FakeMedia>>>,
    timeline: Timeline,
}

impl ModalSurface for FakeSurface {
    fn set_navigation_visible(&mut self, visible: bool) {
        self.log.borrow_mut().nav_visible = Some(visible);
    }

    fn set_counter(&mut self, text: &str) {
        self.log.borrow_mut().counter = text.to_string();
    }

    fn set_title(&mut self, title: Option<&str>) {
        let mut log = self.log.borrow_mut();
        log.title = title.map(str::to_string);
        log.title_hidden = title.is_none();
    }

    fn show_image(&mut self, src: &str, alt: &str) {
        self.log.borrow_mut().image = Some((src.to_string(), alt.to_string()));
    }

    fn video(&self) -> Option<MediaHandle> {
        self.video.as_ref().map(handle)
    }

    fn show_modal(&mut self) {
        self.timeline.borrow_mut().push("surface:show".into());
        self.log.borrow_mut().shown = true;
    }

    fn close_native(&mut self) -> ksn_media::Result<()> {
        let mut log = self.log.borrow_mut();
        if log.native_closed {
            return Err(MediaError::AlreadyClosed);
        }
        log.native_closed = true;
        Ok(())
    }

    fn remove(&mut self) {
        self.timeline.borrow_mut().push("surface:remove".into());
        self.log.borrow_mut().removed = true;
    }
}

#[derive(Default)]
pub struct HostLog {
    pub fail_mount: bool,
    pub external: Vec<String>,
    pub scroll_locked: bool,
    pub listeners_attached: usize,
    pub listeners_detached: usize,
    pub surfaces: Vec<Rc<RefCell<SurfaceLog>>>,
    pub videos: Vec<Rc<RefCell<FakeMedia>>>,
}

impl HostLog {
    pub fn active_listeners(&self) -> usize {
        self.listeners_attached - self.listeners_detached
    }

    pub fn last_surface(&self) -> Rc<RefCell<SurfaceLog>> {
        Rc::clone(self.surfaces.last().expect("no surface mounted"))
    }

    pub fn last_video(&self) -> Rc<RefCell<FakeMedia>> {
        Rc::clone(self.videos.last().expect("no video mounted"))
    }
}

pub struct FakeHost {
    pub native: bool,
    pub log: Rc<RefCell<HostLog>>,
    timeline: Timeline,
}

impl FakeHost {
    pub fn new(native: bool, timeline: &Timeline) -> (SharedModalHost, Rc<RefCell<HostLog>>) {
        let log = Rc::new(RefCell::new(HostLog::default()));
        let host: SharedModalHost = Rc::new(RefCell::new(Self {
            native,
            log: Rc::clone(&log),
            timeline: Rc::clone(timeline),
        }));
        (host, log)
    }
}

impl ModalHost for FakeHost {
    fn supports_native_modal(&self) -> bool {
        self.native
    }

    fn open_external(&mut self, url: &str) {
        self.log.borrow_mut().external.push(url.to_string());
    }

    fn mount(&mut self, kind: CarouselKind) -> ksn_media::Result<Box<dyn ModalSurface>> {
        if self.log.borrow().fail_mount {
            return Err(MediaError::Platform("createElement failed".into()));
        }

        let surface_log = Rc::new(RefCell::new(SurfaceLog {
            kind: Some(kind),
            ..SurfaceLog::default()
        }));
        let video = match kind {
            CarouselKind::Video => Some(FakeMedia::new("modal-video", MediaKind::Video, &self.timeline)),
            CarouselKind::Image => None,
        };

        let mut log = self.log.borrow_mut();
        log.surfaces.push(Rc::clone(&surface_log));
        if let Some(video) = &video {
            log.videos.push(Rc::clone(video));
        }

        self.timeline.borrow_mut().push("surface:mount".into());
        Ok(Box::new(FakeSurface {
            log: surface_log,
            video,
            timeline: Rc::clone(&self.timeline),
        }))
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.log.borrow_mut().scroll_locked = locked;
    }

    fn attach_key_listener(&mut self) {
        self.log.borrow_mut().listeners_attached += 1;
    }

    fn detach_key_listener(&mut self) {
        self.log.borrow_mut().listeners_detached += 1;
    }
}

// ===== Page harness =====

/// A wired site plus the doubles behind it
pub struct Page {
    pub site: Site,
    pub timeline: Timeline,
    pub host: Rc<RefCell<HostLog>>,
    pub hero: Option<(Rc<RefCell<FakeMedia>>, Rc<RefCell<ViewLog>>)>,
    pub tracks: Vec<(Rc<RefCell<FakeMedia>>, Rc<RefCell<ViewLog>>)>,
    /// Elements on the page that no player wraps
    pub loose: Vec<Rc<RefCell<FakeMedia>>>,
}

pub struct PageLayout {
    pub hero: bool,
    pub hero_volume: &'static str,
    pub tracks: usize,
    pub gallery: Vec<RawItemAttributes>,
    pub videos: Vec<RawItemAttributes>,
    pub native_modal: bool,
    /// Bare `<audio controls>` elements
    pub loose_audio: usize,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            hero: true,
            hero_volume: "",
            tracks: 3,
            gallery: Vec::new(),
            videos: Vec::new(),
            native_modal: true,
            loose_audio: 0,
        }
    }
}

pub fn images(count: usize) -> Vec<RawItemAttributes> {
    (0..count)
        .map(|i| {
            let src = format!("/img/{i}.jpg");
            let title = format!("Image {i}");
            RawItemAttributes::new(Some(&src), Some(&title), None)
        })
        .collect()
}

pub fn clips(count: usize) -> Vec<RawItemAttributes> {
    (0..count)
        .map(|i| {
            let src = format!("/video/{i}.mp4");
            let poster = format!("/video/{i}.jpg");
            let poster = if i % 2 == 0 { Some(poster.as_str()) } else { None };
            RawItemAttributes::new(Some(&src), Some("Clip"), poster)
        })
        .collect()
}

impl Page {
    pub fn build(layout: PageLayout) -> Self {
        let timeline = timeline();
        let (host, host_log) = FakeHost::new(layout.native_modal, &timeline);

        let hero = layout.hero.then(|| {
            let media = FakeMedia::new("hero", MediaKind::Audio, &timeline);
            let (view, log) = RecordingView::new();
            (media, view, log)
        });

        let mut hero_doubles = None;
        let hero_parts = hero.map(|(media, view, log)| {
            hero_doubles = Some((Rc::clone(&media), log));
            HeroParts {
                element: Some(handle(&media)),
                view: Some(view),
                volume_control: Some(layout.hero_volume.to_string()),
            }
        });

        let mut tracks = Vec::new();
        let mut track_parts = Vec::new();
        for i in 0..layout.tracks {
            let media = FakeMedia::new(&format!("track{i}"), MediaKind::Audio, &timeline);
            let (view, log) = RecordingView::new();
            track_parts.push(TrackParts {
                element: Some(handle(&media)),
                view: Some(view),
            });
            tracks.push((media, log));
        }

        let loose: Vec<_> = (0..layout.loose_audio)
            .map(|i| FakeMedia::new(&format!("bare{i}"), MediaKind::Audio, &timeline))
            .collect();

        let site = Site::wire(ksn_media::SiteParts {
            hero: hero_parts,
            tracks: track_parts,
            gallery: layout.gallery,
            videos: layout.videos,
            modal_host: Some(host),
            texts: ksn_media::PlayerTexts::default(),
            loose_media: loose.iter().map(handle).collect(),
        });

        Self {
            site,
            timeline,
            host: host_log,
            hero: hero_doubles,
            tracks,
            loose,
        }
    }

    pub fn hero_id(&self) -> MediaId {
        self.site.hero().expect("hero wired").id()
    }

    pub fn track_id(&self, index: usize) -> MediaId {
        self.site.tracks()[index].id()
    }

    fn doubles(&self) -> Vec<(MediaId, Rc<RefCell<FakeMedia>>)> {
        let mut all = Vec::new();
        if let Some((media, _)) = &self.hero {
            all.push((self.hero_id(), Rc::clone(media)));
        }
        for (i, (media, _)) in self.tracks.iter().enumerate() {
            all.push((self.track_id(i), Rc::clone(media)));
        }
        for (id, media) in self.site.loose_media_ids().into_iter().zip(&self.loose) {
            all.push((id, Rc::clone(media)));
        }
        if let Some(id) = self.site.videos().and_then(|v| v.video_id()) {
            all.push((id, self.host.borrow().last_video()));
        }
        all
    }

    /// Deliver every pending platform event until the page is quiet
    pub fn pump(&mut self) {
        loop {
            let mut delivered = false;
            for (id, media) in self.doubles() {
                let events: Vec<MediaEvent> = media.borrow_mut().pending.drain(..).collect();
                for event in events {
                    delivered = true;
                    self.site.dispatch(id, event);
                }
            }
            if !delivered {
                break;
            }
        }
    }

    /// Elements whose double reports playing
    pub fn playing(&self) -> Vec<String> {
        self.doubles()
            .into_iter()
            .filter(|(_, media)| !media.borrow().paused)
            .map(|(_, media)| media.borrow().name.clone())
            .collect()
    }

    pub fn clear_timeline(&self) {
        self.timeline.borrow_mut().clear();
    }

    pub fn timeline_entries(&self) -> Vec<String> {
        self.timeline.borrow().clone()
    }
}
