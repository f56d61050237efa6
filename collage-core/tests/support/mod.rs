//! Fake collaborators shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use collage_core::ports::{Alerts, Compositor, Navigator, PhotoPicker, PhotoStore, PickerSession, Screen};
use collage_core::{CanvasSize, CollageConfig, CollageSession, Collaborators, Image, PersistError};

pub fn photo(tag: u8) -> Image {
    Image::new(CanvasSize::new(8, 8), vec![tag])
}

/// Lays photos side by side: the content is the concatenation of theirs.
#[derive(Default)]
pub struct StripCompositor {
    pub calls: Mutex<usize>,
}

impl Compositor for StripCompositor {
    fn composite(&self, photos: &[Image], size: CanvasSize) -> Image {
        *self.calls.lock() += 1;
        let content: Vec<u8> = photos.iter().flat_map(|p| p.content().to_vec()).collect();
        Image::new(size, content)
    }
}

/// Photo store whose persist calls stay pending until resolved by the test.
#[derive(Default)]
pub struct FakeStore {
    pending: Mutex<Vec<oneshot::Sender<Result<String, PersistError>>>>,
    pub persisted: Mutex<Vec<Image>>,
}

impl FakeStore {
    pub fn resolve(&self, result: Result<String, PersistError>) {
        let tx = self.pending.lock().remove(0);
        let _ = tx.send(result);
    }

    pub fn persist_calls(&self) -> usize {
        self.persisted.lock().len()
    }
}

impl PhotoStore for FakeStore {
    fn persist(&self, image: Image) -> BoxFuture<'static, Result<String, PersistError>> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().push(tx);
        self.persisted.lock().push(image);
        Box::pin(async move {
            rx.await
                .unwrap_or_else(|_| Err(PersistError::new("store dropped")))
        })
    }
}

/// Picker that hands out sessions the test drives directly.
#[derive(Default)]
pub struct FakePicker {
    sessions: Mutex<Vec<PickerSession>>,
    pub initial_counts: Mutex<Vec<usize>>,
}

impl FakePicker {
    pub fn last(&self) -> PickerSession {
        self.sessions
            .lock()
            .last()
            .cloned()
            .expect("picker was opened")
    }

    /// Pick one photo the way a picker screen does: photo first, then the
    /// updated count.
    pub fn pick(&self, image: Image) {
        let session = self.last();
        session.new_photos.emit(image);
        session.chosen_count.update(|count| count + 1);
    }

    pub fn finish(&self) {
        self.last().new_photos.complete();
    }
}

impl PhotoPicker for FakePicker {
    fn select_photos(&self, initial_count: usize) -> PickerSession {
        let session = PickerSession::new(initial_count);
        self.initial_counts.lock().push(initial_count);
        self.sessions.lock().push(session.clone());
        session
    }
}

/// Alerts that stay on screen until acknowledged by the test.
#[derive(Default)]
pub struct FakeAlerts {
    pub shown: Mutex<Vec<(String, Option<String>)>>,
    pending: Mutex<Vec<oneshot::Sender<()>>>,
}

impl FakeAlerts {
    pub fn count(&self) -> usize {
        self.shown.lock().len()
    }

    pub fn acknowledge_all(&self) {
        for tx in self.pending.lock().drain(..) {
            let _ = tx.send(());
        }
    }
}

impl Alerts for FakeAlerts {
    fn show_alert(&self, title: &str, body: Option<&str>) -> BoxFuture<'static, ()> {
        self.shown
            .lock()
            .push((title.to_string(), body.map(str::to_string)));
        let (tx, rx) = oneshot::channel();
        self.pending.lock().push(tx);
        Box::pin(async move {
            let _ = rx.await;
        })
    }
}

#[derive(Default)]
pub struct FakeNavigator {
    pub pops: Mutex<usize>,
}

impl Navigator for FakeNavigator {
    fn pop_screen(&self) {
        *self.pops.lock() += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenEvent {
    Save(bool),
    Clear(bool),
    Add(bool),
    Title(String),
    Preview(usize),
}

#[derive(Default)]
pub struct RecordingScreen {
    pub events: Mutex<Vec<ScreenEvent>>,
}

impl RecordingScreen {
    pub fn title(&self) -> Option<String> {
        self.events.lock().iter().rev().find_map(|e| match e {
            ScreenEvent::Title(t) => Some(t.clone()),
            _ => None,
        })
    }

    pub fn save_enabled(&self) -> Option<bool> {
        self.events.lock().iter().rev().find_map(|e| match e {
            ScreenEvent::Save(enabled) => Some(*enabled),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }
}

impl Screen for RecordingScreen {
    fn set_save_enabled(&self, enabled: bool) {
        self.events.lock().push(ScreenEvent::Save(enabled));
    }
    fn set_clear_enabled(&self, enabled: bool) {
        self.events.lock().push(ScreenEvent::Clear(enabled));
    }
    fn set_add_enabled(&self, enabled: bool) {
        self.events.lock().push(ScreenEvent::Add(enabled));
    }
    fn set_title(&self, title: &str) {
        self.events.lock().push(ScreenEvent::Title(title.to_string()));
    }
    fn show_preview(&self, image: &Image) {
        self.events.lock().push(ScreenEvent::Preview(image.content().len()));
    }
}

pub struct Fakes {
    pub compositor: Arc<StripCompositor>,
    pub store: Arc<FakeStore>,
    pub picker: Arc<FakePicker>,
    pub alerts: Arc<FakeAlerts>,
    pub navigator: Arc<FakeNavigator>,
    pub screen: Arc<RecordingScreen>,
}

impl Fakes {
    pub fn new() -> Self {
        Self {
            compositor: Arc::default(),
            store: Arc::default(),
            picker: Arc::default(),
            alerts: Arc::default(),
            navigator: Arc::default(),
            screen: Arc::default(),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            compositor: self.compositor.clone(),
            store: self.store.clone(),
            picker: self.picker.clone(),
            alerts: self.alerts.clone(),
            navigator: self.navigator.clone(),
            screen: self.screen.clone(),
        }
    }

    pub fn pops(&self) -> usize {
        *self.navigator.pops.lock()
    }
}

pub fn session() -> (CollageSession, Fakes) {
    let fakes = Fakes::new();
    let session = CollageSession::new(CollageConfig::default(), fakes.collaborators())
        .expect("session builds inside a runtime");
    (session, fakes)
}

/// Let spawned tasks run without moving the clock.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

/// Move the (paused) clock forward and let woken tasks run.
pub async fn advance(duration: Duration) {
    // Freshly spawned timers must register before the clock moves.
    settle().await;
    tokio::time::advance(duration).await;
    settle().await;
}
