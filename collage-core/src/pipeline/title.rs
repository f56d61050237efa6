//! Title coordination.
//!
//! The screen title has two writers: the composition pipeline (the normal
//! "N photos" title) and the selection intake (a transient "Selected N
//! photos" override). The last write wins. Every write bumps a generation
//! counter; a scheduled revert captures the generation when it is
//! scheduled and only applies if nothing else touched the title since.
//!
//! The generation check and the screen write happen under one lock, so a
//! write can never land between a revert's check and its own write.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tracing::debug;

use super::spawn_scoped;
use crate::ports::Screen;
use crate::reactive::Subscription;

struct Inner {
    screen: Arc<dyn Screen>,
    generation: Mutex<u64>,
}

#[derive(Clone)]
pub struct TitleController {
    inner: Arc<Inner>,
}

impl TitleController {
    pub fn new(screen: Arc<dyn Screen>) -> Self {
        Self {
            inner: Arc::new(Inner {
                screen,
                generation: Mutex::new(0),
            }),
        }
    }

    /// Show the title derived from the current photo list.
    pub fn show_list_title(&self, title: &str) {
        self.write(title);
    }

    /// Show a transient title until a revert or another write replaces it.
    pub fn show_override(&self, title: &str) {
        debug!(title, "title override");
        self.write(title);
    }

    pub fn generation(&self) -> u64 {
        *self.inner.generation.lock()
    }

    /// After `delay`, replace the title with `restore()` unless the title
    /// was written in the meantime.
    ///
    /// `restore` runs when the timer fires, so it sees the photo list as it
    /// is then. It runs with the title locked and must not write the title
    /// itself. Cancelling the returned subscription aborts the timer.
    pub fn schedule_revert<F>(&self, runtime: &Handle, delay: Duration, restore: F) -> Subscription
    where
        F: FnOnce() -> String + Send + 'static,
    {
        let captured = self.generation();
        let this = self.clone();
        spawn_scoped(runtime, move |token| async move {
            tokio::time::sleep(delay).await;
            if token.is_active() {
                this.revert_if_unchanged(captured, restore);
            }
        })
    }

    fn revert_if_unchanged<F>(&self, captured: u64, restore: F)
    where
        F: FnOnce() -> String,
    {
        let mut generation = self.inner.generation.lock();
        if *generation != captured {
            debug!("selection title revert superseded");
            return;
        }
        let title = restore();
        *generation += 1;
        debug!(%title, "selection title reverted");
        self.inner.screen.set_title(&title);
    }

    fn write(&self, title: &str) {
        let mut generation = self.inner.generation.lock();
        *generation += 1;
        self.inner.screen.set_title(title);
    }
}
