//! Pipelines
//!
//! The derived parts of the graph, each wired from the session's state
//! cell to its collaborators:
//!
//! - `composition`: photo list -> affordances, title, composed preview
//! - `intake`: picker streams -> capacity-filtered appends, selection title
//! - `save`: save action -> persist -> message -> reset
//! - `title`: the two-writer title with generation-checked revert

mod composition;
mod intake;
mod save;
mod title;

pub use composition::{CompositionPipeline, PreviewSlot};
pub use intake::SelectionIntake;
pub use save::SavePipeline;
pub use title::TitleController;

use std::future::Future;

use tokio::runtime::Handle;

use crate::reactive::{ActiveToken, Subscription};

/// Spawn a task tied to a subscription.
///
/// Cancelling the subscription aborts the task. The task receives the
/// subscription's token and should check it before touching shared state
/// after any suspension point. A task that runs to completion deactivates
/// the token, so a scope holding it can prune the handle.
pub(crate) fn spawn_scoped<F, Fut>(runtime: &Handle, task: F) -> Subscription
where
    F: FnOnce(ActiveToken) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    let token = Subscription::new_token();
    let future = task(token.clone());
    let finished = token.clone();
    let handle = runtime.spawn(async move {
        future.await;
        finished.finish();
    });
    Subscription::from_task(token, handle)
}
