//! A Tokio runtime living next to GPUI's executor.
//!
//! Tokio-only futures (signal streams, mostly) run on a small runtime stored
//! as a GPUI global.

use gpui::{App, Global, Task};
use std::future::Future;
use tokio::runtime::Runtime;
use tokio::task::JoinError;

struct GlobalTokio {
    runtime: Runtime,
}

impl Global for GlobalTokio {}

/// Start the runtime. Call once at startup, before [`spawn`].
pub fn init(cx: &mut App) -> std::io::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("termise-tokio")
        .enable_all()
        .build()?;
    cx.set_global(GlobalTokio { runtime });
    Ok(())
}

pub fn is_initialized(cx: &App) -> bool {
    cx.has_global::<GlobalTokio>()
}

/// Run `future` on the Tokio runtime.
///
/// Panics if [`init`] was not called.
pub fn spawn<Fut, R>(cx: &App, future: Fut) -> Task<Result<R, JoinError>>
where
    Fut: Future<Output = R> + Send + 'static,
    R: Send + 'static,
{
    let handle = cx.global::<GlobalTokio>().runtime.spawn(future);
    cx.background_executor().spawn(handle)
}
