//! Dedicated VT parsing thread.
//!
//! PTY output is parsed on its own OS thread so heavy output never stalls
//! the UI. The UI polls an `AtomicBool` render flag on a timer.

use alacritty_terminal::event::EventListener;
use alacritty_terminal::term::Term;
use alacritty_terminal::vte::ansi::Processor;
use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Minimum interval between render signals.
const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(4);

/// Idle wait before re-checking shutdown and exit flags.
const IDLE_RECV_TIMEOUT: Duration = Duration::from_millis(100);

const BATCH_BUFFER_CAPACITY: usize = 64 * 1024;

/// Handle to the parsing thread. Dropping it asks the thread to stop; the
/// thread is not joined because it may be waiting on the term lock.
pub struct TerminalProcessor {
    shutdown: Arc<AtomicBool>,
    render_needed: Arc<AtomicBool>,
    output_seen: Arc<AtomicBool>,
    exited: Arc<AtomicBool>,
}

impl TerminalProcessor {
    /// Start parsing `output_rx` into `term`.
    pub fn start<L>(
        output_rx: Receiver<Vec<u8>>,
        term: Arc<Mutex<Term<L>>>,
        exited: Arc<AtomicBool>,
    ) -> Result<Self>
    where
        L: EventListener + Send + 'static,
    {
        let shutdown = Arc::new(AtomicBool::new(false));
        let render_needed = Arc::new(AtomicBool::new(false));
        let output_seen = Arc::new(AtomicBool::new(false));

        let flags = ThreadFlags {
            shutdown: shutdown.clone(),
            render_needed: render_needed.clone(),
            output_seen: output_seen.clone(),
        };

        thread::Builder::new()
            .name("termise-vt".into())
            .spawn(move || vt_thread_loop(output_rx, term, flags))
            .context("failed to spawn VT processing thread")?;

        Ok(Self {
            shutdown,
            render_needed,
            output_seen,
            exited,
        })
    }

    /// Check and clear the render flag.
    pub fn take_render_needed(&self) -> bool {
        self.render_needed.swap(false, Ordering::AcqRel)
    }

    /// Check and clear the "new child output arrived" flag, used for
    /// scroll-on-output.
    pub fn take_output_seen(&self) -> bool {
        self.output_seen.swap(false, Ordering::AcqRel)
    }

    pub fn has_exited(&self) -> bool {
        self.exited.load(Ordering::Acquire)
    }
}

impl Drop for TerminalProcessor {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
    }
}

struct ThreadFlags {
    shutdown: Arc<AtomicBool>,
    render_needed: Arc<AtomicBool>,
    output_seen: Arc<AtomicBool>,
}

fn vt_thread_loop<L: EventListener>(
    output_rx: Receiver<Vec<u8>>,
    term: Arc<Mutex<Term<L>>>,
    flags: ThreadFlags,
) {
    let mut processor: Processor = Processor::new();
    // Start in the past so the first batch always signals.
    let mut last_signal = Instant::now() - MIN_FRAME_INTERVAL;
    let mut batch = Vec::with_capacity(BATCH_BUFFER_CAPACITY);
    let mut throttled = false;

    loop {
        if flags.shutdown.load(Ordering::Acquire) {
            break;
        }

        match output_rx.recv_timeout(IDLE_RECV_TIMEOUT) {
            Ok(data) => {
                batch.clear();
                batch.extend_from_slice(&data);
                while let Ok(more) = output_rx.try_recv() {
                    batch.extend_from_slice(&more);
                }

                processor.advance(&mut *term.lock(), &batch);

                let now = Instant::now();
                if now.duration_since(last_signal) >= MIN_FRAME_INTERVAL {
                    flags.render_needed.store(true, Ordering::Release);
                    last_signal = now;
                    throttled = false;
                } else {
                    throttled = true;
                }
                flags.output_seen.store(true, Ordering::Release);
            }
            Err(RecvTimeoutError::Timeout) => {
                if throttled {
                    flags.render_needed.store(true, Ordering::Release);
                    throttled = false;
                }
            }
            // The reader thread drops the sender after the child exits, so
            // everything it read has been parsed by now.
            Err(RecvTimeoutError::Disconnected) => {
                flags.render_needed.store(true, Ordering::Release);
                break;
            }
        }
    }
}
