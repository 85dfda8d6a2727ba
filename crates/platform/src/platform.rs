//! Native desktop integrations the windowing layer does not cover.
//!
//! Attention requests and the system beep. Both are no-ops outside macOS.

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "macos")]
pub use macos::*;

#[cfg(not(target_os = "macos"))]
pub fn request_attention(urgent: bool) {
    tracing::trace!(urgent, "attention requests are unsupported on this platform");
}

#[cfg(not(target_os = "macos"))]
pub fn beep() {}
