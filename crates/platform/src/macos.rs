//! macOS integrations via Objective-C FFI.

use objc2::MainThreadMarker;
use objc2_app_kit::NSApplication;
use std::sync::atomic::{AtomicIsize, Ordering};
use tracing::{debug, warn};

/// NSCriticalRequest: bounce until the app is activated.
const CRITICAL_REQUEST: isize = 0;

/// Id of the outstanding attention request, 0 when none.
static ATTENTION_REQUEST: AtomicIsize = AtomicIsize::new(0);

#[link(name = "AppKit", kind = "framework")]
extern "C" {
    fn NSBeep();
}

/// Start or cancel bouncing the dock icon.
pub fn request_attention(urgent: bool) {
    let Some(mtm) = MainThreadMarker::new() else {
        warn!("request_attention called off the main thread");
        return;
    };
    let app = NSApplication::sharedApplication(mtm);

    let previous = ATTENTION_REQUEST.swap(0, Ordering::SeqCst);
    if previous != 0 {
        unsafe {
            let _: () = objc2::msg_send![&app, cancelUserAttentionRequest: previous];
        }
    }
    if urgent {
        let request: isize =
            unsafe { objc2::msg_send![&app, requestUserAttention: CRITICAL_REQUEST] };
        ATTENTION_REQUEST.store(request, Ordering::SeqCst);
        debug!(request, "attention requested");
    }
}

pub fn beep() {
    unsafe { NSBeep() }
}
