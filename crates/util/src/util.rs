//! Shared utilities for termise.

/// Panic in debug builds, log error with backtrace in release.
///
/// Use for session invariants that must not take the terminal down in
/// production.
#[macro_export]
macro_rules! debug_panic {
    ( $($fmt_arg:tt)* ) => {
        if cfg!(debug_assertions) {
            panic!( $($fmt_arg)* );
        } else {
            let backtrace = std::backtrace::Backtrace::capture();
            tracing::error!("{}\n{:?}", format_args!($($fmt_arg)*), backtrace);
        }
    };
}

/// Log-and-discard helpers for fallible calls whose failure is not fatal.
pub trait ResultExt<T> {
    /// Log the error at warn level and turn the result into an `Option`.
    fn log_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                tracing::warn!(%error, location = %caller, "operation failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_err_keeps_ok_values() {
        let ok: Result<u8, String> = Ok(3);
        assert_eq!(ok.log_err(), Some(3));
    }

    #[test]
    fn log_err_discards_errors() {
        let err: Result<u8, String> = Err("boom".into());
        assert_eq!(err.log_err(), None);
    }
}
