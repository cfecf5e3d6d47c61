//! Debug tracing.
//!
//! Set `INDEX_UPDATE_DEBUG=1` to print one line per index resolution and
//! scatter to stderr. The variable is read once per process.

use once_cell::sync::Lazy;

/// Name of the environment variable that enables tracing
pub const DEBUG_ENV: &str = "INDEX_UPDATE_DEBUG";

static ENABLED: Lazy<bool> = Lazy::new(|| std::env::var_os(DEBUG_ENV).is_some());

/// Whether tracing was enabled when the process first asked
pub fn debug_enabled() -> bool {
    *ENABLED
}

/// Write one trace line to stderr without relying on `eprintln!`.
pub fn debug_log(args: std::fmt::Arguments<'_>) {
    if debug_enabled() {
        use std::io::Write;
        let _ = writeln!(std::io::stderr(), "[index_update] {args}");
    }
}

/// `format!`-style front end for `debug_log`; arguments are not evaluated
/// when tracing is off.
macro_rules! update_debug {
    ($($arg:tt)*) => {
        if $crate::trace::debug_enabled() {
            $crate::trace::debug_log(format_args!($($arg)*));
        }
    };
}

pub(crate) use update_debug;
