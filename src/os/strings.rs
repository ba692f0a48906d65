// osfab - os/strings.rs
//
// Case-insensitive comparison primitives and allocating formatting.
//
// Case folding is ASCII-only, matching the host C library's behaviour in
// the "C" locale. Comparisons return `Ordering` rather than a signed int.

use std::cmp::Ordering;
use std::fmt;

/// Compare two strings ignoring ASCII case.
///
/// A string that is a prefix of the other sorts first.
pub fn stricmp(a: &str, b: &str) -> Ordering {
    cmp_folded(a.bytes(), b.bytes())
}

/// Compare at most the first `n` bytes of two strings ignoring ASCII case.
pub fn strnicmp(a: &str, b: &str, n: usize) -> Ordering {
    cmp_folded(a.bytes().take(n), b.bytes().take(n))
}

/// Compare the first `len` bytes of two buffers ignoring ASCII case.
///
/// Unlike `strnicmp`, both buffers are expected to hold at least `len`
/// bytes; a shorter buffer compares as if truncated.
pub fn memicmp(a: &[u8], b: &[u8], len: usize) -> Ordering {
    cmp_folded(
        a.iter().copied().take(len),
        b.iter().copied().take(len),
    )
}

/// Whether two strings are equal ignoring ASCII case.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

fn cmp_folded(a: impl Iterator<Item = u8>, b: impl Iterator<Item = u8>) -> Ordering {
    a.map(|c| c.to_ascii_lowercase())
        .cmp(b.map(|c| c.to_ascii_lowercase()))
}

/// Format `args` into a freshly allocated string.
///
/// The allocating counterpart of `sprintf`; build `args` with
/// `format_args!` or use `os_asprintf!`.
pub fn asprintf(args: fmt::Arguments<'_>) -> String {
    fmt::format(args)
}

/// Allocating formatted print. Expands to `asprintf(format_args!(...))`.
#[macro_export]
macro_rules! os_asprintf {
    ($($arg:tt)*) => {
        $crate::os::strings::asprintf(::std::format_args!($($arg)*))
    };
}
