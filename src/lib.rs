// osfab - lib.rs
//
// Host OS layer for a portable story-file interpreter core.
//
// The interpreter core never calls platform APIs directly. It calls the
// operations in `os` (or the `os::OsLayer` trait), and consults the
// platform-identity table in `util::constants`, so it can run unmodified on
// any host that provides this layer.

pub mod os;
pub mod platform;
pub mod util;
