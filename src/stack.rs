//! Stack headroom for the recursive passes over a syntax tree.
//!
//! One nesting level of parser recursion runs through a dozen frames, so the
//! nesting bound alone does not keep a small thread stack (2 MiB for tokio
//! workers and spawned threads) from overflowing in unoptimized builds.

/// Remaining stack below which recursion moves to a fresh segment. Must cover
/// the frames between two checks.
const RED_ZONE: usize = 256 * 1024;
/// Size of each fresh segment.
const SEGMENT: usize = 4 * 1024 * 1024;

/// Run `f`, switching to a new stack segment first when the current one is
/// close to exhausted.
pub(crate) fn guarded<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT, f)
}
