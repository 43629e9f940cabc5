//! Protocol codecs.
//!
//! Each protocol follows a layered structure:
//! - `layout`: byte offsets and ranges (source of truth)
//! - `reader`: bounds-checked byte access
//! - `parser` / `writer`: decoding and encoding (no direct byte indexing)
//! - `error`: explicit, actionable errors
//!
//! Codecs are pure and contain no I/O; sources and the dispatch pipeline
//! handle sockets and concurrency.

pub mod e131;
