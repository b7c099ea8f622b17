//! Session pipeline:
//!
//! ```text
//!  Idle ─► Resolving ─► Resetting (local sinks only) ─► Streaming ─► Terminated
//!             │                                            │
//!   secrets, engine path, overlay, sinks        producer ─► pump ─► ffmpeg ─► hls / rtmp
//! ```

pub mod audio;
pub mod pipe;
pub mod reset;
pub mod sink;
pub mod stream;
pub mod types;
