//! Typed construction of ffmpeg command lines.
//!
//! ```text
//!   InputConfig (pipe:0, flv/h264) ─┐
//!   InputConfig (file, looped) ─────┼─► FfmpegCommand ─► argv ─► EngineProcess
//!                                   │        │
//!   OutputConfig (hls | net) ───────┘        └─► redacted argv (for logs)
//! ```

pub mod command;
pub mod encoder;
pub mod input;
pub mod output;
pub mod process;

pub use command::FfmpegCommand;
pub use encoder::{AudioSettings, Settings, VideoCodec};
pub use input::{InputConfig, InputSource};
pub use output::{OutputConfig, OutputDest};
pub use process::{EngineProcess, find_program};
