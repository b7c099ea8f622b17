use std::path::PathBuf;

use crate::media::types::{LocalSink, ProducerConfig, ProducerFormat, SinkMode, VideoProfile};

pub const DEFAULT_PRODUCER: &str = "simple";
pub const DEFAULT_FRAMERATE: u32 = 30;
pub const DEFAULT_OUTPUT_DIR: &str = "out";
pub const DEFAULT_PLAYLIST: &str = "stream.m3u8";
pub const DEFAULT_SEGMENT_SECS: u32 = 6;
pub const DEFAULT_PLAYLIST_SIZE: u32 = 10;
pub const DEFAULT_SECRETS_PATH: &str = "secrets.env";
pub const DEFAULT_ENGINE: &str = "ffmpeg";
pub const DEFAULT_ENGINE_LOG_LEVEL: &str = "warning";
pub const DEFAULT_KEYFRAME_INTERVAL: u32 = 60;
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Everything one streaming session is started from.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub producer: ProducerConfig,
    /// Optional audio bed, looped for the whole session.
    pub audio: Option<PathBuf>,
    pub sink_mode: SinkMode,
    pub bandwidth_test: bool,
    pub local: LocalSink,
    pub profile: VideoProfile,
    pub keyframe_interval: u32,
    pub secrets_path: PathBuf,
    pub engine: PathBuf,
    pub engine_log_level: String,
    /// Chunks buffered between producer and engine.
    pub channel_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            producer: ProducerConfig {
                argv: vec![DEFAULT_PRODUCER.to_string()],
                format: ProducerFormat::Flv,
                framerate: DEFAULT_FRAMERATE,
            },
            audio: None,
            sink_mode: SinkMode::Local,
            bandwidth_test: false,
            local: LocalSink {
                dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
                playlist: DEFAULT_PLAYLIST.to_string(),
                segment_secs: DEFAULT_SEGMENT_SECS,
                playlist_size: DEFAULT_PLAYLIST_SIZE,
            },
            profile: VideoProfile::Copy,
            keyframe_interval: DEFAULT_KEYFRAME_INTERVAL,
            secrets_path: PathBuf::from(DEFAULT_SECRETS_PATH),
            engine: PathBuf::from(DEFAULT_ENGINE),
            engine_log_level: DEFAULT_ENGINE_LOG_LEVEL.to_string(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}
