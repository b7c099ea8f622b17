use std::path::PathBuf;

use clap::Parser;

use crate::config::{self, SessionConfig};
use crate::media::types::{LocalSink, ProducerConfig, ProducerFormat, SinkMode, VideoProfile};

/// Pipe a live show into an HLS playlist and/or an RTMP ingest endpoint.
#[derive(Debug, Parser)]
#[command(name = "showcast", version)]
pub struct Cli {
    /// Audio file looped under the video for the whole session
    pub audio: Option<PathBuf>,

    #[arg(long, value_enum, env = "SHOWCAST_SINK", default_value_t = SinkMode::Local)]
    pub sink: SinkMode,

    #[arg(long, value_enum, default_value_t = VideoProfile::Copy)]
    pub profile: VideoProfile,

    /// GOP length in frames for the keyframes profile
    #[arg(long, default_value_t = config::DEFAULT_KEYFRAME_INTERVAL)]
    pub keyframe_interval: u32,

    /// Push with the ingest's bandwidth test flag; nothing goes live
    #[arg(long)]
    pub bandwidth_test: bool,

    #[arg(long, value_enum, default_value_t = ProducerFormat::Flv)]
    pub input_format: ProducerFormat,

    /// Frame rate assumed for raw h264 input
    #[arg(long, default_value_t = config::DEFAULT_FRAMERATE)]
    pub framerate: u32,

    #[arg(long, env = "SHOWCAST_OUTPUT_DIR", default_value = config::DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    #[arg(long, default_value = config::DEFAULT_PLAYLIST)]
    pub playlist: String,

    #[arg(long, default_value_t = config::DEFAULT_SEGMENT_SECS)]
    pub segment_secs: u32,

    /// Segments kept in the playlist, 0 keeps all of them
    #[arg(long, default_value_t = config::DEFAULT_PLAYLIST_SIZE)]
    pub playlist_size: u32,

    /// Env file defining INGEST_URL
    #[arg(long, env = "SHOWCAST_SECRETS", default_value = config::DEFAULT_SECRETS_PATH)]
    pub secrets: PathBuf,

    #[arg(long, env = "SHOWCAST_FFMPEG", default_value = config::DEFAULT_ENGINE)]
    pub ffmpeg: PathBuf,

    #[arg(long, default_value = config::DEFAULT_ENGINE_LOG_LEVEL)]
    pub engine_log_level: String,

    #[arg(long, default_value_t = config::DEFAULT_CHANNEL_CAPACITY)]
    pub channel_capacity: usize,

    /// Resolve the session and print the engine invocation, then exit
    #[arg(long)]
    pub dry_run: bool,

    /// Producer command line
    #[arg(last = true)]
    pub producer: Vec<String>,
}

impl From<Cli> for SessionConfig {
    fn from(cli: Cli) -> Self {
        let argv = if cli.producer.is_empty() {
            vec![config::DEFAULT_PRODUCER.to_string()]
        } else {
            cli.producer
        };
        SessionConfig {
            producer: ProducerConfig {
                argv,
                format: cli.input_format,
                framerate: cli.framerate,
            },
            audio: cli.audio,
            sink_mode: cli.sink,
            bandwidth_test: cli.bandwidth_test,
            local: LocalSink {
                dir: cli.output_dir,
                playlist: cli.playlist,
                segment_secs: cli.segment_secs,
                playlist_size: cli.playlist_size,
            },
            profile: cli.profile,
            keyframe_interval: cli.keyframe_interval,
            secrets_path: cli.secrets,
            engine: cli.ffmpeg,
            engine_log_level: cli.engine_log_level,
            channel_capacity: cli.channel_capacity.max(1),
        }
    }
}
