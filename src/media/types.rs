use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use ffmpeg_cli::{Settings, VideoCodec};

use crate::secrets::IngestUrl;

/// Framing of the producer's stdout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ProducerFormat {
    Flv,
    H264,
}

impl ProducerFormat {
    /// Demuxer name the engine reads stdin with.
    pub fn demuxer(&self) -> &'static str {
        match self {
            ProducerFormat::Flv => "flv",
            ProducerFormat::H264 => "h264",
        }
    }
}

/// External process whose stdout feeds the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProducerConfig {
    pub argv: Vec<String>,
    pub format: ProducerFormat,
    // raw h264 carries no timestamps
    pub framerate: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum SinkMode {
    Local,
    Remote,
    Both,
}

impl SinkMode {
    pub fn has_local(&self) -> bool {
        matches!(self, SinkMode::Local | SinkMode::Both)
    }

    pub fn has_remote(&self) -> bool {
        matches!(self, SinkMode::Remote | SinkMode::Both)
    }
}

impl Display for SinkMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            SinkMode::Local => write!(f, "local"),
            SinkMode::Remote => write!(f, "remote"),
            SinkMode::Both => write!(f, "local+remote"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum VideoProfile {
    /// Forward the producer's encoded video untouched.
    Copy,
    /// Re-encode with a fixed keyframe cadence for ingest endpoints that
    /// require periodic keyframes.
    Keyframes,
}

impl VideoProfile {
    pub fn codec(&self, keyframe_interval: u32) -> VideoCodec {
        match self {
            VideoProfile::Copy => VideoCodec::Copy,
            VideoProfile::Keyframes => {
                VideoCodec::Encode(Settings::default().with_keyframe_interval(keyframe_interval))
            }
        }
    }
}

/// HLS output under a directory that is reset before each session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalSink {
    pub dir: PathBuf,
    pub playlist: String,
    pub segment_secs: u32,
    // 0 = keep every segment in the playlist
    pub playlist_size: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteSink {
    pub ingest: IngestUrl,
    pub bandwidth_test: bool,
}

impl RemoteSink {
    /// The url handed to the engine.
    pub fn target(&self) -> IngestUrl {
        if self.bandwidth_test {
            self.ingest.with_bandwidth_test()
        } else {
            self.ingest.clone()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SinkConfig {
    Local(LocalSink),
    Remote(RemoteSink),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Resolving,
    Resetting,
    Streaming,
    Terminated,
}

impl Display for SessionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::Resolving => "resolving",
            SessionState::Resetting => "resetting",
            SessionState::Streaming => "streaming",
            SessionState::Terminated => "terminated",
        };
        f.write_str(name)
    }
}
