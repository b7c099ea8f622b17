use std::ffi::OsString;
use std::path::PathBuf;

use crate::encoder::{AudioSettings, VideoCodec};

pub(crate) const REDACTED: &str = "<redacted>";

/// Segment file names written next to the playlist.
pub const SEGMENT_PATTERN: &str = "segment_%05d.ts";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputDest {
    /// HLS: a live playlist in `dir` referencing time-based segments.
    Hls {
        dir: PathBuf,
        playlist: String,
        /// printf-style pattern, e.g. "segment_%05d.ts"
        segment_pattern: String,
        segment_secs: u32,
        /// Number of segments kept in the playlist, 0 = all.
        list_size: u32,
    },
    /// Mux to a network stream (not seekable).
    /// eg: rtmp://localhost:1935/live/stream
    /// The url may carry credentials and is never rendered in redacted args.
    Net { url: String, format: String },
}

impl OutputDest {
    pub fn hls(
        dir: impl Into<PathBuf>,
        playlist: impl Into<String>,
        segment_secs: u32,
        list_size: u32,
    ) -> Self {
        OutputDest::Hls {
            dir: dir.into(),
            playlist: playlist.into(),
            segment_pattern: SEGMENT_PATTERN.to_string(),
            segment_secs,
            list_size,
        }
    }

    pub fn net(url: impl Into<String>, format: impl Into<String>) -> Self {
        OutputDest::Net {
            url: url.into(),
            format: format.into(),
        }
    }

    fn write_args(&self, args: &mut Vec<OsString>, redact: bool) {
        match self {
            OutputDest::Hls {
                dir,
                playlist,
                segment_pattern,
                segment_secs,
                list_size,
            } => {
                args.push("-f".into());
                args.push("hls".into());
                args.push("-hls_time".into());
                args.push(segment_secs.to_string().into());
                args.push("-hls_list_size".into());
                args.push(list_size.to_string().into());
                if *list_size > 0 {
                    args.push("-hls_flags".into());
                    args.push("delete_segments".into());
                }
                args.push("-hls_segment_filename".into());
                args.push(dir.join(segment_pattern).into_os_string());
                args.push(dir.join(playlist).into_os_string());
            }
            OutputDest::Net { url, format } => {
                args.push("-f".into());
                args.push(format.into());
                if redact {
                    args.push(REDACTED.into());
                } else {
                    args.push(url.into());
                }
            }
        }
    }
}

/// Configuration for a single engine output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputConfig {
    pub dest: OutputDest,
    /// Stream specifiers for `-map`, e.g. "0:v:0". Empty = engine default.
    pub maps: Vec<String>,
    pub video: VideoCodec,
    /// None = no audio encode options are emitted.
    pub audio: Option<AudioSettings>,
    /// End the output with its shortest stream. Needed when a looped
    /// input would otherwise never end.
    pub shortest: bool,
}

impl OutputConfig {
    pub fn new(dest: OutputDest) -> Self {
        Self {
            dest,
            maps: Vec::new(),
            video: VideoCodec::Copy,
            audio: None,
            shortest: false,
        }
    }

    pub fn map(mut self, spec: impl Into<String>) -> Self {
        self.maps.push(spec.into());
        self
    }

    pub fn with_video(mut self, video: VideoCodec) -> Self {
        self.video = video;
        self
    }

    pub fn with_audio(mut self, audio: AudioSettings) -> Self {
        self.audio = Some(audio);
        self
    }

    pub fn shortest(mut self) -> Self {
        self.shortest = true;
        self
    }

    pub(crate) fn write_args(&self, args: &mut Vec<OsString>, redact: bool) {
        for spec in &self.maps {
            args.push("-map".into());
            args.push(spec.into());
        }
        self.video.write_args(args);
        if let Some(ref audio) = self.audio {
            audio.write_args(args);
        }
        if self.shortest {
            args.push("-shortest".into());
        }
        self.dest.write_args(args, redact);
    }
}
