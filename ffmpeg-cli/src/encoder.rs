use std::ffi::OsString;

/// Video re-encode settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub codec: String,
    pub preset: Option<String>,
    /// GOP length in frames. Also pins the minimum interval and disables
    /// scene-cut keyframes so keyframes land on a fixed cadence.
    pub keyframe_interval: Option<u32>,
    pub pixel_format: Option<String>,
    // bps
    pub bitrate: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            codec: "libx264".to_string(),
            preset: Some("veryfast".to_string()),
            keyframe_interval: None,
            pixel_format: Some("yuv420p".to_string()),
            bitrate: None,
        }
    }
}

impl Settings {
    pub fn with_keyframe_interval(mut self, frames: u32) -> Self {
        self.keyframe_interval = Some(frames);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VideoCodec {
    /// Codec pass-through (`-c:v copy`).
    #[default]
    Copy,
    Encode(Settings),
}

impl VideoCodec {
    pub(crate) fn write_args(&self, args: &mut Vec<OsString>) {
        match self {
            VideoCodec::Copy => {
                args.push("-c:v".into());
                args.push("copy".into());
            }
            VideoCodec::Encode(settings) => {
                args.push("-c:v".into());
                args.push(settings.codec.as_str().into());
                if let Some(ref preset) = settings.preset {
                    args.push("-preset".into());
                    args.push(preset.into());
                }
                if let Some(interval) = settings.keyframe_interval {
                    args.push("-g".into());
                    args.push(interval.to_string().into());
                    args.push("-keyint_min".into());
                    args.push(interval.to_string().into());
                    args.push("-sc_threshold".into());
                    args.push("0".into());
                }
                if let Some(bitrate) = settings.bitrate {
                    args.push("-b:v".into());
                    args.push(bitrate.to_string().into());
                }
                if let Some(ref pix_fmt) = settings.pixel_format {
                    args.push("-pix_fmt".into());
                    args.push(pix_fmt.into());
                }
            }
        }
    }
}

/// Audio encode settings for an output carrying an audio stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSettings {
    pub codec: String,
    // bps
    pub bitrate: u64,
    pub sample_rate: u32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        // AAC at 44.1kHz is what RTMP ingest endpoints accept.
        Self {
            codec: "aac".to_string(),
            bitrate: 128_000,
            sample_rate: 44_100,
        }
    }
}

impl AudioSettings {
    pub(crate) fn write_args(&self, args: &mut Vec<OsString>) {
        args.push("-c:a".into());
        args.push(self.codec.as_str().into());
        args.push("-b:a".into());
        args.push(self.bitrate.to_string().into());
        args.push("-ar".into());
        args.push(self.sample_rate.to_string().into());
    }
}
