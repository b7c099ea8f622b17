use std::path::PathBuf;

use ffmpeg_cli::InputConfig;

/// Engine input index of the overlay; index 0 is always the producer.
pub const OVERLAY_INPUT_INDEX: usize = 1;

/// A secondary audio input that loops for the whole session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioOverlay {
    path: PathBuf,
}

impl AudioOverlay {
    pub fn to_input(&self) -> InputConfig {
        InputConfig::file(&self.path).looped()
    }

    /// `-map` specifier selecting the overlay's first audio stream.
    pub fn map_spec(&self) -> String {
        format!("{}:a:0", OVERLAY_INPUT_INDEX)
    }
}

/// Whether the session gets an audio bed. The path goes to the engine as a
/// single argument; its existence is left for the engine to report.
pub fn resolve_overlay(arg: Option<PathBuf>) -> Option<AudioOverlay> {
    let path = arg.filter(|p| !p.as_os_str().is_empty())?;
    log::info!("audio overlay: looping {}", path.display());
    Some(AudioOverlay { path })
}
