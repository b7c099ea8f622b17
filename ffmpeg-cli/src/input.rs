use std::ffi::OsString;
use std::path::PathBuf;

/// Where an engine input reads its bytes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputSource {
    /// The engine's standard input (`pipe:0`).
    Stdin,
    File(PathBuf),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputConfig {
    pub source: InputSource,
    /// Demuxer name, e.g. "flv" or "h264". None = probe.
    pub format: Option<String>,
    /// `-stream_loop -1`, the input restarts forever.
    pub loop_forever: bool,
    /// Demuxer private options placed before `-i`.
    pub options: Vec<(String, String)>,
}

impl InputConfig {
    pub fn stdin(format: impl Into<String>) -> Self {
        Self {
            source: InputSource::Stdin,
            format: Some(format.into()),
            loop_forever: false,
            options: Vec::new(),
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            source: InputSource::File(path.into()),
            format: None,
            loop_forever: false,
            options: Vec::new(),
        }
    }

    pub fn looped(mut self) -> Self {
        self.loop_forever = true;
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push((key.into(), value.into()));
        self
    }

    pub(crate) fn write_args(&self, args: &mut Vec<OsString>) {
        if self.loop_forever {
            args.push("-stream_loop".into());
            args.push("-1".into());
        }
        if let Some(ref format) = self.format {
            args.push("-f".into());
            args.push(format.into());
        }
        for (key, value) in &self.options {
            args.push(format!("-{}", key).into());
            args.push(value.into());
        }
        args.push("-i".into());
        match &self.source {
            InputSource::Stdin => args.push("pipe:0".into()),
            // One argv element, whatever the path contains.
            InputSource::File(path) => args.push(path.as_os_str().to_owned()),
        }
    }
}
