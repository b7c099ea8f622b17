use std::fmt;
use std::path::Path;

use crate::error::ConfigurationError;

/// Key the secrets file must define.
pub const INGEST_URL_KEY: &str = "INGEST_URL";

pub const BANDWIDTH_TEST_QUERY: &str = "bandwidthtest=true";

/// Remote ingest endpoint, stream key included. Opaque: `Debug` never shows
/// the value and there is no `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct IngestUrl(String);

impl IngestUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// The raw value, for the engine argv only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn with_bandwidth_test(&self) -> IngestUrl {
        let sep = if self.0.contains('?') { '&' } else { '?' };
        IngestUrl(format!("{}{}{}", self.0, sep, BANDWIDTH_TEST_QUERY))
    }
}

impl fmt::Debug for IngestUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IngestUrl(<redacted>)")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecretsConfig {
    pub ingest_url: IngestUrl,
}

/// Load the ingest url from a shell-style env file:
///
/// ```text
/// # comment
/// export INGEST_URL="rtmp://live.example.com/app/stream-key"
/// ```
pub fn load_secrets(path: &Path) -> Result<SecretsConfig, ConfigurationError> {
    let text =
        std::fs::read_to_string(path).map_err(|source| ConfigurationError::SecretsUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
    let secrets = parse_secrets(&text).ok_or_else(|| ConfigurationError::IngestUrlUndefined {
        path: path.to_path_buf(),
        key: INGEST_URL_KEY,
    })?;
    log::info!("loaded ingest url from {}", path.display());
    Ok(secrets)
}

/// Later assignments win, as when the file is sourced.
fn parse_secrets(text: &str) -> Option<SecretsConfig> {
    text.lines()
        .filter_map(parse_assignment)
        .filter(|(key, _)| *key == INGEST_URL_KEY)
        .last()
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
        .map(|value| SecretsConfig {
            ingest_url: IngestUrl::new(value),
        })
}

fn parse_assignment(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let line = line.strip_prefix("export ").unwrap_or(line).trim_start();
    let (key, value) = line.split_once('=')?;
    Some((key.trim(), parse_value(value.trim())))
}

/// Quoted values run to the closing quote. Unquoted values end at a `#`
/// that starts a word, as in a shell.
fn parse_value(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(end) = value.strip_prefix(quote).and_then(|rest| rest.find(quote)) {
            return &value[1..end + 1];
        }
    }
    strip_comment(value)
}

fn strip_comment(value: &str) -> &str {
    let mut word_start = true;
    for (i, c) in value.char_indices() {
        if c == '#' && word_start {
            return value[..i].trim_end();
        }
        word_start = c.is_whitespace();
    }
    value
}
