use ffmpeg_cli::{AudioSettings, OutputConfig, OutputDest, VideoCodec};

use crate::{
    config::SessionConfig,
    error::ConfigurationError,
    media::{
        audio::AudioOverlay,
        types::{RemoteSink, SinkConfig},
    },
    secrets::{INGEST_URL_KEY, SecretsConfig},
};

/// Container pushed to remote ingest.
pub const REMOTE_FORMAT: &str = "flv";

const PRODUCER_VIDEO: &str = "0:v:0";

/// Sinks for the configured mode. A remote sink needs resolved secrets.
pub fn select_sinks(
    config: &SessionConfig,
    secrets: Option<&SecretsConfig>,
) -> Result<Vec<SinkConfig>, ConfigurationError> {
    let mut sinks = Vec::new();
    if config.sink_mode.has_local() {
        sinks.push(SinkConfig::Local(config.local.clone()));
    }
    if config.sink_mode.has_remote() {
        let secrets = secrets.ok_or_else(|| ConfigurationError::IngestUrlUndefined {
            path: config.secrets_path.clone(),
            key: INGEST_URL_KEY,
        })?;
        sinks.push(SinkConfig::Remote(RemoteSink {
            ingest: secrets.ingest_url.clone(),
            bandwidth_test: config.bandwidth_test,
        }));
    }
    Ok(sinks)
}

/// Engine output for one sink.
pub fn engine_output(
    sink: &SinkConfig,
    video: &VideoCodec,
    overlay: Option<&AudioOverlay>,
) -> OutputConfig {
    let dest = match sink {
        SinkConfig::Local(local) => OutputDest::hls(
            &local.dir,
            local.playlist.as_str(),
            local.segment_secs,
            local.playlist_size,
        ),
        SinkConfig::Remote(remote) => {
            if remote.bandwidth_test {
                log::info!("remote sink: bandwidth test");
            }
            OutputDest::net(remote.target().expose(), REMOTE_FORMAT)
        }
    };

    let output = OutputConfig::new(dest)
        .map(PRODUCER_VIDEO)
        .with_video(video.clone());
    match overlay {
        Some(overlay) => output
            .map(overlay.map_spec())
            .with_audio(AudioSettings::default())
            .shortest(),
        None => output,
    }
}
