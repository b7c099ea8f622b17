use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use ffmpeg_cli::{EngineProcess, FfmpegCommand, InputConfig, find_program};
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;

use crate::{
    config::SessionConfig,
    error::{ConfigurationError, SessionError},
    media::{
        audio::{AudioOverlay, resolve_overlay},
        reset::reset_output_dir,
        sink::{engine_output, select_sinks},
        stream::pump,
        types::{ProducerConfig, ProducerFormat, SessionState, SinkConfig},
    },
    secrets::load_secrets,
};

/// How long a producer may outlive an engine that finished cleanly.
const PRODUCER_GRACE: Duration = Duration::from_secs(2);

fn transition(from: SessionState, to: SessionState) {
    log::info!("session: {} -> {}", from, to);
}

/// A session that has not been resolved yet.
pub struct Session {
    config: SessionConfig,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    /// Resolve secrets, engine and producer binaries, overlay and sinks.
    /// Reads the secrets file and nothing else.
    pub fn resolve(self) -> Result<ResolvedSession, SessionError> {
        transition(SessionState::Idle, SessionState::Resolving);
        let config = self.config;

        let secrets = if config.sink_mode.has_remote() {
            Some(load_secrets(&config.secrets_path)?)
        } else {
            None
        };

        let engine_path =
            find_program(&config.engine).ok_or_else(|| ConfigurationError::EngineNotFound {
                program: config.engine.clone(),
            })?;

        let producer_program = config
            .producer
            .argv
            .first()
            .ok_or(ConfigurationError::EmptyProducer)?;
        if find_program(Path::new(producer_program)).is_none() {
            return Err(ConfigurationError::ProducerNotFound {
                program: producer_program.clone(),
            }
            .into());
        }

        let overlay = resolve_overlay(config.audio.clone());
        let sinks = select_sinks(&config, secrets.as_ref())?;
        let engine = build_engine_command(&config, engine_path, &sinks, overlay.as_ref());
        log::info!(
            "sinks: {}, profile: {:?}, overlay: {}",
            config.sink_mode,
            config.profile,
            overlay.is_some()
        );

        Ok(ResolvedSession {
            config,
            sinks,
            engine,
        })
    }
}

/// Engine invocation: the producer on stdin as input 0, the looped overlay
/// as input 1, one output per sink.
pub fn build_engine_command(
    config: &SessionConfig,
    engine_path: impl Into<std::path::PathBuf>,
    sinks: &[SinkConfig],
    overlay: Option<&AudioOverlay>,
) -> FfmpegCommand {
    let mut producer_input = InputConfig::stdin(config.producer.format.demuxer());
    if config.producer.format == ProducerFormat::H264 {
        producer_input =
            producer_input.with_option("framerate", config.producer.framerate.to_string());
    }

    let mut command = FfmpegCommand::new(engine_path)
        .log_level(config.engine_log_level.as_str())
        .input(producer_input);
    if let Some(overlay) = overlay {
        command = command.input(overlay.to_input());
    }

    let video = config.profile.codec(config.keyframe_interval);
    for sink in sinks {
        command = command.output(engine_output(sink, &video, overlay));
    }
    command
}

/// Resolved, not yet reset. Only [`ResolvedSession::reset`] leads to a
/// session that can stream.
pub struct ResolvedSession {
    config: SessionConfig,
    sinks: Vec<SinkConfig>,
    engine: FfmpegCommand,
}

impl ResolvedSession {
    pub fn sinks(&self) -> &[SinkConfig] {
        &self.sinks
    }

    pub fn engine_command(&self) -> &FfmpegCommand {
        &self.engine
    }

    pub fn producer(&self) -> &ProducerConfig {
        &self.config.producer
    }

    /// Clear local output directories. Completes before any engine output
    /// is opened since the engine is only spawned by [`ReadySession::stream`].
    pub async fn reset(self) -> Result<ReadySession, SessionError> {
        let local_dirs: Vec<_> = self
            .sinks
            .iter()
            .filter_map(|sink| match sink {
                SinkConfig::Local(local) => Some(local.dir.clone()),
                SinkConfig::Remote(_) => None,
            })
            .collect();

        let mut previous = SessionState::Resolving;
        if !local_dirs.is_empty() {
            transition(previous, SessionState::Resetting);
            previous = SessionState::Resetting;
            for dir in local_dirs {
                reset_output_dir(&dir)
                    .await
                    .map_err(|source| SessionError::Reset { path: dir, source })?;
            }
        }

        Ok(ReadySession {
            previous,
            config: self.config,
            engine: self.engine,
        })
    }
}

pub struct ReadySession {
    previous: SessionState,
    config: SessionConfig,
    engine: FfmpegCommand,
}

impl ReadySession {
    pub fn state(&self) -> SessionState {
        self.previous
    }

    /// Start the producer and the engine, pump bytes between them and wait
    /// for the engine to exit or for `cancel`.
    pub async fn stream(self, cancel: CancellationToken) -> Result<(), SessionError> {
        transition(self.state(), SessionState::Streaming);

        let mut producer = spawn_producer(&self.config.producer)?;
        let producer_out = producer.stdout.take().ok_or_else(|| SessionError::Spawn {
            what: "producer",
            reason: anyhow::anyhow!("stdout not captured"),
        })?;

        log::info!("engine: {}", self.engine.display_redacted());
        let mut engine =
            EngineProcess::spawn(&self.engine).map_err(|reason| SessionError::Spawn {
                what: "engine",
                reason,
            })?;
        let engine_in = engine.take_stdin().ok_or_else(|| SessionError::Spawn {
            what: "engine",
            reason: anyhow::anyhow!("stdin not captured"),
        })?;

        let pump_cancel = cancel.child_token();
        let pump_handle = tokio::spawn(pump(
            producer_out,
            engine_in,
            self.config.channel_capacity,
            pump_cancel.clone(),
        ));

        let engine_exit = tokio::select! {
            _ = cancel.cancelled() => None,
            status = engine.wait() => Some(status),
        };

        let result = match engine_exit {
            None => {
                log::warn!("interrupted, stopping producer and engine");
                pump_cancel.cancel();
                if let Err(e) = engine.kill().await {
                    log::warn!("kill engine: {:#}", e);
                }
                kill_producer(&mut producer).await;
                Err(SessionError::Interrupted)
            }
            Some(Err(reason)) => {
                pump_cancel.cancel();
                kill_producer(&mut producer).await;
                Err(SessionError::Spawn {
                    what: "engine",
                    reason,
                })
            }
            Some(Ok(status)) if !status.success() => {
                log::error!("engine exited with {}", status);
                pump_cancel.cancel();
                kill_producer(&mut producer).await;
                Err(SessionError::EngineFailure { status })
            }
            Some(Ok(_)) => {
                // the engine reads nothing more; drop the producer's pipe
                pump_cancel.cancel();
                wait_producer(&mut producer, &cancel).await
            }
        };

        pump_cancel.cancel();
        match pump_handle.await {
            Ok(stats) => log::info!(
                "forwarded {} of {} producer bytes",
                stats.bytes_written,
                stats.bytes_read
            ),
            Err(e) => log::error!("pump task: {}", e),
        }

        transition(SessionState::Streaming, SessionState::Terminated);
        result
    }
}

fn spawn_producer(producer: &ProducerConfig) -> Result<Child, SessionError> {
    let (program, args) = producer
        .argv
        .split_first()
        .ok_or(ConfigurationError::EmptyProducer)?;
    log::info!("producer: {} ({})", producer.argv.join(" "), producer.format.demuxer());

    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| SessionError::Spawn {
            what: "producer",
            reason: anyhow::anyhow!("{}: {}", program, e),
        })
}

async fn kill_producer(producer: &mut Child) {
    if let Ok(None) = producer.try_wait() {
        if let Err(e) = producer.kill().await {
            log::warn!("kill producer: {}", e);
        }
    }
}

/// The engine finished cleanly; collect the producer's status. A producer
/// still running after [`PRODUCER_GRACE`] is killed and the session ends
/// with the engine's success.
async fn wait_producer(producer: &mut Child, cancel: &CancellationToken) -> Result<(), SessionError> {
    let status: std::io::Result<ExitStatus> = tokio::select! {
        _ = cancel.cancelled() => {
            kill_producer(producer).await;
            return Err(SessionError::Interrupted);
        }
        _ = tokio::time::sleep(PRODUCER_GRACE) => {
            log::warn!("producer still running after the engine finished, stopping it");
            kill_producer(producer).await;
            return Ok(());
        }
        status = producer.wait() => status,
    };
    match status {
        Ok(status) if status.success() => {
            log::info!("end of stream");
            Ok(())
        }
        Ok(status) => {
            log::error!("producer exited with {}", status);
            Err(SessionError::ProducerFailure { status })
        }
        Err(e) => Err(SessionError::Spawn {
            what: "producer",
            reason: e.into(),
        }),
    }
}

/// Resolve the session and log what would run, without touching the output
/// directory or starting processes.
pub fn plan(config: SessionConfig) -> Result<(), SessionError> {
    let session = Session::new(config).resolve()?;
    for sink in session.sinks() {
        match sink {
            SinkConfig::Local(local) => log::info!(
                "local sink: {} ({}s segments)",
                local.dir.join(&local.playlist).display(),
                local.segment_secs
            ),
            SinkConfig::Remote(remote) => {
                log::info!("remote sink: bandwidth test {}", remote.bandwidth_test)
            }
        }
    }
    log::info!("producer: {}", session.producer().argv.join(" "));
    log::info!("engine: {}", session.engine_command().display_redacted());
    Ok(())
}

/// Run one session to completion: resolve, reset, stream.
pub async fn run(config: SessionConfig, cancel: CancellationToken) -> Result<(), SessionError> {
    Session::new(config)
        .resolve()?
        .reset()
        .await?
        .stream(cancel)
        .await
}

#[cfg(test)]
#[path = "pipe_test.rs"]
mod pipe_test;
