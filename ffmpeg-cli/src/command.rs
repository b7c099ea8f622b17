use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;

use crate::{input::InputConfig, output::OutputConfig};

/// One invocation of the ffmpeg binary: global options, inputs in index
/// order, then outputs.
#[derive(Clone, Debug)]
pub struct FfmpegCommand {
    program: PathBuf,
    log_level: String,
    inputs: Vec<InputConfig>,
    outputs: Vec<OutputConfig>,
}

impl FfmpegCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            log_level: "warning".to_string(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Inputs are numbered in the order they are added; `-map 1:a` refers
    /// to the second one.
    pub fn input(mut self, input: InputConfig) -> Self {
        self.inputs.push(input);
        self
    }

    pub fn output(mut self, output: OutputConfig) -> Self {
        self.outputs.push(output);
        self
    }

    pub fn program(&self) -> &PathBuf {
        &self.program
    }

    pub fn inputs(&self) -> &[InputConfig] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[OutputConfig] {
        &self.outputs
    }

    /// Arguments handed to the engine, network urls included verbatim.
    pub fn args(&self) -> Vec<OsString> {
        self.build_args(false)
    }

    /// Same arguments with network destinations replaced, safe to log.
    pub fn redacted_args(&self) -> Vec<OsString> {
        self.build_args(true)
    }

    pub fn display_redacted(&self) -> String {
        let mut line = self.program.to_string_lossy().into_owned();
        for arg in self.redacted_args() {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }

    fn build_args(&self, redact: bool) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-hide_banner".into(),
            "-loglevel".into(),
            self.log_level.as_str().into(),
            "-y".into(),
        ];
        for input in &self.inputs {
            input.write_args(&mut args);
        }
        for output in &self.outputs {
            output.write_args(&mut args, redact);
        }
        args
    }

    /// A process command with stdin piped and the engine's own diagnostics
    /// passed through to our stderr.
    pub fn to_command(&self) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        cmd
    }
}

#[cfg(test)]
#[path = "command_test.rs"]
mod command_test;
