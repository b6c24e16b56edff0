//! Completion cue implementations

use std::io::Write;

use tokio::{process::Command, runtime::Handle};
use tracing::{debug, warn};

use crate::timer::{CompletionCue, TimerState};

/// Cue that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentCue;

impl CompletionCue for SilentCue {
    fn play(&self, _completed: TimerState) -> Result<(), String> {
        Ok(())
    }
}

/// Ring the terminal bell on stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalBell;

impl CompletionCue for TerminalBell {
    fn play(&self, _completed: TimerState) -> Result<(), String> {
        let mut stderr = std::io::stderr();
        stderr
            .write_all(b"\x07")
            .and_then(|_| stderr.flush())
            .map_err(|e| format!("Failed to ring terminal bell: {}", e))
    }
}

/// Run an external command, e.g. a sound player, without waiting for it
#[derive(Debug, Clone)]
pub struct CommandCue {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandCue {
    /// Build a cue from a program followed by its arguments
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl CompletionCue for CommandCue {
    fn play(&self, completed: TimerState) -> Result<(), String> {
        let handle = Handle::try_current()
            .map_err(|e| format!("No runtime available to run cue command: {}", e))?;

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .env("POMODORO_COMPLETED_STATE", completed.to_string());

        let program = self.program.clone();
        debug!("Spawning cue command {}", program);
        handle.spawn(async move {
            match command.output().await {
                Ok(output) if output.status.success() => {
                    debug!("Cue command {} finished", program);
                }
                Ok(output) => {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    warn!("Cue command {} failed: {}", program, stderr);
                }
                Err(e) => warn!("Failed to execute cue command {}: {}", program, e),
            }
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_argv_splits_program_and_args() {
        let argv = vec!["paplay".to_string(), "/tmp/bell.oga".to_string()];
        let cue = CommandCue::from_argv(&argv).unwrap();
        assert_eq!(cue.program, "paplay");
        assert_eq!(cue.args, vec!["/tmp/bell.oga".to_string()]);
        assert!(CommandCue::from_argv(&[]).is_none());
    }

    #[test]
    fn command_cue_without_runtime_reports_error() {
        let cue = CommandCue { program: "true".to_string(), args: Vec::new() };
        assert!(cue.play(TimerState::Work).is_err());
    }

    #[tokio::test]
    async fn command_cue_inside_runtime_spawns() {
        let cue = CommandCue { program: "definitely-not-a-real-binary".to_string(), args: Vec::new() };
        // Launch failures surface in the spawned task, never to the caller
        assert!(cue.play(TimerState::ShortBreak).is_ok());
    }

    #[test]
    fn silent_cue_always_succeeds() {
        assert!(SilentCue.play(TimerState::LongBreak).is_ok());
    }
}
