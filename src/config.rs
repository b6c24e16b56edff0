//! Configuration and CLI argument handling

use clap::{Parser, ValueEnum};

use crate::{
    services::{CommandCue, SilentCue, TerminalBell},
    timer::{CompletionCue, TimerError, TimerSettings},
};

/// How phase completions are announced
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CueKind {
    /// Ring the terminal bell
    Bell,
    /// No cue at all
    Silent,
    /// Run --cue-command
    Command,
}

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "pomodoro-server")]
#[command(about = "A state-managed HTTP server driving a Pomodoro session timer")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Work phase duration in minutes
    #[arg(short, long, default_value = "25", value_parser = clap::value_parser!(u32).range(1..=120))]
    pub work: u32,

    /// Short break duration in minutes
    #[arg(short, long, default_value = "5", value_parser = clap::value_parser!(u32).range(1..=120))]
    pub short_break: u32,

    /// Long break duration in minutes
    #[arg(short, long, default_value = "15", value_parser = clap::value_parser!(u32).range(1..=120))]
    pub long_break: u32,

    /// Work sessions between long breaks
    #[arg(long, default_value = "4", value_parser = clap::value_parser!(u32).range(1..=12))]
    pub sessions_per_long_break: u32,

    /// Seconds a completion celebration lasts before the next phase starts (0 disables)
    #[arg(short, long, default_value = "15")]
    pub auto_start_delay: u32,

    /// Completion cue
    #[arg(long, value_enum, default_value = "bell")]
    pub cue: CueKind,

    /// Program and arguments run on completion when --cue=command
    #[arg(long, num_args = 1.., allow_hyphen_values = true, required_if_eq("cue", "command"))]
    pub cue_command: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Timer settings from the duration flags
    pub fn timer_settings(&self) -> Result<TimerSettings, TimerError> {
        TimerSettings::new(
            self.work,
            self.short_break,
            self.long_break,
            self.sessions_per_long_break,
        )
    }

    /// Build the completion cue selected by --cue
    pub fn completion_cue(&self) -> Box<dyn CompletionCue> {
        match self.cue {
            CueKind::Bell => Box::new(TerminalBell),
            CueKind::Silent => Box::new(SilentCue),
            CueKind::Command => match CommandCue::from_argv(&self.cue_command) {
                Some(cue) => Box::new(cue),
                None => Box::new(SilentCue),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_pomodoro() {
        let config = Config::try_parse_from(["pomodoro-server"]).unwrap();
        assert_eq!(config.timer_settings().unwrap(), TimerSettings::default());
        assert_eq!(config.auto_start_delay, 15);
        assert_eq!(config.cue, CueKind::Bell);
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn rejects_durations_outside_range() {
        assert!(Config::try_parse_from(["pomodoro-server", "--work", "0"]).is_err());
        assert!(Config::try_parse_from(["pomodoro-server", "--long-break", "121"]).is_err());
        assert!(Config::try_parse_from(["pomodoro-server", "--sessions-per-long-break", "0"]).is_err());
    }

    #[test]
    fn command_cue_requires_program() {
        assert!(Config::try_parse_from(["pomodoro-server", "--cue", "command"]).is_err());

        let config = Config::try_parse_from([
            "pomodoro-server",
            "--cue",
            "command",
            "--cue-command",
            "paplay",
            "/usr/share/sounds/complete.oga",
        ])
        .unwrap();
        assert_eq!(config.cue_command.len(), 2);
    }
}
