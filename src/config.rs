//! Configuration and CLI argument handling

use clap::Parser;

use crate::timer::{FocusOptions, Preset};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "focus-clock")]
#[command(about = "A Pomodoro focus clock with session history")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Duration preset: classic (25/5/15), extended (50/10/30) or short (15/3/10)
    #[arg(long, default_value = "classic")]
    pub preset: Preset,

    /// Start with the completion chime muted
    #[arg(long)]
    pub no_sound: bool,

    /// Keep counting into the next phase instead of waiting for start
    #[arg(long)]
    pub auto_continue: bool,

    /// Keep at most this many history records
    #[arg(long)]
    pub history_limit: Option<usize>,

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

    /// Timer options derived from the flags
    pub fn focus_options(&self) -> FocusOptions {
        FocusOptions {
            preset: self.preset,
            sound_enabled: !self.no_sound,
            auto_continue: self.auto_continue,
            history_limit: self.history_limit,
        }
    }
}
