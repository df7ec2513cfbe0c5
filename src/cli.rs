//! Command-line interface definitions for Newspaper Desk.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! The server can also be given through the environment.

use crate::models::LengthMode;
use clap::Parser;

/// Command-line arguments for the Newspaper Desk application.
///
/// Without `--interactive` the topics and options given here are entered into
/// the form and submitted once. With it, the form starts pre-filled from these
/// flags and is then driven by commands typed on stdin.
///
/// # Examples
///
/// ```sh
/// # One edition about two topics
/// newspaper_desk -t "climate" -t "elections" --layout layout_2.html
///
/// # A single deep-dive article in Spanish
/// newspaper_desk -t "fusion power" --length advanced --language spanish
///
/// # Fill in the form interactively
/// newspaper_desk --interactive --server http://news.local:5000
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Root URL of the newspaper generation server
    #[arg(long, env = "NEWSPAPER_SERVER")]
    pub server: Option<String>,

    /// Optional path to a config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Topic to cover; repeat for several topics
    #[arg(short, long = "topic")]
    pub topics: Vec<String>,

    /// Layout template identifier
    #[arg(short, long)]
    pub layout: Option<String>,

    /// Language the newspaper is written in
    #[arg(long)]
    pub language: Option<String>,

    /// Article length mode
    #[arg(long, value_enum, default_value_t = LengthMode::Standard)]
    pub length: LengthMode,

    /// Read form commands from stdin instead of submitting once
    #[arg(short, long)]
    pub interactive: bool,

    /// Seconds between loading messages
    #[arg(long)]
    pub message_interval_secs: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(&[
            "newspaper_desk",
            "--topic",
            "climate",
            "--topic",
            "elections",
            "--layout",
            "layout_2.html",
            "--length",
            "advanced",
        ]);

        assert_eq!(cli.topics, vec!["climate", "elections"]);
        assert_eq!(cli.layout.as_deref(), Some("layout_2.html"));
        assert_eq!(cli.length, LengthMode::Advanced);
        assert!(!cli.interactive);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(&[
            "newspaper_desk",
            "-t",
            "tides",
            "-c",
            "/tmp/desk.yaml",
            "-i",
        ]);

        assert_eq!(cli.topics, vec!["tides"]);
        assert_eq!(cli.config.as_deref(), Some("/tmp/desk.yaml"));
        assert!(cli.interactive);
        assert_eq!(cli.length, LengthMode::Standard);
    }

    #[test]
    fn test_cli_rejects_unknown_length() {
        let result = Cli::try_parse_from(&["newspaper_desk", "--length", "epic"]);
        assert!(result.is_err());
    }
}
