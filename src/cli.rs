//! Command line interface for the `replayframe` binary.
//!
//! The binary inspects, builds and replays corpus files. This module only
//! defines the arguments so `build.rs` can render the man page from it.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Command line arguments for the `replayframe` binary.
#[derive(Debug, Parser)]
#[command(
    name = "replayframe",
    version,
    about = "Replay TLV record streams against a transfer engine"
)]
pub struct Cli {
    /// Emit debug logs and enable engine verbosity.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported operations.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print every record in a corpus file.
    Decode {
        /// Corpus file to read.
        file: PathBuf,
    },
    /// Build a corpus file from flags.
    Encode(EncodeArgs),
    /// Run a corpus file through the dry-run engine.
    Replay {
        /// Corpus file to read.
        file: PathBuf,
    },
}

/// Record values for `encode`.
///
/// Text values accept `\r`, `\n`, `\t` and `\\` escapes.
#[derive(Debug, Args)]
pub struct EncodeArgs {
    /// Output file.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Target URL.
    #[arg(long)]
    pub url: Option<String>,

    /// Scripted server response; the Nth occurrence fills slot N-1.
    #[arg(long = "response", value_name = "TEXT")]
    pub responses: Vec<String>,

    /// Upload payload.
    #[arg(long)]
    pub upload: Option<String>,

    /// Request body.
    #[arg(long)]
    pub postfields: Option<String>,

    /// Custom request header; may repeat.
    #[arg(long = "header", value_name = "TEXT")]
    pub headers: Vec<String>,

    /// Username.
    #[arg(long)]
    pub username: Option<String>,

    /// Password.
    #[arg(long)]
    pub password: Option<String>,

    /// Cookie string.
    #[arg(long)]
    pub cookie: Option<String>,

    /// Byte range.
    #[arg(long)]
    pub range: Option<String>,

    /// Custom request verb.
    #[arg(long)]
    pub custom_request: Option<String>,

    /// Mail sender.
    #[arg(long)]
    pub mail_from: Option<String>,

    /// Mail recipient; may repeat.
    #[arg(long = "mail-rcpt", value_name = "TEXT")]
    pub mail_recipients: Vec<String>,

    /// HTTP authentication bitmask.
    #[arg(long)]
    pub http_auth: Option<u32>,

    /// Skip the response body.
    #[arg(long)]
    pub nobody: bool,

    /// Follow redirects.
    #[arg(long)]
    pub follow_location: bool,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Command};

    #[test]
    fn parses_replay_with_global_verbose() {
        let cli = Cli::parse_from(["replayframe", "replay", "corpus.bin", "-v"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Replay { file } if file.ends_with("corpus.bin")));
    }

    #[test]
    fn parses_repeated_encode_flags() {
        let cli = Cli::parse_from([
            "replayframe",
            "encode",
            "-o",
            "out.bin",
            "--url",
            "http://x",
            "--response",
            "a",
            "--response",
            "b",
            "--header",
            "X-A: 1",
            "--nobody",
        ]);
        let Command::Encode(args) = cli.command else {
            panic!("expected encode");
        };
        assert_eq!(args.url.as_deref(), Some("http://x"));
        assert_eq!(args.responses, ["a", "b"]);
        assert_eq!(args.headers, ["X-A: 1"]);
        assert!(args.nobody);
        assert!(!args.follow_location);
    }

    #[test]
    fn encode_requires_an_output_file() {
        assert!(Cli::try_parse_from(["replayframe", "encode", "--url", "http://x"]).is_err());
    }
}
