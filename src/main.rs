//! Corpus tooling for `replayframe`.
//!
//! `decode` lists the records in a file, `encode` builds one from flags and
//! `replay` runs one through the dry-run engine.

mod cli;

use std::{fs, io, path::PathBuf, process::ExitCode};

use clap::Parser;
use replayframe::{
    DryRunEngine,
    Harness,
    HarnessConfig,
    RecordCursor,
    RecordType,
    RecordWriter,
    record::EncodeError,
    session::RESPONSE_SLOTS,
};
use thiserror::Error;
use tracing::{Level, error, info};

use crate::cli::{Cli, Command, EncodeArgs};

/// Preview width for decoded record values.
const PREVIEW_CHARS: usize = 48;

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("{count} responses given but only {capacity} slots exist")]
    TooManyResponses { count: usize, capacity: usize },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = harness_config(cli.verbose, HarnessConfig::from_env());
    tracing_subscriber::fmt()
        .with_max_level(log_level(&config))
        .with_writer(io::stderr)
        .init();

    match run(cli, config) {
        Ok(code) => code,
        Err(err) => {
            error!(error = %err, "command failed");
            ExitCode::FAILURE
        }
    }
}

/// Either `--verbose` or the environment enables verbosity.
fn harness_config(flag: bool, base: HarnessConfig) -> HarnessConfig {
    let verbose = flag || base.verbose();
    base.with_verbose(verbose)
}

fn log_level(config: &HarnessConfig) -> Level {
    if config.verbose() { Level::DEBUG } else { Level::INFO }
}

fn run(cli: Cli, config: HarnessConfig) -> Result<ExitCode, CliError> {
    match cli.command {
        Command::Decode { file } => decode(&read(file)?),
        Command::Encode(args) => encode(&args),
        Command::Replay { file } => Ok(replay(&read(file)?, config)),
    }
}

fn read(path: PathBuf) -> Result<Vec<u8>, CliError> {
    fs::read(&path).map_err(|source| CliError::Read { path, source })
}

fn decode(input: &[u8]) -> Result<ExitCode, CliError> {
    let mut cursor = RecordCursor::new(input);
    let mut offset = cursor.position();
    let mut next = cursor.first_record();
    loop {
        match next {
            Ok(Some(record)) => {
                println!(
                    "{offset:>8}  {:<16} {:>6}  {}",
                    record.record_type().to_string(),
                    record.length(),
                    preview(record.value())
                );
            }
            Ok(None) => return Ok(ExitCode::SUCCESS),
            Err(err) => {
                println!("{offset:>8}  {err}");
                return Ok(ExitCode::FAILURE);
            }
        }
        offset = cursor.position();
        next = cursor.next_record();
    }
}

fn preview(value: &[u8]) -> String {
    let text: String = String::from_utf8_lossy(value).escape_debug().collect();
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text,
    }
}

fn encode(args: &EncodeArgs) -> Result<ExitCode, CliError> {
    let input = build_records(args)?;
    fs::write(&args.output, &input).map_err(|source| CliError::Write {
        path: args.output.clone(),
        source,
    })?;
    info!(path = %args.output.display(), bytes = input.len(), "corpus written");
    Ok(ExitCode::SUCCESS)
}

fn build_records(args: &EncodeArgs) -> Result<Vec<u8>, CliError> {
    if args.responses.len() > RESPONSE_SLOTS {
        return Err(CliError::TooManyResponses {
            count: args.responses.len(),
            capacity: RESPONSE_SLOTS,
        });
    }

    let mut writer = RecordWriter::new();
    let singletons = [
        (RecordType::Url, &args.url),
        (RecordType::Username, &args.username),
        (RecordType::Password, &args.password),
        (RecordType::PostFields, &args.postfields),
        (RecordType::Cookie, &args.cookie),
        (RecordType::Upload, &args.upload),
        (RecordType::Range, &args.range),
        (RecordType::CustomRequest, &args.custom_request),
        (RecordType::MailFrom, &args.mail_from),
    ];
    for (record_type, value) in singletons {
        if let Some(text) = value {
            writer.push(record_type, &unescape(text))?;
        }
    }
    for header in &args.headers {
        writer.push(RecordType::Header, &unescape(header))?;
    }
    for recipient in &args.mail_recipients {
        writer.push(RecordType::MailRecipient, &unescape(recipient))?;
    }
    if let Some(mask) = args.http_auth {
        writer.push_u32(RecordType::HttpAuth, mask);
    }
    if args.nobody {
        writer.push_u32(RecordType::NoBody, 1);
    }
    if args.follow_location {
        writer.push_u32(RecordType::FollowLocation, 1);
    }
    for (slot, response) in (0_u8..).zip(&args.responses) {
        writer.push(RecordType::Response(slot), &unescape(response))?;
    }
    Ok(writer.finish().to_vec())
}

/// Expand `\r`, `\n`, `\t` and `\\`; other escapes are kept verbatim.
fn unescape(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    let mut chars = text.chars();
    let mut utf8 = [0_u8; 4];
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
            continue;
        }
        match chars.next() {
            Some('r') => out.push(b'\r'),
            Some('n') => out.push(b'\n'),
            Some('t') => out.push(b'\t'),
            Some('\\') => out.push(b'\\'),
            Some(other) => {
                out.push(b'\\');
                out.extend_from_slice(other.encode_utf8(&mut utf8).as_bytes());
            }
            None => out.push(b'\\'),
        }
    }
    out
}

fn replay(input: &[u8], config: HarnessConfig) -> ExitCode {
    let (outcome, engine) = Harness::new(DryRunEngine::new())
        .with_config(config)
        .run(input);
    let stats = outcome.transport();
    let transcript = engine.transcript();
    println!("status:    {}", outcome.status());
    if let Some(err) = outcome.error() {
        println!("error:     {err}");
    }
    println!("records:   {}", outcome.records_applied());
    println!("performed: {}", outcome.performed());
    println!(
        "transport: uploaded={} delivered={} sent={} body={}",
        stats.uploaded, stats.delivered, stats.received_from_engine, stats.body
    );
    println!("response:  {}", preview(&transcript.response));
    ExitCode::from(u8::try_from(outcome.status()).unwrap_or(u8::MAX))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;
    use replayframe::{HarnessConfig, RecordCursor, RecordType, config::VERBOSE_ENV};
    use rstest::rstest;
    use tracing::Level;

    use super::{CliError, build_records, harness_config, log_level, preview, unescape};
    use crate::cli::{Cli, Command, EncodeArgs};

    fn encode_args(extra: &[&str]) -> EncodeArgs {
        let mut argv = vec!["replayframe", "encode", "-o", "out.bin"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Command::Encode(args) => args,
            other => panic!("expected encode, got {other:?}"),
        }
    }

    #[rstest]
    #[case("plain", b"plain".as_slice())]
    #[case(r"a\r\nb", b"a\r\nb".as_slice())]
    #[case(r"tab\there", b"tab\there".as_slice())]
    #[case(r"back\\slash", b"back\\slash".as_slice())]
    #[case(r"keep\x", b"keep\\x".as_slice())]
    #[case("trailing\\", b"trailing\\".as_slice())]
    fn escapes_are_expanded(#[case] text: &str, #[case] expected: &[u8]) {
        assert_eq!(unescape(text), expected);
    }

    #[rstest]
    #[case(false, false, Level::INFO)]
    #[case(true, false, Level::DEBUG)]
    #[case(false, true, Level::DEBUG)]
    #[case(true, true, Level::DEBUG)]
    fn flag_or_environment_raises_log_level(
        #[case] flag: bool,
        #[case] env_set: bool,
        #[case] expected: Level,
    ) {
        let base =
            HarnessConfig::from_lookup(|key| (env_set && key == VERBOSE_ENV).then(|| "1".into()));
        let config = harness_config(flag, base);
        assert_eq!(log_level(&config), expected);
        assert_eq!(config.verbose(), expected == Level::DEBUG);
    }

    #[test]
    fn long_previews_are_truncated() {
        let value = [b'a'; 100];
        let shown = preview(&value);
        assert!(shown.ends_with("..."));
        assert_eq!(shown.len(), super::PREVIEW_CHARS + 3);
    }

    #[test]
    fn responses_fill_slots_in_order() {
        let args = encode_args(&["--url", "http://x", "--response", "a", "--response", "b"]);
        let input = build_records(&args).expect("encodes");
        let types: Vec<_> = RecordCursor::new(&input)
            .records()
            .map(|record| record.expect("valid").record_type())
            .collect();
        assert_eq!(
            types,
            [RecordType::Url, RecordType::Response(0), RecordType::Response(1)]
        );
    }

    #[test]
    fn too_many_responses_are_refused() {
        let mut extra = Vec::new();
        for _ in 0..12 {
            extra.extend(["--response", "r"]);
        }
        let args = encode_args(&extra);
        assert!(matches!(
            build_records(&args),
            Err(CliError::TooManyResponses { count: 12, .. })
        ));
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = super::read(PathBuf::from("/nonexistent/corpus.bin")).expect_err("missing");
        assert!(err.to_string().contains("/nonexistent/corpus.bin"));
    }
}
