// Idiomatic Rust CLI for Oxi85.
//
// Explicit `encode`/`decode` subcommands, with `-e`/`-d` accepted as the
// short forms used by classic btoa-style tools (`oxi85 -e in out`).

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::codec::decoder::{Ascii85Decoder, StreamEnd};
use crate::codec::encoder;
use crate::codec::{BASE, DIGIT_OFFSET, HEADER, LINE_WIDTH, MAX_DIGIT, TRAILER, ZERO_SHORTHAND};
use crate::io::BUF_SIZE;

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Ascii85 (btoa) encoder/decoder.
#[derive(Parser, Debug)]
#[command(
    name = "oxi85",
    version,
    about = "Ascii85 encoder/decoder",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stderr.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Encode binary input as Ascii85 text.
    #[command(short_flag = 'e')]
    Encode(StreamArgs),
    /// Decode the first Ascii85 payload in the input.
    #[command(short_flag = 'd')]
    Decode(StreamArgs),
    /// Print build/configuration details.
    Config,
}

#[derive(Args, Debug)]
struct StreamArgs {
    /// Input file (default: stdin).
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "input_pos")]
    input: Option<PathBuf>,

    /// Output file (default: stdout).
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "output_pos")]
    output: Option<PathBuf>,

    /// Write output to stdout.
    #[arg(short = 'c', long)]
    stdout: bool,

    /// Input file (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    input_pos: Option<PathBuf>,

    /// Output file (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    output_pos: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Resolved command + options (flattened from Cli)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Encode,
    Decode,
    Config,
}

#[derive(Debug)]
struct Options {
    command: Command,
    use_stdout: bool,
    force: bool,
    quiet: bool,
    verbose: u8,
    input_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
    json_output: bool,
}

fn resolve_options(cli: Cli) -> Options {
    let (command, args) = match cli.command {
        Cmd::Encode(args) => (Command::Encode, Some(args)),
        Cmd::Decode(args) => (Command::Decode, Some(args)),
        Cmd::Config => (Command::Config, None),
    };

    let (use_stdout, input_file, output_file) = match args {
        Some(args) => (
            args.stdout,
            args.input.or(args.input_pos),
            args.output.or(args.output_pos),
        ),
        None => (false, None, None),
    };

    Options {
        command,
        use_stdout,
        force: cli.force,
        quiet: cli.quiet,
        verbose: cli.verbose.min(2),
        input_file,
        output_file,
        json_output: cli.json_output,
    }
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("oxi85".to_string())
        .chain(args.iter().cloned())
        .collect();
    if let Ok(cli) = Cli::try_parse_from(argv) {
        let _ = resolve_options(cli);
    }
}

fn log_filter(opts: &Options) -> &'static str {
    match (opts.quiet, opts.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    }
}

// ---------------------------------------------------------------------------
// Config command
// ---------------------------------------------------------------------------

fn cmd_config() -> i32 {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!("oxi85 version {version} (Rust)");

    let cli = cfg!(feature = "cli") as u8;
    let header = String::from_utf8_lossy(HEADER);
    let trailer = String::from_utf8_lossy(TRAILER);
    let shorthand = ZERO_SHORTHAND as char;

    eprintln!("CLI={cli}");
    eprintln!("HEADER={header}");
    eprintln!("TRAILER={trailer}");
    eprintln!("ZERO_SHORTHAND={shorthand}");
    eprintln!("BASE={BASE}");
    eprintln!("DIGIT_OFFSET={DIGIT_OFFSET}");
    eprintln!("MAX_DIGIT={MAX_DIGIT}");
    eprintln!("LINE_WIDTH={LINE_WIDTH}");

    0
}

// ---------------------------------------------------------------------------
// Input/output helpers
// ---------------------------------------------------------------------------

fn open_input(opts: &Options) -> Result<Box<dyn Read>, i32> {
    match &opts.input_file {
        Some(path) => match File::open(path) {
            Ok(f) => Ok(Box::new(BufReader::with_capacity(BUF_SIZE, f))),
            Err(e) => {
                eprintln!("oxi85: input file: {}: {e}", path.display());
                Err(1)
            }
        },
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

fn open_output(opts: &Options) -> Result<Box<dyn Write>, i32> {
    match (opts.use_stdout, &opts.output_file) {
        (true, _) | (_, None) => Ok(Box::new(BufWriter::with_capacity(
            BUF_SIZE,
            io::stdout().lock(),
        ))),
        (false, Some(path)) => {
            if path.exists() && !opts.force {
                eprintln!(
                    "oxi85: output file exists, use -f to overwrite: {}",
                    path.display()
                );
                return Err(1);
            }
            match File::create(path) {
                Ok(f) => Ok(Box::new(BufWriter::with_capacity(BUF_SIZE, f))),
                Err(e) => {
                    eprintln!("oxi85: output file: {}: {e}", path.display());
                    Err(1)
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Encode command
// ---------------------------------------------------------------------------

fn cmd_encode(opts: &Options) -> i32 {
    let reader = match open_input(opts) {
        Ok(r) => r,
        Err(code) => return code,
    };
    let mut writer = match open_output(opts) {
        Ok(w) => w,
        Err(code) => return code,
    };

    let stats = match encoder::encode_to(reader, &mut writer) {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("oxi85: encode error: {e}");
            return 1;
        }
    };

    if let Err(e) = writer.flush() {
        eprintln!("oxi85: write flush error: {e}");
        return 1;
    }

    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "oxi85: encoder: input size: {}, output size: {}, groups: {}, zero groups: {}, lines: {}",
            stats.input_bytes, stats.output_bytes, stats.groups, stats.zero_groups, stats.lines
        );
    }

    if opts.json_output {
        let json = serde_json::json!({
            "command": "encode",
            "input_size": stats.input_bytes,
            "output_size": stats.output_bytes,
            "groups": stats.groups,
            "zero_groups": stats.zero_groups,
            "lines": stats.lines,
        });
        eprintln!("{json:#}");
    }

    0
}

// ---------------------------------------------------------------------------
// Decode command
// ---------------------------------------------------------------------------

fn stream_end_name(end: StreamEnd) -> &'static str {
    match end {
        StreamEnd::NoHeader => "no-header",
        StreamEnd::Trailer => "trailer",
        StreamEnd::EndOfInput => "end-of-input",
        StreamEnd::Aborted => "aborted",
    }
}

fn cmd_decode(opts: &Options) -> i32 {
    let reader = match open_input(opts) {
        Ok(r) => r,
        Err(code) => return code,
    };
    let mut writer = match open_output(opts) {
        Ok(w) => w,
        Err(code) => return code,
    };

    let mut decoder = Ascii85Decoder::new(reader);
    let result = decoder.decode_to(&mut writer);

    // Bytes decoded before a malformed digit are kept.
    if let Err(e) = writer.flush() {
        eprintln!("oxi85: write flush error: {e}");
        return 1;
    }

    let stats = match result {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("oxi85: decode error: {e}");
            return 1;
        }
    };

    if stats.end == StreamEnd::NoHeader && !opts.quiet {
        eprintln!("oxi85: warning: no <~ header found in input");
    }

    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "oxi85: decoder: input size: {}, output size: {}, groups: {}, zero groups: {}, end: {}",
            stats.input_bytes,
            stats.output_bytes,
            stats.groups,
            stats.zero_groups,
            stream_end_name(stats.end)
        );
    }

    if opts.json_output {
        let json = serde_json::json!({
            "command": "decode",
            "input_size": stats.input_bytes,
            "output_size": stats.output_bytes,
            "groups": stats.groups,
            "zero_groups": stats.zero_groups,
            "end": stream_end_name(stats.end),
        });
        eprintln!("{json:#}");
    }

    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run() -> ! {
    let cli = Cli::parse();
    let mut opts = resolve_options(cli);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_filter(&opts)))
        .format_timestamp(None)
        .format_target(false)
        .init();

    // Warn if -c overrides output filename.
    if opts.use_stdout && !opts.quiet {
        if let Some(path) = &opts.output_file {
            eprintln!(
                "oxi85: warning: -c option overrides output filename: {}",
                path.display()
            );
        }
    }
    if opts.use_stdout {
        opts.output_file = None;
    }

    let exit_code = match opts.command {
        Command::Encode => cmd_encode(&opts),
        Command::Decode => cmd_decode(&opts),
        Command::Config => cmd_config(),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
