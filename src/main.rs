use anyhow::{Error, Result};
use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use termcolor::{ColorChoice, StandardStream};
use tracing_subscriber::EnvFilter;

// Use modules from the library instead of redefining them
use geofeedcheck::engine::{Config, Engine, FamilyFilter};
use geofeedcheck::rir::RirClient;
use geofeedcheck::{report, FeedSource};

/// Check if the error chain contains a broken pipe error.
#[inline(always)]
fn is_broken_pipe(err: &Error) -> bool {
    // Look for a broken pipe error in the error chain
    for cause in err.chain() {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::BrokenPipe {
                return true;
            }
        }
    }
    false
}

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Show detailed validation information
    #[clap(short, long)]
    verbose: bool,

    /// Show prefix length and country statistics
    #[clap(long)]
    stats: bool,

    /// Skip TLS certificate verification (use with caution)
    #[clap(long)]
    insecure: bool,

    /// Skip checking for overlapping IP ranges
    #[clap(long)]
    no_overlap_check: bool,

    /// Show RIR (Regional Internet Registry) data for each prefix
    #[clap(long)]
    show_rir: bool,

    /// Only validate IPv4 addresses
    #[clap(short = '4', long, conflicts_with = "ipv6_only")]
    ipv4_only: bool,

    /// Only validate IPv6 addresses
    #[clap(short = '6', long)]
    ipv6_only: bool,

    /// Path to the RFC 8805 formatted file, "-" for stdin, or an HTTP(S) URL
    #[clap(value_name = "INPUT", value_hint = clap::ValueHint::FilePath)]
    input: String,
}

fn main() -> ExitCode {
    // Use a separate run function to handle the actual work
    let err = match run_main() {
        Ok(code) => return code,
        Err(err) => err,
    };

    // Handle broken pipe errors gracefully
    if is_broken_pipe(&err) {
        return ExitCode::SUCCESS;
    }

    // Print detailed error information based on environment variables
    if std::env::var("RUST_BACKTRACE").is_ok_and(|v| v == "1")
        && std::env::var("RUST_LIB_BACKTRACE").map_or(true, |v| v == "1")
    {
        writeln!(&mut std::io::stderr(), "{:?}", err).unwrap();
    } else {
        writeln!(&mut std::io::stderr(), "{:#}", err).unwrap();
    }

    ExitCode::FAILURE
}

fn run_main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let family_filter = if args.ipv4_only {
        FamilyFilter::V4Only
    } else if args.ipv6_only {
        FamilyFilter::V6Only
    } else {
        FamilyFilter::All
    };

    let config = Config {
        family_filter,
        overlap_check_enabled: !args.no_overlap_check,
        show_rir: args.show_rir,
        verbose: args.verbose,
        insecure_tls: args.insecure,
    };

    // determine appropriate colormode. auto simply
    // tests if stdout is a tty (if so, then yes color)
    // or otherwise don't color if it's to a file or another pipe
    let colormode = if std::io::stdout().is_terminal() {
        ColorChoice::Always
    } else {
        ColorChoice::Never
    };

    let source = FeedSource::from_arg(&args.input);

    // The RDAP client outlives the engine borrowing it
    let rir_client;
    let engine = if args.show_rir {
        rir_client = RirClient::new()?;
        Engine::with_rir(config, &rir_client)
    } else {
        Engine::new(config)
    };

    let run = engine.validate_source(&source)?;

    let mut out = StandardStream::stdout(colormode);

    if args.show_rir {
        report::print_rir_records(&mut out, &run.rir_records)?;
    }

    report::print_results(&mut out, &run)?;

    if args.stats {
        report::print_stats(&mut out, &run.statistics)?;
    }

    let passed = run.passed();
    if args.verbose && passed {
        writeln!(
            &mut out,
            "\nFile '{}' is a valid RFC 8805 geo IP feed",
            source
        )?;
    }

    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
