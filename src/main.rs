use anyhow::{Context, Error, Result};
use camino::Utf8PathBuf;
use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing_subscriber::EnvFilter;

use nali::input::LineReader;
use nali::{command, encoding, AppConfig, Annotator, Extractor, GeoDatabase, GeoLocator};
use nali::{MaxMindDatabase, Mode, SearchPath};

/// Check if the error chain contains a broken pipe error.
#[inline(always)]
fn is_broken_pipe(err: &Error) -> bool {
    for cause in err.chain() {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::BrokenPipe {
                return true;
            }
        }
    }
    false
}

// The built-in help and version flags are off: `-h`, `--help`, `-v`,
// `--version`, `-c` and `--color` are command words handled by `Mode`.
#[derive(Parser, Debug)]
#[clap(
    name = "nali",
    about,
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Args {
    /// Database files to try in order. The first one that exists is opened,
    /// otherwise the last one is attempted anyway
    #[clap(long, value_name = "FILE", env = "NALI_DB", value_delimiter = ',')]
    db: Vec<Utf8PathBuf>,

    /// Character encoding of piped input
    #[clap(
        long,
        value_name = "LABEL",
        env = "NALI_ENCODING",
        default_value = encoding::DEFAULT_SOURCE_ENCODING
    )]
    encoding: String,

    /// A command (help, version, color) followed by addresses or text to annotate
    #[clap(value_name = "ARGS", allow_hyphen_values = true, trailing_var_arg = true)]
    args: Vec<String>,
}

fn main() -> ExitCode {
    init_tracing();

    let err = match run_main() {
        Ok(code) => return code,
        Err(err) => err,
    };

    // Handle broken pipe errors gracefully
    if is_broken_pipe(&err) {
        return ExitCode::SUCCESS;
    }

    let mut stderr = io::stderr();
    if std::env::var("RUST_BACKTRACE").is_ok_and(|v| v == "1")
        && std::env::var("RUST_LIB_BACKTRACE").map_or(true, |v| v == "1")
    {
        let _ = writeln!(stderr, "{:?}", err);
    } else {
        let _ = writeln!(stderr, "{:#}", err);
    }

    ExitCode::FAILURE
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("NALI_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run_main() -> Result<ExitCode> {
    let args = Args::parse();
    let search_path = SearchPath::new(args.db);

    match Mode::select(args.args, io::stdin().is_terminal()) {
        Mode::Help => print_usage()?,
        Mode::Version => print_version(&search_path)?,
        Mode::Args { config, items } => run_args(&search_path, &config, &items)?,
        Mode::Stdin { config } => run_stdin(&search_path, &config, &args.encoding)?,
    }

    Ok(ExitCode::SUCCESS)
}

/// The name the program was invoked under, as shown in the usage line.
fn program_name() -> String {
    std::env::args_os()
        .next()
        .map(|arg| arg.to_string_lossy().into_owned())
        .unwrap_or_else(|| "nali".to_string())
}

fn print_usage() -> Result<()> {
    let mut out = io::stdout().lock();
    out.write_all(command::usage(&program_name()).as_bytes())?;
    out.flush()?;
    Ok(())
}

// determine appropriate colormode: color output is requested explicitly
// with the color command, never inferred from the terminal
fn color_choice(config: &AppConfig) -> ColorChoice {
    if config.color {
        ColorChoice::Always
    } else {
        ColorChoice::Never
    }
}

fn print_version(search_path: &SearchPath) -> Result<()> {
    let colormode = if io::stdout().is_terminal() {
        ColorChoice::Always
    } else {
        ColorChoice::Never
    };
    let mut out = StandardStream::stdout(colormode);

    writeln!(out, "{} {}", clap::crate_name!(), clap::crate_version!())?;

    let path = search_path.resolve();
    let db = match MaxMindDatabase::open(path) {
        Ok(db) => db,
        Err(err) => {
            write!(out, "IPv4 Version: ")?;
            out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
            write!(out, "Database Not Found.")?;
            out.reset()?;
            writeln!(out)?;
            out.flush()?;
            tracing::error!(path = %path, error = %err, "failed to load database");
            return Err(err).context("failed to load database");
        }
    };

    let info = db.info();
    if info.supports_ipv4() {
        let build_time = info
            .build_time()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| info.build_epoch.to_string());
        writeln!(out, "Database Path: {}", info.path)?;
        writeln!(out, "Database Type: {}", info.database_type)?;
        writeln!(out, "Database BuildTime: {}", build_time)?;
        writeln!(out, "Database Fields: [{}]", info.fields.join(" "))?;
    }
    out.flush()?;
    Ok(())
}

fn annotator(search_path: &SearchPath) -> Result<Annotator> {
    let extractor = Extractor::new().context("failed to build IPv4 extractor")?;
    Ok(Annotator::new(
        extractor,
        GeoLocator::open_or_unavailable(search_path),
    ))
}

fn run_args(search_path: &SearchPath, config: &AppConfig, items: &[String]) -> Result<()> {
    if items.is_empty() {
        return Ok(());
    }

    let mut annotator = annotator(search_path)?;
    let mut out = io::BufWriter::with_capacity(65536, StandardStream::stdout(color_choice(config)));

    for item in items {
        out.write_all(annotator.annotate(item, config).as_bytes())?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

fn run_stdin(search_path: &SearchPath, config: &AppConfig, label: &str) -> Result<()> {
    let source = encoding::source_encoding(label)?;
    let mut annotator = annotator(search_path)?;
    let mut out = io::BufWriter::with_capacity(65536, StandardStream::stdout(color_choice(config)));

    // lines keep their own terminators, nothing is appended
    let result = LineReader::stdin().for_byte_line(|raw| {
        let line = encoding::normalize(raw, source);
        out.write_all(annotator.annotate(&line, config).as_bytes())?;
        Ok(())
    });

    out.flush()?;
    result
}
