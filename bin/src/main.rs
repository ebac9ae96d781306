use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

#[derive(Parser, Debug)]
#[clap(
    name = "jwk-generator",
    version,
    about = "Converts an X.509 certificate into a JSON Web Key"
)]
struct Cli {
    #[clap(flatten)]
    options: loader::cli::GeneratorOptions,

    /// Write the JWK to this file instead of stdout
    #[clap(long, short)]
    output: Option<PathBuf>,

    /// Log at debug level (RUST_LOG takes precedence)
    #[clap(long, short)]
    verbose: bool,
}

/// Quiet runs print `level: message` for the user; verbose runs keep the
/// timestamped line with the source location.
fn log_line(verbose: bool, record: &log::Record) -> String {
    if !verbose {
        return format!(
            "{}: {}",
            record.level().as_str().to_lowercase(),
            record.args()
        );
    }
    format!(
        "{} [{}] - {} - {} - {}:{}",
        chrono::Utc::now().to_rfc3339(),
        record.level(),
        record.target(),
        record.args(),
        record.file().unwrap_or(""),
        record.line().unwrap_or(0),
    )
}

fn log_init(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format(move |buf, record| {
            use std::io::Write;
            writeln!(buf, "{}", log_line(verbose, record))
        })
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    log_init(cli.verbose);

    let config = loader::config::generator_config();
    let json = loader::run(&cli.options, &config)
        .with_context(|| format!("failed to convert {}", cli.options.certificate.display()))?;

    match &cli.output {
        Some(path) => std::fs::write(path, format!("{json}\n"))
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}
