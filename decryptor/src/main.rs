//! Command-line entrypoint: `decryptor <source-file> <target-file>`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use decryptor::config::{DecryptorConfig, LogFormat};
use decryptor::decrypt_file;
use decryptor::resolver::{HttpResolver, TokenFile};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// JSON document containing `secure:` values
    source: PathBuf,

    /// Where the resolved document is written
    target: PathBuf,

    /// Decrypt service URL (overrides DECRYPTOR_ENDPOINT)
    #[arg(long)]
    endpoint: Option<String>,

    /// Bearer token file (overrides DECRYPTOR_TOKEN_PATH)
    #[arg(long)]
    token_path: Option<PathBuf>,

    /// Log filter, e.g. "debug" (overrides DECRYPTOR_LOG_LEVEL; RUST_LOG wins over both)
    #[arg(long)]
    log_level: Option<String>,

    /// "text" or "json" (overrides DECRYPTOR_LOG_FORMAT)
    #[arg(long)]
    log_format: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = DecryptorConfig::from_env();
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(path) = cli.token_path {
        config.token_path = path;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format.as_deref() {
        config.log_format = LogFormat::parse_lenient(format);
    }

    init_tracing(&config);

    let resolver = match HttpResolver::new(&config.endpoint, TokenFile::new(&config.token_path)) {
        Ok(resolver) => resolver,
        Err(err) => {
            eprintln!("decryptor failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    match decrypt_file(&cli.source, &cli.target, &resolver) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("decryptor failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(config: &DecryptorConfig) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match config.log_format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Text => subscriber.init(),
    }
}
