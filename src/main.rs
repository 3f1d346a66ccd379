use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use devserve::config::{self, Config};
use devserve::handler::StaticFileHandler;
use devserve::{logger, server, Result, ServeError};

/// Static file server for local development
#[derive(Debug, Parser)]
#[command(name = "devserve", version, about)]
struct Cli {
    /// Port to listen on; a value that is not a port falls back to the default
    port: Option<String>,

    /// Directory to serve (must exist)
    directory: Option<PathBuf>,

    /// Configuration file, extension optional
    #[arg(short, long, default_value = config::DEFAULT_CONFIG_FILE)]
    config: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut cfg = Config::load_from(&cli.config)?;
    logger::init(&cfg.logging)?;

    cfg.server.port = config::resolve_port(cli.port.as_deref(), cfg.server.port);
    let root = config::resolve_root(cli.directory.as_deref(), &cfg.server.root)?;

    // Create Tokio runtime, thread count from the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg, root))
}

async fn async_main(cfg: Config, root: PathBuf) -> Result<()> {
    let addr = cfg.socket_addr()?;
    let listener = server::bind(addr)?;

    logger::log_server_start(cfg.server.port, &root);

    let handler = Arc::new(StaticFileHandler::new(root, &cfg));
    server::serve(listener, handler, server::shutdown_signal()).await?;
    Ok(())
}

fn report(err: &ServeError) {
    match err {
        ServeError::AddrInUse { port } => logger::log_port_in_use(*port),
        other => logger::log_fatal(&other.to_string()),
    }
}
