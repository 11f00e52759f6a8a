use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

mod config;
mod error;
mod extract;
mod handler;
mod http;
mod logger;
mod server;
mod upload;

/// Upload a PDF or plain-text document, get its text back as JSON
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Configuration file (extension optional; missing file means defaults)
    #[arg(short, long, default_value = "docextract")]
    config: String,

    /// Address to bind, overrides `server.host`
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, overrides `server.port`
    #[arg(short, long)]
    port: Option<u16>,

    /// Transient upload directory, overrides `upload.dir`
    #[arg(long)]
    upload_dir: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let overrides = config::Overrides {
        host: args.host,
        port: args.port,
        upload_dir: args.upload_dir,
    };
    let cfg = config::Config::load_from(&args.config, &overrides)?;
    logger::init(&cfg.logging)?;

    // Build the Tokio runtime, sized by the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    tokio::fs::create_dir_all(&cfg.upload.dir).await?;

    let listener = server::create_listener(addr)?;
    logger::log_server_start(&addr, &cfg);

    let state = Arc::new(config::AppState::new(cfg));
    server::run_server_loop(listener, state, server::shutdown_signal()).await;
    Ok(())
}
