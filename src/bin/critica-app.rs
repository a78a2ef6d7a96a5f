use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;

use critica::api::{CriticaApi, HttpApi};
use critica::cli::ConnectionArgs;
use critica::config::Config;
use critica::session::{FileStorage, Session, SharedSession, Storage};
use critica::web::{self, AppState};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct AppArgs {
    #[arg(long, env = "CRITICA_ADDR", default_value = "127.0.0.1:3000")]
    addr: SocketAddr,

    #[command(flatten)]
    connection: ConnectionArgs,
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return std::process::ExitCode::FAILURE;
    }
    std::process::ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    critica::logging::init(critica::logging::APP_DIRECTIVE)?;

    let args = AppArgs::parse();
    tracing::info!(?args, "starting critica-app");

    let config = Config::from_args(&args.connection).context("resolve config")?;
    let api: Arc<dyn CriticaApi> = Arc::new(HttpApi::new(config.api_url.as_str())?);
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(&config.session_dir));
    let session: SharedSession = Session::init(storage).context("open session")?;
    if session.api_key().is_none() {
        tracing::info!("no stored api key; dashboard requires `critica login`");
    }

    let app = web::router(AppState {
        api,
        session: Arc::new(session),
    });

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .map_err(|err| anyhow::anyhow!("bind {}: {err}", args.addr))?;
    tracing::info!(addr = %args.addr, api_url = %config.api_url, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;
    Ok(())
}
