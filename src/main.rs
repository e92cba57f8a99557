use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use expense_ledger::server::router::{LedgerState, ledger_router};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &expense_ledger::config::CONFIG;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        storage = ?cfg.storage,
        data_path = %cfg.data_path.display(),
        database_url = %cfg.database_url,
        loglevel = %cfg.loglevel
    );

    let store = expense_ledger::store::open(cfg).await?;
    let handle = expense_ledger::service::spawn(store).await?;

    let state = LedgerState::new(handle.clone());
    let app = ledger_router(state);

    let addr = cfg.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    expense_ledger::server::serve(listener, app).await?;

    handle.stop();
    Ok(())
}
