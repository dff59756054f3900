/// Kaarigar360 Admin Console
///
/// Back-office service for the Kaarigar360 home-services marketplace:
/// registration approval, dispute resolution, platform analytics, and an
/// append-only audit trail over the shared document store.

mod admin;
mod analytics;
mod api;
mod auth;
mod config;
mod context;
mod error;
mod metrics;
mod model;
mod server;
mod store;

use config::ConsoleConfig;
use context::AppContext;
use error::ConsoleResult;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ConsoleResult<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kaarigar_console=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Print banner
    print_banner();

    // Load configuration
    let config = ConsoleConfig::from_env()?;

    // Create application context
    let ctx = AppContext::new(config).await?;

    // Start server
    server::serve(ctx).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
    __ __                 _                 _____  ____ ____
   / //_/___ _____ ______(_)___ _____ _____|__  / / ___// __ \
  / ,<  / __ `/ __ `/ ___/ / __ `/ __ `/ ___//_ </ __ \/ / / /
 / /| |/ /_/ / /_/ / /  / / /_/ / /_/ / /  ___/ / /_/ / /_/ /
/_/ |_|\__,_/\__,_/_/  /_/\__, /\__,_/_/  /____/\____/\____/
                         /____/

        Admin Console v{}
        "#,
        env!("CARGO_PKG_VERSION")
    );
}
