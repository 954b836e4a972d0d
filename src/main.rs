//! mailsweep - entry point for the interactive console tool

use mailsweep::App;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting mailsweep");

    if let Err(e) = App::new().run().await {
        tracing::error!("Application error: {}", e);
        std::process::exit(1);
    }
}
