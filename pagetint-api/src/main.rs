use pagetint_api::app;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pagetint_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr =
        std::env::var("PAGETINT_API_ADDR").unwrap_or_else(|_| "127.0.0.1:9006".to_string());

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    info!("pagetint API listening on http://{addr}");

    axum::serve(listener, app()).await.unwrap();
}
