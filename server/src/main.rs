use std::sync::Arc;

use todo_core::KvTodoRepository;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let data_dir = std::env::var("TODO_DATA_DIR").unwrap_or_else(|_| "data".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "5000".to_string());

    let repo = Arc::new(KvTodoRepository::open(&data_dir)?);
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, %data_dir, "todo server listening");
    todo_server::run(listener, repo).await
}
