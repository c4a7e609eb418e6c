//! HTTP server lifecycle.
//!
//! bind → serve `api_router()` → stop on the shutdown signal.

use std::future::Future;
use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::api::router::api_router;
use crate::api::types::ApiContext;

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(ctx: ApiContext, addr: SocketAddr) -> Result<(), String> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind {addr}: {e}"))?;

    serve_on(listener, ctx, ctrl_c()).await
}

/// Serve on an already-bound listener until `shutdown` resolves.
pub async fn serve_on<F>(listener: TcpListener, ctx: ApiContext, shutdown: F) -> Result<(), String>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get server address: {e}"))?;

    let app = api_router(ctx);
    tracing::info!(%addr, "MediVision server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| format!("Server error: {e}"))?;

    tracing::info!("MediVision server stopped");
    Ok(())
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::sync::oneshot;

    use crate::doctors::DoctorRecommender;
    use crate::history::SqliteHistoryStore;
    use crate::pipeline::Orchestrator;
    use crate::report::ReportGenerator;
    use crate::resources::tests::bundled_resources_dir;
    use crate::resources::ResourceBundle;

    fn test_ctx() -> ApiContext {
        let bundle = ResourceBundle::load(&bundled_resources_dir()).unwrap();
        let orchestrator = Orchestrator::from_resources(
            bundle,
            DoctorRecommender::builtin(),
            Arc::new(SqliteHistoryStore::open_in_memory().unwrap()),
            ReportGenerator::default(),
        );
        ApiContext::new(Arc::new(orchestrator))
    }

    #[tokio::test]
    async fn start_serve_and_stop() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let server = tokio::spawn(serve_on(listener, test_ctx(), async move {
            let _ = shutdown_rx.await;
        }));

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /api/health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = Vec::new();
        stream.read_to_end(&mut response).await.unwrap();
        let response = String::from_utf8_lossy(&response);
        assert!(response.starts_with("HTTP/1.1 200 OK"), "got: {response}");
        assert!(response.contains("\"status\":\"ok\""));

        shutdown_tx.send(()).unwrap();
        server.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn bind_failure_is_reported() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = taken.local_addr().unwrap();

        let err = serve(test_ctx(), addr).await.unwrap_err();
        assert!(err.starts_with("Failed to bind"));
    }
}
