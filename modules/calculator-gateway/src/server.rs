use std::net::SocketAddr;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Parse bind address from configuration string.
///
/// # Errors
/// Returns an error if `bind_addr` is not a `host:port` socket address.
pub fn parse_bind_address(bind_addr: &str) -> anyhow::Result<SocketAddr> {
    bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address '{bind_addr}': {e}"))
}

/// Bind `bind_addr` and serve `router` until `cancel` fires.
///
/// # Errors
/// Returns an error if the address is invalid, binding fails, or the
/// server stops with an I/O error.
pub async fn serve(
    router: Router,
    bind_addr: &str,
    cancel: CancellationToken,
    server: &'static str,
) -> anyhow::Result<()> {
    let addr = parse_bind_address(bind_addr)?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {server} server to {addr}"))?;
    serve_listener(router, listener, cancel, server).await
}

/// Serve on an already bound listener until `cancel` fires.
///
/// # Errors
/// Returns an error if the server stops with an I/O error.
pub async fn serve_listener(
    router: Router,
    listener: TcpListener,
    cancel: CancellationToken,
    server: &'static str,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(server, %addr, "HTTP server bound");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .with_context(|| format!("{server} server failed"))?;

    tracing::info!(server, "HTTP server stopped");
    Ok(())
}
