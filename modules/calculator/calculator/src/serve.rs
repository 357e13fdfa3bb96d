//! Hosting of the `CalculatorService` tonic server.

use std::net::SocketAddr;
#[cfg(unix)]
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_util::sync::CancellationToken;
use tonic::transport::Server;

use calculator_sdk::{CalculatorServiceServer, SERVICE_NAME};

use crate::api::grpc::CalculatorServiceImpl;
use crate::domain::Service;

/// Where the gRPC server listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenConfig {
    Tcp(SocketAddr),
    #[cfg(unix)]
    Uds(PathBuf),
}

impl ListenConfig {
    /// Parse a `listen_addr` value.
    ///
    /// # Errors
    /// Returns an error if the address format is invalid or unsupported on the platform.
    pub fn parse(listen_addr: &str) -> anyhow::Result<Self> {
        if let Some(path) = listen_addr.strip_prefix("uds://") {
            #[cfg(unix)]
            {
                if path.is_empty() {
                    anyhow::bail!("UDS listen_addr has an empty path: '{listen_addr}'");
                }
                return Ok(Self::Uds(PathBuf::from(path)));
            }
            #[cfg(not(unix))]
            {
                let _ = path;
                anyhow::bail!("UDS listen_addr is not supported on this platform: '{listen_addr}'");
            }
        }

        let addr = listen_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("invalid listen_addr '{listen_addr}'"))?;
        Ok(Self::Tcp(addr))
    }
}

/// Serve the calculator over `listen_addr` until `cancel` fires.
///
/// # Errors
/// Returns an error if the address is invalid, binding fails, or the server fails.
pub async fn serve_grpc(
    service: Arc<Service>,
    listen_addr: &str,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    match ListenConfig::parse(listen_addr)? {
        ListenConfig::Tcp(addr) => {
            let listener = TcpListener::bind(addr)
                .await
                .with_context(|| format!("failed to bind gRPC listener at {addr}"))?;
            serve_tcp(service, listener, cancel).await
        }
        #[cfg(unix)]
        ListenConfig::Uds(path) => serve_uds(service, &path, cancel).await,
    }
}

/// Serve on an already bound TCP listener.
///
/// # Errors
/// Returns an error if the server fails.
pub async fn serve_tcp(
    service: Arc<Service>,
    listener: TcpListener,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let bound_addr = listener.local_addr()?;
    tracing::info!(%bound_addr, transport = "tcp", service = SERVICE_NAME, "gRPC server listening");

    let incoming = TcpListenerStream::new(listener);
    Server::builder()
        .add_service(CalculatorServiceServer::new(CalculatorServiceImpl::new(service)))
        .serve_with_incoming_shutdown(incoming, async move {
            cancel.cancelled().await;
        })
        .await?;

    tracing::info!("gRPC server stopped");
    Ok(())
}

#[cfg(unix)]
async fn serve_uds(
    service: Arc<Service>,
    path: &Path,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    use tokio::net::UnixListener;
    use tokio_stream::wrappers::UnixListenerStream;

    prepare_uds_socket_path(path);

    let uds = UnixListener::bind(path)
        .with_context(|| format!("failed to bind UDS listener at '{}'", path.display()))?;
    tracing::info!(path = %path.display(), transport = "uds", service = SERVICE_NAME, "gRPC server listening");

    let incoming = UnixListenerStream::new(uds);
    Server::builder()
        .add_service(CalculatorServiceServer::new(CalculatorServiceImpl::new(service)))
        .serve_with_incoming_shutdown(incoming, async move {
            cancel.cancelled().await;
        })
        .await?;

    tracing::info!("gRPC server stopped");
    Ok(())
}

/// Remove a stale socket file left by a previous run.
#[cfg(unix)]
fn prepare_uds_socket_path(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "removed existing UDS socket file before bind");
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to remove existing UDS socket file before bind"
            );
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn parses_tcp_addresses() {
        assert_eq!(
            ListenConfig::parse("127.0.0.1:50051").unwrap(),
            ListenConfig::Tcp("127.0.0.1:50051".parse().unwrap())
        );
        assert!(ListenConfig::parse("localhost").is_err());
        assert!(ListenConfig::parse("").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn parses_uds_addresses() {
        assert_eq!(
            ListenConfig::parse("uds:///tmp/calc.sock").unwrap(),
            ListenConfig::Uds(PathBuf::from("/tmp/calc.sock"))
        );
        assert!(ListenConfig::parse("uds://").is_err());
    }

    #[tokio::test]
    async fn stops_when_cancelled() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(serve_tcp(
            Arc::new(Service::default()),
            listener,
            cancel.clone(),
        ));

        cancel.cancel();
        let result = tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }
}
