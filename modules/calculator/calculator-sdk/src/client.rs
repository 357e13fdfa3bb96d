//! gRPC client implementation of `CalculatorClient`

use std::time::Duration;

use async_trait::async_trait;
use tonic::transport::{Channel, Endpoint};
use tonic::{Code, Status};
use tracing::Instrument;

use crate::api::{CalcErrorCode, CalculatorClient, CalculatorError, ERROR_CODE_METADATA_KEY};
use crate::models::{CalcOutcome, WireCommand};
use crate::proto::CalcRequest;
use crate::proto::calculator_service_client::CalculatorServiceClient;

/// Transport settings for [`CalculatorGrpcClient`].
#[derive(Debug, Clone)]
pub struct GrpcClientConfig {
    /// Timeout for establishing the initial connection.
    pub connect_timeout: Duration,

    /// Timeout for individual RPC calls (applied at transport level).
    pub rpc_timeout: Duration,

    /// Service name for tracing.
    pub service_name: &'static str,
}

impl Default for GrpcClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            rpc_timeout: Duration::from_secs(30),
            service_name: crate::SERVICE_NAME,
        }
    }
}

impl GrpcClientConfig {
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_rpc_timeout(mut self, timeout: Duration) -> Self {
        self.rpc_timeout = timeout;
        self
    }
}

/// Build a tonic `Endpoint` with timeouts and keepalive settings.
fn build_endpoint(uri: String, cfg: &GrpcClientConfig) -> Result<Endpoint, tonic::transport::Error> {
    let endpoint = Endpoint::from_shared(uri)?
        .connect_timeout(cfg.connect_timeout)
        .timeout(cfg.rpc_timeout)
        .tcp_keepalive(Some(Duration::from_secs(30)))
        .http2_keep_alive_interval(Duration::from_secs(30))
        .keep_alive_timeout(Duration::from_secs(10))
        .keep_alive_while_idle(true);

    Ok(endpoint)
}

/// gRPC client implementation of `CalculatorClient`
#[derive(Clone)]
pub struct CalculatorGrpcClient {
    inner: CalculatorServiceClient<Channel>,
}

impl CalculatorGrpcClient {
    /// Connect eagerly; fails if the service is unreachable.
    ///
    /// # Errors
    /// Returns [`CalculatorError::Transport`] if the URI is invalid or the
    /// connection cannot be established within the connect timeout.
    pub async fn connect(
        uri: impl Into<String>,
        cfg: &GrpcClientConfig,
    ) -> Result<Self, CalculatorError> {
        let uri = uri.into();
        let span = tracing::debug_span!("grpc_connect", service = cfg.service_name, uri = %uri);

        async move {
            let channel = build_endpoint(uri, cfg)
                .map_err(|e| CalculatorError::Transport(e.to_string()))?
                .connect()
                .await
                .map_err(|e| CalculatorError::Transport(e.to_string()))?;
            tracing::debug!("connected to calculator service");
            Ok(Self::from_channel(channel))
        }
        .instrument(span)
        .await
    }

    /// Build a client whose channel connects on first use.
    ///
    /// # Errors
    /// Returns [`CalculatorError::Transport`] if the URI is invalid.
    pub fn connect_lazy(
        uri: impl Into<String>,
        cfg: &GrpcClientConfig,
    ) -> Result<Self, CalculatorError> {
        let endpoint =
            build_endpoint(uri.into(), cfg).map_err(|e| CalculatorError::Transport(e.to_string()))?;
        Ok(Self::from_channel(endpoint.connect_lazy()))
    }

    #[must_use]
    pub fn from_channel(channel: Channel) -> Self {
        Self {
            inner: CalculatorServiceClient::new(channel),
        }
    }
}

#[async_trait]
impl CalculatorClient for CalculatorGrpcClient {
    async fn calc(&self, commands: Vec<WireCommand>) -> Result<CalcOutcome, CalculatorError> {
        let mut client = self.inner.clone();
        let request = CalcRequest {
            commands: commands.into_iter().map(Into::into).collect(),
        };

        let response = client
            .calc(request)
            .await
            .map_err(|status| status_to_error(&status))?;

        Ok(response.into_inner().into())
    }
}

/// Recover the domain error from a status; anything without a code in
/// metadata is a transport or internal failure.
fn status_to_error(status: &Status) -> CalculatorError {
    let code = status
        .metadata()
        .get(ERROR_CODE_METADATA_KEY)
        .and_then(|v| v.to_str().ok())
        .and_then(CalcErrorCode::parse);

    if let Some(code) = code {
        return CalculatorError::rejected(code, status.message());
    }

    match status.code() {
        Code::Unavailable | Code::DeadlineExceeded | Code::Cancelled => {
            CalculatorError::Transport(status.message().to_owned())
        }
        _ => CalculatorError::Internal(status.message().to_owned()),
    }
}
