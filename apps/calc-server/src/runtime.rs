//! Process lifecycle: start every server, wait for a signal or a failure,
//! then drain within the shutdown timeout.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use calc_bootstrap::{AppConfig, module_config_or_default, wait_for_shutdown};
use calculator::{CalculatorConfig, ListenConfig, LocalCalculatorClient};
use calculator_gateway::{GatewayConfig, build_docs_router, build_router, upstream_client};
use calculator_sdk::CalculatorClient;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;

type TaskOutcome = (&'static str, Result<()>);

/// Typed module sections, decoded leniently from `modules.<name>.config`.
#[derive(Debug, Clone)]
pub struct ModuleConfigs {
    pub calculator: CalculatorConfig,
    pub gateway: GatewayConfig,
}

impl ModuleConfigs {
    pub fn load(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            calculator: module_config_or_default(config, calculator::MODULE_NAME)?,
            gateway: module_config_or_default(config, calculator_gateway::MODULE_NAME)?,
        })
    }

    /// Checks that go beyond deserialization: addresses parse and the
    /// gateway router can be built.
    pub fn validate(&self) -> Result<()> {
        ListenConfig::parse(&self.calculator.listen_addr)
            .context("modules.calculator.config.listen_addr")?;

        let gw = &self.gateway;
        if gw.enabled {
            calculator_gateway::server::parse_bind_address(&gw.bind_addr)
                .context("modules.calculator_gateway.config.bind_addr")?;
            if gw.docs.enabled {
                calculator_gateway::server::parse_bind_address(&gw.docs.bind_addr)
                    .context("modules.calculator_gateway.config.docs.bind_addr")?;
            }
            if gw.cors_enabled {
                calculator_gateway::cors::build_cors_layer(&gw.cors)
                    .context("modules.calculator_gateway.config.cors")?;
            }
        }
        Ok(())
    }
}

/// Run until a shutdown signal arrives or any server stops on its own.
pub async fn run(config: &AppConfig, modules: ModuleConfigs) -> Result<()> {
    let cancel = CancellationToken::new();
    let mut tasks: JoinSet<TaskOutcome> = JoinSet::new();

    let core = Arc::new(calculator::Service::new(&modules.calculator));

    {
        let core = core.clone();
        let addr = modules.calculator.listen_addr.clone();
        let token = cancel.child_token();
        tasks.spawn(async move { ("grpc", calculator::serve_grpc(core, &addr, token).await) });
    }

    let gw = modules.gateway;
    if gw.enabled {
        let client: Arc<dyn CalculatorClient> = match gw.upstream.as_deref() {
            Some(uri) => {
                tracing::info!(upstream = uri, "Gateway forwards to remote calculator");
                upstream_client(uri, &gw)?
            }
            None => {
                tracing::info!("Gateway evaluates in-process");
                Arc::new(LocalCalculatorClient::new(core))
            }
        };
        let router = build_router(Arc::new(calculator_gateway::Service::new(client)), &gw)?;
        let addr = gw.bind_addr.clone();
        let token = cancel.child_token();
        tasks.spawn(async move {
            (
                "gateway",
                calculator_gateway::serve(router, &addr, token, "gateway").await,
            )
        });

        if gw.docs.enabled {
            let addr = gw.docs.bind_addr.clone();
            let token = cancel.child_token();
            tasks.spawn(async move {
                (
                    "docs",
                    calculator_gateway::serve(build_docs_router(), &addr, token, "docs").await,
                )
            });
        }
    } else {
        tracing::info!("Gateway disabled");
    }

    let outcome = tokio::select! {
        signal = wait_for_shutdown() => signal.map(|_| ()),
        Some(joined) = tasks.join_next() => Err(early_exit(joined)),
    };

    cancel.cancel();
    drain(&mut tasks, config.server.shutdown_timeout).await;
    tracing::info!("Calculator server stopped");
    outcome
}

fn early_exit(joined: Result<TaskOutcome, JoinError>) -> anyhow::Error {
    let err = match joined {
        Ok((name, Ok(()))) => anyhow!("{name} server stopped unexpectedly"),
        Ok((name, Err(e))) => e.context(format!("{name} server failed")),
        Err(e) => anyhow!("server task panicked: {e}"),
    };
    tracing::error!(error = %format!("{err:#}"), "Server exited, shutting down");
    err
}

async fn drain(tasks: &mut JoinSet<TaskOutcome>, timeout: Duration) {
    let graceful = tokio::time::timeout(timeout, async {
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((name, Ok(()))) => tracing::debug!(server = name, "stopped"),
                Ok((name, Err(e))) => {
                    tracing::warn!(server = name, error = %format!("{e:#}"), "stopped with error");
                }
                Err(e) => tracing::warn!(error = %e, "server task panicked during shutdown"),
            }
        }
    })
    .await;

    if graceful.is_err() {
        tracing::warn!(
            timeout = ?timeout,
            "Shutdown timeout elapsed, aborting remaining servers"
        );
        tasks.abort_all();
        while tasks.join_next().await.is_some() {}
    }
}
