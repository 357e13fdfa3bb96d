#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end tests: tonic server on a loopback listener, SDK client on the other side.

use std::sync::Arc;
use std::time::Duration;

use calculator::{CalculatorConfig, Service, serve_tcp};
use calculator_sdk::{
    CalcErrorCode, CalculatorClient, CalculatorError, CalculatorGrpcClient, GrpcClientConfig,
    VariableValue, WireCommand,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

struct TestServer {
    uri: String,
    cancel: CancellationToken,
    handle: JoinHandle<anyhow::Result<()>>,
}

impl TestServer {
    async fn start(config: &CalculatorConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(serve_tcp(
            Arc::new(Service::new(config)),
            listener,
            cancel.clone(),
        ));

        Self {
            uri: format!("http://{addr}"),
            cancel,
            handle,
        }
    }

    async fn client(&self) -> CalculatorGrpcClient {
        CalculatorGrpcClient::connect(&self.uri, &GrpcClientConfig::default())
            .await
            .expect("connect to loopback server")
    }

    async fn stop(self) {
        self.cancel.cancel();
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server stops within timeout")
            .unwrap()
            .unwrap();
    }
}

#[tokio::test]
async fn evaluates_batch_over_grpc() {
    let server = TestServer::start(&CalculatorConfig::default()).await;
    let client = server.client().await;

    let outcome = client
        .calc(vec![
            WireCommand::calc_binary("x", "+", 2.0, 3.0),
            WireCommand::calc_expr("y", "x / 2"),
            WireCommand::print("x"),
            WireCommand::print("y"),
        ])
        .await
        .unwrap();

    assert_eq!(
        outcome.items,
        vec![VariableValue::new("x", 5.0), VariableValue::new("y", 2.5)]
    );

    server.stop().await;
}

#[tokio::test]
async fn error_codes_survive_the_wire() {
    let server = TestServer::start(&CalculatorConfig::default()).await;
    let client = server.client().await;

    let cases = [
        (vec![WireCommand::print("y")], CalcErrorCode::UndefinedVariable),
        (
            vec![WireCommand::calc_binary("x", "/", 10.0, 0.0)],
            CalcErrorCode::DivisionByZero,
        ),
        (
            vec![WireCommand {
                kind: "Print".to_owned(),
                var: Some("x".to_owned()),
                ..WireCommand::default()
            }],
            CalcErrorCode::UnknownCommandKind,
        ),
        (
            vec![WireCommand::calc_expr("x", "1 +")],
            CalcErrorCode::MalformedPayload,
        ),
    ];

    for (batch, expected) in cases {
        match client.calc(batch).await {
            Err(CalculatorError::Rejected { code, .. }) => assert_eq!(code, expected),
            other => panic!("expected {expected} rejection, got {other:?}"),
        }
    }

    server.stop().await;
}

#[tokio::test]
async fn oversized_batch_is_rejected() {
    let config = CalculatorConfig {
        max_commands: 3,
        ..CalculatorConfig::default()
    };
    let server = TestServer::start(&config).await;
    let client = server.client().await;

    let err = client
        .calc(vec![WireCommand::print("x"); 4])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CalculatorError::Rejected {
            code: CalcErrorCode::RequestTooLarge,
            ..
        }
    ));

    server.stop().await;
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let cfg = GrpcClientConfig::default().with_connect_timeout(Duration::from_millis(500));
    let result = CalculatorGrpcClient::connect(format!("http://{addr}"), &cfg).await;
    assert!(matches!(result, Err(CalculatorError::Transport(_))));
}
