//! Over-the-wire tests against a served engine.

use std::time::{Duration, Instant};

use axum::http::StatusCode;
use switchyard::{handler, Engine, EngineConfig, RouteOverrides};

mod common;
use common::text;

async fn spawn_engine(engine: Engine) -> std::net::SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = engine.serve(listener).await;
    });
    // Give the acceptor a moment to come up.
    tokio::time::sleep(Duration::from_millis(100)).await;
    addr
}

#[tokio::test]
async fn test_round_trip_and_recovery_over_the_wire() {
    let mut engine = Engine::new();
    engine
        .router_mut()
        .root()
        .get("/ping", "ping", [text(StatusCode::OK, "pong")]);
    engine.router_mut().root().get(
        "/boom",
        "boom",
        [handler(|ctx| async move {
            let _ = ctx;
            panic!("boom");
        })],
    );

    let addr = spawn_engine(engine).await;
    let client = reqwest::Client::builder().no_proxy().build().expect("client");

    let response = client
        .get(format!("http://{addr}/ping"))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.expect("body"), "pong");

    let response = client
        .get(format!("http://{addr}/boom"))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status().as_u16(), 500);

    // The serving task survived the panic.
    let response = client
        .get(format!("http://{addr}/ping"))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status().as_u16(), 200);

    let response = client
        .get(format!("http://{addr}/nowhere"))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn test_route_timeout_override_over_the_wire() {
    let mut engine = Engine::with_config(EngineConfig {
        timeout_ms: 200,
        ..EngineConfig::default()
    });
    let slow = engine.router_mut().root().get(
        "/slow",
        "slow",
        [handler(|mut ctx| async move {
            let started = Instant::now();
            ctx.done().await;
            ctx.string(
                StatusCode::OK,
                format!("{}", started.elapsed().as_millis()),
            );
            ctx
        })],
    );
    slow.set_overrides(RouteOverrides {
        timeout_ms: 400,
        max_request_body: 1 << 20,
    });

    let addr = spawn_engine(engine).await;
    let client = reqwest::Client::builder().no_proxy().build().expect("client");

    let started = Instant::now();
    let response = client
        .get(format!("http://{addr}/slow"))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status().as_u16(), 200);
    let elapsed_in_handler: u128 = response.text().await.expect("body").parse().expect("millis");
    // The override, not the 200ms engine default, bounds the wait.
    assert!(elapsed_in_handler >= 400, "handler waited {elapsed_in_handler}ms");
    assert!(started.elapsed() >= Duration::from_millis(400));
}
