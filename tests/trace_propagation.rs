//! End-to-end trace propagation tests against the stub serving side.

use std::time::Duration;

use tokio::net::TcpListener;
use url::Url;

use trace_chain::client::ClientError;
use trace_chain::logging::TraceLog;
use trace_chain::trace::{Sampler, TraceContext, Tracer};
use trace_chain::{verify, CallChain, StubServer, UserClient};

mod common;

const MARKER: &str = "[TRACE_CHECK]";

/// Spawn the stub server on an ephemeral port, returning its base URL.
async fn start_stub(producer_log: TraceLog) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = StubServer::new(producer_log);
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });
    Url::parse(&format!("http://{}/", addr)).unwrap()
}

#[tokio::test]
async fn test_trace_id_propagates_through_three_calls() {
    let producer_path = common::temp_log("propagation-producer");
    let test_path = common::temp_log("propagation-test");
    let producer_log = TraceLog::create(&producer_path, MARKER).unwrap();
    let test_log = TraceLog::create(&test_path, MARKER).unwrap();

    let base = start_stub(producer_log).await;
    let endpoints = [
        base.join("foo").unwrap(),
        base.join("bar").unwrap(),
        base.join("baz").unwrap(),
    ];

    let tracer = Tracer::new(Sampler::Always);
    let chain = CallChain::new(endpoints, tracer.clone(), test_log);
    let outcome = chain.run().await.expect("chain should succeed");

    // Results concatenate in call order with single spaces.
    assert_eq!(outcome.result, "foo bar baz");
    // The span finished exactly once.
    assert_eq!(tracer.finished_count(), 1);

    // Both log streams are durable and agree on exactly one trace id:
    // the one the chain's span ran under.
    let wait = Duration::from_secs(2);
    verify::wait_for_marker(&producer_path, MARKER, wait).await.unwrap();
    verify::wait_for_marker(&test_path, MARKER, wait).await.unwrap();
    verify::verify_streams(
        &outcome.trace_id,
        &[&producer_path, &test_path],
        MARKER,
    )
    .expect("streams should agree on the chain's trace id");

    // The producer stream saw all three downstream calls.
    let producer_ids = verify::read_trace_ids(&producer_path, MARKER).unwrap();
    assert_eq!(producer_ids.len(), 3);

    std::fs::remove_file(&producer_path).ok();
    std::fs::remove_file(&test_path).ok();
}

#[tokio::test]
async fn test_two_chain_runs_get_distinct_trace_ids() {
    let producer_path = common::temp_log("distinct-producer");
    let test_path = common::temp_log("distinct-test");
    let producer_log = TraceLog::create(&producer_path, MARKER).unwrap();
    let test_log = TraceLog::create(&test_path, MARKER).unwrap();

    let base = start_stub(producer_log).await;
    let endpoints = [
        base.join("foo").unwrap(),
        base.join("bar").unwrap(),
        base.join("baz").unwrap(),
    ];

    let tracer = Tracer::new(Sampler::Always);
    let chain = CallChain::new(endpoints, tracer.clone(), test_log);
    let first = chain.run().await.unwrap();
    let second = chain.run().await.unwrap();

    assert_ne!(first.trace_id, second.trace_id);
    assert_eq!(tracer.finished_count(), 2);

    // With two distinct ids in the streams, single-id verification
    // against either one must now fail.
    let err = verify::verify_streams(
        &first.trace_id,
        &[&producer_path, &test_path],
        MARKER,
    )
    .unwrap_err();
    assert!(matches!(err, verify::VerifyError::Mismatch { .. }));

    std::fs::remove_file(&producer_path).ok();
    std::fs::remove_file(&test_path).ok();
}

#[tokio::test]
async fn test_user_client_against_stub() {
    let producer_path = common::temp_log("users-producer");
    let producer_log = TraceLog::create(&producer_path, MARKER).unwrap();
    let base = start_stub(producer_log).await;

    let client = UserClient::new(base);
    let ctx = TraceContext::new_root(true);

    let users = client.list_users(&ctx).await.expect("listing should succeed");
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].name, "Alice");
    assert_eq!(users[1].name, "Bob");

    let detail = client.user_detail(&ctx, "1").await.expect("detail should succeed");
    assert_eq!(detail.name, "Alice");
    assert_eq!(detail.email.as_deref(), Some("alice@example.com"));

    // Unknown id surfaces the non-success status as a transport error.
    let err = client.user_detail(&ctx, "999").await.unwrap_err();
    match err {
        ClientError::Transport(msg) => assert!(msg.contains("404"), "got: {msg}"),
        other => panic!("unexpected error: {other}"),
    }

    // The stub recorded each instrumented call under the caller's trace id.
    verify::wait_for_marker(&producer_path, MARKER, Duration::from_secs(2))
        .await
        .unwrap();
    verify::verify_streams(&ctx.trace_id, &[&producer_path], MARKER).unwrap();

    std::fs::remove_file(&producer_path).ok();
}

#[tokio::test]
async fn test_unsampled_chain_leaves_streams_empty() {
    let producer_path = common::temp_log("unsampled-producer");
    let test_path = common::temp_log("unsampled-test");
    let producer_log = TraceLog::create(&producer_path, MARKER).unwrap();
    let test_log = TraceLog::create(&test_path, MARKER).unwrap();

    let base = start_stub(producer_log).await;
    let endpoints = [
        base.join("foo").unwrap(),
        base.join("bar").unwrap(),
        base.join("baz").unwrap(),
    ];

    let tracer = Tracer::new(Sampler::Never);
    let chain = CallChain::new(endpoints, tracer, test_log);
    let outcome = chain.run().await.unwrap();
    assert_eq!(outcome.result, "foo bar baz");

    // Nothing recorded, so single-id verification reports empty streams.
    let err = verify::verify_streams(
        &outcome.trace_id,
        &[&producer_path, &test_path],
        MARKER,
    )
    .unwrap_err();
    assert!(matches!(err, verify::VerifyError::Empty));

    std::fs::remove_file(&producer_path).ok();
    std::fs::remove_file(&test_path).ok();
}
