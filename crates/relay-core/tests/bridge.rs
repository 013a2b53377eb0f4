//! End-to-end: caller → host → handler → normalized outcome → caller.

use std::time::Duration;

use anyhow::anyhow;
use relay_core::fixtures::{self, TestBail};
use relay_core::{
    Command, CommandContext, CommandResult, FailureKind, HostBuilder, HostHandle, InvocationState,
    Invoker, MessageFormat, RelayConfig, handler_fn,
};
use rstest::rstest;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Serialize, Deserialize)]
struct DivideArgs {
    numerator: i64,
    denominator: i64,
}

struct Divide;

impl Command for Divide {
    const NAME: &'static str = "divide";
    type Args = DivideArgs;
    type Output = i64;
}

struct LoadProfile;

impl Command for LoadProfile {
    const NAME: &'static str = "load_profile";
    type Args = ();
    type Output = String;
}

struct Explode;

impl Command for Explode {
    const NAME: &'static str = "explode";
    type Args = ();
    type Output = ();
}

struct Slow;

impl Command for Slow {
    const NAME: &'static str = "slow";
    type Args = u64;
    type Output = u64;
}

async fn divide(args: DivideArgs) -> CommandResult<i64> {
    relay_core::ensure!(args.denominator != 0, "cannot divide {} by zero", args.numerator);
    Ok(args.numerator / args.denominator)
}

async fn load_profile(_: ()) -> CommandResult<String> {
    Err::<String, _>(anyhow!("file not found")).command_context("loading profile")
}

async fn explode(_: ()) -> CommandResult<()> {
    panic!("handler blew up")
}

async fn slow(millis: u64) -> CommandResult<u64> {
    tokio::time::sleep(Duration::from_millis(millis)).await;
    Ok(millis)
}

fn builder(config: RelayConfig) -> HostBuilder {
    fixtures::host_builder()
        .unwrap()
        .with_config(config)
        .register::<Divide, _>(handler_fn(divide))
        .unwrap()
        .register::<LoadProfile, _>(handler_fn(load_profile))
        .unwrap()
        .register::<Explode, _>(handler_fn(explode))
        .unwrap()
        .register::<Slow, _>(handler_fn(slow))
        .unwrap()
}

fn start() -> (Invoker, HostHandle) {
    builder(RelayConfig::default()).build().unwrap().spawn()
}

#[rstest]
#[case("test", "No error thrown.")]
#[case("test_anyhow_success", "this function succeeds")]
#[tokio::test]
async fn success_fixtures_resolve_with_value(#[case] name: &str, #[case] expected: &str) {
    let (invoker, handle) = start();

    let value = invoker.invoke(name, None).await.unwrap();
    assert_eq!(value, json!(expected));

    handle.shutdown_and_join().await;
}

#[rstest]
#[case("test_throw", FailureKind::Thrown, "Simulating a possible throw")]
#[case(
    "test_pure_err_conversion",
    FailureKind::PureConverted,
    "Showcase of the .into_command_result()"
)]
#[case("test_bail", FailureKind::Bailed, "Showcase of the .bail!()")]
#[case("test_ensure", FailureKind::Ensured, "Condition failed: `1 == 2`")]
#[tokio::test]
async fn failure_fixtures_resolve_with_descriptor(
    #[case] name: &str,
    #[case] kind: FailureKind,
    #[case] message: &str,
) {
    let (invoker, handle) = start();

    let error = invoker.invoke(name, None).await.unwrap_err();
    assert_eq!(error.kind, kind);
    assert_eq!(error.message, message);
    assert!(error.cause.is_none());

    handle.shutdown_and_join().await;
}

#[tokio::test]
async fn every_fixture_resolves_exactly_once() {
    let (invoker, handle) = start();

    for name in fixtures::NAMES {
        let pending = invoker.dispatch(invoker.request(name, None)).await;
        assert_eq!(pending.state(), InvocationState::Pending);

        let outcome = pending.outcome().await;
        assert!(outcome.state().is_terminal(), "{name} did not settle");
    }

    handle.shutdown_and_join().await;
}

#[tokio::test]
async fn repeated_invocations_are_independent() {
    let (invoker, handle) = start();

    let first = invoker.invoke("test_bail", None).await.unwrap_err();
    let second = invoker.invoke("test_bail", None).await.unwrap_err();
    assert_eq!(first, second);

    let first = invoker.invoke("test", None).await.unwrap();
    let second = invoker.invoke("test", None).await.unwrap();
    assert_eq!(first, second);

    handle.shutdown_and_join().await;
}

#[tokio::test]
async fn unknown_command_is_unrecognized() {
    let (invoker, handle) = start();

    let error = invoker.invoke("no_such_command", None).await.unwrap_err();
    assert_eq!(error.kind, FailureKind::UnrecognizedCommand);
    assert!(error.message.contains("no_such_command"));

    handle.shutdown_and_join().await;
}

#[tokio::test]
async fn panic_is_contained_and_host_keeps_serving() {
    let (invoker, handle) = start();

    let error = invoker.invoke(Explode::NAME, None).await.unwrap_err();
    assert_eq!(error.kind, FailureKind::Thrown);
    assert_eq!(error.message, "command panicked: handler blew up");

    let value = invoker.invoke("test", None).await.unwrap();
    assert_eq!(value, json!("No error thrown."));

    handle.shutdown_and_join().await;
}

#[tokio::test]
async fn shut_down_host_is_unavailable() {
    let (invoker, handle) = start();
    handle.shutdown_and_join().await;

    let error = invoker.invoke("test", None).await.unwrap_err();
    assert_eq!(error.kind, FailureKind::HostUnavailable);
    assert!(!error.message.is_empty());
}

#[tokio::test]
async fn dropped_handle_stops_host() {
    let (invoker, handle) = start();
    drop(handle);
    // let the loop observe the closed shutdown channel
    tokio::time::sleep(Duration::from_millis(50)).await;

    let result = tokio::time::timeout(Duration::from_secs(2), invoker.invoke("test", None))
        .await
        .expect("invoke must not hang after the host is dropped");
    assert_eq!(result.unwrap_err().kind, FailureKind::HostUnavailable);
}

#[tokio::test]
async fn in_flight_request_is_answered_across_shutdown() {
    let (invoker, handle) = start();

    let pending = invoker.dispatch(invoker.request(Slow::NAME, Some(json!(200)))).await;
    // let the loop pick the request up before shutting down
    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.shutdown_and_join().await;

    let value = tokio::time::timeout(Duration::from_secs(2), pending.resolve())
        .await
        .expect("in-flight request must resolve after shutdown")
        .unwrap();
    assert_eq!(value, json!(200));
}

#[tokio::test]
async fn malformed_arguments_are_invalid_payload() {
    let (invoker, handle) = start();

    let error = invoker
        .invoke(Divide::NAME, Some(json!({"numerator": "ten"})))
        .await
        .unwrap_err();
    assert_eq!(error.kind, FailureKind::InvalidPayload);
    assert!(error.message.contains("divide"));

    handle.shutdown_and_join().await;
}

#[tokio::test]
async fn typed_invoke_round_trips_arguments() {
    let (invoker, handle) = start();

    let quotient = invoker
        .invoke_command::<Divide>(&DivideArgs {
            numerator: 42,
            denominator: 6,
        })
        .await
        .unwrap();
    assert_eq!(quotient, 7);

    let error = invoker
        .invoke_command::<Divide>(&DivideArgs {
            numerator: 1,
            denominator: 0,
        })
        .await
        .unwrap_err();
    assert_eq!(error.kind, FailureKind::Ensured);
    assert_eq!(error.message, "cannot divide 1 by zero");

    handle.shutdown_and_join().await;
}

#[tokio::test]
async fn context_chain_is_preserved() {
    let (invoker, handle) = start();

    let error = invoker.invoke(LoadProfile::NAME, None).await.unwrap_err();
    assert_eq!(error.kind, FailureKind::ContextWrapped);
    assert_eq!(error.message, "loading profile: file not found");

    let causes: Vec<&str> = error.causes().map(|c| c.message.as_str()).collect();
    assert_eq!(causes, vec!["file not found"]);

    handle.shutdown_and_join().await;
}

#[tokio::test]
async fn outermost_format_and_no_chain() {
    let config = RelayConfig {
        message_format: MessageFormat::Outermost,
        preserve_cause_chain: false,
        ..RelayConfig::default()
    };
    let (invoker, handle) = builder(config).build().unwrap().spawn();

    let error = invoker.invoke(LoadProfile::NAME, None).await.unwrap_err();
    assert_eq!(error.message, "loading profile");
    assert!(error.cause.is_none());

    handle.shutdown_and_join().await;
}

#[tokio::test]
async fn outcome_wire_shape() {
    let (invoker, handle) = start();

    let failure = invoker
        .dispatch(invoker.request(TestBail::NAME, None))
        .await
        .outcome()
        .await;
    assert_eq!(
        serde_json::to_value(&failure).unwrap(),
        json!({
            "status": "failure",
            "error": {"kind": "bailed", "message": "Showcase of the .bail!()"}
        })
    );

    let success = invoker.dispatch(invoker.request("test", None)).await.outcome().await;
    assert_eq!(
        serde_json::to_value(&success).unwrap(),
        json!({"status": "success", "value": "No error thrown."})
    );

    handle.shutdown_and_join().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_invocations_resolve_independently() {
    let (invoker, handle) = start();

    let tasks: Vec<_> = (0..32u64)
        .map(|i| {
            let invoker = invoker.clone();
            tokio::spawn(async move {
                if i % 2 == 0 {
                    invoker.invoke(Slow::NAME, Some(json!(i % 5))).await
                } else {
                    invoker.invoke("test_throw", None).await
                }
            })
        })
        .collect();

    for (i, task) in tasks.into_iter().enumerate() {
        let result: Result<Value, _> = task.await.unwrap();
        if i % 2 == 0 {
            assert_eq!(result.unwrap(), json!(i as u64 % 5));
        } else {
            assert_eq!(result.unwrap_err().kind, FailureKind::Thrown);
        }
    }

    handle.shutdown_and_join().await;
}
