//! The six protocol fixtures.
//!
//! Each one exercises a different way of producing its result. The messages
//! are fixed literals; tests and the CLI compare against them.
//!
//! | command | result |
//! |---|---|
//! | `test` | success |
//! | `test_anyhow_success` | success converted from `anyhow::Result` |
//! | `test_throw` | `Thrown` via `?` |
//! | `test_pure_err_conversion` | `PureConverted` |
//! | `test_bail` | `Bailed` |
//! | `test_ensure` | `Ensured` |

use anyhow::anyhow;

use crate::app::HostBuilder;
use crate::domain::{CommandResult, FailureKind};
use crate::typed::{
    Command, CommandRegistry, IntoCommandResult, IntoEmptyCommandResult, RegistryError, handler_fn,
};

pub const TEST_OK: &str = "No error thrown.";
pub const ANYHOW_SUCCESS_OK: &str = "this function succeeds";
pub const THROW_MESSAGE: &str = "Simulating a possible throw";
pub const PURE_CONVERSION_MESSAGE: &str = "Showcase of the .into_command_result()";
pub const BAIL_MESSAGE: &str = "Showcase of the .bail!()";
pub const ENSURE_MESSAGE: &str = "Condition failed: `1 == 2`";

/// Fixture names in presentation order.
pub const NAMES: [&str; 6] = [
    Test::NAME,
    TestAnyhowSuccess::NAME,
    TestThrow::NAME,
    TestPureErrConversion::NAME,
    TestBail::NAME,
    TestEnsure::NAME,
];

macro_rules! fixture_command {
    ($ty:ident, $name:literal) => {
        pub struct $ty;

        impl Command for $ty {
            const NAME: &'static str = $name;
            type Args = ();
            type Output = String;
        }
    };
}

fixture_command!(Test, "test");
fixture_command!(TestAnyhowSuccess, "test_anyhow_success");
fixture_command!(TestThrow, "test_throw");
fixture_command!(TestPureErrConversion, "test_pure_err_conversion");
fixture_command!(TestBail, "test_bail");
fixture_command!(TestEnsure, "test_ensure");

fn function_that_throws() -> anyhow::Result<()> {
    anyhow::bail!("Simulating a possible throw")
}

fn function_that_succeeds() -> anyhow::Result<String> {
    Ok(ANYHOW_SUCCESS_OK.to_string())
}

async fn test(_: ()) -> CommandResult<String> {
    Ok(TEST_OK.into())
}

async fn test_anyhow_success(_: ()) -> CommandResult<String> {
    function_that_succeeds().into_command_result()
}

async fn test_throw(_: ()) -> CommandResult<String> {
    function_that_throws()?;

    Ok("this should never trigger".to_owned())
}

async fn test_pure_err_conversion(_: ()) -> CommandResult<String> {
    let _discarded = anyhow!("some err").into_empty_command_result();
    anyhow!("Showcase of the .into_command_result()").into_command_result()
}

async fn test_bail(_: ()) -> CommandResult<String> {
    crate::bail!("Showcase of the .bail!()")
}

async fn test_ensure(_: ()) -> CommandResult<String> {
    crate::ensure!(1 == 2);

    Ok("this should never trigger".to_owned())
}

/// The failure kind a fixture is built to produce, `None` for the two that
/// succeed and for names that are not fixtures.
pub fn expected_failure(name: &str) -> Option<FailureKind> {
    match name {
        TestThrow::NAME => Some(FailureKind::Thrown),
        TestPureErrConversion::NAME => Some(FailureKind::PureConverted),
        TestBail::NAME => Some(FailureKind::Bailed),
        TestEnsure::NAME => Some(FailureKind::Ensured),
        _ => None,
    }
}

/// Registers all six fixtures.
pub fn register_all(registry: &mut CommandRegistry) -> Result<(), RegistryError> {
    registry.register::<Test, _>(handler_fn(test))?;
    registry.register::<TestAnyhowSuccess, _>(handler_fn(test_anyhow_success))?;
    registry.register::<TestThrow, _>(handler_fn(test_throw))?;
    registry.register::<TestPureErrConversion, _>(handler_fn(test_pure_err_conversion))?;
    registry.register::<TestBail, _>(handler_fn(test_bail))?;
    registry.register::<TestEnsure, _>(handler_fn(test_ensure))?;
    Ok(())
}

/// A builder with every fixture registered and expected.
pub fn host_builder() -> Result<HostBuilder, RegistryError> {
    Ok(HostBuilder::new()
        .register_with(register_all)?
        .expect_commands(&NAMES))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FailureDescriptor;

    #[tokio::test]
    async fn throw_never_reaches_success_return() {
        let err = test_throw(()).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Thrown);
        assert_eq!(err.to_string(), THROW_MESSAGE);
    }

    #[tokio::test]
    async fn pure_conversion_keeps_literal_text() {
        let d = FailureDescriptor::from(test_pure_err_conversion(()).await.unwrap_err());
        assert_eq!(d.kind, FailureKind::PureConverted);
        assert_eq!(d.message, PURE_CONVERSION_MESSAGE);
    }

    #[tokio::test]
    async fn ensure_names_the_condition() {
        let err = test_ensure(()).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Ensured);
        assert_eq!(err.to_string(), ENSURE_MESSAGE);
    }

    #[test]
    fn expected_failure_matches_fixture_table() {
        assert_eq!(expected_failure(Test::NAME), None);
        assert_eq!(expected_failure(TestAnyhowSuccess::NAME), None);
        assert_eq!(expected_failure("test_bail"), Some(FailureKind::Bailed));
        assert_eq!(expected_failure("test_ensure"), Some(FailureKind::Ensured));
        assert_eq!(expected_failure("unknown"), None);
    }

    #[test]
    fn builder_registers_every_fixture() {
        let host = host_builder().unwrap().build().unwrap();
        let mut expected: Vec<String> = NAMES.iter().map(|n| n.to_string()).collect();
        expected.sort();
        assert_eq!(host.registry().registered_names(), expected);
    }
}
