//! Domain model (IDs, requests, outcomes, errors, states).

pub mod errors;
pub mod ids;
pub mod outcome;
pub mod request;
pub mod state;

pub use self::errors::{CommandError, CommandResult, MessageFormat, RenderOptions};
pub use self::ids::InvocationId;
pub use self::outcome::{CommandOutcome, FailureDescriptor, FailureKind};
pub use self::request::{CommandName, CommandRequest};
pub use self::state::InvocationState;
