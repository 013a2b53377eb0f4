//! DirectDispatch - command 名と handler キーを 1:1 でマッピング

use crate::domain::{CommandName, FailureDescriptor};
use crate::ports::DispatchStrategy;

#[derive(Debug, Clone, Copy, Default)]
pub struct DirectDispatch;

impl DirectDispatch {
    pub fn new() -> Self {
        Self
    }
}

impl DispatchStrategy for DirectDispatch {
    fn select_handler(&self, name: &CommandName) -> Result<String, FailureDescriptor> {
        Ok(name.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_dispatch() {
        let dispatcher = DirectDispatch::new();
        let name = CommandName::from("test_bail");
        let handler_key = dispatcher.select_handler(&name).unwrap();
        assert_eq!(handler_key, "test_bail");
    }
}
