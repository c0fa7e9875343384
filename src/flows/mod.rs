//! The two flows bundled with the application.
//!
//! - [`capture`]: the knowledge capture interview
//! - [`request`]: the form that asks a colleague for a capture session

pub mod capture;
pub mod request;

use crate::flow::FlowDefinition;

/// Look up a bundled flow by id
pub fn builtin(id: &str) -> Option<FlowDefinition> {
    match id {
        capture::CAPTURE_FLOW_ID => Some(capture::capture_flow()),
        request::REQUEST_FLOW_ID => Some(request::request_flow()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_flows_are_valid() {
        for id in [capture::CAPTURE_FLOW_ID, request::REQUEST_FLOW_ID] {
            let flow = builtin(id).unwrap();
            assert_eq!(flow.id, id);
            flow.validate().unwrap();
        }
        assert!(builtin("dashboard").is_none());
    }
}
