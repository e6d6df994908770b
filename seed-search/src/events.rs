//! Boundary messages the search driver produces for an external transport.
//!
//! These mirror the JSON-equivalent event stream in the system's external
//! interface one-to-one; the transport (HTTP/WebSocket adapter, CLI, etc.)
//! is responsible for turning [`SearchEvent`] into wire bytes.

use serde::Serialize;

/// One message in the search driver's output stream.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchEvent {
    /// Emitted once at run start.
    Start {
        /// `end_seed - start_seed + 1`.
        total: u64,
    },
    /// Throttled progress update.
    Progress {
        #[serde(rename = "checkedCount")]
        checked_count: u64,
        total: u64,
        /// `0..=100`.
        progress: f64,
        /// Seeds per second.
        speed: f64,
        elapsed: f64,
    },
    /// One per matching seed, delivered in ascending seed order.
    Found { seed: u32 },
    /// Emitted exactly once at the end of a run.
    Complete {
        #[serde(rename = "totalFound")]
        total_found: usize,
        elapsed: f64,
        /// Set when the run aborted on a worker-fatal error; absent on a
        /// normal (cap-reached or range-exhausted) completion.
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_serializes_with_type_tag() {
        let json = serde_json::to_string(&SearchEvent::Start { total: 1000 }).unwrap();
        assert_eq!(json, r#"{"type":"start","total":1000}"#);
    }

    #[test]
    fn progress_uses_camel_case_checked_count() {
        let event = SearchEvent::Progress {
            checked_count: 500,
            total: 1000,
            progress: 50.0,
            speed: 1000.0,
            elapsed: 0.5,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""checkedCount":500"#));
    }

    #[test]
    fn complete_omits_error_when_none() {
        let event = SearchEvent::Complete {
            total_found: 3,
            elapsed: 1.2,
            error: None,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.contains("error"));
        assert!(json.contains(r#""totalFound":3"#));
    }
}
