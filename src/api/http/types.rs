// src/api/http/types.rs
// JSON request bodies for the lab API.

use serde::Deserialize;

/// Anonymous clients share one session — a deliberate single-tenant
/// simplification. The default is applied here at the transport boundary;
/// the engine treats all session ids opaquely.
pub const DEFAULT_SESSION_ID: &str = "default";

fn default_session_id() -> String {
    DEFAULT_SESSION_ID.to_string()
}

#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    #[serde(default = "default_session_id")]
    pub session_id: String,
    pub step_id: String,
    pub action: String,
}

#[derive(Debug, Deserialize)]
pub struct DebriefRequest {
    #[serde(default = "default_session_id")]
    pub session_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_request_defaults_session_id() {
        let req: ActionRequest =
            serde_json::from_str(r#"{"step_id":"start","action":"wear_ppe"}"#).unwrap();
        assert_eq!(req.session_id, DEFAULT_SESSION_ID);
    }

    #[test]
    fn debrief_request_defaults_session_id() {
        let req: DebriefRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.session_id, DEFAULT_SESSION_ID);
    }
}
