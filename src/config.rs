use crate::domain::TransitionGraph;
use crate::error::{BoardError, Result};
use crate::notify::NotificationCenter;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Settings the server injects into the page before the board starts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Status name to the names of statuses it may move to.
    /// Absent means the server's default workflow; an empty map allows nothing.
    #[serde(default)]
    pub transitions: Option<HashMap<String, Vec<String>>>,
    pub csrf_token: String,
    /// Per-card endpoint, with `{id}` standing in for the card ID
    pub move_url: String,
    #[serde(default = "default_error_display_ms")]
    pub error_display_ms: u64,
    #[serde(default = "default_success_display_ms")]
    pub success_display_ms: u64,
}

fn default_error_display_ms() -> u64 {
    5000
}

fn default_success_display_ms() -> u64 {
    3000
}

impl ClientConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.csrf_token.trim().is_empty() {
            return Err(BoardError::ConfigError("csrf_token is empty".to_string()));
        }
        if !self.move_url.contains("{id}") {
            return Err(BoardError::ConfigError(format!(
                "move_url '{}' has no {{id}} placeholder",
                self.move_url
            )));
        }
        if self.error_display_ms == 0 || self.success_display_ms == 0 {
            return Err(BoardError::ConfigError(
                "notification durations must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn transition_graph(&self) -> TransitionGraph {
        let Some(names) = &self.transitions else {
            return TransitionGraph::default_workflow();
        };
        let graph = TransitionGraph::from_names(names);
        if graph.is_empty() {
            tracing::warn!("Transition map allows no moves; every drop will be rejected");
        }
        graph
    }

    pub fn notification_center(&self) -> NotificationCenter {
        NotificationCenter::new(
            Duration::from_millis(self.error_display_ms),
            Duration::from_millis(self.success_display_ms),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Status;

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "transitions": {"todo": ["in_progress"], "in_progress": ["review", "todo"]},
            "csrf_token": "abc123",
            "move_url": "/tasks/{id}/move/"
        }"#;
        let config = ClientConfig::from_json(json).unwrap();

        assert_eq!(config.error_display_ms, 5000);
        assert_eq!(config.success_display_ms, 3000);
        let graph = config.transition_graph();
        assert!(graph.is_allowed(Status::InProgress, Status::Todo));
        assert!(!graph.is_allowed(Status::Todo, Status::Review));
    }

    #[test]
    fn test_missing_transitions_use_default_workflow() {
        let json = r#"{"csrf_token": "t", "move_url": "/tasks/{id}/status/"}"#;
        let graph = ClientConfig::from_json(json).unwrap().transition_graph();
        assert!(graph.is_allowed(Status::Pending, Status::InProgress));
    }

    #[test]
    fn test_empty_transitions_allow_no_moves() {
        let json = r#"{"transitions": {}, "csrf_token": "t", "move_url": "/tasks/{id}/"}"#;
        let config = ClientConfig::from_json(json).unwrap();
        assert_eq!(config.transitions, Some(HashMap::new()));

        let graph = config.transition_graph();
        assert!(graph.is_empty());
        assert!(!graph.is_allowed(Status::Pending, Status::InProgress));
        assert!(!graph.is_allowed(Status::InProgress, Status::Completed));
    }

    #[test]
    fn test_config_validation() {
        let no_token = r#"{"csrf_token": " ", "move_url": "/tasks/{id}/"}"#;
        assert!(matches!(
            ClientConfig::from_json(no_token),
            Err(BoardError::ConfigError(_))
        ));

        let no_placeholder = r#"{"csrf_token": "t", "move_url": "/tasks/move/"}"#;
        assert!(matches!(
            ClientConfig::from_json(no_placeholder),
            Err(BoardError::ConfigError(_))
        ));

        let zero = r#"{"csrf_token": "t", "move_url": "/t/{id}/", "error_display_ms": 0}"#;
        assert!(ClientConfig::from_json(zero).is_err());

        assert!(matches!(
            ClientConfig::from_json("not json"),
            Err(BoardError::SerializationError(_))
        ));
    }
}
