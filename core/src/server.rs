//! Server instance records kept by the storage layer.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a deployed server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    #[default]
    Creating,
    Running,
    Stopped,
    Error,
    Removing,
}

/// A deployed game server built from a catalog modpack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerInstance {
    pub id: Uuid,
    /// Unique display name.
    pub name: String,
    /// Catalog id of the modpack the server runs.
    pub modpack_id: i64,
    pub modpack_version: String,
    /// Container handle, unset until the container exists.
    #[serde(default)]
    pub container_id: Option<String>,
    #[serde(default)]
    pub status: ServerStatus,
    pub port: u16,
    pub rcon_port: u16,
    #[serde(default, skip_serializing)]
    pub rcon_password: String,
    /// Template the server was created from, if any.
    #[serde(default)]
    pub configuration_id: Option<Uuid>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A single rule violation reported by `validate()`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    #[error("{field} cannot exceed {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} must be a positive integer")]
    NotPositive { field: &'static str },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: &'static str, min: u32, max: u32 },

    #[error("{0}")]
    Invalid(String),
}

const NAME_MAX: usize = 255;
const VERSION_MAX: usize = 50;
const PORT_MIN: u16 = 1024;
const RCON_PASSWORD_MIN: usize = 8;

impl ServerInstance {
    /// Creates a server record in the `Creating` state.
    pub fn new(
        name: impl Into<String>,
        modpack_id: i64,
        modpack_version: impl Into<String>,
        port: u16,
        rcon_port: u16,
        rcon_password: impl Into<String>,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            modpack_id,
            modpack_version: modpack_version.into(),
            container_id: None,
            status: ServerStatus::Creating,
            port,
            rcon_port,
            rcon_password: rcon_password.into(),
            configuration_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == ServerStatus::Running
    }

    pub fn is_stopped(&self) -> bool {
        self.status == ServerStatus::Stopped
    }

    /// Checks every field rule and returns all violations found.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        check_text(&mut errors, "Server name", &self.name, NAME_MAX);
        if self.modpack_id <= 0 {
            errors.push(ValidationError::NotPositive { field: "Modpack ID" });
        }
        check_text(&mut errors, "Modpack version", &self.modpack_version, VERSION_MAX);

        for (field, port) in [("Server port", self.port), ("RCON port", self.rcon_port)] {
            if port < PORT_MIN {
                errors.push(ValidationError::OutOfRange {
                    field,
                    min: u32::from(PORT_MIN),
                    max: u32::from(u16::MAX),
                });
            }
        }
        if self.port == self.rcon_port {
            errors.push(ValidationError::Invalid(
                "Server port and RCON port cannot be the same".to_string(),
            ));
        }

        if self.rcon_password.chars().count() < RCON_PASSWORD_MIN {
            errors.push(ValidationError::Invalid(format!(
                "RCON password must be at least {RCON_PASSWORD_MIN} characters long"
            )));
        }

        errors
    }
}

/// Pushes an error when `value` is blank or longer than `max` characters.
pub(crate) fn check_text(
    errors: &mut Vec<ValidationError>,
    field: &'static str,
    value: &str,
    max: usize,
) {
    if value.trim().is_empty() {
        errors.push(ValidationError::Empty { field });
    } else if value.chars().count() > max {
        errors.push(ValidationError::TooLong { field, max });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn valid_server() -> ServerInstance {
        ServerInstance::new("survival", 285109, "1.2.0", 25565, 25575, "hunter22!")
    }

    #[test]
    fn valid_server_has_no_errors() {
        assert_eq!(valid_server().validate(), vec![]);
        assert_eq!(valid_server().status, ServerStatus::Creating);
    }

    #[test]
    fn reports_every_violation() {
        let mut server = valid_server();
        server.name = "   ".to_string();
        server.modpack_id = 0;
        server.port = 80;
        server.rcon_port = 80;
        server.rcon_password = "short".to_string();

        let errors = server.validate();
        assert_eq!(errors.len(), 6);
        assert!(errors.contains(&ValidationError::Empty { field: "Server name" }));
        assert!(errors.contains(&ValidationError::NotPositive { field: "Modpack ID" }));
    }

    #[test]
    fn version_length_is_bounded() {
        let mut server = valid_server();
        server.modpack_version = "v".repeat(51);
        assert_eq!(
            server.validate(),
            vec![ValidationError::TooLong {
                field: "Modpack version",
                max: 50
            }]
        );
    }

    #[test]
    fn status_helpers() {
        let mut server = valid_server();
        assert!(!server.is_running());
        server.status = ServerStatus::Running;
        assert!(server.is_running());
        server.status = ServerStatus::Stopped;
        assert!(server.is_stopped());
    }
}
