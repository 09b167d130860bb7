//! Telnet backend configuration

use serde::{Deserialize, Serialize};

/// Configuration for the telnet console backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelnetConfig {
    /// PDU IP address or hostname
    pub host: String,
    /// Console TCP port (default: 23)
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_password")]
    pub password: String,
    /// Literal markers awaited during the session
    #[serde(default)]
    pub prompts: TelnetPrompts,
    /// Timeout for the TCP connect step only; reads have no timeout
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,
    /// Total status queries issued before an empty page is an error
    #[serde(default = "default_status_query_attempts")]
    pub status_query_attempts: u32,
}

impl TelnetConfig {
    /// Default configuration for a PDU at `host`
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: default_port(),
            username: default_username(),
            password: default_password(),
            prompts: TelnetPrompts::default(),
            connect_timeout_ms: default_connect_timeout(),
            status_query_attempts: default_status_query_attempts(),
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }
}

fn default_port() -> u16 {
    23
}

// Factory default console account
fn default_username() -> String {
    "cyber".to_string()
}

fn default_password() -> String {
    "cyber".to_string()
}

fn default_connect_timeout() -> u64 {
    5000
}

fn default_status_query_attempts() -> u32 {
    5
}

/// Console prompts, matched as literal substrings of the incoming stream
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TelnetPrompts {
    #[serde(default = "default_login_prompt")]
    pub login: String,
    #[serde(default = "default_password_prompt")]
    pub password: String,
    #[serde(default = "default_command_prompt")]
    pub command: String,
}

impl Default for TelnetPrompts {
    fn default() -> Self {
        Self {
            login: default_login_prompt(),
            password: default_password_prompt(),
            command: default_command_prompt(),
        }
    }
}

fn default_login_prompt() -> String {
    "Login Name: ".to_string()
}

fn default_password_prompt() -> String {
    "Login Password: ".to_string()
}

fn default_command_prompt() -> String {
    "CyberPower > ".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_toml() {
        let config: TelnetConfig = toml::from_str(r#"host = "10.0.0.5""#).unwrap();

        assert_eq!(config.port, 23);
        assert_eq!(config.username, "cyber");
        assert_eq!(config.prompts, TelnetPrompts::default());
        assert_eq!(config.prompts.command, "CyberPower > ");
        assert_eq!(config.connect_timeout_ms, 5000);
        assert_eq!(config.status_query_attempts, 5);
    }

    #[test]
    fn test_prompt_override() {
        let config: TelnetConfig = toml::from_str(
            r#"
            host = "10.0.0.5"
            username = "admin"
            password = "secret"

            [prompts]
            command = "PDU> "
            "#,
        )
        .unwrap();

        assert_eq!(config.username, "admin");
        assert_eq!(config.prompts.command, "PDU> ");
        assert_eq!(config.prompts.login, "Login Name: ");
    }
}
