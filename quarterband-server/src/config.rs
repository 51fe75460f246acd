use quarterband_scanner::config::{env_parse, env_str};
use quarterband_scanner::error::ConfigError;

/// HTTP-layer configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Basic-auth user/password pair. `None` ⇒ the gate is disabled
    /// (logged loudly at startup).
    pub credentials: Option<(String, String)>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let user = env_str("QB_BASIC_USER", "");
        let pass = env_str("QB_BASIC_PASS", "");
        let credentials = if user.is_empty() || pass.is_empty() {
            None
        } else {
            Some((user, pass))
        };

        Ok(Self {
            bind: env_str("QB_BIND", "0.0.0.0"),
            port: env_parse("QB_PORT", 8080u16)?,
            credentials,
        })
    }
}
