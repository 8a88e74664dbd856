use serde::{Deserialize, Serialize};

/// Main configuration structure for tether
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Identity provider simulation configuration
    #[serde(default)]
    pub provider: ProviderConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Optional directory for rotated log files; stdout-only if unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}

/// Identity provider simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProviderConfig {
    /// Whether the email/password sign-in method is enabled.
    /// Disabling it makes every link attempt report
    /// `operation-not-allowed`, as a misconfigured provider would.
    #[serde(default = "default_password_sign_in_enabled")]
    pub password_sign_in_enabled: bool,

    /// Minimum accepted password length
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,

    /// Accounts that already exist on the provider, for reproducing
    /// the credential-in-use conflict
    #[serde(default)]
    pub seed_accounts: Vec<SeedAccount>,
}

const fn default_password_sign_in_enabled() -> bool {
    true
}

const fn default_min_password_length() -> usize {
    6
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            password_sign_in_enabled: default_password_sign_in_enabled(),
            min_password_length: default_min_password_length(),
            seed_accounts: vec![],
        }
    }
}

/// A pre-existing account on the simulated provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SeedAccount {
    /// Account email
    pub email: String,

    /// Account password
    pub password: String,
}
