use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::agent::AgentPool;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub messagebird: MessageBirdConfig,
    pub sales: SalesConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct MessageBirdConfig {
    pub api_key: SecretString,
    pub originator: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct SalesConfig {
    pub agent_numbers: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub templates_dir: PathBuf,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub messagebird_api_key: Option<String>,
    pub messagebird_originator: Option<String>,
    pub messagebird_base_url: Option<String>,
    pub agent_numbers: Option<Vec<String>>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub templates_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            messagebird: MessageBirdConfig {
                api_key: String::new().into(),
                originator: String::new(),
                base_url: "https://rest.messagebird.com".to_string(),
                timeout_secs: 10,
            },
            sales: SalesConfig { agent_numbers: Vec::new() },
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 8080,
                templates_dir: PathBuf::from("templates"),
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("callme.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn agent_pool(&self) -> Result<AgentPool, ConfigError> {
        AgentPool::new(self.sales.agent_numbers.iter().map(String::as_str)).map_err(|_| {
            ConfigError::Validation(
                "sales.agent_numbers must contain at least one phone number".to_string(),
            )
        })
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(messagebird) = patch.messagebird {
            if let Some(api_key) = messagebird.api_key {
                self.messagebird.api_key = secret_value(api_key);
            }
            if let Some(originator) = messagebird.originator {
                self.messagebird.originator = originator;
            }
            if let Some(base_url) = messagebird.base_url {
                self.messagebird.base_url = base_url;
            }
            if let Some(timeout_secs) = messagebird.timeout_secs {
                self.messagebird.timeout_secs = timeout_secs;
            }
        }

        if let Some(sales) = patch.sales {
            if let Some(agent_numbers) = sales.agent_numbers {
                self.sales.agent_numbers = agent_numbers.into_list();
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(templates_dir) = server.templates_dir {
                self.server.templates_dir = templates_dir;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        let api_key = read_env("CALLME_MESSAGEBIRD_API_KEY")
            .or_else(|| read_env("MESSAGEBIRD_API_KEY"));
        if let Some(value) = api_key {
            self.messagebird.api_key = secret_value(value);
        }
        let originator = read_env("CALLME_MESSAGEBIRD_ORIGINATOR")
            .or_else(|| read_env("MESSAGEBIRD_ORIGINATOR"));
        if let Some(value) = originator {
            self.messagebird.originator = value;
        }
        if let Some(value) = read_env("CALLME_MESSAGEBIRD_BASE_URL") {
            self.messagebird.base_url = value;
        }
        if let Some(value) = read_env("CALLME_MESSAGEBIRD_TIMEOUT_SECS") {
            self.messagebird.timeout_secs = parse_env("CALLME_MESSAGEBIRD_TIMEOUT_SECS", &value)?;
        }

        let agent_numbers = read_env("CALLME_SALES_AGENT_NUMBERS")
            .or_else(|| read_env("SALES_AGENT_NUMBERS"));
        if let Some(value) = agent_numbers {
            self.sales.agent_numbers = split_numbers(&value);
        }

        if let Some(value) = read_env("CALLME_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("CALLME_SERVER_PORT") {
            self.server.port = parse_env("CALLME_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("CALLME_SERVER_TEMPLATES_DIR") {
            self.server.templates_dir = PathBuf::from(value);
        }

        let log_level = read_env("CALLME_LOGGING_LEVEL").or_else(|| read_env("CALLME_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("CALLME_LOGGING_FORMAT").or_else(|| read_env("CALLME_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(api_key) = overrides.messagebird_api_key {
            self.messagebird.api_key = secret_value(api_key);
        }
        if let Some(originator) = overrides.messagebird_originator {
            self.messagebird.originator = originator;
        }
        if let Some(base_url) = overrides.messagebird_base_url {
            self.messagebird.base_url = base_url;
        }
        if let Some(agent_numbers) = overrides.agent_numbers {
            self.sales.agent_numbers = agent_numbers;
        }
        if let Some(bind_address) = overrides.bind_address {
            self.server.bind_address = bind_address;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(templates_dir) = overrides.templates_dir {
            self.server.templates_dir = templates_dir;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_messagebird(&self.messagebird)?;
        self.agent_pool()?;
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("callme.toml"), PathBuf::from("config/callme.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

/// Replaces every `${NAME}` with the value of environment variable `NAME`.
fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(open) = rest.find("${") {
        output.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];
        let close = after_open.find('}').ok_or(ConfigError::UnterminatedInterpolation)?;
        let var = &after_open[..close];
        let value = env::var(var)
            .map_err(|_| ConfigError::MissingEnvInterpolation { var: var.to_string() })?;
        output.push_str(&value);
        rest = &after_open[close + 1..];
    }

    output.push_str(rest);
    Ok(output)
}

fn validate_messagebird(messagebird: &MessageBirdConfig) -> Result<(), ConfigError> {
    if messagebird.api_key.expose_secret().trim().is_empty() {
        return Err(ConfigError::Validation(
            "messagebird.api_key is required. Get it from the MessageBird dashboard > Developers > API access".to_string(),
        ));
    }

    validate_originator(messagebird.originator.trim())?;

    let base_url = messagebird.base_url.trim();
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ConfigError::Validation(
            "messagebird.base_url must start with http:// or https://".to_string(),
        ));
    }

    if messagebird.timeout_secs == 0 || messagebird.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "messagebird.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

// Alphanumeric sender names are capped at 11 characters; numeric senders are
// phone numbers with an optional leading `+`.
fn validate_originator(originator: &str) -> Result<(), ConfigError> {
    if originator.is_empty() {
        return Err(ConfigError::Validation("messagebird.originator is required".to_string()));
    }

    let digits = originator.strip_prefix('+').unwrap_or(originator);
    let numeric = !digits.is_empty() && digits.chars().all(|ch| ch.is_ascii_digit());
    if numeric {
        return Ok(());
    }

    if originator.len() > 11 || !originator.chars().all(|ch| ch.is_ascii_alphanumeric()) {
        return Err(ConfigError::Validation(format!(
            "messagebird.originator `{originator}` must be a phone number or at most 11 alphanumeric characters"
        )));
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if server.bind_address.trim().is_empty() {
        return Err(ConfigError::Validation("server.bind_address is required".to_string()));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn split_numbers(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|value| !value.is_empty()).map(str::to_string).collect()
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse::<T>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    messagebird: Option<MessageBirdPatch>,
    sales: Option<SalesPatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct MessageBirdPatch {
    api_key: Option<String>,
    originator: Option<String>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct SalesPatch {
    agent_numbers: Option<AgentNumbersPatch>,
}

/// Agent numbers may be written as a TOML array or as one comma-separated string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AgentNumbersPatch {
    List(Vec<String>),
    Csv(String),
}

impl AgentNumbersPatch {
    fn into_list(self) -> Vec<String> {
        match self {
            Self::List(numbers) => numbers,
            Self::Csv(raw) => split_numbers(&raw),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    templates_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
