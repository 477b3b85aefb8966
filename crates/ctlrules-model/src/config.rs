//! Editor configuration loading (`ctlrules.toml`).

#![allow(missing_docs)]

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use smol_str::SmolStr;

use crate::error::ConfigError;
use crate::kinds::IoKind;

pub const DEFAULT_CONTROLLER_URL: &str = "http://192.168.4.1";
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_SAVE_WINDOW_MS: u64 = 3_000;

#[derive(Debug, Clone)]
pub struct EditorConfig {
    pub controller: ControllerConfig,
    pub log_level: SmolStr,
    pub limits: Limits,
}

#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub url: SmolStr,
    pub fetch_timeout: Duration,
    /// How long a save may stay unanswered before it is presumed applied.
    pub save_window: Duration,
}

impl ControllerConfig {
    /// Endpoint serving and accepting the configuration document.
    #[must_use]
    pub fn config_url(&self) -> String {
        format!("{}/config", self.url.trim_end_matches('/'))
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            url: SmolStr::new(DEFAULT_CONTROLLER_URL),
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
            save_window: Duration::from_millis(DEFAULT_SAVE_WINDOW_MS),
        }
    }
}

/// Table sizes used when creating a document from scratch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub digital_inputs: u16,
    pub digital_outputs: u16,
    pub analog_inputs: u16,
    pub soft_variables: u16,
    pub timers: u16,
    pub conditions: usize,
    pub actions: usize,
    pub condition_groups: usize,
    pub action_groups: usize,
}

impl Limits {
    #[must_use]
    pub fn io_count(&self, kind: IoKind) -> u16 {
        match kind {
            IoKind::DigitalInput => self.digital_inputs,
            IoKind::DigitalOutput => self.digital_outputs,
            IoKind::AnalogInput => self.analog_inputs,
            IoKind::SoftVariable => self.soft_variables,
            IoKind::Timer => self.timers,
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            digital_inputs: 8,
            digital_outputs: 8,
            analog_inputs: 4,
            soft_variables: 8,
            timers: 8,
            conditions: 20,
            actions: 20,
            condition_groups: 10,
            action_groups: 10,
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            controller: ControllerConfig::default(),
            log_level: SmolStr::new("info"),
            limits: Limits::default(),
        }
    }
}

impl EditorConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|err| ConfigError::InvalidConfig(format!("ctlrules.toml: {err}").into()))?;
        Self::from_toml_str(&text)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.is_file() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: EditorToml = toml::from_str(text)
            .map_err(|err| ConfigError::InvalidConfig(format!("ctlrules.toml: {err}").into()))?;
        raw.into_config()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct EditorToml {
    controller: Option<ControllerSection>,
    log: Option<LogSection>,
    limits: Option<LimitsSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ControllerSection {
    url: Option<String>,
    fetch_timeout_ms: Option<u64>,
    save_window_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LogSection {
    level: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LimitsSection {
    digital_inputs: Option<u16>,
    digital_outputs: Option<u16>,
    analog_inputs: Option<u16>,
    soft_variables: Option<u16>,
    timers: Option<u16>,
    conditions: Option<usize>,
    actions: Option<usize>,
    condition_groups: Option<usize>,
    action_groups: Option<usize>,
}

impl EditorToml {
    fn into_config(self) -> Result<EditorConfig, ConfigError> {
        let controller = match self.controller {
            Some(section) => section.into_config()?,
            None => ControllerConfig::default(),
        };
        let log_level = match self.log {
            Some(section) => parse_log_level(&section.level)?,
            None => SmolStr::new("info"),
        };
        let limits = self
            .limits
            .map(LimitsSection::into_limits)
            .unwrap_or_default();
        for (name, size) in [
            ("limits.conditions", limits.conditions),
            ("limits.actions", limits.actions),
            ("limits.condition_groups", limits.condition_groups),
            ("limits.action_groups", limits.action_groups),
        ] {
            if size == 0 || size > usize::from(u16::MAX) {
                return Err(ConfigError::InvalidConfig(
                    format!("{name} must be within 1..=65535").into(),
                ));
            }
        }
        Ok(EditorConfig {
            controller,
            log_level,
            limits,
        })
    }
}

impl ControllerSection {
    fn into_config(self) -> Result<ControllerConfig, ConfigError> {
        let url = self
            .url
            .unwrap_or_else(|| DEFAULT_CONTROLLER_URL.to_string());
        let url = url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidConfig(
                format!("controller.url must be http(s), got '{url}'").into(),
            ));
        }
        let fetch_timeout_ms = self.fetch_timeout_ms.unwrap_or(DEFAULT_FETCH_TIMEOUT_MS);
        let save_window_ms = self.save_window_ms.unwrap_or(DEFAULT_SAVE_WINDOW_MS);
        if fetch_timeout_ms == 0 {
            return Err(ConfigError::InvalidConfig(
                "controller.fetch_timeout_ms must be greater than 0".into(),
            ));
        }
        if save_window_ms == 0 {
            return Err(ConfigError::InvalidConfig(
                "controller.save_window_ms must be greater than 0".into(),
            ));
        }
        Ok(ControllerConfig {
            url: SmolStr::new(url.trim_end_matches('/')),
            fetch_timeout: Duration::from_millis(fetch_timeout_ms),
            save_window: Duration::from_millis(save_window_ms),
        })
    }
}

impl LimitsSection {
    fn into_limits(self) -> Limits {
        let defaults = Limits::default();
        Limits {
            digital_inputs: self.digital_inputs.unwrap_or(defaults.digital_inputs),
            digital_outputs: self.digital_outputs.unwrap_or(defaults.digital_outputs),
            analog_inputs: self.analog_inputs.unwrap_or(defaults.analog_inputs),
            soft_variables: self.soft_variables.unwrap_or(defaults.soft_variables),
            timers: self.timers.unwrap_or(defaults.timers),
            conditions: self.conditions.unwrap_or(defaults.conditions),
            actions: self.actions.unwrap_or(defaults.actions),
            condition_groups: self.condition_groups.unwrap_or(defaults.condition_groups),
            action_groups: self.action_groups.unwrap_or(defaults.action_groups),
        }
    }
}

fn parse_log_level(text: &str) -> Result<SmolStr, ConfigError> {
    let level = text.trim().to_ascii_lowercase();
    match level.as_str() {
        "error" | "warn" | "info" | "debug" | "trace" => Ok(SmolStr::new(level)),
        _ => Err(ConfigError::InvalidConfig(
            format!("invalid log.level '{text}'").into(),
        )),
    }
}
