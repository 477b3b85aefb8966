//! Controller transport.
//!
//! The controller serves its document on `GET /config` and takes a full
//! replacement on `POST /config`. Applying a new document restarts the
//! controller, which often drops the connection before answering, so a save
//! that stays unanswered for the whole save window counts as accepted.

use std::time::Duration;

use smol_str::SmolStr;
use tracing::debug;

use crate::config::ControllerConfig;
use crate::error::ConfigError;

/// How a save was acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The controller answered with a 2xx status.
    Confirmed,
    /// The document was sent but no answer came within the save window; the
    /// controller is assumed to be restarting with it.
    Presumed,
}

/// Fetch/replace access to a controller's configuration document.
pub trait ConfigTransport {
    /// Human-readable location, for logs.
    fn endpoint(&self) -> &str;

    /// Raw JSON body of the current document.
    fn fetch(&self) -> Result<String, ConfigError>;

    /// Send a full document body.
    fn submit(&self, body: &str) -> Result<SaveOutcome, ConfigError>;
}

/// [`ConfigTransport`] over HTTP.
pub struct HttpTransport {
    url: String,
    fetch_agent: ureq::Agent,
    save_agent: ureq::Agent,
}

impl HttpTransport {
    #[must_use]
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            url: config.config_url(),
            fetch_agent: fetch_agent(config.fetch_timeout),
            save_agent: save_agent(config.fetch_timeout, config.save_window),
        }
    }
}

fn fetch_agent(timeout: Duration) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build();
    ureq::Agent::new_with_config(config)
}

/// Per-phase timeouts so a connect failure is told apart from a controller
/// that went quiet after taking the document.
fn save_agent(connect: Duration, window: Duration) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_resolve(Some(connect))
        .timeout_connect(Some(connect))
        .timeout_send_request(Some(window))
        .timeout_send_body(Some(window))
        .timeout_recv_response(Some(window))
        .timeout_recv_body(Some(window))
        .http_status_as_error(false)
        .build();
    ureq::Agent::new_with_config(config)
}

/// Only silence after the body went out means the controller is applying it.
fn presumed_applied(timeout: ureq::Timeout) -> bool {
    matches!(
        timeout,
        ureq::Timeout::RecvResponse | ureq::Timeout::RecvBody
    )
}

fn failure(context: &str, detail: impl std::fmt::Display) -> ConfigError {
    ConfigError::TransportFailure(SmolStr::new(format!("{context}: {detail}")))
}

impl ConfigTransport for HttpTransport {
    fn endpoint(&self) -> &str {
        &self.url
    }

    fn fetch(&self) -> Result<String, ConfigError> {
        let context = format!("GET {}", self.url);
        debug!("{context}");
        let mut response = self
            .fetch_agent
            .get(&self.url)
            .call()
            .map_err(|err| failure(&context, err))?;
        let status = response.status();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|err| failure(&context, err))?;
        if !status.is_success() {
            return Err(failure(
                &context,
                format!("HTTP {}: {}", status.as_u16(), body.trim()),
            ));
        }
        Ok(body)
    }

    fn submit(&self, body: &str) -> Result<SaveOutcome, ConfigError> {
        let context = format!("POST {}", self.url);
        debug!("{context} ({} bytes)", body.len());
        let result = self
            .save_agent
            .post(&self.url)
            .header("Content-Type", "application/json")
            .send(body);
        match result {
            Ok(mut response) => {
                let status = response.status();
                if status.is_success() {
                    return Ok(SaveOutcome::Confirmed);
                }
                let text = response.body_mut().read_to_string().unwrap_or_default();
                Err(failure(
                    &context,
                    format!("HTTP {}: {}", status.as_u16(), text.trim()),
                ))
            }
            Err(ureq::Error::Timeout(timeout)) if presumed_applied(timeout) => {
                Ok(SaveOutcome::Presumed)
            }
            Err(err) => Err(failure(&context, err)),
        }
    }
}
