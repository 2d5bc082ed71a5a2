//! Application settings loaded via OrthoConfig.
//!
//! Every value may come from the command line, a configuration file, or a
//! `CITYINFO_`-prefixed environment variable. Accessors supply defaults and
//! validate the raw strings.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use cityinfo::outbound::notification::{
    InvalidMailAddress, MailSettings, MailTransport, UnknownMailTransport,
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAIL_FROM: &str = "noreply@cityinfo.local";
const DEFAULT_MAIL_TO: &str = "admin@cityinfo.local";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Raised when a configured value cannot be interpreted.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// `bind_addr` is not a socket address.
    #[error("invalid bind address `{value}`: {message}")]
    BindAddr { value: String, message: String },
    /// `mail_sender` names an unknown transport.
    #[error(transparent)]
    MailTransport(#[from] UnknownMailTransport),
    /// `mail_from` or `mail_to` is not an address.
    #[error(transparent)]
    MailAddress(#[from] InvalidMailAddress),
}

/// Runtime configuration for the CityInfo server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CITYINFO")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string; the in-memory store is used when unset.
    pub database_url: Option<String>,
    /// Mail transport named in notification logs: `local` or `cloud`.
    pub mail_sender: Option<String>,
    /// Sender address of notification mails.
    pub mail_from: Option<String>,
    /// Recipient address of notification mails.
    pub mail_to: Option<String>,
    /// City claim a session must carry to reach point of interest routes.
    pub required_city_claim: Option<String>,
    /// Path of the session signing key.
    pub session_key_file: Option<PathBuf>,
    /// Permit a generated session key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Mark session cookies `Secure`; defaults to true.
    pub cookie_secure: Option<bool>,
}

impl AppSettings {
    /// Listening address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Database connection string when one is configured and non-blank.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Mail transport, defaulting to `local`.
    pub fn mail_transport(&self) -> Result<MailTransport, SettingsError> {
        match self.mail_sender.as_deref() {
            Some(raw) => Ok(raw.parse()?),
            None => Ok(MailTransport::default()),
        }
    }

    /// Validated mail envelope addresses.
    pub fn mail_settings(&self) -> Result<MailSettings, SettingsError> {
        Ok(MailSettings::new(
            self.mail_from.as_deref().unwrap_or(DEFAULT_MAIL_FROM),
            self.mail_to.as_deref().unwrap_or(DEFAULT_MAIL_TO),
        )?)
    }

    /// Required city claim, ignoring blank values.
    pub fn required_city_claim(&self) -> Option<String> {
        self.required_city_claim
            .as_deref()
            .map(str::trim)
            .filter(|claim| !claim.is_empty())
            .map(str::to_owned)
    }

    /// Session key path, defaulting to `/var/run/secrets/session_key`.
    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    /// Whether session cookies carry the `Secure` flag.
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }
}
