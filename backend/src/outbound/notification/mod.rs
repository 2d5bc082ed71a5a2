//! Log-backed mail notification adapter.
//!
//! No mail leaves the process: the envelope and body are written to the
//! structured log. The `local` and `cloud` transports differ only in the
//! name they report, mirroring the two delivery back ends an operator can
//! choose between.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::ports::{NotificationError, NotificationSender};

/// Delivery back end named in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailTransport {
    /// Development transport.
    #[default]
    Local,
    /// Hosted transport.
    Cloud,
}

impl MailTransport {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Cloud => "cloud",
        }
    }
}

impl fmt::Display for MailTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a transport name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mail transport `{0}`; expected `local` or `cloud`")]
pub struct UnknownMailTransport(pub String);

impl FromStr for MailTransport {
    type Err = UnknownMailTransport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "cloud" => Ok(Self::Cloud),
            _ => Err(UnknownMailTransport(s.to_owned())),
        }
    }
}

/// Sender and recipient addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    from: String,
    to: String,
}

/// Raised for an address that is blank or lacks an `@`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid mail {field} address `{value}`")]
pub struct InvalidMailAddress {
    pub field: &'static str,
    pub value: String,
}

fn check_address(field: &'static str, value: &str) -> Result<String, InvalidMailAddress> {
    let trimmed = value.trim();
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(trimmed.to_owned()),
        _ => Err(InvalidMailAddress {
            field,
            value: value.to_owned(),
        }),
    }
}

impl MailSettings {
    /// Validate both addresses.
    pub fn new(from: &str, to: &str) -> Result<Self, InvalidMailAddress> {
        Ok(Self {
            from: check_address("from", from)?,
            to: check_address("to", to)?,
        })
    }

    pub fn from_address(&self) -> &str {
        &self.from
    }

    pub fn to_address(&self) -> &str {
        &self.to
    }
}

/// [`NotificationSender`] that writes each mail to the log.
#[derive(Debug, Clone)]
pub struct LogMailSender {
    settings: MailSettings,
    transport: MailTransport,
}

impl LogMailSender {
    pub fn new(settings: MailSettings, transport: MailTransport) -> Self {
        Self {
            settings,
            transport,
        }
    }

    pub fn transport(&self) -> MailTransport {
        self.transport
    }
}

#[async_trait]
impl NotificationSender for LogMailSender {
    async fn send(&self, subject: &str, message: &str) -> Result<(), NotificationError> {
        if subject.trim().is_empty() {
            return Err(NotificationError::delivery("mail subject must not be blank"));
        }
        info!(
            transport = %self.transport,
            from = self.settings.from_address(),
            to = self.settings.to_address(),
            subject,
            message,
            "mail sent"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("local", MailTransport::Local)]
    #[case(" Cloud ", MailTransport::Cloud)]
    fn transports_parse_case_insensitively(#[case] raw: &str, #[case] expected: MailTransport) {
        assert_eq!(raw.parse::<MailTransport>(), Ok(expected));
    }

    #[rstest]
    fn unknown_transport_is_rejected() {
        assert!("smtp".parse::<MailTransport>().is_err());
    }

    #[rstest]
    #[case("", "admin@mycompany.com", "from")]
    #[case("noreply@mycompany.com", "admin", "to")]
    #[case("@mycompany.com", "admin@mycompany.com", "from")]
    fn malformed_addresses_are_rejected(
        #[case] from: &str,
        #[case] to: &str,
        #[case] field: &str,
    ) {
        let err = MailSettings::new(from, to).expect_err("invalid address");
        assert_eq!(err.field, field);
    }

    #[rstest]
    #[tokio::test]
    async fn sending_logs_and_succeeds() {
        let settings =
            MailSettings::new("noreply@mycompany.com", "admin@mycompany.com").expect("valid");
        let sender = LogMailSender::new(settings, MailTransport::Cloud);
        sender
            .send("Point of interest deleted", "Point of interest X with id 1 was deleted")
            .await
            .expect("log delivery succeeds");
        assert_eq!(sender.transport(), MailTransport::Cloud);
    }

    #[rstest]
    #[tokio::test]
    async fn blank_subject_fails_delivery() {
        let settings = MailSettings::new("a@b.c", "d@e.f").expect("valid");
        let err = LogMailSender::new(settings, MailTransport::Local)
            .send(" ", "body")
            .await
            .expect_err("blank subject");
        assert!(matches!(err, NotificationError::Delivery { .. }));
    }
}
