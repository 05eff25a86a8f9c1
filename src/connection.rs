use std::collections::BTreeMap;
use std::fmt::Display;
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DRIVER_NAME_MAX_LENGTH: usize = 64;

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Hash, Eq)]
#[serde(try_from = "String")]
/// Name of an ODBC driver known to the server-side installer, e.g.
/// "PostgreSQL" or "SQL Server". It must contain 64 printable characters at
/// most and carry no surrounding whitespace.
pub struct DriverName(String);

#[derive(Error, Debug, PartialEq)]
pub enum DriverNameError {
    #[error("driver names must not be empty")]
    Empty,
    #[error(
        "driver names must contain {DRIVER_NAME_MAX_LENGTH} printable characters at most and no surrounding whitespace"
    )]
    InvalidFormat,
}

impl DriverName {
    pub fn new(name: &str) -> Result<Self, DriverNameError> {
        Self::try_from(name.to_string())
    }

    fn is_valid_format(s: &str) -> bool {
        s.chars().count() <= DRIVER_NAME_MAX_LENGTH
            && s.trim() == s
            && s.chars().all(|c| !c.is_control())
    }
}

impl TryFrom<String> for DriverName {
    type Error = DriverNameError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        if name.is_empty() {
            return Err(DriverNameError::Empty);
        }

        if DriverName::is_valid_format(&name) {
            Ok(DriverName(name))
        } else {
            Err(DriverNameError::InvalidFormat)
        }
    }
}

impl Deref for DriverName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for DriverName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.as_str())
    }
}

/// Parameters of one driver installation as handed over by the wizard.
/// Immutable once built.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Eq)]
pub struct DriverInstallRequest {
    driver: DriverName,
}

impl DriverInstallRequest {
    pub fn new(driver: DriverName) -> Self {
        Self { driver }
    }

    pub fn driver(&self) -> &DriverName {
        &self.driver
    }
}

impl From<DriverName> for DriverInstallRequest {
    fn from(driver: DriverName) -> Self {
        Self::new(driver)
    }
}

/// Connection configuration collected from a wizard panel. The install step
/// configures nothing, so it always hands back the default (empty) set.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Eq, Default)]
pub struct ConnectionOptions(BTreeMap<String, String>);

impl ConnectionOptions {
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn driver_name_validator() {
        assert!(DriverName::try_from("PostgreSQL".to_string()).is_ok());
        assert!(DriverName::try_from("SQL Server".to_string()).is_ok());
        assert!(DriverName::try_from("MySQL (8.0)".to_string()).is_ok());
        assert!(DriverName::try_from("a".repeat(64)).is_ok());
        // The length limit counts characters, not bytes.
        assert!(DriverName::try_from("é".repeat(64)).is_ok());

        assert!(DriverName::try_from(" PostgreSQL".to_string()).is_err());
        assert!(DriverName::try_from("PostgreSQL ".to_string()).is_err());
        assert!(DriverName::try_from("Postgre\nSQL".to_string()).is_err());
        assert!(DriverName::try_from("Postgre\tSQL".to_string()).is_err());
        assert!(DriverName::try_from("a".repeat(65)).is_err());
        assert!(DriverName::try_from("é".repeat(65)).is_err());

        assert_matches!(
            DriverName::try_from(String::new()),
            Err(DriverNameError::Empty)
        );
        assert_matches!(
            DriverName::try_from("\n".to_string()),
            Err(DriverNameError::InvalidFormat)
        );
    }

    #[test]
    fn install_request_exposes_the_driver() {
        let request = DriverInstallRequest::from(DriverName::new("PostgreSQL").unwrap());
        assert_eq!(request.driver().to_string(), "PostgreSQL");
    }

    #[test]
    fn default_options_serialize_to_an_empty_map() {
        let options = ConnectionOptions::default();

        assert!(options.is_empty());
        assert_eq!(serde_json::to_string(&options).unwrap(), "{}");
    }

    #[test]
    fn options_keep_the_last_value_per_key() {
        let mut options = ConnectionOptions::default();
        options.set("dsn", "postgres-prod");
        options.set("dsn", "postgres-dev");

        assert_eq!(options.len(), 1);
        assert_eq!(options.get("dsn"), Some("postgres-dev"));
    }
}
