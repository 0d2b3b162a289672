//! Licence (permit) categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// Transmission category of a driving permit.
///
/// A student may only train in a vehicle of the same category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermitType {
    /// Manual gearbox.
    #[serde(alias = "manuel")]
    Manual,
    /// Automatic gearbox.
    #[serde(alias = "auto")]
    Automatic,
}

impl PermitType {
    /// Canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            PermitType::Manual => "manual",
            PermitType::Automatic => "automatic",
        }
    }
}

impl fmt::Display for PermitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermitType {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manual" | "manuel" => Ok(PermitType::Manual),
            "automatic" | "auto" => Ok(PermitType::Automatic),
            other => Err(ScheduleError::config(format!("unknown permit type '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("manual".parse::<PermitType>().unwrap(), PermitType::Manual);
        assert_eq!("Manuel".parse::<PermitType>().unwrap(), PermitType::Manual);
        assert_eq!(" auto ".parse::<PermitType>().unwrap(), PermitType::Automatic);
        assert_eq!("automatic".parse::<PermitType>().unwrap(), PermitType::Automatic);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "truck".parse::<PermitType>().unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_serde_aliases() {
        let p: PermitType = serde_json::from_str("\"auto\"").unwrap();
        assert_eq!(p, PermitType::Automatic);
        assert_eq!(serde_json::to_string(&PermitType::Manual).unwrap(), "\"manual\"");
        assert!(serde_json::from_str::<PermitType>("\"moped\"").is_err());
    }
}
