//! Cron recurrence kinds
//!
//! A job's schedule is a set of triggers, each picked from a fixed menu of
//! recurrence periods identified by an integer code.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Recurrence period of a scheduled trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum CronType {
    /// Every 15 minutes
    QuarterHourly,

    /// Every hour
    Hourly,

    /// Every day
    Daily,

    /// Every week
    Weekly,

    /// Every 30 days
    Monthly,

    /// A code this client does not know about
    Other(i32),
}

impl CronType {
    /// Numeric code used on the wire and in the add-cron path
    pub fn code(self) -> i32 {
        self.into()
    }
}

impl From<i32> for CronType {
    fn from(code: i32) -> Self {
        match code {
            1 => CronType::QuarterHourly,
            2 => CronType::Hourly,
            3 => CronType::Daily,
            4 => CronType::Weekly,
            5 => CronType::Monthly,
            other => CronType::Other(other),
        }
    }
}

impl From<CronType> for i32 {
    fn from(kind: CronType) -> Self {
        match kind {
            CronType::QuarterHourly => 1,
            CronType::Hourly => 2,
            CronType::Daily => 3,
            CronType::Weekly => 4,
            CronType::Monthly => 5,
            CronType::Other(code) => code,
        }
    }
}

impl FromStr for CronType {
    type Err = String;

    /// Accepts either the numeric code or the period name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(code) = s.parse::<i32>() {
            return Ok(CronType::from(code));
        }

        match s.to_lowercase().as_str() {
            "quarter-hourly" | "quarterhourly" | "15m" => Ok(CronType::QuarterHourly),
            "hourly" => Ok(CronType::Hourly),
            "daily" => Ok(CronType::Daily),
            "weekly" => Ok(CronType::Weekly),
            "monthly" => Ok(CronType::Monthly),
            _ => Err(format!("Unknown cron type: {}", s)),
        }
    }
}

impl std::fmt::Display for CronType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CronType::QuarterHourly => write!(f, "quarter-hourly"),
            CronType::Hourly => write!(f, "hourly"),
            CronType::Daily => write!(f, "daily"),
            CronType::Weekly => write!(f, "weekly"),
            CronType::Monthly => write!(f, "monthly"),
            CronType::Other(code) => write!(f, "type {}", code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_by_name_and_code() {
        assert_eq!("daily".parse::<CronType>().unwrap(), CronType::Daily);
        assert_eq!("Weekly".parse::<CronType>().unwrap(), CronType::Weekly);
        assert_eq!("1".parse::<CronType>().unwrap(), CronType::QuarterHourly);
        assert_eq!("9".parse::<CronType>().unwrap(), CronType::Other(9));
        assert!("fortnightly".parse::<CronType>().is_err());
    }

    #[test]
    fn test_code() {
        assert_eq!(CronType::Hourly.code(), 2);
        assert_eq!(CronType::Monthly.code(), 5);
    }
}
