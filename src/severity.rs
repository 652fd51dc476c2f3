use std::fmt;
use std::str::FromStr;

/// Marker rendered in the `severity` slot for levels outside the RFC 5424 set.
pub const UNKNOWN_SEVERITY: &str = "Unknown";

/// RFC 5424 severity levels, ordered from most to least important.
///
/// The discriminant is the numeric syslog code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Emergency = 0,
    Alert = 1,
    Critical = 2,
    Error = 3,
    Warning = 4,
    Notice = 5,
    Info = 6,
    Debug = 7,
}

impl Severity {
    /// All levels in code order.
    pub const ALL: [Severity; 8] = [
        Severity::Emergency,
        Severity::Alert,
        Severity::Critical,
        Severity::Error,
        Severity::Warning,
        Severity::Notice,
        Severity::Info,
        Severity::Debug,
    ];

    /// Resolve a numeric syslog code. Returns `None` outside `0..=7`.
    pub fn from_code(code: i64) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Canonical name written into the `severity` field.
    pub fn name(self) -> &'static str {
        match self {
            Severity::Emergency => "Emergency",
            Severity::Alert => "Alert",
            Severity::Critical => "Critical",
            Severity::Error => "Error",
            Severity::Warning => "Warning",
            Severity::Notice => "Notice",
            Severity::Info => "Info",
            Severity::Debug => "Debug",
        }
    }

    /// Name for an optional level, falling back to [`UNKNOWN_SEVERITY`].
    pub fn name_or_unknown(level: Option<Self>) -> &'static str {
        level.map(Self::name).unwrap_or(UNKNOWN_SEVERITY)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<tracing::Level> for Severity {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::ERROR => Severity::Error,
            tracing::Level::WARN => Severity::Warning,
            tracing::Level::INFO => Severity::Info,
            tracing::Level::DEBUG | tracing::Level::TRACE => Severity::Debug,
        }
    }
}

/// Error returned when a level name or code is not recognized.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown severity level: {0:?}")]
pub struct ParseSeverityError(pub String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    /// Accepts PSR-3 / syslog names (any case), their short forms, and
    /// numeric codes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<i64>() {
            return Self::from_code(code).ok_or_else(|| ParseSeverityError(s.to_string()));
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "emergency" | "emerg" => Ok(Severity::Emergency),
            "alert" => Ok(Severity::Alert),
            "critical" | "crit" => Ok(Severity::Critical),
            "error" | "err" => Ok(Severity::Error),
            "warning" | "warn" => Ok(Severity::Warning),
            "notice" => Ok(Severity::Notice),
            "info" | "informational" => Ok(Severity::Info),
            "debug" => Ok(Severity::Debug),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_lookup() {
        for level in Severity::ALL {
            assert_eq!(Severity::from_code(i64::from(level.code())), Some(level));
        }
    }

    #[test]
    fn out_of_range_codes_are_unknown() {
        assert_eq!(Severity::from_code(-1), None);
        assert_eq!(Severity::from_code(8), None);
        assert_eq!(Severity::name_or_unknown(Severity::from_code(42)), "Unknown");
    }

    #[test]
    fn parses_names_and_short_forms() {
        assert_eq!("WARN".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!("crit".parse::<Severity>(), Ok(Severity::Critical));
        assert_eq!("notice".parse::<Severity>(), Ok(Severity::Notice));
        assert_eq!("3".parse::<Severity>(), Ok(Severity::Error));
        assert!("verbose".parse::<Severity>().is_err());
        assert!("9".parse::<Severity>().is_err());
    }

    #[test]
    fn maps_tracing_levels() {
        assert_eq!(Severity::from(tracing::Level::ERROR), Severity::Error);
        assert_eq!(Severity::from(tracing::Level::WARN), Severity::Warning);
        assert_eq!(Severity::from(tracing::Level::TRACE), Severity::Debug);
    }
}
