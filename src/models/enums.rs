use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(AppointmentRepeat {
    None => "none",
    Weekly => "weekly",
    Monthly => "monthly",
});

str_enum!(RefillSchedule {
    Every30Days => "every_30_days",
    Weekly => "weekly",
    Monthly => "monthly",
    Quarterly => "quarterly",
});

impl AppointmentRepeat {
    /// Interpret a stored rule string. Surrounding whitespace is ignored;
    /// anything other than `weekly` or `monthly` is a single visit.
    pub fn from_stored(raw: &str) -> Self {
        raw.trim().parse().unwrap_or(Self::None)
    }

    /// Parse admin input. Empty input means `none`; unknown rules are rejected.
    pub fn parse_input(raw: &str) -> Result<Self, DatabaseError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::None);
        }
        trimmed.parse()
    }
}

impl RefillSchedule {
    /// Lower-case and collapse whitespace runs to `_`, so "Every 30 days"
    /// and "every_30_days" name the same schedule.
    pub fn normalize(raw: &str) -> String {
        raw.split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .to_lowercase()
    }

    fn from_normalized(normalized: &str) -> Option<Self> {
        match normalized {
            "every30days" => Some(Self::Every30Days),
            other => other.parse().ok(),
        }
    }

    /// Interpret a stored schedule string. Unknown or empty schedules refill monthly.
    pub fn from_stored(raw: &str) -> Self {
        Self::from_normalized(&Self::normalize(raw)).unwrap_or(Self::Monthly)
    }

    /// Parse admin input. Empty input means `monthly`; unknown schedules are rejected.
    pub fn parse_input(raw: &str) -> Result<Self, DatabaseError> {
        let normalized = Self::normalize(raw);
        if normalized.is_empty() {
            return Ok(Self::Monthly);
        }
        Self::from_normalized(&normalized).ok_or_else(|| DatabaseError::InvalidEnum {
            field: "RefillSchedule".into(),
            value: raw.into(),
        })
    }

    /// Human-readable label for list views.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Every30Days => "Every 30 days",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Quarterly => "Quarterly",
        }
    }
}
