//! Typed argument values delivered by built-in system intents.
//!
//! The platform populates exactly one value field per wire argument; the
//! conversion here picks the populated field and tags it, so handlers match
//! on a closed enum instead of probing optional fields.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use serde_json::Value;

use crate::wire::direct::WireArgument;

#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: String,
    /// What the user literally said, when the platform supplies it.
    pub raw_text: Option<String>,
    pub value: ArgumentValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentValue {
    Text(String),
    Bool(bool),
    Integer(i64),
    DateTime(DateTimeValue),
    /// `@type`-tagged payload (sign-in status, transaction results,
    /// delivery address). Left as JSON; typed readers live on
    /// [`Conversation`](super::Conversation).
    Extension(Value),
    /// No value field populated at all.
    Empty,
}

impl Argument {
    pub fn from_wire(wire: &WireArgument) -> Self {
        let value = if let Some(b) = wire.bool_value {
            ArgumentValue::Bool(b)
        } else if let Some(i) = wire.int_value {
            ArgumentValue::Integer(i)
        } else if let Some(ref dt) = wire.datetime_value {
            match DateTimeValue::from_json(dt) {
                Some(parsed) => ArgumentValue::DateTime(parsed),
                None => ArgumentValue::Extension(dt.clone()),
            }
        } else if let Some(ref ext) = wire.extension {
            ArgumentValue::Extension(ext.clone())
        } else if let Some(ref t) = wire.text_value {
            ArgumentValue::Text(t.clone())
        } else {
            ArgumentValue::Empty
        };
        Self {
            name: wire.name.clone().unwrap_or_default(),
            raw_text: wire.raw_text.clone(),
            value,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self.value {
            ArgumentValue::Text(ref t) => Some(t),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            ArgumentValue::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_date_time(&self) -> Option<&DateTimeValue> {
        match self.value {
            ArgumentValue::DateTime(ref dt) => Some(dt),
            _ => None,
        }
    }

    pub fn as_extension(&self) -> Option<&Value> {
        match self.value {
            ArgumentValue::Extension(ref v) => Some(v),
            _ => None,
        }
    }
}

// ── Date-time argument ────────────────────────────────────────────

/// Calendar value from a date-time system intent. Date and time halves are
/// independently optional: a date-only ask yields no time part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct DateTimeValue {
    #[serde(default)]
    pub date: Option<DatePart>,
    #[serde(default)]
    pub time: Option<TimePart>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct DatePart {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct TimePart {
    #[serde(default)]
    pub hours: u32,
    #[serde(default)]
    pub minutes: u32,
    #[serde(default)]
    pub seconds: u32,
}

impl DateTimeValue {
    pub fn from_json(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Combine into a naive timestamp; `None` if the date half is absent or
    /// out of range. A missing time half means midnight.
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        let d = self.date?;
        let date = NaiveDate::from_ymd_opt(d.year, d.month, d.day)?;
        let time = match self.time {
            Some(t) => NaiveTime::from_hms_opt(t.hours, t.minutes, t.seconds)?,
            None => NaiveTime::from_hms_opt(0, 0, 0)?,
        };
        Some(date.and_time(time))
    }
}

// ── Sign-in status ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum SignInStatus {
    #[strum(serialize = "OK")]
    Ok,
    #[strum(serialize = "CANCELLED")]
    Cancelled,
    #[strum(serialize = "ERROR")]
    Error,
    #[strum(serialize = "STATUS_UNSPECIFIED")]
    Unspecified,
}

impl SignInStatus {
    pub fn from_wire(status: &str) -> Self {
        match status {
            "OK" => SignInStatus::Ok,
            "CANCELLED" => SignInStatus::Cancelled,
            "ERROR" => SignInStatus::Error,
            _ => SignInStatus::Unspecified,
        }
    }
}

// ── Transaction decision ──────────────────────────────────────────

/// Outcome of a transaction-decision system intent.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDecision {
    /// Platform decision constant, e.g. `ORDER_ACCEPTED` or
    /// `ORDER_REJECTED`. Kept verbatim.
    pub decision: String,
    /// The confirmed order, present on acceptance.
    pub order: Option<Value>,
}
