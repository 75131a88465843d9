//! Wire format of client requests.
//!
//! Each connection carries exactly one JSON object:
//!
//! ```text
//! {"sensorname": "kitchen", "type": "info", "temperature": 21}
//! {"type": "daily_stats"}
//! {"type": "weekly_stats", "date": "2024-03-10"}
//! ```
//!
//! All fields are optional at the JSON level; [`Request::try_from`] decides
//! which combinations are meaningful.

use std::io::Read;

use serde::{Deserialize, Serialize};
use thermo::Temperature;
use thiserror::Error;

/// Upper bound on the bytes read for one request.
pub const MAX_REQUEST_BYTES: u64 = 64 * 1024;

/// A decoded request object, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Reporting sensor (`info` only).
    #[serde(rename = "sensorname", default)]
    pub sensor_name: String,

    /// Request type: `info`, `daily_stats` or `weekly_stats`.
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Reading to ingest (`info` only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Temperature>,

    /// As-of date for stats requests; today when absent or empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// A validated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Ingest one reading for a sensor.
    Info {
        /// Sensor name, never empty.
        sensor: String,
        /// The reading.
        temperature: Temperature,
    },
    /// Daily cross-section report.
    DailyStats {
        /// Caller-supplied as-of date, if any.
        as_of: Option<String>,
    },
    /// Weekly per-sensor report.
    WeeklyStats {
        /// Caller-supplied as-of date, if any.
        as_of: Option<String>,
    },
}

/// Reasons a message is rejected.
#[derive(Error, Debug)]
pub enum RequestError {
    /// The bytes on the wire were not a request object.
    #[error("wrong format sent")]
    Malformed(#[from] serde_json::Error),

    /// An `info` request without a sensor name or temperature.
    #[error("please provide a valid sensorname and temperature")]
    InvalidInfo,

    /// A `type` the server does not handle.
    #[error("wrong type")]
    UnknownType(String),
}

impl TryFrom<Message> for Request {
    type Error = RequestError;

    fn try_from(msg: Message) -> Result<Self, Self::Error> {
        // An empty date means "today", same as a missing one.
        let as_of = msg.date.filter(|d| !d.is_empty());

        match msg.kind.as_str() {
            "info" => match msg.temperature {
                Some(temperature) if !msg.sensor_name.is_empty() => Ok(Self::Info {
                    sensor: msg.sensor_name,
                    temperature,
                }),
                _ => Err(RequestError::InvalidInfo),
            },
            "daily_stats" => Ok(Self::DailyStats { as_of }),
            "weekly_stats" => Ok(Self::WeeklyStats { as_of }),
            _ => Err(RequestError::UnknownType(msg.kind)),
        }
    }
}

/// Reads one request object from `reader` and validates it.
///
/// Only the first JSON value is consumed; anything after it is ignored so a
/// client may keep its side of the connection open while waiting for the
/// reply. At most [`MAX_REQUEST_BYTES`] are read; a longer object is
/// rejected as malformed.
///
/// # Errors
///
/// Returns a [`RequestError`] whose message is the reply to send back.
pub fn read_request<R: Read>(reader: R) -> Result<Request, RequestError> {
    let mut de = serde_json::Deserializer::from_reader(reader.take(MAX_REQUEST_BYTES));
    let msg = Message::deserialize(&mut de)?;
    Request::try_from(msg)
}
