//! Scheduled message store
//!
//! Messages are keyed by calendar date. Every entry carries a content
//! version stamp; saves must quote the version they were based on, so two
//! admins editing the same day cannot silently overwrite each other.
//! Persisted as JSON (file on native, LocalStorage on web).

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LoadError, ScheduleError};
use crate::sim::GelatoWorld;

/// Calendar date (`YYYY-MM-DD`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl DateKey {
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, ScheduleError> {
        if !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month) {
            return Err(ScheduleError::InvalidDate(format!("{year:04}-{month:02}-{day:02}")));
        }
        Ok(Self { year, month, day })
    }
}

fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        2 if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

impl FromStr for DateKey {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScheduleError::InvalidDate(s.to_owned());
        let mut parts = s.trim().splitn(3, '-');
        let (Some(y), Some(m), Some(d)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };
        if y.len() != 4 || m.len() != 2 || d.len() != 2 {
            return Err(invalid());
        }
        let year = y.parse().map_err(|_| invalid())?;
        let month = m.parse().map_err(|_| invalid())?;
        let day = d.parse().map_err(|_| invalid())?;
        Self::new(year, month, day)
    }
}

impl TryFrom<String> for DateKey {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DateKey> for String {
    fn from(value: DateKey) -> Self {
        value.to_string()
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// One scheduled message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledMessage {
    pub text: String,
    /// Content version stamp, bumped on every save
    pub version: u64,
}

/// Scheduling collaborator interface
pub trait ScheduleBackend {
    fn fetch(&self, date: DateKey) -> Result<Option<ScheduledMessage>, ScheduleError>;

    /// Save `text` for `date`. `expected_version` must match the stored
    /// version (`None` = the date must be empty). Returns the new version.
    fn save(&mut self, date: DateKey, text: &str, expected_version: Option<u64>) -> Result<u64, ScheduleError>;

    /// All entries in date order (for the admin calendar)
    fn entries(&self) -> Result<Vec<(DateKey, ScheduledMessage)>, ScheduleError>;
}

/// In-process schedule with JSON persistence
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleStore {
    entries: BTreeMap<DateKey, ScheduledMessage>,
}

impl ScheduleStore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "gelato_schedule";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove a date's message, subject to the same version check as `save`
    pub fn remove(&mut self, date: DateKey, expected_version: u64) -> Result<ScheduledMessage, ScheduleError> {
        let current = self.entries.get(&date).map(|m| m.version);
        match current {
            None => Err(ScheduleError::NotFound(date.to_string())),
            Some(found) if found != expected_version => Err(ScheduleError::Conflict {
                date: date.to_string(),
                expected: Some(expected_version),
                found: Some(found),
            }),
            Some(_) => self
                .entries
                .remove(&date)
                .ok_or_else(|| ScheduleError::NotFound(date.to_string())),
        }
    }

    /// Message for `date`, or the latest earlier one if that day is empty
    pub fn active_on(&self, date: DateKey) -> Option<(DateKey, &ScheduledMessage)> {
        self.entries.range(..=date).next_back().map(|(k, v)| (*k, v))
    }

    pub fn to_json(&self) -> Result<String, ScheduleError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ScheduleError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file; a missing file is an empty schedule
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, ScheduleError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No schedule at {}, starting fresh", path.display());
            return Ok(Self::new());
        }
        let store = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::info!("Loaded {} scheduled messages", store.len());
        Ok(store)
    }

    /// Write via a temp file so a crash never leaves a torn schedule
    pub fn save_file(&self, path: impl AsRef<Path>) -> Result<(), ScheduleError> {
        let path = path.as_ref();
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, self.to_json()?)?;
        std::fs::rename(&tmp, path)?;
        log::info!("Schedule saved ({} entries)", self.len());
        Ok(())
    }

    /// Load the schedule from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load_local() -> Result<Self, ScheduleError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| ScheduleError::Storage("LocalStorage unavailable".into()))?;

        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => Self::from_json(&json),
            Ok(None) => Ok(Self::new()),
            Err(_) => Err(ScheduleError::Storage("LocalStorage read failed".into())),
        }
    }

    /// Save the schedule to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save_local(&self) -> Result<(), ScheduleError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| ScheduleError::Storage("LocalStorage unavailable".into()))?;
        storage
            .set_item(Self::STORAGE_KEY, &self.to_json()?)
            .map_err(|_| ScheduleError::Storage("LocalStorage write failed".into()))
    }
}

impl ScheduleBackend for ScheduleStore {
    fn fetch(&self, date: DateKey) -> Result<Option<ScheduledMessage>, ScheduleError> {
        Ok(self.entries.get(&date).cloned())
    }

    fn save(&mut self, date: DateKey, text: &str, expected_version: Option<u64>) -> Result<u64, ScheduleError> {
        let found = self.entries.get(&date).map(|m| m.version);
        if found != expected_version {
            log::warn!("Schedule conflict on {date}: expected {expected_version:?}, found {found:?}");
            return Err(ScheduleError::Conflict {
                date: date.to_string(),
                expected: expected_version,
                found,
            });
        }

        let version = found.map_or(1, |v| v + 1);
        self.entries.insert(
            date,
            ScheduledMessage {
                text: text.to_owned(),
                version,
            },
        );
        log::debug!("Scheduled message for {date} at version {version}");
        Ok(version)
    }

    fn entries(&self) -> Result<Vec<(DateKey, ScheduledMessage)>, ScheduleError> {
        Ok(self.entries.iter().map(|(k, v)| (*k, v.clone())).collect())
    }
}

/// Fetch the message for `date` and feed it to the world.
///
/// A day with nothing scheduled loads as an empty message. Fetch errors are
/// returned after the world has fallen back to an empty sequence.
pub fn load_scheduled_message<B: ScheduleBackend + ?Sized>(
    world: &mut GelatoWorld,
    backend: &B,
    date: DateKey,
) -> Result<usize, LoadError> {
    let ticket = world.begin_message_load()?;
    let result = backend
        .fetch(date)
        .map(|entry| entry.map(|m| m.text).unwrap_or_default())
        .map_err(LoadError::from);
    world.finish_message_load(ticket, result)
}
