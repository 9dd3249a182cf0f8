use super::migration::{unwrap_envelope, CURRENT_VERSION};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A named unit of persisted state. The timer is never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    Tasks,
    Goals,
    History,
    Settings,
}

impl Slot {
    pub fn all() -> &'static [Slot] {
        &[Slot::Tasks, Slot::Goals, Slot::History, Slot::Settings]
    }

    pub fn key(&self) -> &'static str {
        match self {
            Slot::Tasks => "dofive-tasks",
            Slot::Goals => "dofive-goals",
            Slot::History => "dofive-history",
            Slot::Settings => "dofive-settings",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.key())
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    state: &'a T,
}

/// Wrap `state` in a `{ "version", "state" }` envelope as pretty JSON
pub fn encode<T: Serialize>(slot: Slot, state: &T) -> Result<String> {
    let envelope = EnvelopeRef {
        version: CURRENT_VERSION,
        state,
    };
    serde_json::to_string_pretty(&envelope)
        .with_context(|| format!("Failed to serialize slot {}", slot.key()))
}

/// Parse a stored slot, accepting both the envelope and the legacy bare shape
pub fn decode<T: DeserializeOwned>(slot: Slot, raw: &str) -> Result<T> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .with_context(|| format!("Slot {} is not valid JSON", slot.key()))?;
    let state = unwrap_envelope(slot, value)?;
    serde_json::from_value(state).with_context(|| format!("Slot {} has an unexpected shape", slot.key()))
}
