use super::slots::Slot;
use anyhow::{bail, Result};
use serde_json::Value;
use tracing::{debug, info};

/// Schema version written by this build
pub const CURRENT_VERSION: u32 = 1;

/// Strip the version envelope from a stored slot and bring the state up to
/// [`CURRENT_VERSION`].
///
/// An object carrying both `version` and `state` is an envelope. Anything
/// else is a legacy bare payload and counts as version 0. Version 0 state has
/// the same shape as version 1, so upgrading only rewraps it on next save.
/// Versions newer than this build are refused rather than misread.
pub fn unwrap_envelope(slot: Slot, value: Value) -> Result<Value> {
    let (version, state) = split_envelope(value);

    if version > CURRENT_VERSION as u64 {
        bail!(
            "Slot {} was written with schema version {}, newer than supported version {}",
            slot.key(),
            version,
            CURRENT_VERSION
        );
    }

    if version < CURRENT_VERSION as u64 {
        info!(slot = slot.key(), from = version, to = CURRENT_VERSION, "upgrading stored slot");
    } else {
        debug!(slot = slot.key(), version, "slot is current");
    }

    Ok(state)
}

fn split_envelope(value: Value) -> (u64, Value) {
    match value {
        Value::Object(mut map) if map.contains_key("state") && map.get("version").is_some_and(Value::is_u64) => {
            let version = map.get("version").and_then(Value::as_u64).unwrap_or(0);
            let state = map.remove("state").unwrap_or(Value::Null);
            (version, state)
        }
        bare => (0, bare),
    }
}
