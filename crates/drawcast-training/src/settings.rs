//! Typed access to the settings store.

use drawcast_core::{History, ZodiacConfigStatus, ZodiacMap};
use drawcast_store::{HistoryStore, SettingsStore, keys};
use serde::{Serialize, de::DeserializeOwned};

use crate::EvolutionError;

/// Reads and decodes a JSON value, failing on malformed JSON.
pub fn read_json<S, T>(store: &S, key: &'static str) -> Result<Option<T>, EvolutionError>
where
    S: SettingsStore + ?Sized,
    T: DeserializeOwned,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| EvolutionError::Decode { key, source })
}

/// Reads and decodes a JSON value, treating malformed JSON as absent (with a warning).
pub fn read_json_lenient<S, T>(store: &S, key: &'static str) -> Result<Option<T>, EvolutionError>
where
    S: SettingsStore + ?Sized,
    T: DeserializeOwned,
{
    Ok(decode_lenient(key, store.get(key)?.as_deref()))
}

/// Decodes an already fetched value the way [`read_json_lenient`] does.
pub fn decode_lenient<T>(key: &'static str, raw: Option<&str>) -> Option<T>
where
    T: DeserializeOwned,
{
    match serde_json::from_str(raw?) {
        Ok(value) => Some(value),
        Err(source) => {
            tracing::warn!(key, error = %source, "ignoring malformed setting");
            None
        }
    }
}

pub fn write_json<S, T>(store: &mut S, key: &'static str, value: &T) -> Result<(), EvolutionError>
where
    S: SettingsStore + ?Sized,
    T: Serialize + ?Sized,
{
    store.set(key, &encode(key, value)?)?;
    Ok(())
}

/// Writes `value` only if the stored raw value is still `expected`.
pub fn compare_and_set_json<S, T>(
    store: &mut S,
    key: &'static str,
    expected: Option<&str>,
    value: &T,
) -> Result<bool, EvolutionError>
where
    S: SettingsStore + ?Sized,
    T: Serialize + ?Sized,
{
    Ok(store.compare_and_set(key, expected, &encode(key, value)?)?)
}

fn encode<T>(key: &'static str, value: &T) -> Result<String, EvolutionError>
where
    T: Serialize + ?Sized,
{
    serde_json::to_string(value).map_err(|source| EvolutionError::Encode { key, source })
}

/// Whether the evolution step may run. Only an explicit `"0"` disables it.
pub fn is_enabled<S>(store: &S) -> Result<bool, EvolutionError>
where
    S: SettingsStore + ?Sized,
{
    Ok(store
        .get(keys::EVOLUTION_ENABLED)?
        .is_none_or(|v| v.trim() != "0"))
}

pub fn set_enabled<S>(store: &mut S, enabled: bool) -> Result<(), EvolutionError>
where
    S: SettingsStore + ?Sized,
{
    store.set(keys::EVOLUTION_ENABLED, if enabled { "1" } else { "0" })?;
    tracing::info!(enabled, "evolution flag updated");
    Ok(())
}

pub fn generation_counter<S>(store: &S) -> Result<u64, EvolutionError>
where
    S: SettingsStore + ?Sized,
{
    Ok(store
        .get(keys::GENERATION_COUNTER)?
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0))
}

/// The zodiac mapping in force: the stored override if valid, otherwise the default.
pub fn zodiac_map<S>(store: &S) -> Result<(ZodiacMap, ZodiacConfigStatus), EvolutionError>
where
    S: SettingsStore + ?Sized,
{
    let raw = store.get(keys::ZODIAC_CATEGORY_CONFIG)?;
    let (map, status) = ZodiacMap::resolve(raw.as_deref(), &ZodiacMap::default());
    if let ZodiacConfigStatus::Rejected(err) = &status {
        tracing::warn!(error = %err, "stored zodiac config rejected, using default mapping");
    }
    Ok((map, status))
}

/// Validates and stores a zodiac override. A rejected config leaves the stored value untouched.
pub fn set_zodiac_config<S>(store: &mut S, json: &str) -> Result<ZodiacMap, EvolutionError>
where
    S: SettingsStore + ?Sized,
{
    let map = ZodiacMap::from_json(json).map_err(|source| {
        tracing::warn!(error = %source, "zodiac config rejected");
        EvolutionError::ZodiacConfig { source }
    })?;
    write_json(store, keys::ZODIAC_CATEGORY_CONFIG, &map.to_config())?;
    tracing::info!("zodiac config accepted");
    Ok(map)
}

/// The most recent `depth` draws as a history.
pub fn load_history<S>(store: &S, depth: usize) -> Result<History, EvolutionError>
where
    S: HistoryStore + ?Sized,
{
    Ok(History::from_unordered(store.recent_draws(depth)?))
}

#[cfg(test)]
mod tests {
    use drawcast_core::Zodiac;
    use drawcast_store::MemoryStore;

    use super::*;

    #[test]
    fn test_enabled_flag() {
        let mut store = MemoryStore::new();
        assert!(is_enabled(&store).unwrap());
        set_enabled(&mut store, false).unwrap();
        assert!(!is_enabled(&store).unwrap());
        store.set(keys::EVOLUTION_ENABLED, "yes").unwrap();
        assert!(is_enabled(&store).unwrap());
    }

    #[test]
    fn test_rejected_zodiac_config_keeps_previous() {
        let mut store = MemoryStore::new();
        let shifted = ZodiacMap::cyclic(Zodiac::Snake);
        let json = serde_json::to_string(&shifted.to_config()).unwrap();
        set_zodiac_config(&mut store, &json).unwrap();

        let err = set_zodiac_config(&mut store, r#"{"鼠": [1]}"#).unwrap_err();
        assert!(matches!(err, EvolutionError::ZodiacConfig { .. }));

        let (map, status) = zodiac_map(&store).unwrap();
        assert!(status.is_accepted());
        assert_eq!(map, shifted);
    }

    #[test]
    fn test_malformed_json_is_lenient_or_strict() {
        let mut store = MemoryStore::new();
        store.set(keys::POPULATION, "not json").unwrap();
        let lenient: Option<Vec<u8>> = read_json_lenient(&store, keys::POPULATION).unwrap();
        assert_eq!(lenient, None);
        assert!(read_json::<_, Vec<u8>>(&store, keys::POPULATION).is_err());
    }

    #[test]
    fn test_compare_and_set_json_needs_matching_raw_value() {
        let mut store = MemoryStore::new();
        assert!(compare_and_set_json(&mut store, keys::POPULATION, None, &[1, 2]).unwrap());
        assert!(!compare_and_set_json(&mut store, keys::POPULATION, None, &[3]).unwrap());
        let raw = store.get(keys::POPULATION).unwrap();
        assert_eq!(raw.as_deref(), Some("[1,2]"));
        assert!(
            compare_and_set_json(&mut store, keys::POPULATION, raw.as_deref(), &[3]).unwrap()
        );
        let stored: Option<Vec<u8>> = read_json(&store, keys::POPULATION).unwrap();
        assert_eq!(stored, Some(vec![3]));
    }
}
