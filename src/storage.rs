//! Run persistence: the save blob, the key-value stores it lives in, and the
//! field-by-field defaulting applied when reading it back.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::SAVE_KEY;
use crate::entities::{default_roster, Hero, RunState};
use crate::error::StorageError;

const DEFAULT_SCORE: u32 = 0;
const DEFAULT_WAVE: u32 = 1;
const DEFAULT_TAVERN_HP: i32 = 100;

/// Highest `waveNumber` a save may resume at; anything above counts as missing.
pub const MAX_WAVE: u32 = 1000;

// ── Save blob ────────────────────────────────────────────────────────────────

/// Persisted shape: `{score, waveNumber, tavernHP, heroes, totalMonstersKilled}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveData {
    pub score: u32,
    pub wave_number: u32,
    #[serde(rename = "tavernHP")]
    pub tavern_hp: i32,
    pub heroes: Vec<Hero>,
    pub total_monsters_killed: u32,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            score: DEFAULT_SCORE,
            wave_number: DEFAULT_WAVE,
            tavern_hp: DEFAULT_TAVERN_HP,
            heroes: default_roster(),
            total_monsters_killed: 0,
        }
    }
}

impl SaveData {
    pub fn from_state(state: &RunState) -> Self {
        Self {
            score: state.score,
            wave_number: state.wave,
            tavern_hp: state.tavern_hp,
            heroes: state.heroes.clone(),
            total_monsters_killed: state.total_kills,
        }
    }

    /// Copy the persisted fields onto `state`.
    pub fn apply_to(&self, state: &RunState) -> RunState {
        RunState {
            score: self.score,
            wave: self.wave_number,
            tavern_hp: self.tavern_hp,
            heroes: self.heroes.clone(),
            total_kills: self.total_monsters_killed,
            ..state.clone()
        }
    }

    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a save, defaulting each field that is missing or unusable.
    ///
    /// Zero or negative `waveNumber`/`tavernHP` count as missing, so a save
    /// written at game over resumes with a full tavern.  A `waveNumber`
    /// above `MAX_WAVE` is missing too.  Only text that is not JSON at all
    /// is an error.
    pub fn from_json(raw: &str) -> Result<Self, StorageError> {
        let value: Value = serde_json::from_str(raw)?;
        let field = |name: &str| value.get(name);
        Ok(Self {
            score: positive_u32(field("score")).unwrap_or(DEFAULT_SCORE),
            wave_number: positive_u32(field("waveNumber"))
                .filter(|w| *w <= MAX_WAVE)
                .unwrap_or(DEFAULT_WAVE),
            tavern_hp: positive_i32(field("tavernHP")).unwrap_or(DEFAULT_TAVERN_HP),
            heroes: field("heroes")
                .and_then(|v| serde_json::from_value::<Vec<Hero>>(v.clone()).ok())
                .unwrap_or_else(default_roster),
            total_monsters_killed: positive_u32(field("totalMonstersKilled")).unwrap_or(0),
        })
    }
}

fn positive_number(v: Option<&Value>) -> Option<f64> {
    v.and_then(Value::as_f64)
        .filter(|n| n.is_finite() && *n >= 1.0)
        .map(f64::floor)
}

fn positive_u32(v: Option<&Value>) -> Option<u32> {
    positive_number(v).filter(|n| *n <= f64::from(u32::MAX)).map(|n| n as u32)
}

fn positive_i32(v: Option<&Value>) -> Option<i32> {
    positive_number(v).filter(|n| *n <= f64::from(i32::MAX)).map(|n| n as i32)
}

// ── Key-value stores ─────────────────────────────────────────────────────────

/// Durable string storage keyed by name.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-process store; nothing survives the process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `$HOME/.last_hearth`, or `./.last_hearth` without a home directory.
    pub fn default_dir() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".last_hearth")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

// ── Load / save ──────────────────────────────────────────────────────────────

/// Read the run saved under `lastHearthSave`; `None` if nothing was saved.
pub fn load_save(store: &impl KeyValueStore) -> Result<Option<SaveData>, StorageError> {
    match store.get(SAVE_KEY)? {
        Some(raw) => Ok(Some(SaveData::from_json(&raw)?)),
        None => Ok(None),
    }
}

pub fn write_save(store: &mut impl KeyValueStore, save: &SaveData) -> Result<(), StorageError> {
    store.set(SAVE_KEY, &save.to_json()?)
}
