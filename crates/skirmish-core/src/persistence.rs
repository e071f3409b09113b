//! Save/Load for a running simulation.
//!
//! The binary format is bincode over a `SaveData` snapshot whose first field
//! is the format version. JSON is offered for inspection and
//! hand-edited fixtures.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use skirmish_logic::sim::ai::AiPolicy;
use skirmish_logic::sim::{EntityId, WorldState};

use crate::config::EngineConfig;

/// Version number for save file format (increment when format changes)
pub const SAVE_VERSION: u32 = 1;

/// Serializable snapshot of an engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveData {
    /// Save format version
    pub version: u32,
    pub world: WorldState,
    /// AI policy per AI-driven entity
    pub policies: BTreeMap<EntityId, AiPolicy>,
    pub config: EngineConfig,
}

impl SaveData {
    pub fn new(world: WorldState, policies: BTreeMap<EntityId, AiPolicy>, config: EngineConfig) -> Self {
        Self {
            version: SAVE_VERSION,
            world,
            policies,
            config,
        }
    }

    fn check_version(self) -> Result<Self, SaveError> {
        if self.version != SAVE_VERSION {
            log::warn!("rejecting save with version {} (expected {})", self.version, SAVE_VERSION);
            return Err(SaveError::VersionMismatch {
                expected: SAVE_VERSION,
                found: self.version,
            });
        }
        Ok(self)
    }
}

/// Write a snapshot to any writer.
pub fn save_to_writer<W: Write>(writer: W, data: &SaveData) -> Result<(), SaveError> {
    bincode::serialize_into(writer, data)?;
    log::info!(
        "saved tick {} with {} entities",
        data.world.tick,
        data.world.entities.len()
    );
    Ok(())
}

/// Read a snapshot, rejecting other format versions.
pub fn load_from_reader<R: Read>(reader: R) -> Result<SaveData, SaveError> {
    let data: SaveData = bincode::deserialize_from(reader)?;
    let data = data.check_version()?;
    log::info!(
        "loaded tick {} with {} entities",
        data.world.tick,
        data.world.entities.len()
    );
    Ok(data)
}

pub fn save_to_bytes(data: &SaveData) -> Result<Vec<u8>, SaveError> {
    let mut buf = Vec::new();
    save_to_writer(&mut buf, data)?;
    Ok(buf)
}

pub fn load_from_bytes(bytes: &[u8]) -> Result<SaveData, SaveError> {
    load_from_reader(bytes)
}

pub fn save_to_file(path: impl AsRef<Path>, data: &SaveData) -> Result<(), SaveError> {
    let mut writer = BufWriter::new(File::create(path)?);
    save_to_writer(&mut writer, data)?;
    writer.flush()?;
    Ok(())
}

pub fn load_from_file(path: impl AsRef<Path>) -> Result<SaveData, SaveError> {
    load_from_reader(BufReader::new(File::open(path)?))
}

pub fn to_json(data: &SaveData) -> Result<String, SaveError> {
    Ok(serde_json::to_string_pretty(data)?)
}

pub fn from_json(s: &str) -> Result<SaveData, SaveError> {
    let data: SaveData = serde_json::from_str(s)?;
    data.check_version()
}

/// Errors that can occur during save/load
#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Bincode(Box<bincode::ErrorKind>),
    Json(serde_json::Error),
    VersionMismatch { expected: u32, found: u32 },
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for SaveError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        SaveError::Bincode(e)
    }
}

impl From<serde_json::Error> for SaveError {
    fn from(e: serde_json::Error) -> Self {
        SaveError::Json(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Bincode(e) => write!(f, "Serialization error: {}", e),
            SaveError::Json(e) => write!(f, "JSON error: {}", e),
            SaveError::VersionMismatch { expected, found } => {
                write!(f, "Save version mismatch: expected {}, found {}", expected, found)
            }
        }
    }
}

impl std::error::Error for SaveError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{generate_scenario, ScenarioConfig};
    use skirmish_logic::sim::{step_world, CommandMap, KernelContext};

    fn sample() -> SaveData {
        let scenario = generate_scenario(&ScenarioConfig::default());
        let mut world = scenario.world;
        let ctx = KernelContext::default();
        for _ in 0..5 {
            step_world(&mut world, &CommandMap::new(), &ctx);
        }
        SaveData::new(world, scenario.policies, EngineConfig::default())
    }

    #[test]
    fn test_bytes_roundtrip() {
        let data = sample();
        let bytes = save_to_bytes(&data).expect("save failed");
        println!("Save size: {} bytes", bytes.len());
        let loaded = load_from_bytes(&bytes).expect("load failed");
        assert_eq!(loaded, data);
        assert_eq!(loaded.world.tick, 5);
    }

    #[test]
    fn test_json_roundtrip() {
        let data = sample();
        let json = to_json(&data).unwrap();
        assert_eq!(from_json(&json).unwrap(), data);
    }

    #[test]
    fn test_file_roundtrip() {
        let data = sample();
        let path = std::env::temp_dir().join(format!("skirmish_save_{}.bin", std::process::id()));
        save_to_file(&path, &data).unwrap();
        let loaded = load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, data);
    }

    #[test]
    fn test_version_mismatch() {
        let mut data = sample();
        data.version = SAVE_VERSION + 1;
        let bytes = bincode::serialize(&data).unwrap();
        match load_from_bytes(&bytes) {
            Err(SaveError::VersionMismatch { expected, found }) => {
                assert_eq!(expected, SAVE_VERSION);
                assert_eq!(found, SAVE_VERSION + 1);
            }
            other => panic!("expected version mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(load_from_bytes(&[1, 2, 3]), Err(SaveError::Bincode(_))));
        assert!(matches!(from_json("{"), Err(SaveError::Json(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("skirmish_no_such_save.bin");
        assert!(matches!(load_from_file(path), Err(SaveError::Io(_))));
    }
}
