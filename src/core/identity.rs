//! Entity identity - prefixed ULID handles
//!
//! Every device, unit and system is addressed by an [`EntityId`] of the form
//! `PREFIX-<ULID>` (e.g. `DEV-01HQ3K...`). Ids are opaque handles into the
//! prediction context's arenas.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use ulid::Ulid;

/// Entity type prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityPrefix {
    Dev,
    Unit,
    Sys,
}

impl EntityPrefix {
    /// All known prefixes
    pub fn all() -> &'static [EntityPrefix] {
        &[EntityPrefix::Dev, EntityPrefix::Unit, EntityPrefix::Sys]
    }

    /// The prefix as it appears in ids
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::Dev => "DEV",
            EntityPrefix::Unit => "UNIT",
            EntityPrefix::Sys => "SYS",
        }
    }
}

impl fmt::Display for EntityPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityPrefix {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEV" => Ok(EntityPrefix::Dev),
            "UNIT" => Ok(EntityPrefix::Unit),
            "SYS" => Ok(EntityPrefix::Sys),
            _ => Err(IdParseError::UnknownPrefix(s.to_string())),
        }
    }
}

/// Errors from parsing an entity id string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdParseError {
    #[error("Entity id is missing the '-' separator: {0}")]
    MissingSeparator(String),

    #[error("Unknown entity prefix: {0}")]
    UnknownPrefix(String),

    #[error("Invalid ULID in entity id: {0}")]
    InvalidUlid(String),
}

/// Opaque, globally unique entity handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    prefix: EntityPrefix,
    ulid: Ulid,
}

impl EntityId {
    /// Generate a fresh id with the given prefix
    pub fn new(prefix: EntityPrefix) -> Self {
        Self {
            prefix,
            ulid: Ulid::new(),
        }
    }

    /// Build an id from an existing ULID
    pub fn from_parts(prefix: EntityPrefix, ulid: Ulid) -> Self {
        Self { prefix, ulid }
    }

    /// The entity type prefix
    pub fn prefix(&self) -> EntityPrefix {
        self.prefix
    }

    /// The ULID part
    pub fn ulid(&self) -> Ulid {
        self.ulid
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.prefix, self.ulid)
    }
}

impl FromStr for EntityId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, ulid) = s
            .split_once('-')
            .ok_or_else(|| IdParseError::MissingSeparator(s.to_string()))?;
        let prefix = prefix.parse()?;
        let ulid = Ulid::from_string(ulid).map_err(|_| IdParseError::InvalidUlid(s.to_string()))?;
        Ok(Self { prefix, ulid })
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_format() {
        let id = EntityId::new(EntityPrefix::Dev);
        let s = id.to_string();
        assert!(s.starts_with("DEV-"));
        assert_eq!(s.len(), "DEV-".len() + 26);
    }

    #[test]
    fn test_id_parse_roundtrip() {
        let id = EntityId::new(EntityPrefix::Unit);
        let parsed: EntityId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert_eq!(parsed.prefix(), EntityPrefix::Unit);
    }

    #[test]
    fn test_id_parse_errors() {
        assert!(matches!(
            "DEV01ABC".parse::<EntityId>(),
            Err(IdParseError::MissingSeparator(_))
        ));
        assert!(matches!(
            "FOO-01ARZ3NDEKTSV4RRFFQ69G5FAV".parse::<EntityId>(),
            Err(IdParseError::UnknownPrefix(_))
        ));
        assert!(matches!(
            "SYS-not-a-ulid".parse::<EntityId>(),
            Err(IdParseError::InvalidUlid(_))
        ));
    }

    #[test]
    fn test_ids_are_unique() {
        let a = EntityId::new(EntityPrefix::Sys);
        let b = EntityId::new(EntityPrefix::Sys);
        assert_ne!(a, b);
    }

    #[test]
    fn test_id_serializes_as_string() {
        let id = EntityId::new(EntityPrefix::Sys);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
        let back: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
