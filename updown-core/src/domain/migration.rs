//! Migration identity: versions and directions

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::result::Error;

/// Ordered token identifying one migration's position in history.
///
/// Versions are timestamp-like integers. Numeric order is used everywhere:
/// for sorting pending work and for the rollback-target comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(i64);

impl Version {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| Error::validation(format!("'{}' is not a valid migration version", s)))
    }
}

/// Up (apply) or down (revert) variant of a migration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Value stored in the ledger's `direction` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    /// Filename prefix: `u` or `d`
    pub fn prefix(&self) -> &'static str {
        match self {
            Direction::Up => "u",
            Direction::Down => "d",
        }
    }

    /// Parse a filename prefix back into a direction
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "u" => Some(Direction::Up),
            "d" => Some(Direction::Down),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" | "u" => Ok(Direction::Up),
            "down" | "d" => Ok(Direction::Down),
            other => Err(Error::validation(format!("unknown direction '{}'", other))),
        }
    }
}

/// Versions found on disk, partitioned by direction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationFiles {
    pub up: BTreeSet<Version>,
    pub down: BTreeSet<Version>,
}

impl MigrationFiles {
    pub fn insert(&mut self, direction: Direction, version: Version) {
        match direction {
            Direction::Up => self.up.insert(version),
            Direction::Down => self.down.insert(version),
        };
    }
}

/// Work that is present on disk but not reflected in the ledger.
///
/// `up` is ascending, oldest first. `down` is informational only: rollbacks
/// are driven by an explicit target, never by this list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PendingSet {
    pub up: Vec<Version>,
    pub down: Vec<Version>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse_and_order() {
        let a: Version = "1621698206".parse().unwrap();
        let b: Version = " 900 ".parse().unwrap();
        assert_eq!(a.as_i64(), 1621698206);
        assert!(b < a);
        assert!("20240101abc".parse::<Version>().is_err());
    }

    #[test]
    fn test_versions_sort_numerically() {
        let mut versions = vec![Version::new(100), Version::new(9), Version::new(20)];
        versions.sort();
        assert_eq!(versions, vec![Version::new(9), Version::new(20), Version::new(100)]);
    }

    #[test]
    fn test_direction_prefix_round_trip() {
        for direction in [Direction::Up, Direction::Down] {
            assert_eq!(Direction::from_prefix(direction.prefix()), Some(direction));
            assert_eq!(direction.as_str().parse::<Direction>().unwrap(), direction);
        }
        assert_eq!(Direction::from_prefix("x"), None);
        assert!("sideways".parse::<Direction>().is_err());
    }
}
