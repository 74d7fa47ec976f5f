//! The persisted migration progress record.

use serde::{Deserialize, Serialize};

/// Row id of the singleton version record.
pub const SCHEMA_VERSION_ROW_ID: i64 = 0;

/// Migration progress stored in the `schema_version` table.
///
/// `Default` is the state of a database no migration has touched yet:
/// version 0 with an empty checksum.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Constant row identifier, always [`SCHEMA_VERSION_ROW_ID`].
    pub id: i64,

    /// Number of migrations applied, in order.
    pub version: usize,

    /// Chain checksum covering the first `version` migrations.
    pub checksum: String,
}

impl SchemaVersion {
    /// Build the record for `version` applied migrations.
    pub fn new(version: usize, checksum: impl Into<String>) -> Self {
        Self {
            id: SCHEMA_VERSION_ROW_ID,
            version,
            checksum: checksum.into(),
        }
    }

    /// `true` when no migration has been recorded.
    pub fn is_initial(&self) -> bool {
        self.version == 0
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.checksum.is_empty() {
            write!(f, "v{}", self.version)
        } else {
            write!(f, "v{} ({})", self.version, self.checksum)
        }
    }
}
