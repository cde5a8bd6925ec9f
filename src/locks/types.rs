//! Lock purpose and identity definitions.

use std::fmt;

/// What a lock protects.
///
/// Different purposes on the same location are independent exclusion domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockPurpose {
    /// Table metadata (schema) updates.
    Metadata,
    /// Table status file updates.
    TableStatus,
    /// Compaction of a single table.
    Compaction,
    /// System-wide compaction scheduling.
    SystemLevelCompaction,
    /// Segment deletion.
    DeleteSegment,
    /// Clean-files housekeeping.
    CleanFiles,
}

impl LockPurpose {
    /// All purposes, in declaration order.
    pub const ALL: [LockPurpose; 6] = [
        LockPurpose::Metadata,
        LockPurpose::TableStatus,
        LockPurpose::Compaction,
        LockPurpose::SystemLevelCompaction,
        LockPurpose::DeleteSegment,
        LockPurpose::CleanFiles,
    ];

    /// Stable name of this purpose.
    pub fn as_str(&self) -> &'static str {
        match self {
            LockPurpose::Metadata => "metadata",
            LockPurpose::TableStatus => "table_status",
            LockPurpose::Compaction => "compaction",
            LockPurpose::SystemLevelCompaction => "system_level_compaction",
            LockPurpose::DeleteSegment => "delete_segment",
            LockPurpose::CleanFiles => "clean_files",
        }
    }

    /// Lock file name for this purpose.
    ///
    /// Only [`LockPurpose::Metadata`] appends it to the location on the
    /// filesystem; the coordination backend uses it for every purpose.
    pub fn file_name(&self) -> &'static str {
        match self {
            LockPurpose::Metadata => "meta.lock",
            LockPurpose::TableStatus => "tablestatus.lock",
            LockPurpose::Compaction => "compaction.lock",
            LockPurpose::SystemLevelCompaction => "system_level_compaction.lock",
            LockPurpose::DeleteSegment => "delete_segment.lock",
            LockPurpose::CleanFiles => "clean_files.lock",
        }
    }

    /// Parse a purpose from its stable name (`-` and `_` are interchangeable).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|purpose| purpose.as_str() == normalized)
    }
}

impl fmt::Display for LockPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The resource a lock is taken on: a storage location plus a purpose.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LockIdentity {
    location: String,
    purpose: LockPurpose,
}

impl LockIdentity {
    pub fn new(location: impl Into<String>, purpose: LockPurpose) -> Self {
        Self {
            location: location.into(),
            purpose,
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn purpose(&self) -> LockPurpose {
        self.purpose
    }

    /// Effective lock path.
    ///
    /// For [`LockPurpose::Metadata`] this is `location/meta.lock`, with any
    /// trailing separators on `location` dropped first. For every other
    /// purpose the location itself is the lock file, so callers must pick a
    /// distinct location per purpose.
    pub fn lock_path(&self) -> String {
        if self.purpose != LockPurpose::Metadata {
            return self.location.clone();
        }

        let separator = separator_for(&self.location);
        let trimmed = self.location.trim_end_matches(is_separator);
        if self.location.is_empty() {
            self.purpose.file_name().to_string()
        } else if trimmed.is_empty() {
            // Location is a bare root such as "/"
            format!("{}{}", separator, self.purpose.file_name())
        } else {
            format!("{}{}{}", trimmed, separator, self.purpose.file_name())
        }
    }
}

impl fmt::Display for LockIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.location, self.purpose)
    }
}

fn is_separator(c: char) -> bool {
    c == '/' || c == std::path::MAIN_SEPARATOR
}

// URIs always use '/', bare paths use the platform separator.
fn separator_for(location: &str) -> char {
    if location.contains("://") {
        '/'
    } else {
        std::path::MAIN_SEPARATOR
    }
}
