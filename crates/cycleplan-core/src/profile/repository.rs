//! Profile repository implementations.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::ProfileRecord;
use crate::error::Result;

/// Read access to stored profiles.
pub trait ProfileRepository: Send + Sync {
    /// Look up a profile; `Ok(None)` when the user has none.
    fn profile(&self, user_id: &str) -> Result<Option<ProfileRecord>>;
}

/// Profiles held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfiles {
    profiles: HashMap<String, ProfileRecord>,
}

impl InMemoryProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record for its user.
    pub fn upsert(&mut self, record: ProfileRecord) {
        self.profiles.insert(record.user_id.clone(), record);
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl ProfileRepository for InMemoryProfiles {
    fn profile(&self, user_id: &str) -> Result<Option<ProfileRecord>> {
        Ok(self.profiles.get(user_id).cloned())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ProfileDocument {
    #[serde(default)]
    profiles: HashMap<String, ProfileRecord>,
}

/// Profiles read once from a JSON document of the form
/// `{"profiles": {"<user id>": {...}}}`.
#[derive(Debug, Clone)]
pub struct JsonFileProfiles {
    path: PathBuf,
    inner: InMemoryProfiles,
}

impl JsonFileProfiles {
    /// Read the document; a missing file yields an empty repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let document: ProfileDocument = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => ProfileDocument::default(),
            Err(e) => return Err(e.into()),
        };

        let mut inner = InMemoryProfiles::new();
        for (user_id, mut record) in document.profiles {
            if record.user_id.is_empty() {
                record.user_id = user_id;
            }
            inner.upsert(record);
        }
        tracing::debug!(path = %path.display(), profiles = inner.len(), "loaded profiles");
        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfileRepository for JsonFileProfiles {
    fn profile(&self, user_id: &str) -> Result<Option<ProfileRecord>> {
        self.inner.profile(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn in_memory_lookup() {
        let mut repo = InMemoryProfiles::new();
        repo.upsert(ProfileRecord {
            user_id: "a".into(),
            last_period_start: Some("2025-01-01".into()),
            ..Default::default()
        });
        assert!(repo.profile("a").unwrap().is_some());
        assert!(repo.profile("b").unwrap().is_none());
    }

    #[test]
    fn json_file_fills_user_ids_from_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(
            &path,
            r#"{"profiles": {"u1": {"last_period_start": "2025-01-01", "cycle_length": 30}}}"#,
        )
        .unwrap();

        let repo = JsonFileProfiles::open(&path).unwrap();
        let record = repo.profile("u1").unwrap().unwrap();
        assert_eq!(record.user_id, "u1");
        assert_eq!(record.cycle_length, Some(30));
        assert_eq!(record.menstruation_phase_duration, None);
    }

    #[test]
    fn missing_file_is_empty_and_bad_json_fails() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileProfiles::open(dir.path().join("absent.json")).unwrap();
        assert!(repo.profile("u1").unwrap().is_none());

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{not json").unwrap();
        assert!(JsonFileProfiles::open(&bad).is_err());
    }
}
