//! Capability-scoped JSON snapshot file backing the local store.
//!
//! The whole row set is rewritten on every mutation: the file is written to
//! a sibling temporary name and renamed over the original, so readers never
//! observe a half-written snapshot.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;

use super::models::ContactRow;
use crate::domain::Contact;
use crate::domain::ports::ContactStoreError;

/// Location of a contact snapshot on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFile {
    directory: PathBuf,
    file_name: OsString,
}

impl SnapshotFile {
    /// Resolve the directory and file name for `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ContactStoreError::Io`] when `path` has no file name.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ContactStoreError> {
        let path = path.as_ref();
        let file_name = path.file_name().ok_or_else(|| {
            ContactStoreError::io(format!(
                "snapshot path '{}' must name a file",
                path.display()
            ))
        })?;
        let directory = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        Ok(Self {
            directory,
            file_name: file_name.to_owned(),
        })
    }

    /// Full path of the snapshot.
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }

    fn open_directory(&self) -> Result<Dir, ContactStoreError> {
        Dir::open_ambient_dir(&self.directory, ambient_authority()).map_err(|error| {
            ContactStoreError::io(format!(
                "open snapshot directory '{}': {error}",
                self.directory.display()
            ))
        })
    }

    fn temporary_name(&self) -> OsString {
        let mut name = self.file_name.clone();
        name.push(".tmp");
        name
    }

    /// Load every row. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`ContactStoreError::Io`] for unreadable files and
    /// [`ContactStoreError::Serialization`] for malformed content.
    pub fn load(&self) -> Result<Vec<Contact>, ContactStoreError> {
        let directory = self.open_directory()?;
        let raw = match directory.read_to_string(Path::new(&self.file_name)) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path().display(), "no contact snapshot yet");
                return Ok(Vec::new());
            }
            Err(error) => {
                return Err(ContactStoreError::io(format!(
                    "read snapshot '{}': {error}",
                    self.path().display()
                )));
            }
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<ContactRow> = serde_json::from_str(&raw).map_err(|error| {
            ContactStoreError::serialization(format!(
                "decode snapshot '{}': {error}",
                self.path().display()
            ))
        })?;
        Ok(rows.into_iter().map(Contact::from).collect())
    }

    /// Replace the snapshot with `contacts`.
    ///
    /// # Errors
    ///
    /// Returns [`ContactStoreError::Serialization`] when encoding fails and
    /// [`ContactStoreError::Io`] when the file cannot be written.
    pub fn save(&self, contacts: &[Contact]) -> Result<(), ContactStoreError> {
        let rows = contacts.iter().map(ContactRow::from).collect::<Vec<_>>();
        let encoded = serde_json::to_vec_pretty(&rows).map_err(|error| {
            ContactStoreError::serialization(format!("encode snapshot: {error}"))
        })?;

        let directory = self.open_directory()?;
        let temporary = self.temporary_name();
        directory
            .write(Path::new(&temporary), encoded)
            .and_then(|()| {
                directory.rename(
                    Path::new(&temporary),
                    &directory,
                    Path::new(&self.file_name),
                )
            })
            .map_err(|error| {
                ContactStoreError::io(format!(
                    "write snapshot '{}': {error}",
                    self.path().display()
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::scratch::ScratchDir;
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};

    const SNAPSHOT: &str = "contacts.json";

    #[fixture]
    fn scratch() -> ScratchDir {
        ScratchDir::new().expect("scratch dir")
    }

    fn snapshot_in(scratch: &ScratchDir) -> SnapshotFile {
        SnapshotFile::new(scratch.path(SNAPSHOT)).expect("snapshot path")
    }

    #[rstest]
    fn bare_file_names_resolve_to_the_working_directory() {
        let file = SnapshotFile::new("contacts.json").expect("file name present");
        assert_eq!(file.path(), PathBuf::from("./contacts.json"));
    }

    #[rstest]
    fn paths_without_file_names_are_rejected() {
        let error = SnapshotFile::new("/").expect_err("root has no file name");
        assert!(matches!(error, ContactStoreError::Io { .. }));
    }

    #[rstest]
    fn missing_snapshot_loads_as_empty(scratch: ScratchDir) {
        assert!(snapshot_in(&scratch).load().expect("load").is_empty());
    }

    #[rstest]
    fn saved_rows_load_back_in_order(scratch: ScratchDir) {
        let file = snapshot_in(&scratch);
        let contacts = vec![
            Contact::new("Ada", "Lovelace", "8095550100", "").with_id(1),
            Contact::new("Grace", "Hopper", "8295550101", "https://img/2").with_id(2),
        ];

        file.save(&contacts).expect("save");
        assert_eq!(file.load().expect("load"), contacts);
        assert!(
            !scratch.exists("contacts.json.tmp"),
            "temporary file is renamed away"
        );
    }

    #[rstest]
    fn snapshots_are_stored_as_a_json_array_of_rows(scratch: ScratchDir) {
        snapshot_in(&scratch)
            .save(&[Contact::new("Ada", "Lovelace", "8095550100", "https://img/ada").with_id(7)])
            .expect("save");

        let written: Value =
            serde_json::from_str(&scratch.read(SNAPSHOT).expect("read snapshot")).expect("json");
        assert_eq!(
            written,
            json!([{
                "id": 7,
                "name": "Ada",
                "last_name": "Lovelace",
                "phone": "8095550100",
                "image_url": "https://img/ada"
            }])
        );
    }

    #[rstest]
    fn malformed_snapshot_is_a_serialization_error(scratch: ScratchDir) {
        scratch.write(SNAPSHOT, b"{not json").expect("seed file");

        let error = snapshot_in(&scratch).load().expect_err("decode must fail");
        assert!(matches!(error, ContactStoreError::Serialization { .. }));
    }
}
