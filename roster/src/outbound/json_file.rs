//! Roster source reading a JSON array of records from a file.

use std::io::Read;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::Record;
use crate::domain::ports::{RosterSource, RosterSourceError};

/// File-backed [`RosterSource`].
///
/// The file must hold a JSON array whose elements deserialise into `R`.
#[derive(Debug, Clone)]
pub struct JsonFileRosterSource<R> {
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R> JsonFileRosterSource<R> {
    /// Read records from `path` on each load.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    /// File read on each load.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_to_string(&self) -> Result<String, RosterSourceError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| RosterSourceError::read("input path must be a file"))?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
            RosterSourceError::read(format!(
                "open input parent directory '{}': {error}",
                parent.display()
            ))
        })?;
        let mut file = directory.open(Path::new(file_name)).map_err(|error| {
            RosterSourceError::read(format!("open input file '{}': {error}", self.path.display()))
        })?;
        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(|error| {
            RosterSourceError::read(format!("read input file '{}': {error}", self.path.display()))
        })?;
        Ok(contents)
    }
}

impl<R> RosterSource<R> for JsonFileRosterSource<R>
where
    R: Record + DeserializeOwned,
{
    fn load(&self) -> Result<Vec<R>, RosterSourceError> {
        let contents = self.read_to_string()?;
        let records: Vec<R> = serde_json::from_str(&contents).map_err(|error| {
            RosterSourceError::parse(format!("{error} ({})", self.path.display()))
        })?;
        debug!(
            path = %self.path.display(),
            kind = %R::KIND,
            count = records.len(),
            "roster batch loaded"
        );
        Ok(records)
    }
}
