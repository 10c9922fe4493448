//! Roster settings loaded via OrthoConfig.
//!
//! Values come from `ROSTER_*` environment variables, configuration files
//! and command-line flags, in OrthoConfig's usual precedence.

use std::path::{Path, PathBuf};

use ortho_config::OrthoConfig;
use pagination::{DEFAULT_PAGE_SIZE, PageSize, PaginationError};
use serde::Deserialize;

/// Settings shared by roster views and the batch validation tool.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ROSTER")]
pub struct RosterSettings {
    /// Records shown per page.
    #[ortho_config(default = 10)]
    pub page_size: usize,
    /// JSON file holding the records already stored, used as the baseline
    /// for duplicate detection when validating uploads.
    pub existing_roster_path: Option<PathBuf>,
}

impl RosterSettings {
    /// Validated page size.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::ZeroPageSize`] when the configured size is
    /// zero.
    pub fn page_size(&self) -> Result<PageSize, PaginationError> {
        PageSize::new(self.page_size)
    }

    /// Configured baseline roster, if any.
    pub fn existing_roster_path(&self) -> Option<&Path> {
        self.existing_roster_path.as_deref()
    }
}

impl Default for RosterSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            existing_roster_path: None,
        }
    }
}
