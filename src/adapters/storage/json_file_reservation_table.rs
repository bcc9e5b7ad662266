//! File-based Reservation Table Adapter
//!
//! Stores the manual reservation table as a single pretty-printed JSON
//! object mapping port numbers to records. Every save replaces the whole
//! file: the new content goes to a sibling `.tmp` file, is flushed to
//! disk, then renamed over the old file.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::ports::{ReservationTable, ReservationTableError, Reservations};

/// JSON file storage for the reservation table
#[derive(Debug, Clone)]
pub struct JsonFileReservationTable {
    path: PathBuf,
}

impl JsonFileReservationTable {
    /// Create a table backed by the file at `path`
    ///
    /// The file and its parent directory are created on first save.
    ///
    /// # Example
    /// ```ignore
    /// let table = JsonFileReservationTable::new("/data/reservations.json");
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn ensure_parent_dir(&self) -> Result<(), ReservationTableError> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
                .await
                .map_err(|e| ReservationTableError::IoError(e.to_string())),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl ReservationTable for JsonFileReservationTable {
    async fn load(&self) -> Result<Reservations, ReservationTableError> {
        let json = match fs::read_to_string(&self.path).await {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "No reservation file yet, starting empty");
                return Ok(Reservations::new());
            }
            Err(e) => return Err(ReservationTableError::IoError(e.to_string())),
        };

        if json.trim().is_empty() {
            return Ok(Reservations::new());
        }

        let mut reservations: Reservations = serde_json::from_str(&json)
            .map_err(|e| ReservationTableError::DeserializationFailed(e.to_string()))?;

        // The key is authoritative for the port number.
        for (port, record) in reservations.iter_mut() {
            record.port = *port;
        }

        tracing::debug!(
            path = %self.path.display(),
            count = reservations.len(),
            "Loaded reservation table"
        );
        Ok(reservations)
    }

    async fn save(&self, reservations: &Reservations) -> Result<(), ReservationTableError> {
        self.ensure_parent_dir().await?;

        let json = serde_json::to_string_pretty(reservations)
            .map_err(|e| ReservationTableError::SerializationFailed(e.to_string()))?;

        let temp_path = self.temp_path();
        if let Err(e) = write_and_replace(&temp_path, &self.path, json.as_bytes()).await {
            if let Err(cleanup) = fs::remove_file(&temp_path).await {
                if cleanup.kind() != ErrorKind::NotFound {
                    tracing::warn!(
                        path = %temp_path.display(),
                        error = %cleanup,
                        "Could not remove temporary reservation file"
                    );
                }
            }
            return Err(ReservationTableError::IoError(e.to_string()));
        }

        Ok(())
    }
}

async fn write_and_replace(temp_path: &Path, path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(temp_path).await?;
    file.write_all(contents).await?;
    file.sync_all().await?;
    drop(file);
    fs::rename(temp_path, path).await
}
