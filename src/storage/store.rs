//! Per-entity record file
//!
//! A store file is a flat concatenation of fixed-size blocks: no header, no
//! index, no free list. A block's position means nothing; identity lives in
//! the record's id field.
//!
//! - `load_all` reads every full block; a short trailing block is treated as
//!   an interrupted append and dropped
//! - `save_all` replaces the whole file (used for every update)
//! - `append` adds exactly one block (used only for new records)
//!
//! No file handle outlives a call.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use super::codec::{Layout, RecordCodec};
use super::errors::{StorageError, StorageResult};
use crate::observability::{log_event_with_fields, Event};

/// File accessor for one entity kind.
#[derive(Debug, Clone)]
pub struct RecordStore<E> {
    path: PathBuf,
    layout: Layout,
    _entity: PhantomData<fn() -> E>,
}

impl<E: RecordCodec> RecordStore<E> {
    /// Creates a store for `path`. Nothing is opened until the first call.
    pub fn new(path: impl Into<PathBuf>, layout: Layout) -> Self {
        Self {
            path: path.into(),
            layout,
            _entity: PhantomData,
        }
    }

    /// Returns the store file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the block layout.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// `record` as this store would hand it back from `load_all`.
    pub fn stored_form(&self, record: E) -> E {
        record.stored(self.layout)
    }

    /// Size of one block in this store.
    pub fn block_size(&self) -> usize {
        E::block_size(self.layout)
    }

    /// Reads every full block in file order.
    ///
    /// A missing file is an empty collection. A trailing partial block is
    /// dropped with a WARN log line. A full block that fails to decode is
    /// `BOOKVAULT_DATA_CORRUPTION`.
    pub fn load_all(&self) -> StorageResult<Vec<E>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StorageError::read_failed(
                    format!("Failed to open store file: {}", self.path.display()),
                    e,
                ))
            }
        };

        let size = self.block_size();
        let mut reader = BufReader::new(file);
        let mut block = vec![0u8; size];
        let mut records = Vec::new();
        let mut offset: u64 = 0;

        loop {
            let filled = read_block(&mut reader, &mut block).map_err(|e| {
                StorageError::read_failed(
                    format!(
                        "Failed to read {} block at byte {} of {}",
                        E::KIND,
                        offset,
                        self.path.display()
                    ),
                    e,
                )
            })?;

            if filled == 0 {
                break;
            }
            if filled < size {
                self.log_truncated_tail(offset, filled);
                break;
            }

            match E::decode(&block, self.layout) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => break,
                Err(e) => {
                    let offset_str = offset.to_string();
                    log_event_with_fields(
                        Event::StoreCorruption,
                        &[
                            ("kind", E::KIND),
                            ("byte_offset", &offset_str),
                            ("path", &self.path.display().to_string()),
                        ],
                    );
                    return Err(StorageError::corruption_at_offset(
                        &self.path,
                        offset,
                        e.to_string(),
                    ));
                }
            }
            offset += size as u64;
        }

        log_event_with_fields(
            Event::StoreLoaded,
            &[("kind", E::KIND), ("records", &records.len().to_string())],
        );

        Ok(records)
    }

    /// Replaces the file with `records`, in order.
    ///
    /// Written to a sibling temp file, fsynced, then renamed over the store
    /// file, so a crash leaves either the old or the new collection.
    pub fn save_all(&self, records: &[E]) -> StorageResult<()> {
        self.ensure_parent_dir()?;

        let tmp_path = self.tmp_path();
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp_path)
            .map_err(|e| {
                StorageError::write_failed(
                    format!("Failed to create temp file: {}", tmp_path.display()),
                    e,
                )
            })?;

        let mut writer = BufWriter::new(file);
        for record in records {
            writer
                .write_all(&record.encode(self.layout))
                .map_err(|e| {
                    StorageError::write_failed(
                        format!("Failed to write {} records: {}", E::KIND, tmp_path.display()),
                        e,
                    )
                })?;
        }

        let file = writer.into_inner().map_err(|e| {
            StorageError::write_failed(
                format!("Failed to flush temp file: {}", tmp_path.display()),
                e.into_error(),
            )
        })?;

        file.sync_all().map_err(|e| {
            StorageError::write_failed(
                format!("fsync failed for temp file: {}", tmp_path.display()),
                e,
            )
        })?;
        drop(file);

        fs::rename(&tmp_path, &self.path).map_err(|e| {
            StorageError::write_failed(
                format!(
                    "Failed to replace {} with {}",
                    self.path.display(),
                    tmp_path.display()
                ),
                e,
            )
        })?;

        self.sync_parent_dir()?;

        log_event_with_fields(
            Event::StoreRewritten,
            &[("kind", E::KIND), ("records", &records.len().to_string())],
        );

        Ok(())
    }

    /// Appends one record to the end of the file, creating it if needed.
    ///
    /// A partial trailing block left by an interrupted append is cut off
    /// first, so the new block starts on a block boundary.
    pub fn append(&self, record: &E) -> StorageResult<()> {
        self.ensure_parent_dir()?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                StorageError::write_failed(
                    format!("Failed to open store file: {}", self.path.display()),
                    e,
                )
            })?;

        let len = file
            .metadata()
            .map_err(|e| StorageError::io_error("Failed to read store file metadata", e))?
            .len();
        let size = self.block_size() as u64;
        let partial = len % size;
        if partial != 0 {
            let aligned_len = len - partial;
            self.log_truncated_tail(aligned_len, partial as usize);
            file.set_len(aligned_len).map_err(|e| {
                StorageError::write_failed(
                    format!("Failed to cut partial block from {}", self.path.display()),
                    e,
                )
            })?;
        }

        file.write_all(&record.encode(self.layout)).map_err(|e| {
            StorageError::write_failed(
                format!("Failed to append {} record: {}", E::KIND, self.path.display()),
                e,
            )
        })?;

        file.sync_all().map_err(|e| {
            StorageError::write_failed(
                format!("fsync failed after append: {}", self.path.display()),
                e,
            )
        })?;

        log_event_with_fields(Event::StoreAppended, &[("kind", E::KIND)]);

        Ok(())
    }

    /// Number of full blocks currently on disk.
    pub fn record_count(&self) -> StorageResult<u64> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len() / self.block_size() as u64),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(StorageError::io_error(
                format!("Failed to read metadata: {}", self.path.display()),
                e,
            )),
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn ensure_parent_dir(&self) -> StorageResult<()> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
                fs::create_dir_all(dir).map_err(|e| {
                    StorageError::write_failed(
                        format!("Failed to create data directory: {}", dir.display()),
                        e,
                    )
                })
            }
            _ => Ok(()),
        }
    }

    #[cfg(unix)]
    fn sync_parent_dir(&self) -> StorageResult<()> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let handle = File::open(dir).map_err(|e| {
            StorageError::io_error(
                format!("Failed to open data directory for fsync: {}", dir.display()),
                e,
            )
        })?;
        handle.sync_all().map_err(|e| {
            StorageError::io_error(
                format!("Failed to fsync data directory: {}", dir.display()),
                e,
            )
        })
    }

    #[cfg(not(unix))]
    fn sync_parent_dir(&self) -> StorageResult<()> {
        Ok(())
    }

    fn log_truncated_tail(&self, offset: u64, bytes: usize) {
        log_event_with_fields(
            Event::StoreTruncatedTail,
            &[
                ("kind", E::KIND),
                ("byte_offset", &offset.to_string()),
                ("bytes", &bytes.to_string()),
                ("path", &self.path.display().to_string()),
            ],
        );
    }
}

/// Fills `buf` from `reader`, stopping early only at end of file.
///
/// Returns the number of bytes read.
fn read_block<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
