//! File-backed storage implementation.
//!
//! Keeps the working set in memory (same ordered map as
//! [`MemoryStorage`](crate::storage::memory::MemoryStorage)) and persists it
//! as a single snapshot file with a checksummed header. Snapshots are
//! written to a temporary file and renamed into place, so a crash mid-write
//! leaves the previous snapshot intact.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use parking_lot::RwLock;

use crate::error::Result;
use crate::storage::memory::apply_batch;
use crate::storage::traits::{
    KeyScan, Storage, StorageConfig, StorageError, WriteBatch, decode_counter, encode_counter,
};

/// Snapshot file magic bytes.
const SNAPSHOT_MAGIC: &[u8; 4] = b"SEDG";

/// Snapshot format version.
const SNAPSHOT_VERSION: u32 = 1;

/// Snapshot file name inside the storage directory.
const SNAPSHOT_FILE: &str = "sedge.snap";

/// A file-backed ordered key-value storage implementation.
#[derive(Debug)]
pub struct FileStorage {
    /// Directory holding the snapshot file.
    dir: PathBuf,
    /// The entries, ordered by key.
    entries: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
    /// Storage configuration.
    config: StorageConfig,
    /// Whether the storage is closed.
    closed: bool,
}

impl FileStorage {
    /// Open (or create) a file storage rooted at `dir`.
    ///
    /// An existing snapshot in `dir` is loaded and verified; a missing
    /// snapshot starts the store empty.
    pub fn open<P: AsRef<Path>>(dir: P, config: StorageConfig) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        let snapshot_path = dir.join(SNAPSHOT_FILE);
        let entries = if snapshot_path.exists() {
            load_snapshot(&snapshot_path, config.buffer_size)?
        } else {
            BTreeMap::new()
        };

        Ok(FileStorage {
            dir,
            entries: Arc::new(RwLock::new(entries)),
            config,
            closed: false,
        })
    }

    /// Path of the snapshot file.
    pub fn snapshot_path(&self) -> PathBuf {
        self.dir.join(SNAPSHOT_FILE)
    }

    /// Check if the storage is closed.
    fn check_closed(&self) -> Result<()> {
        if self.closed {
            Err(StorageError::StorageClosed.into())
        } else {
            Ok(())
        }
    }

    /// Write the current entries to the snapshot file.
    fn persist(&self, entries: &BTreeMap<String, Vec<u8>>) -> Result<()> {
        let tmp_path = self.dir.join(format!("{SNAPSHOT_FILE}.tmp"));
        write_snapshot(&tmp_path, entries, self.config.buffer_size)?;
        fs::rename(&tmp_path, self.snapshot_path())?;
        Ok(())
    }
}

fn write_snapshot(
    path: &Path,
    entries: &BTreeMap<String, Vec<u8>>,
    buffer_size: usize,
) -> Result<()> {
    let payload = bincode::serialize(entries)?;
    let checksum = crc32fast::hash(&payload);

    let file = File::create(path)?;
    let mut writer = BufWriter::with_capacity(buffer_size, file);
    writer.write_all(SNAPSHOT_MAGIC)?;
    writer.write_u32::<LittleEndian>(SNAPSHOT_VERSION)?;
    writer.write_u32::<LittleEndian>(checksum)?;
    writer.write_u64::<LittleEndian>(payload.len() as u64)?;
    writer.write_all(&payload)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

fn load_snapshot(path: &Path, buffer_size: usize) -> Result<BTreeMap<String, Vec<u8>>> {
    let file = File::open(path)?;
    let mut reader = BufReader::with_capacity(buffer_size, file);

    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if &magic != SNAPSHOT_MAGIC {
        return Err(StorageError::CorruptSnapshot(format!(
            "bad magic in {}",
            path.display()
        ))
        .into());
    }

    let version = reader.read_u32::<LittleEndian>()?;
    if version != SNAPSHOT_VERSION {
        return Err(StorageError::CorruptSnapshot(format!(
            "unsupported snapshot version {version}"
        ))
        .into());
    }

    let checksum = reader.read_u32::<LittleEndian>()?;
    let payload_len = reader.read_u64::<LittleEndian>()? as usize;
    let mut payload = vec![0u8; payload_len];
    reader.read_exact(&mut payload)?;

    if crc32fast::hash(&payload) != checksum {
        return Err(StorageError::CorruptSnapshot(format!(
            "checksum mismatch in {}",
            path.display()
        ))
        .into());
    }

    Ok(bincode::deserialize(&payload)?)
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.check_closed()?;
        Ok(self.entries.read().get(key).cloned())
    }

    fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    fn scan_prefix(&self, prefix: &str) -> Result<KeyScan> {
        self.check_closed()?;

        let entries = self.entries.read();
        let snapshot: Vec<(String, Vec<u8>)> = entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(KeyScan::new(snapshot))
    }

    fn write(&self, batch: WriteBatch) -> Result<()> {
        self.check_closed()?;

        let mut entries = self.entries.write();
        apply_batch(&mut entries, &batch)?;

        if self.config.sync_writes {
            self.persist(&entries)?;
        }
        Ok(())
    }

    fn increment(&self, key: &str, delta: i64) -> Result<i64> {
        self.check_closed()?;

        let mut entries = self.entries.write();
        let current = match entries.get(key) {
            Some(bytes) => decode_counter(key, bytes)?,
            None => 0,
        };
        let next = current + delta;
        entries.insert(key.to_string(), encode_counter(next));

        if self.config.sync_writes {
            self.persist(&entries)?;
        }
        Ok(next)
    }

    fn counter(&self, key: &str) -> Result<i64> {
        self.check_closed()?;

        match self.entries.read().get(key) {
            Some(bytes) => decode_counter(key, bytes),
            None => Ok(0),
        }
    }

    fn sync(&self) -> Result<()> {
        self.check_closed()?;

        let entries = self.entries.read();
        self.persist(&entries)
    }

    fn close(&mut self) -> Result<()> {
        if !self.closed {
            let entries = self.entries.read();
            self.persist(&entries)?;
            drop(entries);
            self.closed = true;
        }
        Ok(())
    }
}
