//! Directory-backed discovery of sessions, their per-event data, and the
//! sampled images recorded under them.
//!
//! Store layout, as produced by the recording profiler:
//!
//! ```text
//! <samples-dir>/<session-name>/<event-name>/<image>.json
//! ```
//!
//! Each image file is a JSON document carrying the sampled binary's path and
//! its raw samples. Discovery reads only the image names; sample bodies are
//! loaded on demand by the queries that need them. The store is read-only to
//! this crate.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Deserialize;
use thiserror::Error;

/// The distinguished session name always surfaced first in grouped output.
pub const DEFAULT_SESSION_NAME: &str = "current";

/// Error type for sample-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying filesystem error while reading the store.
    #[error("failed to read sample store at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A sample file exists but does not decode.
    #[error("malformed sample file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// One raw sample: a virtual address and how many hits it collected.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct Sample {
    pub vma: u64,
    pub count: u32,
}

/// On-disk shape of one image's sample file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SampleFile {
    /// Path of the sampled binary, as recorded by the profiler.
    pub image: String,
    /// Samples in the order the recorder wrote them (nominally
    /// address-ordered upstream; not re-sorted here).
    pub samples: Vec<Sample>,
}

impl SampleFile {
    /// Load and decode one sample file.
    pub fn load(path: &Path) -> StoreResult<Self> {
        let body = fs::read_to_string(path)
            .map_err(|source| StoreError::Io { path: path.to_path_buf(), source })?;
        serde_json::from_str(&body)
            .map_err(|source| StoreError::Malformed { path: path.to_path_buf(), source })
    }
}

/// One sampled binary under a (session, event) pair.
///
/// Discovery keeps only the image name (the filter key) and the backing
/// file path; the sample body is re-read when a query actually needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileImage {
    /// Binary path as recorded by the profiler.
    pub name: String,
    /// Sample file backing this image.
    pub path: PathBuf,
}

impl ProfileImage {
    /// Load this image's samples from its backing file.
    pub fn load_samples(&self) -> StoreResult<Vec<Sample>> {
        Ok(SampleFile::load(&self.path)?.samples)
    }
}

/// The data recorded for one (session, event) pair.
///
/// Carries its owning session's name because grouping orders entries by
/// session name, never by event name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEvent {
    /// Owning session's name.
    pub session: String,
    /// Event name (the grouping key).
    pub event: String,
    /// Images in discovery order.
    pub images: Vec<ProfileImage>,
}

/// A named collection of recorded profiling runs grouped by event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub name: String,
    pub events: Vec<SessionEvent>,
}

impl Session {
    /// Look up this session's data for one event name.
    ///
    /// `None` means the event was never recorded in this session, which is a
    /// user-facing error for model-data. An event that exists with an empty
    /// image list is a normal empty result, not `None`.
    pub fn event(&self, name: &str) -> Option<&SessionEvent> {
        self.events.iter().find(|e| e.event == name)
    }
}

/// Read-only view over the sample-store directory tree.
pub struct SampleStore {
    root: PathBuf,
}

impl SampleStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Discover every session in the store, in name order.
    ///
    /// A missing store root is an empty store, not an error.
    pub fn sessions(&self) -> StoreResult<Vec<Session>> {
        if !self.root.is_dir() {
            debug!("sample store {} does not exist; no sessions", self.root.display());
            return Ok(Vec::new());
        }

        let mut sessions = Vec::new();
        for entry in sorted_entries(&self.root)? {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            sessions.push(self.load_session(&name, &path)?);
        }
        Ok(sessions)
    }

    /// Load one session by name, or `None` if it was never recorded.
    pub fn session(&self, name: &str) -> StoreResult<Option<Session>> {
        let dir = self.root.join(name);
        if !dir.is_dir() {
            return Ok(None);
        }
        Ok(Some(self.load_session(name, &dir)?))
    }

    fn load_session(&self, name: &str, dir: &Path) -> StoreResult<Session> {
        let mut events = Vec::new();
        for event_entry in sorted_entries(dir)? {
            let event_dir = event_entry.path();
            if !event_dir.is_dir() {
                continue;
            }
            let event = event_entry.file_name().to_string_lossy().to_string();

            let mut images = Vec::new();
            for image_entry in sorted_entries(&event_dir)? {
                let path = image_entry.path();
                if !path.is_file() {
                    continue;
                }
                match SampleFile::load(&path) {
                    Ok(file) => images.push(ProfileImage { name: file.image, path }),
                    Err(err) => warn!("skipping unreadable sample file: {err}"),
                }
            }

            events.push(SessionEvent { session: name.to_string(), event, images });
        }

        debug!("session {name}: {} events", events.len());
        Ok(Session { name: name.to_string(), events })
    }
}

/// Directory entries sorted by file name, so discovery order is stable
/// across platforms.
fn sorted_entries(dir: &Path) -> StoreResult<Vec<fs::DirEntry>> {
    let entries = fs::read_dir(dir)
        .map_err(|source| StoreError::Io { path: dir.to_path_buf(), source })?;
    let mut entries: Vec<fs::DirEntry> = entries
        .collect::<Result<_, io::Error>>()
        .map_err(|source| StoreError::Io { path: dir.to_path_buf(), source })?;
    entries.sort_by_key(|e| e.file_name());
    Ok(entries)
}
