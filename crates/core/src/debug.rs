//! DWARF-based resolution of sample addresses to debug annotations.
//!
//! A resolver is built per image binary: the file is parsed with `object`,
//! its DWARF sections loaded through `gimli`, and addresses looked up with
//! `addr2line`. Unresolved debug info is normal and silent: stripped
//! binaries simply yield records with no function, file or line.

use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use addr2line::Context;
use gimli::{EndianRcSlice, RunTimeEndian};
use object::{Object, ObjectSection};
use thiserror::Error;

use crate::xml::XmlWriter;

/// Error type for debug-info resolution.
#[derive(Debug, Error)]
pub enum DebugError {
    /// The image binary could not be read.
    #[error("failed to read image {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The image binary is not a recognized object file.
    #[error("failed to parse image {path}: {source}")]
    Object {
        path: PathBuf,
        #[source]
        source: object::read::Error,
    },

    /// The image's DWARF data could not be loaded.
    #[error("no usable debug info in {path}: {source}")]
    Dwarf {
        path: PathBuf,
        #[source]
        source: gimli::Error,
    },
}

/// Debug annotations for one sampled address.
///
/// A `line` of 0 means unknown and is suppressed from output; empty function
/// and file names are normalized to `None` during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugRecord {
    pub vma: u64,
    pub function: Option<String>,
    pub file: Option<String>,
    pub line: u32,
}

impl DebugRecord {
    /// Emit this record as one `address` element: the optional attributes
    /// first, then the address itself as text content.
    pub fn write_xml<W: Write>(&self, xml: &mut XmlWriter<W>) -> io::Result<()> {
        xml.open_tag("address")?;
        if let Some(file) = &self.file {
            xml.attribute("source-filename", file)?;
        }
        if let Some(function) = &self.function {
            xml.attribute("function", function)?;
        }
        if self.line != 0 {
            xml.attribute("line", &self.line.to_string())?;
        }
        xml.text(&format_vma(self.vma))?;
        xml.close_tag()
    }
}

/// Render an address the way the consuming layer expects: unprefixed
/// lower-case hex, at least eight digits.
pub fn format_vma(vma: u64) -> String {
    format!("{vma:08x}")
}

type DwarfReader = EndianRcSlice<RunTimeEndian>;

/// Resolver for one image's debug info, with a per-address lookup cache.
pub struct DebugResolver {
    ctx: Context<DwarfReader>,
    cache: RefCell<HashMap<u64, DebugRecord>>,
}

impl std::fmt::Debug for DebugResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebugResolver").finish_non_exhaustive()
    }
}

impl DebugResolver {
    /// Build a resolver for the given image binary.
    pub fn for_image(path: &Path) -> Result<Self, DebugError> {
        let data = fs::read(path)
            .map_err(|source| DebugError::Io { path: path.to_path_buf(), source })?;
        let file = object::File::parse(&*data)
            .map_err(|source| DebugError::Object { path: path.to_path_buf(), source })?;

        let endian =
            if file.is_little_endian() { RunTimeEndian::Little } else { RunTimeEndian::Big };

        let load_section = |id: gimli::SectionId| -> Result<DwarfReader, gimli::Error> {
            let data = file
                .section_by_name(id.name())
                .and_then(|section| section.uncompressed_data().ok())
                .unwrap_or(Cow::Borrowed(&[][..]));
            Ok(EndianRcSlice::new(Rc::from(&*data), endian))
        };

        let dwarf = gimli::Dwarf::load(&load_section)
            .map_err(|source| DebugError::Dwarf { path: path.to_path_buf(), source })?;
        let ctx = Context::from_dwarf(dwarf)
            .map_err(|source| DebugError::Dwarf { path: path.to_path_buf(), source })?;

        Ok(Self { ctx, cache: RefCell::new(HashMap::new()) })
    }

    /// Resolve one address to its debug annotations.
    ///
    /// Never fails: whatever the DWARF data cannot provide is simply absent
    /// from the record.
    pub fn resolve(&self, vma: u64) -> DebugRecord {
        if let Some(cached) = self.cache.borrow().get(&vma) {
            return cached.clone();
        }

        let mut record = DebugRecord { vma, function: None, file: None, line: 0 };

        if let Ok(mut frames) = self.ctx.find_frames(vma).skip_all_loads() {
            if let Ok(Some(frame)) = frames.next() {
                record.function = frame
                    .function
                    .and_then(|f| f.demangle().ok().map(|name| name.to_string()))
                    .filter(|name| !name.is_empty());
                if let Some(location) = frame.location {
                    record.file =
                        location.file.map(str::to_string).filter(|file| !file.is_empty());
                    record.line = location.line.unwrap_or(0);
                }
            }
        }

        self.cache.borrow_mut().insert(vma, record.clone());
        record
    }
}
