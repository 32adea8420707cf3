//! Flat binary persistence of CSR graphs.
//!
//! Layout (all integers little-endian, no padding):
//!
//! ```text
//! u64 forward_indptr_len
//! u64 forward_indices_len
//! u64 backward_indptr_len
//! u64 backward_indices_len
//! u64[forward_indptr_len]    forward index pointer
//! u32[forward_indices_len]   forward neighbor ids
//! u64[backward_indptr_len]   backward index pointer
//! u32[backward_indices_len]  backward neighbor ids
//! ```
//!
//! [`MappedGraph`] maps a file read-only and hands out a [`Graph`] that borrows
//! the arrays in place. The only array that can land misaligned is the backward
//! index pointer (after an odd number of forward ids); it is copied in that
//! case. Directedness is not recorded in the file and is supplied by the caller.

mod mmap;

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tracing::info;
use zerocopy::byteorder::{LittleEndian, U64};
use zerocopy::{AsBytes, FromBytes, FromZeroes};

use crate::error::GraphError;
use crate::graph::{CsrMatrix, Graph};
use crate::VertexId;

use self::mmap::Mapping;

/// Fixed-size record header.
#[derive(Debug, Clone, Copy, FromZeroes, FromBytes, AsBytes)]
#[repr(C)]
struct Header {
    forward_indptr_len: U64<LittleEndian>,
    forward_indices_len: U64<LittleEndian>,
    backward_indptr_len: U64<LittleEndian>,
    backward_indices_len: U64<LittleEndian>,
}

const HEADER_LEN: usize = core::mem::size_of::<Header>();

/// Writes `graph` to `path` in the flat binary layout, replacing any existing
/// file.
///
/// # Errors
/// Returns [`GraphError::Io`] on write failure.
pub fn save(graph: &Graph<'_>, path: impl AsRef<Path>) -> Result<(), GraphError> {
    let path = path.as_ref();
    let (f, b) = (graph.forward(), graph.backward());
    let header = Header {
        forward_indptr_len: U64::new(f.indptr().len() as u64),
        forward_indices_len: U64::new(f.indices().len() as u64),
        backward_indptr_len: U64::new(b.indptr().len() as u64),
        backward_indices_len: U64::new(b.indices().len() as u64),
    };

    let mut out = BufWriter::new(File::create(path)?);
    out.write_all(header.as_bytes())?;
    write_u64s(&mut out, f.indptr())?;
    write_u32s(&mut out, f.indices())?;
    write_u64s(&mut out, b.indptr())?;
    write_u32s(&mut out, b.indices())?;
    out.flush()?;

    info!(path = %path.display(), vertices = graph.vertex_count(), edges = graph.edge_count(), "saved graph");
    Ok(())
}

/// Reads a graph into owned memory and validates every neighbor id.
///
/// # Errors
/// Returns [`GraphError::Io`] or any decoding/validation error.
pub fn load(path: impl AsRef<Path>, directed: bool) -> Result<Graph<'static>, GraphError> {
    let path = path.as_ref();
    let mut bytes = Vec::new();
    File::open(path)?.read_to_end(&mut bytes)?;
    let graph = decode(&bytes, directed)?.into_owned();
    graph.validate()?;
    info!(path = %path.display(), vertices = graph.vertex_count(), edges = graph.edge_count(), "loaded graph");
    Ok(graph)
}

/// A read-only memory-mapped graph file.
pub struct MappedGraph {
    map: Mapping,
    path: PathBuf,
}

impl MappedGraph {
    /// Maps the file at `path`.
    ///
    /// # Errors
    /// Returns [`GraphError::Io`] if the file cannot be opened or mapped.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let path = path.as_ref().to_path_buf();
        let map = Mapping::open(&File::open(&path)?)?;
        info!(path = %path.display(), bytes = map.as_slice().len(), "mapped graph file");
        Ok(Self { map, path })
    }

    /// The mapped file's path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the mapping in bytes.
    pub fn len_bytes(&self) -> usize {
        self.map.as_slice().len()
    }

    /// Decodes the mapping into a graph borrowing its arrays.
    ///
    /// Only the CSR structure is checked; neighbor ids are range-checked by the
    /// traversal engine as it reads them. Call [`Graph::validate`] for an
    /// up-front O(m) check.
    ///
    /// # Errors
    /// Returns [`GraphError::MalformedRecord`] for truncated or inconsistent
    /// files and the [`Graph::from_csr`] errors.
    pub fn graph(&self, directed: bool) -> Result<Graph<'_>, GraphError> {
        decode(self.map.as_slice(), directed)
    }
}

/// Decodes a complete record.
///
/// # Errors
/// See [`MappedGraph::graph`].
pub fn decode(bytes: &[u8], directed: bool) -> Result<Graph<'_>, GraphError> {
    let header = Header::read_from_prefix(bytes).ok_or_else(|| malformed(format!(
        "{} bytes is shorter than the {HEADER_LEN}-byte header",
        bytes.len()
    )))?;

    let mut cursor = Cursor {
        bytes,
        offset: HEADER_LEN,
    };
    let f_indptr = cursor.take(header.forward_indptr_len.get(), 8, "forward index pointer")?;
    let f_indices = cursor.take(header.forward_indices_len.get(), 4, "forward indices")?;
    let b_indptr = cursor.take(header.backward_indptr_len.get(), 8, "backward index pointer")?;
    let b_indices = cursor.take(header.backward_indices_len.get(), 4, "backward indices")?;
    if cursor.offset != bytes.len() {
        return Err(malformed(format!(
            "{} trailing bytes after the backward indices",
            bytes.len() - cursor.offset
        )));
    }

    let forward = CsrMatrix::from_parts(u64_array(f_indptr), u32_array(f_indices))?;
    let backward = CsrMatrix::from_parts(u64_array(b_indptr), u32_array(b_indices))?;
    Graph::from_csr(forward, backward, directed)
}

struct Cursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, count: u64, width: usize, what: &str) -> Result<&'a [u8], GraphError> {
        let len = usize::try_from(count)
            .ok()
            .and_then(|c| c.checked_mul(width))
            .ok_or_else(|| malformed(format!("{what} length {count} overflows")))?;
        let end = self
            .offset
            .checked_add(len)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| malformed(format!("{what} of {count} entries runs past end of record")))?;
        let out = &self.bytes[self.offset..end];
        self.offset = end;
        Ok(out)
    }
}

fn malformed(reason: String) -> GraphError {
    GraphError::MalformedRecord { reason }
}

fn u64_array(bytes: &[u8]) -> Cow<'_, [u64]> {
    if cfg!(target_endian = "little") {
        if let Some(words) = u64::slice_from(bytes) {
            return Cow::Borrowed(words);
        }
    }
    Cow::Owned(
        bytes
            .chunks_exact(8)
            .map(|c| {
                let mut le = [0u8; 8];
                le.copy_from_slice(c);
                u64::from_le_bytes(le)
            })
            .collect(),
    )
}

fn u32_array(bytes: &[u8]) -> Cow<'_, [VertexId]> {
    if cfg!(target_endian = "little") {
        if let Some(ids) = VertexId::slice_from(bytes) {
            return Cow::Borrowed(ids);
        }
    }
    Cow::Owned(
        bytes
            .chunks_exact(4)
            .map(|c| {
                let mut le = [0u8; 4];
                le.copy_from_slice(c);
                VertexId::from_le_bytes(le)
            })
            .collect(),
    )
}

fn write_u64s(out: &mut impl Write, values: &[u64]) -> std::io::Result<()> {
    if cfg!(target_endian = "little") {
        return out.write_all(values.as_bytes());
    }
    values.iter().try_for_each(|v| out.write_all(&v.to_le_bytes()))
}

fn write_u32s(out: &mut impl Write, values: &[VertexId]) -> std::io::Result<()> {
    if cfg!(target_endian = "little") {
        return out.write_all(values.as_bytes());
    }
    values.iter().try_for_each(|v| out.write_all(&v.to_le_bytes()))
}
