//! Immutable CSR (compressed sparse row) adjacency matrices.
//!
//! Memory layout:
//! - `indptr`: `u64` row offsets of length `n + 1`
//! - `indices`: flat `u32` column ids, ascending within each row
//!
//! Both arrays are `Cow`s so a matrix can either own its storage or borrow it
//! zero-copy from a memory-mapped file.
//!
//! ### Performance Characteristics
//! | Operation | Complexity | Notes |
//! |-----------|------------|-------|
//! | `from_sorted_pairs` | \(O(n + m)\) | Single scan over sorted row ids |
//! | `from_parts` | \(O(n)\) | Structural checks only |
//! | `validate_indices` | \(O(m)\) | Range and per-row ordering |
//! | `row` | \(O(1)\) | Slice into `indices` |
//! | `contains` | \(O(\log \text{degree})\) | Binary search in the row |

use std::borrow::Cow;

use crate::error::GraphError;
use crate::VertexId;

/// One direction of a graph's adjacency in CSR form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrMatrix<'a> {
    indptr: Cow<'a, [u64]>,
    indices: Cow<'a, [VertexId]>,
}

impl<'a> CsrMatrix<'a> {
    /// Wraps existing CSR arrays after checking their structure.
    ///
    /// Checks that `indptr` is non-empty, starts at zero, never decreases, and
    /// ends at `indices.len()`. Column ids are not inspected; use
    /// [`validate_indices`](Self::validate_indices) for that.
    ///
    /// # Errors
    /// Returns [`GraphError::MalformedIndptr`] when the layout is inconsistent.
    pub fn from_parts(
        indptr: impl Into<Cow<'a, [u64]>>,
        indices: impl Into<Cow<'a, [VertexId]>>,
    ) -> Result<Self, GraphError> {
        let indptr = indptr.into();
        let indices = indices.into();

        let malformed = |reason: String| GraphError::MalformedIndptr { reason };
        let (&first, &last) = match (indptr.first(), indptr.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(malformed("index pointer must have length n + 1 >= 1".into())),
        };
        if first != 0 {
            return Err(malformed(format!("first offset is {first}, expected 0")));
        }
        if let Some(row) = indptr.windows(2).position(|w| w[0] > w[1]) {
            return Err(malformed(format!("offsets decrease at row {row}")));
        }
        if last != indices.len() as u64 {
            return Err(malformed(format!(
                "last offset is {last} but there are {} indices",
                indices.len()
            )));
        }
        Ok(Self { indptr, indices })
    }

    /// Number of rows (vertices).
    #[inline]
    pub fn dim(&self) -> usize {
        self.indptr.len() - 1
    }

    /// Number of stored entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// The index-pointer array.
    #[inline]
    pub fn indptr(&self) -> &[u64] {
        &self.indptr
    }

    /// The flat column-index array.
    #[inline]
    pub fn indices(&self) -> &[VertexId] {
        &self.indices
    }

    /// Returns the entries of row `v` in ascending order.
    ///
    /// # Panics
    /// Panics if `v >= dim()`.
    #[inline]
    pub fn row(&self, v: VertexId) -> &[VertexId] {
        let v = v as usize;
        assert!(v < self.dim(), "row {v} out of bounds for {} rows", self.dim());
        // Offsets are bounded by `indices.len()` (checked in `from_parts`), so
        // they fit in `usize`.
        let start = self.indptr[v] as usize;
        let end = self.indptr[v + 1] as usize;
        &self.indices[start..end]
    }

    /// Returns the entries of row `v`, or `None` if `v` is not a row.
    #[inline]
    pub fn try_row(&self, v: VertexId) -> Option<&[VertexId]> {
        ((v as usize) < self.dim()).then(|| self.row(v))
    }

    /// Returns `true` if row `r` stores column `c`.
    pub fn contains(&self, r: VertexId, c: VertexId) -> bool {
        self.try_row(r)
            .is_some_and(|row| row.binary_search(&c).is_ok())
    }

    /// Checks that every column id is a valid row id and that each row is
    /// strictly ascending.
    ///
    /// # Errors
    /// Returns [`GraphError::VertexOutOfRange`] or [`GraphError::UnsortedInput`].
    pub fn validate_indices(&self) -> Result<(), GraphError> {
        let n = self.dim();
        if let Some(&bad) = self.indices.iter().find(|&&c| c as usize >= n) {
            return Err(GraphError::VertexOutOfRange {
                vertex: u64::from(bad),
                vertex_count: n,
            });
        }
        for v in 0..n {
            let start = self.indptr[v] as usize;
            let row = &self.indices[start..self.indptr[v + 1] as usize];
            if let Some(i) = row.windows(2).position(|w| w[0] >= w[1]) {
                return Err(GraphError::UnsortedInput {
                    position: start + i + 1,
                });
            }
        }
        Ok(())
    }

    /// Copies any borrowed storage so the matrix no longer borrows.
    pub fn into_owned(self) -> CsrMatrix<'static> {
        CsrMatrix {
            indptr: Cow::Owned(self.indptr.into_owned()),
            indices: Cow::Owned(self.indices.into_owned()),
        }
    }
}

impl CsrMatrix<'static> {
    /// Builds a matrix with `n` rows from `(row, col)` pairs sorted by row, then
    /// column.
    ///
    /// Offsets are produced by one scan over the row ids; rows with no entries
    /// carry the previous offset forward.
    ///
    /// # Errors
    /// - [`GraphError::LengthMismatch`] if `rows` and `cols` differ in length
    /// - [`GraphError::VertexOutOfRange`] if any id is `>= n`
    /// - [`GraphError::UnsortedInput`] if the pairs are not strictly ascending
    pub fn from_sorted_pairs(
        rows: &[VertexId],
        cols: &[VertexId],
        n: usize,
    ) -> Result<Self, GraphError> {
        if rows.len() != cols.len() {
            return Err(GraphError::LengthMismatch {
                sources: rows.len(),
                destinations: cols.len(),
            });
        }
        if let Some(&bad) = rows.iter().chain(cols).find(|&&v| v as usize >= n) {
            return Err(GraphError::VertexOutOfRange {
                vertex: u64::from(bad),
                vertex_count: n,
            });
        }
        if let Some(i) = (1..rows.len()).find(|&i| (rows[i - 1], cols[i - 1]) >= (rows[i], cols[i])) {
            return Err(GraphError::UnsortedInput { position: i });
        }

        let mut indptr = Vec::with_capacity(n + 1);
        indptr.push(0u64);
        let mut current = 0usize;
        for (i, &r) in rows.iter().enumerate() {
            while current < r as usize {
                indptr.push(i as u64);
                current += 1;
            }
        }
        indptr.resize(n + 1, rows.len() as u64);

        Ok(Self {
            indptr: Cow::Owned(indptr),
            indices: Cow::Owned(cols.to_vec()),
        })
    }
}
