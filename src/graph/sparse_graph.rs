//! Immutable graphs stored as a forward and a backward CSR matrix.
//!
//! The forward matrix holds out-neighbors, the backward matrix in-neighbors.
//! For undirected graphs every edge is stored in both directions and the two
//! matrices are identical.

use crate::error::GraphError;
use crate::graph::csr::CsrMatrix;
use crate::VertexId;

/// Largest supported vertex count; `VertexId::MAX` is reserved as a sentinel.
pub const MAX_VERTICES: usize = VertexId::MAX as usize;

/// An immutable sparse graph with dense vertex ids `0..vertex_count()`.
///
/// `Graph<'static>` owns its storage; a `Graph<'a>` may borrow it zero-copy from
/// a [`MappedGraph`](crate::graph::persistence::MappedGraph).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph<'a> {
    forward: CsrMatrix<'a>,
    backward: CsrMatrix<'a>,
    directed: bool,
    edge_count: usize,
}

impl Graph<'static> {
    /// Builds a graph from parallel source/destination arrays.
    ///
    /// Duplicate edges are collapsed. Undirected graphs store each edge in both
    /// directions; a self-loop is stored once.
    ///
    /// # Errors
    /// - [`GraphError::LengthMismatch`] if the arrays differ in length
    /// - [`GraphError::TooManyVertices`] if `vertex_count > MAX_VERTICES`
    /// - [`GraphError::VertexOutOfRange`] if an endpoint is `>= vertex_count`
    pub fn from_edges(
        sources: &[VertexId],
        destinations: &[VertexId],
        vertex_count: usize,
        directed: bool,
    ) -> Result<Self, GraphError> {
        if sources.len() != destinations.len() {
            return Err(GraphError::LengthMismatch {
                sources: sources.len(),
                destinations: destinations.len(),
            });
        }
        if vertex_count > MAX_VERTICES {
            return Err(GraphError::TooManyVertices {
                vertex_count,
                max: MAX_VERTICES,
            });
        }
        if let Some(&bad) = sources
            .iter()
            .chain(destinations)
            .find(|&&v| v as usize >= vertex_count)
        {
            return Err(GraphError::VertexOutOfRange {
                vertex: u64::from(bad),
                vertex_count,
            });
        }

        let mut pairs: Vec<(VertexId, VertexId)> = sources
            .iter()
            .copied()
            .zip(destinations.iter().copied())
            .collect();
        if !directed {
            pairs.extend(destinations.iter().copied().zip(sources.iter().copied()));
        }
        let forward = matrix_from_pairs(pairs.clone(), vertex_count)?;

        let (backward, edge_count) = if directed {
            let reversed = pairs.into_iter().map(|(s, d)| (d, s)).collect();
            let backward = matrix_from_pairs(reversed, vertex_count)?;
            let edges = forward.nnz();
            (backward, edges)
        } else {
            let loops = count_self_loops(&forward);
            let edges = (forward.nnz() + loops) / 2;
            (forward.clone(), edges)
        };

        Ok(Self {
            forward,
            backward,
            directed,
            edge_count,
        })
    }

    /// Builds a graph from `(source, destination)` pairs.
    ///
    /// # Errors
    /// See [`from_edges`](Self::from_edges).
    pub fn from_edge_pairs(
        edges: &[(VertexId, VertexId)],
        vertex_count: usize,
        directed: bool,
    ) -> Result<Self, GraphError> {
        let (sources, destinations): (Vec<_>, Vec<_>) = edges.iter().copied().unzip();
        Self::from_edges(&sources, &destinations, vertex_count, directed)
    }
}

impl<'a> Graph<'a> {
    /// Assembles a graph from prebuilt forward and backward matrices.
    ///
    /// Column ids are not range-checked here (that is O(m)); call
    /// [`validate`](Self::validate) when the matrices come from an untrusted
    /// source. The traversal engine re-checks every id it reads regardless.
    ///
    /// # Errors
    /// - [`GraphError::VertexCountMismatch`] if the matrices differ in dimension
    /// - [`GraphError::EdgeCountMismatch`] if they differ in stored entries
    /// - [`GraphError::TooManyVertices`] if the dimension exceeds `MAX_VERTICES`
    pub fn from_csr(
        forward: CsrMatrix<'a>,
        backward: CsrMatrix<'a>,
        directed: bool,
    ) -> Result<Self, GraphError> {
        if forward.dim() != backward.dim() {
            return Err(GraphError::VertexCountMismatch {
                forward: forward.dim(),
                backward: backward.dim(),
            });
        }
        if forward.nnz() != backward.nnz() {
            return Err(GraphError::EdgeCountMismatch {
                forward: forward.nnz(),
                backward: backward.nnz(),
            });
        }
        if forward.dim() > MAX_VERTICES {
            return Err(GraphError::TooManyVertices {
                vertex_count: forward.dim(),
                max: MAX_VERTICES,
            });
        }
        let edge_count = if directed {
            forward.nnz()
        } else {
            (forward.nnz() + count_self_loops(&forward)) / 2
        };
        Ok(Self {
            forward,
            backward,
            directed,
            edge_count,
        })
    }

    /// Checks every stored column id of both matrices.
    ///
    /// # Errors
    /// See [`CsrMatrix::validate_indices`].
    pub fn validate(&self) -> Result<(), GraphError> {
        self.forward.validate_indices()?;
        self.backward.validate_indices()
    }

    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.forward.dim()
    }

    /// Number of edges; an undirected edge counts once.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Whether edges are directed.
    #[inline]
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Out-neighbors of `v`, ascending.
    ///
    /// # Panics
    /// Panics if `v >= vertex_count()`.
    #[inline]
    pub fn out_neighbors(&self, v: VertexId) -> &[VertexId] {
        self.forward.row(v)
    }

    /// In-neighbors of `v`, ascending.
    ///
    /// # Panics
    /// Panics if `v >= vertex_count()`.
    #[inline]
    pub fn in_neighbors(&self, v: VertexId) -> &[VertexId] {
        self.backward.row(v)
    }

    /// Alias of [`out_neighbors`](Self::out_neighbors).
    #[inline]
    pub fn neighbors(&self, v: VertexId) -> &[VertexId] {
        self.out_neighbors(v)
    }

    /// Out-degree of `v`.
    #[inline]
    pub fn out_degree(&self, v: VertexId) -> usize {
        self.out_neighbors(v).len()
    }

    /// In-degree of `v`.
    #[inline]
    pub fn in_degree(&self, v: VertexId) -> usize {
        self.in_neighbors(v).len()
    }

    /// Returns `true` if the edge `u -> v` exists (either direction when
    /// undirected).
    ///
    /// Searches whichever of `u`'s out-row and `v`'s in-row is shorter.
    pub fn has_edge(&self, u: VertexId, v: VertexId) -> bool {
        match (self.forward.try_row(u), self.backward.try_row(v)) {
            (Some(out), Some(inc)) if inc.len() > out.len() => out.binary_search(&v).is_ok(),
            (Some(_), Some(inc)) => inc.binary_search(&u).is_ok(),
            _ => false,
        }
    }

    /// Iterates edges as `(source, destination)`.
    ///
    /// Undirected edges are reported once with `source <= destination`.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        let directed = self.directed;
        (0..self.vertex_count() as VertexId).flat_map(move |u| {
            self.forward
                .row(u)
                .iter()
                .copied()
                .filter(move |&v| directed || u <= v)
                .map(move |v| (u, v))
        })
    }

    /// The forward (out-neighbor) matrix.
    #[inline]
    pub fn forward(&self) -> &CsrMatrix<'a> {
        &self.forward
    }

    /// The backward (in-neighbor) matrix.
    #[inline]
    pub fn backward(&self) -> &CsrMatrix<'a> {
        &self.backward
    }

    /// Copies any borrowed storage so the graph no longer borrows.
    pub fn into_owned(self) -> Graph<'static> {
        Graph {
            forward: self.forward.into_owned(),
            backward: self.backward.into_owned(),
            directed: self.directed,
            edge_count: self.edge_count,
        }
    }
}

impl std::fmt::Display for Graph<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.directed { "directed" } else { "undirected" };
        write!(f, "({}, {}) {kind} graph", self.vertex_count(), self.edge_count())
    }
}

fn matrix_from_pairs(
    mut pairs: Vec<(VertexId, VertexId)>,
    n: usize,
) -> Result<CsrMatrix<'static>, GraphError> {
    sort_pairs(&mut pairs);
    pairs.dedup();
    let (rows, cols): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
    CsrMatrix::from_sorted_pairs(&rows, &cols, n)
}

#[cfg(feature = "parallel")]
fn sort_pairs(pairs: &mut [(VertexId, VertexId)]) {
    use rayon::slice::ParallelSliceMut;
    pairs.par_sort_unstable();
}

#[cfg(not(feature = "parallel"))]
fn sort_pairs(pairs: &mut [(VertexId, VertexId)]) {
    pairs.sort_unstable();
}

fn count_self_loops(m: &CsrMatrix<'_>) -> usize {
    (0..m.dim() as VertexId)
        .filter(|&v| m.contains(v, v))
        .count()
}
