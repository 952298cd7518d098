//! Dense travel matrix.

use crate::models::Customer;

/// A dense n×n matrix of costs or travel times in row-major order.
///
/// Index 0 is the depot when the matrix feeds
/// [`CustomerGraph::from_matrices`](super::CustomerGraph::from_matrices).
///
/// # Examples
///
/// ```
/// use u_colgen::graph::TravelMatrix;
///
/// let m = TravelMatrix::from_rows(vec![
///     vec![0.0, 4.0],
///     vec![6.0, 0.0],
/// ])
/// .unwrap();
/// assert_eq!(m.get(0, 1), 4.0);
/// assert_eq!(m.get(1, 0), 6.0);
/// assert_eq!(m.size(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TravelMatrix {
    data: Vec<f64>,
    size: usize,
}

impl TravelMatrix {
    /// Creates a zero matrix.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Euclidean distances between located customers, in slice order.
    pub fn euclidean(locations: &[&Customer]) -> Self {
        let n = locations.len();
        let mut m = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = locations[i].distance_to(locations[j].x(), locations[j].y());
                m.set(i, j, d);
                m.set(j, i, d);
            }
        }
        m
    }

    /// Builds a matrix from square rows.
    ///
    /// Returns `None` if the rows do not form a square.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|r| r.len() != size) {
            return None;
        }
        Some(Self {
            data: rows.into_iter().flatten().collect(),
            size,
        })
    }

    /// Entry for `from → to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Overwrites the entry for `from → to`.
    pub fn set(&mut self, from: usize, to: usize, value: f64) {
        self.data[from * self.size + to] = value;
    }

    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.size
    }
}
