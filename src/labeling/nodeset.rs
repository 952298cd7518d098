//! Visited-node bitset.

use std::fmt;

const WORDS: usize = 2;

/// Set of graph arena indices below [`MAX_NODES`](crate::graph::MAX_NODES).
///
/// Two `u128` words, copied along with each label.
///
/// # Examples
///
/// ```
/// use u_colgen::labeling::NodeSet;
///
/// let mut a = NodeSet::new();
/// a.insert(3);
/// a.insert(200);
/// let mut b = a;
/// b.insert(7);
/// assert!(a.is_subset(&b));
/// assert!(!b.is_subset(&a));
/// assert_eq!(b.len(), 3);
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NodeSet([u128; WORDS]);

impl NodeSet {
    /// Empty set.
    pub fn new() -> Self {
        Self([0; WORDS])
    }

    #[inline]
    fn word_bit(i: usize) -> (usize, u32) {
        (i >> 7, (i & 0x7f) as u32)
    }

    /// Adds `i` to the set.
    #[inline]
    pub fn insert(&mut self, i: usize) {
        let (w, b) = Self::word_bit(i);
        self.0[w] |= 1u128 << b;
    }

    /// Removes `i` from the set.
    #[inline]
    pub fn remove(&mut self, i: usize) {
        let (w, b) = Self::word_bit(i);
        self.0[w] &= !(1u128 << b);
    }

    /// Returns `true` if `i` is in the set.
    #[inline]
    pub fn contains(&self, i: usize) -> bool {
        let (w, b) = Self::word_bit(i);
        self.0[w] & (1u128 << b) != 0
    }

    /// Returns `true` if no element is shared.
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.0.iter().zip(other.0.iter()).all(|(x, y)| x & y == 0)
    }

    /// Returns `true` if every element of `self` is in `other`.
    pub fn is_subset(&self, other: &Self) -> bool {
        self.0.iter().zip(other.0.iter()).all(|(x, y)| x & y == *x)
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.0.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&w| w == 0)
    }

    /// Elements in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().enumerate().flat_map(|(w, &bits)| {
            (0..128u32)
                .filter(move |b| bits & (1u128 << b) != 0)
                .map(move |b| (w << 7) + b as usize)
        })
    }
}

impl fmt::Debug for NodeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
