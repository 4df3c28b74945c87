//! Dense row-major matrices of fixed rank 2, 3, and 4.
//!
//! The EM engine stores every tensor it owns in one of these types: the
//! sequence matrix and the motifs are rank 2, the class-probability tensor
//! is rank 3, and the likelihood/posterior tensors are rank 4. All of them
//! are contiguous `Vec`-backed buffers indexed by tuple; an out-of-range
//! index is a programming error and panics.

use std::ops::{Index, IndexMut};

/// A dense 2-D matrix with row-major storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix2D<T> {
    n_row: usize,
    n_col: usize,
    data: Vec<T>,
}

impl<T: Clone> Matrix2D<T> {
    /// Creates an `n_row` x `n_col` matrix with every element set to `fill`.
    pub fn new(n_row: usize, n_col: usize, fill: T) -> Self {
        Self {
            n_row,
            n_col,
            data: vec![fill; n_row * n_col],
        }
    }

    /// Builds a matrix from a row-major buffer. Panics if `data` does not
    /// hold exactly `n_row * n_col` elements.
    pub fn from_vec(n_row: usize, n_col: usize, data: Vec<T>) -> Self {
        assert_eq!(
            data.len(),
            n_row * n_col,
            "buffer of {} elements cannot fill a {}x{} matrix",
            data.len(),
            n_row,
            n_col
        );
        Self { n_row, n_col, data }
    }

    /// Number of rows.
    #[must_use]
    pub fn n_row(&self) -> usize {
        self.n_row
    }

    /// Number of columns.
    #[must_use]
    pub fn n_col(&self) -> usize {
        self.n_col
    }

    /// Total number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the matrix holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Extracts column `j` as an owned vector.
    pub fn column(&self, j: usize) -> Vec<T> {
        assert!(j < self.n_col, "column {} out of range ({})", j, self.n_col);
        (0..self.n_row)
            .map(|i| self.data[i * self.n_col + j].clone())
            .collect()
    }

    /// Returns the transposed matrix. Used when writing motifs, which are
    /// stored 4 x W internally but serialized W x 4.
    #[must_use]
    pub fn transposed(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for j in 0..self.n_col {
            for i in 0..self.n_row {
                data.push(self.data[i * self.n_col + j].clone());
            }
        }
        Self {
            n_row: self.n_col,
            n_col: self.n_row,
            data,
        }
    }

    /// The underlying row-major buffer.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The underlying row-major buffer, mutable.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Iterates over all elements in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Iterates mutably over all elements in row-major order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    /// Iterates over the rows of the matrix.
    pub fn rows(&self) -> std::slice::Chunks<'_, T> {
        self.data.chunks(self.n_col)
    }

    fn offset(&self, i: usize, j: usize) -> usize {
        assert!(
            i < self.n_row && j < self.n_col,
            "index ({}, {}) out of range for {}x{} matrix",
            i,
            j,
            self.n_row,
            self.n_col
        );
        i * self.n_col + j
    }
}

impl<T: Clone> Index<(usize, usize)> for Matrix2D<T> {
    type Output = T;

    fn index(&self, (i, j): (usize, usize)) -> &T {
        &self.data[self.offset(i, j)]
    }
}

impl<T: Clone> IndexMut<(usize, usize)> for Matrix2D<T> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        let offset = self.offset(i, j);
        &mut self.data[offset]
    }
}

/// A dense 3-D tensor with row-major storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix3D<T> {
    dim: [usize; 3],
    data: Vec<T>,
}

impl<T: Clone> Matrix3D<T> {
    /// Creates a `d0` x `d1` x `d2` tensor with every element set to `fill`.
    pub fn new(d0: usize, d1: usize, d2: usize, fill: T) -> Self {
        Self {
            dim: [d0, d1, d2],
            data: vec![fill; d0 * d1 * d2],
        }
    }

    /// Shape as `[d0, d1, d2]`.
    #[must_use]
    pub fn dim(&self) -> [usize; 3] {
        self.dim
    }

    /// Total number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the tensor holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The underlying row-major buffer.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Iterates over all elements in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Iterates mutably over all elements in row-major order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    fn offset(&self, idx: [usize; 3]) -> usize {
        assert!(
            idx[0] < self.dim[0] && idx[1] < self.dim[1] && idx[2] < self.dim[2],
            "index {:?} out of range for tensor of shape {:?}",
            idx,
            self.dim
        );
        (idx[0] * self.dim[1] + idx[1]) * self.dim[2] + idx[2]
    }
}

impl<T: Clone> Index<(usize, usize, usize)> for Matrix3D<T> {
    type Output = T;

    fn index(&self, (i, j, k): (usize, usize, usize)) -> &T {
        &self.data[self.offset([i, j, k])]
    }
}

impl<T: Clone> IndexMut<(usize, usize, usize)> for Matrix3D<T> {
    fn index_mut(&mut self, (i, j, k): (usize, usize, usize)) -> &mut T {
        let offset = self.offset([i, j, k]);
        &mut self.data[offset]
    }
}

/// A dense 4-D tensor with row-major storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix4D<T> {
    dim: [usize; 4],
    data: Vec<T>,
}

impl<T: Clone> Matrix4D<T> {
    /// Creates a `d0` x `d1` x `d2` x `d3` tensor with every element set
    /// to `fill`.
    pub fn new(d0: usize, d1: usize, d2: usize, d3: usize, fill: T) -> Self {
        Self {
            dim: [d0, d1, d2, d3],
            data: vec![fill; d0 * d1 * d2 * d3],
        }
    }

    /// Shape as `[d0, d1, d2, d3]`.
    #[must_use]
    pub fn dim(&self) -> [usize; 4] {
        self.dim
    }

    /// Total number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the tensor holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The underlying row-major buffer.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The underlying row-major buffer, mutable.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Iterates over all elements in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Iterates mutably over all elements in row-major order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    fn offset(&self, idx: [usize; 4]) -> usize {
        assert!(
            idx[0] < self.dim[0]
                && idx[1] < self.dim[1]
                && idx[2] < self.dim[2]
                && idx[3] < self.dim[3],
            "index {:?} out of range for tensor of shape {:?}",
            idx,
            self.dim
        );
        ((idx[0] * self.dim[1] + idx[1]) * self.dim[2] + idx[2]) * self.dim[3] + idx[3]
    }
}

impl<T: Clone> Index<(usize, usize, usize, usize)> for Matrix4D<T> {
    type Output = T;

    fn index(&self, (i, j, k, l): (usize, usize, usize, usize)) -> &T {
        &self.data[self.offset([i, j, k, l])]
    }
}

impl<T: Clone> IndexMut<(usize, usize, usize, usize)> for Matrix4D<T> {
    fn index_mut(&mut self, (i, j, k, l): (usize, usize, usize, usize)) -> &mut T {
        let offset = self.offset([i, j, k, l]);
        &mut self.data[offset]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix2d_row_major_layout() {
        let mut m = Matrix2D::new(2, 3, 0.0);
        m[(0, 0)] = 1.0;
        m[(0, 2)] = 2.0;
        m[(1, 1)] = 3.0;
        assert_eq!(m.as_slice(), &[1.0, 0.0, 2.0, 0.0, 3.0, 0.0]);
        assert_eq!(m.n_row(), 2);
        assert_eq!(m.n_col(), 3);
        assert_eq!(m.len(), 6);
    }

    #[test]
    fn matrix2d_column_extraction() {
        let m = Matrix2D::from_vec(2, 3, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(m.column(0), vec![1, 4]);
        assert_eq!(m.column(2), vec![3, 6]);
    }

    #[test]
    fn matrix2d_transpose() {
        let m = Matrix2D::from_vec(2, 3, vec![1, 2, 3, 4, 5, 6]);
        let t = m.transposed();
        assert_eq!(t.n_row(), 3);
        assert_eq!(t.n_col(), 2);
        assert_eq!(t.as_slice(), &[1, 4, 2, 5, 3, 6]);
        assert_eq!(t.transposed(), m);
    }

    #[test]
    fn matrix2d_deep_copy_is_independent() {
        let mut m = Matrix2D::new(2, 2, 1.0);
        let copy = m.clone();
        m[(0, 0)] = 9.0;
        assert_eq!(copy[(0, 0)], 1.0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn matrix2d_out_of_range_row_panics() {
        let m = Matrix2D::new(2, 2, 0.0);
        let _ = m[(2, 0)];
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn matrix2d_out_of_range_col_panics() {
        let m = Matrix2D::new(2, 2, 0.0);
        let _ = m[(0, 2)];
    }

    #[test]
    fn matrix3d_indexing() {
        let mut m = Matrix3D::new(2, 3, 4, 0.0);
        m[(1, 2, 3)] = 7.0;
        m[(0, 0, 0)] = 1.0;
        assert_eq!(m[(1, 2, 3)], 7.0);
        assert_eq!(m.as_slice()[0], 1.0);
        assert_eq!(m.as_slice()[23], 7.0);
        assert_eq!(m.len(), 24);
        assert_eq!(m.dim(), [2, 3, 4]);
    }

    #[test]
    fn matrix4d_indexing() {
        let mut m = Matrix4D::new(2, 3, 4, 5, 0.0);
        m[(1, 2, 3, 4)] = 7.0;
        assert_eq!(m.as_slice()[119], 7.0);
        assert_eq!(m.len(), 120);

        // strides: the last axis varies fastest
        m[(0, 0, 0, 1)] = 2.0;
        assert_eq!(m.as_slice()[1], 2.0);
        m[(0, 0, 1, 0)] = 3.0;
        assert_eq!(m.as_slice()[5], 3.0);
        m[(0, 1, 0, 0)] = 4.0;
        assert_eq!(m.as_slice()[20], 4.0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn matrix4d_out_of_range_panics() {
        let m = Matrix4D::new(1, 1, 1, 1, 0.0);
        let _ = m[(0, 0, 0, 1)];
    }

    #[test]
    fn element_iteration_covers_all_cells() {
        let mut m = Matrix4D::new(2, 2, 2, 2, 1.0);
        assert_eq!(m.iter().sum::<f64>(), 16.0);
        for v in m.iter_mut() {
            *v *= 2.0;
        }
        assert_eq!(m.iter().sum::<f64>(), 32.0);
    }
}
