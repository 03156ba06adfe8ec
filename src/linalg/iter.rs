//! Lazy producers over vectors and matrices.
//!
//! Each producer borrows its source and walks it by index; re-invoking the
//! method that created it restarts the traversal. Producers never allocate
//! except where an item is itself an owned row or column.

use std::iter::FusedIterator;

use crate::linalg::dense_vector::DenseVector;
use crate::linalg::matrix::Matrix;
use crate::linalg::vector::Vector;

/// Values of a vector in index order.
#[derive(Debug, Clone)]
pub struct Values<'a> {
    source: &'a dyn Vector,
    front: usize,
    back: usize,
}

impl<'a> Values<'a> {
    pub(crate) fn new(source: &'a dyn Vector) -> Self {
        Values { source, front: 0, back: source.count() }
    }
}

impl Iterator for Values<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.front >= self.back {
            return None;
        }
        let value = self.source.value_at(self.front);
        self.front += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for Values<'_> {
    fn next_back(&mut self) -> Option<f64> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(self.source.value_at(self.back))
    }
}

impl ExactSizeIterator for Values<'_> {}
impl FusedIterator for Values<'_> {}

/// `(index, value)` pairs over the half-open window `[start, end)`.
#[derive(Debug, Clone)]
pub struct IndexedValues<'a> {
    source: &'a dyn Vector,
    next: usize,
    end: usize,
}

impl<'a> IndexedValues<'a> {
    pub(crate) fn new(source: &'a dyn Vector, start: usize, end: usize) -> Self {
        IndexedValues { source, next: start, end }
    }
}

impl Iterator for IndexedValues<'_> {
    type Item = (usize, f64);

    fn next(&mut self) -> Option<(usize, f64)> {
        if self.next >= self.end {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some((index, self.source.value_at(index)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for IndexedValues<'_> {}
impl FusedIterator for IndexedValues<'_> {}

/// Rows of a matrix as owned dense vectors, tagged with the row index.
#[derive(Debug, Clone)]
pub struct Rows<'a> {
    source: &'a dyn Matrix,
    next: usize,
}

impl<'a> Rows<'a> {
    pub(crate) fn new(source: &'a dyn Matrix) -> Self {
        Rows { source, next: 0 }
    }
}

impl Iterator for Rows<'_> {
    type Item = (usize, DenseVector);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.source.rows() {
            return None;
        }
        let row = self.next;
        self.next += 1;
        let values = (0..self.source.columns()).map(|c| self.source.value_at(row, c)).collect();
        Some((row, DenseVector::from_vec_unchecked(values)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.source.rows() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Rows<'_> {}

/// Columns of a matrix as owned dense vectors, tagged with the column index.
#[derive(Debug, Clone)]
pub struct Columns<'a> {
    source: &'a dyn Matrix,
    next: usize,
}

impl<'a> Columns<'a> {
    pub(crate) fn new(source: &'a dyn Matrix) -> Self {
        Columns { source, next: 0 }
    }
}

impl Iterator for Columns<'_> {
    type Item = (usize, DenseVector);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.source.columns() {
            return None;
        }
        let column = self.next;
        self.next += 1;
        let values = match self.source.as_column_major() {
            Some(data) => {
                let rows = self.source.rows();
                data[column * rows..(column + 1) * rows].to_vec()
            }
            None => (0..self.source.rows()).map(|r| self.source.value_at(r, column)).collect(),
        };
        Some((column, DenseVector::from_vec_unchecked(values)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.source.columns() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Columns<'_> {}

#[cfg(test)]
mod tests {
    use crate::linalg::dense_matrix::DenseMatrix;
    use crate::linalg::dense_vector::DenseVector;
    use crate::linalg::matrix::Matrix;
    use crate::linalg::vector::Vector;

    #[test]
    fn values_is_restartable_and_double_ended() {
        let v = DenseVector::from_slice(&[1.0, 2.0, 3.0]).unwrap();

        let forward: Vec<f64> = v.values().collect();
        let backward: Vec<f64> = v.values().rev().collect();

        assert_eq!(forward, vec![1.0, 2.0, 3.0]);
        assert_eq!(backward, vec![3.0, 2.0, 1.0]);
        assert_eq!(v.values().len(), 3);
    }

    #[test]
    fn indexed_range_yields_window_only() {
        let v = DenseVector::from_slice(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        let pairs: Vec<(usize, f64)> = v.indexed_range(1, 2).unwrap().collect();
        assert_eq!(pairs, vec![(1, 2.0), (2, 3.0)]);
        assert!(v.indexed_range(3, 2).is_err());
    }

    #[test]
    fn rows_and_columns_follow_matrix_layout() {
        let m = DenseMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();

        let rows: Vec<Vec<f64>> = m.row_iter().map(|(_, r)| r.to_vec()).collect();
        let cols: Vec<Vec<f64>> = m.column_iter().map(|(_, c)| c.to_vec()).collect();

        assert_eq!(rows, vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]);
        assert_eq!(cols, vec![vec![1.0, 3.0, 5.0], vec![2.0, 4.0, 6.0]]);
    }
}
