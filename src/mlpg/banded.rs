use std::ops::{Index, IndexMut};

/// Upper band of a symmetric banded matrix.
///
/// Entry `(t, j)` holds element `(t, t + j)` of the full matrix for `j < width`.
#[derive(Debug, Clone, PartialEq)]
pub struct BandedMatrix {
    rows: usize,
    width: usize,
    data: Box<[f64]>,
}

impl BandedMatrix {
    pub fn zeros(rows: usize, width: usize) -> Self {
        Self {
            rows,
            width,
            data: vec![0.0; rows * width].into(),
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn row(&self, t: usize) -> &[f64] {
        &self.data[self.width * t..self.width * (t + 1)]
    }

    /// Element `(r, c)` of the full symmetric matrix; zero outside the band.
    pub fn symmetric(&self, r: usize, c: usize) -> f64 {
        let (t, j) = if r <= c { (r, c - r) } else { (c, r - c) };
        if j < self.width { self[(t, j)] } else { 0.0 }
    }

    /// Product of the full symmetric matrix with `x`.
    pub fn mul_vec(&self, x: &[f64]) -> Box<[f64]> {
        debug_assert_eq!(x.len(), self.rows);
        let mut y = boxed_slice![0.0; self.rows];
        for t in 0..self.rows {
            y[t] = self[(t, 0)] * x[t];
            for i in 1..self.width {
                if t + i < self.rows {
                    y[t] += self[(t, i)] * x[t + i];
                }
                if t >= i {
                    y[t] += self[(t - i, i)] * x[t - i];
                }
            }
        }
        y
    }
}

impl Index<(usize, usize)> for BandedMatrix {
    type Output = f64;
    #[inline]
    fn index(&self, (t, j): (usize, usize)) -> &f64 {
        assert!(j < self.width, "band offset {j} outside width {}", self.width);
        &self.data[self.width * t + j]
    }
}

impl IndexMut<(usize, usize)> for BandedMatrix {
    #[inline]
    fn index_mut(&mut self, (t, j): (usize, usize)) -> &mut f64 {
        assert!(j < self.width, "band offset {j} outside width {}", self.width);
        &mut self.data[self.width * t + j]
    }
}
