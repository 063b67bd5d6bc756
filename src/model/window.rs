//! Dynamic feature windows.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WindowError {
    /// A window must contain at least one coefficient.
    #[error("Window has no coefficients")]
    Empty,
    /// Centred windows need an odd number of coefficients.
    #[error("Window of {0} coefficients cannot be centred")]
    EvenLength(usize),
    /// `left_width` must be non-positive and `right_width` non-negative.
    #[error("Window widths [{0}, {1}] do not include the current frame")]
    InvalidWidths(isize, isize),
    /// The number of coefficients does not match the widths.
    #[error("Window widths [{left}, {right}] require {expected} coefficients, got {actual}")]
    LengthMismatch {
        left: isize,
        right: isize,
        expected: usize,
        actual: usize,
    },
}

/// Set of dynamic windows used by a stream. The first window is the static one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Windows {
    windows: Vec<Window>,
}

impl Windows {
    pub fn new(windows: Vec<Window>) -> Self {
        Self { windows }
    }

    pub fn iter(&self) -> impl '_ + Iterator<Item = &Window> {
        self.windows.iter()
    }
    pub fn size(&self) -> usize {
        self.windows.len()
    }
    /// Whether the first window is the static window.
    pub fn starts_with_static(&self) -> bool {
        self.windows.first().is_some_and(Window::is_static)
    }
    /// Largest distance from the current frame reached by any window.
    pub fn max_span(&self) -> usize {
        self.windows.iter().map(Window::span).max().unwrap_or(0)
    }
    /// Number of entries stored per row of `W^T U^{-1} W`.
    pub fn band_width(&self) -> usize {
        self.max_span() * 2 + 1
    }
}

impl FromIterator<Window> for Windows {
    fn from_iter<I: IntoIterator<Item = Window>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A dynamic window.
///
/// The feature of window `k` at frame `t` is `Σ_j coefficient(j) * c[t + j]`
/// for `j` in `left_width..=right_width`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
    left_width: isize,
    right_width: isize,
    coefficients: Box<[f64]>,
}

impl Window {
    /// Static window `[1.0]`.
    pub fn identity() -> Self {
        Self {
            left_width: 0,
            right_width: 0,
            coefficients: Box::new([1.0]),
        }
    }

    /// Window whose coefficients are centred on the current frame, as stored in voice files.
    pub fn centered(coefficients: Vec<f64>) -> Result<Self, WindowError> {
        let len = coefficients.len();
        if len == 0 {
            return Err(WindowError::Empty);
        }
        if len % 2 == 0 {
            return Err(WindowError::EvenLength(len));
        }
        let half = (len / 2) as isize;
        Self::with_widths(-half, half, coefficients)
    }

    pub fn with_widths(
        left_width: isize,
        right_width: isize,
        coefficients: Vec<f64>,
    ) -> Result<Self, WindowError> {
        if left_width > 0 || right_width < 0 {
            return Err(WindowError::InvalidWidths(left_width, right_width));
        }
        let expected = (right_width - left_width + 1) as usize;
        if coefficients.len() != expected {
            return Err(WindowError::LengthMismatch {
                left: left_width,
                right: right_width,
                expected,
                actual: coefficients.len(),
            });
        }
        Ok(Self {
            left_width,
            right_width,
            coefficients: coefficients.into(),
        })
    }

    /// Coefficient applied to frame `t + offset`; zero outside the window.
    #[inline]
    pub fn coefficient(&self, offset: isize) -> f64 {
        if offset < self.left_width || offset > self.right_width {
            return 0.0;
        }
        self.coefficients[(offset - self.left_width) as usize]
    }

    /// Iterate over `(offset, coefficient)` pairs.
    pub fn iter(&self) -> impl '_ + Iterator<Item = (isize, f64)> {
        (self.left_width..=self.right_width).zip(self.coefficients.iter().copied())
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.coefficients.len()
    }
    #[inline]
    pub fn left_width(&self) -> isize {
        self.left_width
    }
    #[inline]
    pub fn right_width(&self) -> isize {
        self.right_width
    }
    /// `[1.0]` on the current frame only.
    pub fn is_static(&self) -> bool {
        self.left_width == 0 && self.right_width == 0 && self.coefficients[..] == [1.0]
    }
    #[inline]
    pub fn span(&self) -> usize {
        self.left_width.unsigned_abs().max(self.right_width.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::{Window, WindowError, Windows};

    #[test]
    fn width_1() {
        let window = Window::centered(vec![1.0]).unwrap();
        assert_eq!(window, Window::identity());
        assert_eq!(window.width(), 1);
        assert_eq!(window.left_width(), 0);
        assert_eq!(window.right_width(), 0);
        assert_eq!(window.span(), 0);
    }

    #[test]
    fn width_3() {
        let window = Window::centered(vec![-0.5, 0.0, 0.5]).unwrap();
        assert_eq!(window.width(), 3);
        assert_eq!(window.left_width(), -1);
        assert_eq!(window.right_width(), 1);
        assert_eq!(window.coefficient(-1), -0.5);
        assert_eq!(window.coefficient(1), 0.5);
        assert_eq!(window.coefficient(2), 0.0);
        assert_eq!(window.coefficient(-2), 0.0);
    }

    #[test]
    fn asymmetric() {
        let window = Window::with_widths(-1, 0, vec![-1.0, 1.0]).unwrap();
        assert_eq!(window.span(), 1);
        assert_eq!(
            window.iter().collect::<Vec<_>>(),
            vec![(-1, -1.0), (0, 1.0)]
        );
    }

    #[test]
    fn invalid() {
        assert_eq!(Window::centered(vec![]), Err(WindowError::Empty));
        assert_eq!(
            Window::centered(vec![1.0, 2.0]),
            Err(WindowError::EvenLength(2))
        );
        assert_eq!(
            Window::with_widths(1, 2, vec![1.0, 1.0]),
            Err(WindowError::InvalidWidths(1, 2))
        );
        assert!(matches!(
            Window::with_widths(-1, 1, vec![1.0]),
            Err(WindowError::LengthMismatch { expected: 3, .. })
        ));
    }

    #[test]
    fn band_width() {
        let windows = Windows::new(vec![
            Window::identity(),
            Window::centered(vec![-0.5, 0.0, 0.5]).unwrap(),
            Window::centered(vec![1.0, -2.0, 1.0]).unwrap(),
        ]);
        assert_eq!(windows.size(), 3);
        assert_eq!(windows.max_span(), 1);
        assert_eq!(windows.band_width(), 3);

        let static_only: Windows = std::iter::once(Window::identity()).collect();
        assert_eq!(static_only.band_width(), 1);
    }

    #[test]
    fn starts_with_static() {
        let delta = Window::centered(vec![-0.5, 0.0, 0.5]).unwrap();
        assert!(Windows::new(vec![Window::identity(), delta.clone()]).starts_with_static());
        assert!(!Windows::new(vec![delta, Window::identity()]).starts_with_static());
        assert!(!Windows::new(vec![Window::centered(vec![2.0]).unwrap()]).starts_with_static());
        assert!(!Windows::new(vec![]).starts_with_static());
    }
}
