use serde::Serialize;
use thiserror::Error;

/// Upper bound on the number of bins of one histogram (512 MiB of `f64` contents).
pub const MAX_BINS: usize = 1 << 26;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum HistogramError {
    #[error("{x} x {y} bins exceeds the limit of {max} bins per histogram")]
    TooManyBins { x: usize, y: usize, max: usize },
    #[error("Axis '{axis}' must have at least one bin")]
    NoBins { axis: &'static str },
    #[error("Axis '{axis}' has an empty or inverted range [{low}, {high})")]
    InvalidRange {
        axis: &'static str,
        low: f64,
        high: f64,
    },
}

/// Fixed-width binning along one axis. Bins are half-open, `[low, high)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Axis {
    pub bins: usize,
    pub low: f64,
    pub high: f64,
}

impl Axis {
    pub fn new(bins: usize, low: f64, high: f64) -> Self {
        Self { bins, low, high }
    }

    fn validate(&self, axis: &'static str) -> Result<(), HistogramError> {
        if self.bins == 0 {
            return Err(HistogramError::NoBins { axis });
        }
        if !(self.low < self.high) || !self.low.is_finite() || !self.high.is_finite() {
            return Err(HistogramError::InvalidRange {
                axis,
                low: self.low,
                high: self.high,
            });
        }
        Ok(())
    }

    pub fn bin_width(&self) -> f64 {
        (self.high - self.low) / self.bins as f64
    }

    /// Bin holding `value`, or `Err(Ordering)` telling which side of the range it fell off.
    pub fn find_bin(&self, value: f64) -> Result<usize, std::cmp::Ordering> {
        if value.is_nan() || value < self.low {
            return Err(std::cmp::Ordering::Less);
        }
        if value >= self.high {
            return Err(std::cmp::Ordering::Greater);
        }
        let bin = ((value - self.low) / self.bin_width()) as usize;
        Ok(bin.min(self.bins - 1))
    }

    pub fn bin_edges(&self, bin: usize) -> (f64, f64) {
        let width = self.bin_width();
        (
            self.low + width * bin as f64,
            self.low + width * (bin + 1) as f64,
        )
    }
}

/// A 2D histogram with fixed-width bins on both axes.
///
/// Entries that land outside either axis range are counted in `underflow`/`overflow`
/// instead of a bin. An entry below one axis and above the other counts as underflow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram2D {
    pub name: String,
    pub title: String,
    x_axis: Axis,
    y_axis: Axis,
    contents: Vec<f64>,
    underflow: f64,
    overflow: f64,
    entries: u64,
}

impl Histogram2D {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        x_axis: Axis,
        y_axis: Axis,
    ) -> Result<Self, HistogramError> {
        x_axis.validate("x")?;
        y_axis.validate("y")?;
        let cells = x_axis
            .bins
            .checked_mul(y_axis.bins)
            .filter(|&cells| cells <= MAX_BINS)
            .ok_or(HistogramError::TooManyBins {
                x: x_axis.bins,
                y: y_axis.bins,
                max: MAX_BINS,
            })?;
        Ok(Self {
            name: name.into(),
            title: title.into(),
            x_axis,
            y_axis,
            contents: vec![0.0; cells],
            underflow: 0.0,
            overflow: 0.0,
            entries: 0,
        })
    }

    /// Square histogram centred on the origin, `bins` per axis over `[-side/2, side/2)`.
    pub fn square(
        name: impl Into<String>,
        title: impl Into<String>,
        bins: usize,
        side: f64,
    ) -> Result<Self, HistogramError> {
        let axis = Axis::new(bins, -side / 2.0, side / 2.0);
        Self::new(name, title, axis, axis)
    }

    pub fn fill(&mut self, x: f64, y: f64) {
        self.fill_weighted(x, y, 1.0);
    }

    pub fn fill_weighted(&mut self, x: f64, y: f64, weight: f64) {
        use std::cmp::Ordering;

        self.entries += 1;
        match (self.x_axis.find_bin(x), self.y_axis.find_bin(y)) {
            (Ok(ix), Ok(iy)) => {
                let idx = self.index(ix, iy);
                self.contents[idx] += weight;
            }
            (Err(Ordering::Less), _) | (_, Err(Ordering::Less)) => self.underflow += weight,
            _ => self.overflow += weight,
        }
    }

    #[inline]
    fn index(&self, ix: usize, iy: usize) -> usize {
        iy * self.x_axis.bins + ix
    }

    pub fn x_axis(&self) -> &Axis {
        &self.x_axis
    }

    pub fn y_axis(&self) -> &Axis {
        &self.y_axis
    }

    pub fn bin_content(&self, ix: usize, iy: usize) -> Option<f64> {
        if ix >= self.x_axis.bins || iy >= self.y_axis.bins {
            return None;
        }
        Some(self.contents[self.index(ix, iy)])
    }

    /// `((x_low, x_high), (y_low, y_high))` of a bin.
    pub fn bin_edges(&self, ix: usize, iy: usize) -> ((f64, f64), (f64, f64)) {
        (self.x_axis.bin_edges(ix), self.y_axis.bin_edges(iy))
    }

    /// Every bin as `(ix, iy, content)`, x varying fastest.
    pub fn iter_bins(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        let nx = self.x_axis.bins;
        self.contents
            .iter()
            .enumerate()
            .map(move |(i, &content)| (i % nx, i / nx, content))
    }

    pub fn entries(&self) -> u64 {
        self.entries
    }

    pub fn underflow(&self) -> f64 {
        self.underflow
    }

    pub fn overflow(&self) -> f64 {
        self.overflow
    }

    /// Sum of all in-range bin contents.
    pub fn integral(&self) -> f64 {
        self.contents.iter().sum()
    }

    pub fn max_bin_content(&self) -> f64 {
        self.contents.iter().copied().fold(0.0, f64::max)
    }

    /// Smallest non-zero content, the natural lower bound of a log colour scale.
    pub fn min_positive_content(&self) -> Option<f64> {
        self.contents
            .iter()
            .copied()
            .filter(|&c| c > 0.0)
            .min_by(|a, b| a.total_cmp(b))
    }
}
