use nalgebra::DMatrix;

/// Time-indexed samples of a K-component vector.
///
/// Stored as an `N x (K+1)` matrix; column 0 is time and row order is the
/// source table's row order.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorSeries {
    data: DMatrix<f64>,
}

impl VectorSeries {
    /// Build from a time column and component columns of equal length.
    pub fn from_columns(time: &[f64], components: &[Vec<f64>]) -> Self {
        debug_assert!(components.iter().all(|c| c.len() == time.len()));
        let data = DMatrix::from_fn(time.len(), components.len() + 1, |row, col| {
            if col == 0 {
                time[row]
            } else {
                components[col - 1][row]
            }
        });
        Self { data }
    }

    /// Build from row tuples `[t, v1, .., vK]`.
    pub fn from_rows<const W: usize>(rows: &[[f64; W]]) -> Self {
        Self {
            data: DMatrix::from_fn(rows.len(), W, |r, c| rows[r][c]),
        }
    }

    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.data
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    /// Number of columns including time
    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn time(&self) -> Vec<f64> {
        self.column(0)
    }

    /// Values of column `index` (0 is time).
    pub fn column(&self, index: usize) -> Vec<f64> {
        self.data.column(index).iter().copied().collect()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[(row, col)]
    }
}

/// Time-indexed 0/1 flags for one navigation modality, stored as `N x 2`.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    data: DMatrix<f64>,
}

impl IndicatorSeries {
    pub fn new(time: &[f64], flags: &[bool]) -> Self {
        debug_assert_eq!(time.len(), flags.len());
        let data = DMatrix::from_fn(time.len(), 2, |row, col| {
            if col == 0 {
                time[row]
            } else if flags[row] {
                1.0
            } else {
                0.0
            }
        });
        Self { data }
    }

    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    pub fn time(&self) -> Vec<f64> {
        self.data.column(0).iter().copied().collect()
    }

    pub fn flags(&self) -> Vec<bool> {
        self.data.column(1).iter().map(|&v| v != 0.0).collect()
    }
}
