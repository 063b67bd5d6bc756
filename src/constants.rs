pub const MAX_F0: f64 = 20000.0;
pub const MIN_F0: f64 = 20.0;

/// log(MAX_F0) = log(20000.0)
pub const MAX_LF0: f64 = 9.903_487_552_536_127;
/// log(MIN_F0) = log(20.0)
pub const MIN_LF0: f64 = 2.995_732_273_553_991;

/// log(2.0)/12.0
pub const HALF_TONE: f64 = 0.057_762_265_046_662_11;

/// Value written to unvoiced frames when a masked trajectory is re-expanded.
pub const NODATA: f64 = -1e10;

/// Variances above this are treated as infinite (no constraint).
pub const INFINITE_VARIANCE: f64 = 1e19;
/// Variances below this are treated as zero.
pub const ZERO_VARIANCE: f64 = 1e-19;
/// Inverse variance used in place of `1 / 0`.
pub const MAX_INVERSE_VARIANCE: f64 = 1e38;
