use crate::analyzers::types::PerformanceLevel;

/// Converts an average score (0–100) into a performance level.
///
/// | Range   | Level             |
/// |---------|-------------------|
/// | >= 90   | Excellent         |
/// | >= 80   | Good              |
/// | >= 70   | Satisfactory      |
/// | >= 60   | Needs Improvement |
/// | < 60    | Poor              |
pub fn performance_level(average: f64) -> PerformanceLevel {
    match average {
        a if a >= 90.0 => PerformanceLevel::Excellent,
        a if a >= 80.0 => PerformanceLevel::Good,
        a if a >= 70.0 => PerformanceLevel::Satisfactory,
        a if a >= 60.0 => PerformanceLevel::NeedsImprovement,
        _ => PerformanceLevel::Poor,
    }
}
