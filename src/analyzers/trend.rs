use crate::analyzers::types::Trend;
use crate::analyzers::utility::mean;

/// Number of trailing scores compared against the rest.
const RECENT_WINDOW: usize = 3;

/// Points the recent average must move before the trend is not `Stable`.
const TREND_MARGIN: f64 = 5.0;

/// Classifies the last three positive scores against the ones before them.
///
/// `positive` is in task enumeration order, not completion order.
pub fn trend(positive: &[f64]) -> Trend {
    if positive.len() < RECENT_WINDOW {
        return Trend::InsufficientData;
    }

    let split = positive.len() - RECENT_WINDOW;
    let recent_avg = mean(&positive[split..]);
    let earlier_avg = if split == 0 {
        recent_avg
    } else {
        mean(&positive[..split])
    };

    if recent_avg > earlier_avg + TREND_MARGIN {
        Trend::Improving
    } else if recent_avg < earlier_avg - TREND_MARGIN {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fewer_than_three_scores() {
        assert_eq!(trend(&[]), Trend::InsufficientData);
        assert_eq!(trend(&[90.0, 80.0]), Trend::InsufficientData);
    }

    #[test]
    fn test_exactly_three_scores_is_stable() {
        assert_eq!(trend(&[10.0, 90.0, 50.0]), Trend::Stable);
    }

    #[test]
    fn test_improving() {
        assert_eq!(trend(&[50.0, 80.0, 85.0, 90.0]), Trend::Improving);
    }

    #[test]
    fn test_declining() {
        assert_eq!(trend(&[85.0, 90.0, 70.0, 60.0]), Trend::Declining);
    }

    #[test]
    fn test_margin_is_exclusive() {
        // recent 75, earlier 70: exactly +5 stays stable
        assert_eq!(trend(&[70.0, 75.0, 75.0, 75.0]), Trend::Stable);
    }
}
