use serde::Serialize;

const MAX_STARS: u32 = 5;

/// How a rating renders as five stars.
///
/// | Part of rating     | Stars        |
/// |--------------------|--------------|
/// | integer part       | full         |
/// | fraction >= 0.5    | one half     |
/// | remainder up to 5  | empty        |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StarBreakdown {
    pub full: u32,
    pub half: bool,
    pub empty: u32,
}

impl StarBreakdown {
    /// Never renders more than five stars: ratings of 5 or above, infinity
    /// included, are five full stars. Negative and NaN ratings render as five
    /// empty stars. The numeric value shown next to the stars is not affected.
    pub fn from_rating(rating: f64) -> Self {
        if rating.is_nan() || rating <= 0.0 {
            return Self {
                full: 0,
                half: false,
                empty: MAX_STARS,
            };
        }
        if rating >= MAX_STARS as f64 {
            return Self {
                full: MAX_STARS,
                half: false,
                empty: 0,
            };
        }
        let full = rating.floor() as u32;
        let half = rating.fract() >= 0.5;
        let empty = MAX_STARS.saturating_sub(full + u32::from(half));
        Self { full, half, empty }
    }
}

/// Width of a 0..=5 metric as a fraction of a full bar. Not clamped.
pub fn bar_fraction(value: f64) -> f64 {
    value / MAX_STARS as f64
}

/// One decimal, the way metrics are displayed.
pub fn format_rating(value: f64) -> String {
    format!("{value:.1}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_boundaries() {
        assert_eq!(
            StarBreakdown::from_rating(5.0),
            StarBreakdown { full: 5, half: false, empty: 0 }
        );
        assert_eq!(
            StarBreakdown::from_rating(3.5),
            StarBreakdown { full: 3, half: true, empty: 1 }
        );
        assert_eq!(
            StarBreakdown::from_rating(3.49),
            StarBreakdown { full: 3, half: false, empty: 2 }
        );
        assert_eq!(
            StarBreakdown::from_rating(0.0),
            StarBreakdown { full: 0, half: false, empty: 5 }
        );
    }

    #[test]
    fn test_out_of_range_capped_at_five_stars() {
        let five = StarBreakdown { full: 5, half: false, empty: 0 };

        assert_eq!(StarBreakdown::from_rating(7.5), five);
        assert_eq!(StarBreakdown::from_rating(1e10), five);
        assert_eq!(StarBreakdown::from_rating(f64::INFINITY), five);
        assert_eq!(StarBreakdown::from_rating(f64::NAN).empty, 5);
        assert_eq!(StarBreakdown::from_rating(f64::NEG_INFINITY).empty, 5);
    }

    #[test]
    fn test_bar_fraction() {
        assert_eq!(bar_fraction(5.0), 1.0);
        assert_eq!(bar_fraction(2.5), 0.5);
        assert_eq!(bar_fraction(0.0), 0.0);
    }

    #[test]
    fn test_format_rating() {
        assert_eq!(format_rating(3.0), "3.0");
        assert_eq!(format_rating(4.26), "4.3");
    }
}
