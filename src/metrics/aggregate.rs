use crate::metrics::utility::{contribution, mean};
use crate::models::{CarMetrics, Category, CategoryMetric, OverallMetric, Review};

/// Mean of one category across `reviews`.
///
/// A NaN rating adds nothing to the sum but its review still counts in the
/// denominator, so malformed records pull the average down. Returns 0.0 for
/// an empty collection.
pub fn category_average(reviews: &[Review], category: Category) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let sum: f64 = reviews
        .iter()
        .map(|r| contribution(r.rating(category)))
        .sum();
    sum / reviews.len() as f64
}

/// Unweighted mean of one review's five ratings, NaN counted as zero.
pub fn review_average(review: &Review) -> f64 {
    let ratings = review.ratings().map(contribution);
    ratings.iter().sum::<f64>() / ratings.len() as f64
}

/// Mean, across reviews, of each review's own five-category mean.
///
/// Not computed as a mean of category means, even though the two agree while
/// every review carries all five fields.
pub fn overall_average(reviews: &[Review]) -> f64 {
    let per_review: Vec<f64> = reviews.iter().map(review_average).collect();
    mean(&per_review)
}

/// Aggregates `reviews` into the overall metric and the five category metrics.
///
/// Values are not clamped: out-of-range upstream ratings can produce metrics
/// outside 0..=5.
pub fn car_metrics(reviews: &[Review]) -> CarMetrics {
    CarMetrics {
        overall: OverallMetric(overall_average(reviews)),
        categories: Category::ALL.map(|c| CategoryMetric::new(c, category_average(reviews, c))),
        total_reviews: reviews.len(),
    }
}
