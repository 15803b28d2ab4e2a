//! Render-ready output of the aggregator.

use serde::Serialize;

/// The five rating categories, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Performance,
    Comfort,
    Consumption,
    Design,
    CostBenefit,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Performance,
        Category::Comfort,
        Category::Consumption,
        Category::Design,
        Category::CostBenefit,
    ];

    /// Label shown on the detail page.
    pub fn label(self) -> &'static str {
        match self {
            Category::Performance => "Desempenho",
            Category::Comfort => "Conforto",
            Category::Consumption => "Consumo",
            Category::Design => "Design",
            Category::CostBenefit => "Custo-Benefício",
        }
    }
}

/// Mean of one category across a review collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMetric {
    pub(crate) category: Category,
    pub(crate) label: &'static str,
    pub(crate) value: f64,
}

impl CategoryMetric {
    pub(crate) fn new(category: Category, value: f64) -> Self {
        Self {
            category,
            label: category.label(),
            value,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

/// Mean, across reviews, of each review's own five-category mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverallMetric(pub(crate) f64);

impl OverallMetric {
    pub fn value(self) -> f64 {
        self.0
    }
}

/// Everything the detail page renders: the overall metric, the five category
/// metrics in display order, and the review count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarMetrics {
    pub(crate) overall: OverallMetric,
    pub(crate) categories: [CategoryMetric; 5],
    pub(crate) total_reviews: usize,
}

impl CarMetrics {
    pub fn overall(&self) -> OverallMetric {
        self.overall
    }

    pub fn categories(&self) -> &[CategoryMetric; 5] {
        &self.categories
    }

    pub fn category(&self, category: Category) -> &CategoryMetric {
        // `categories` is built from `Category::ALL`, so positions line up.
        let idx = Category::ALL
            .iter()
            .position(|c| *c == category)
            .unwrap_or_default();
        &self.categories[idx]
    }

    pub fn total_reviews(&self) -> usize {
        self.total_reviews
    }
}
