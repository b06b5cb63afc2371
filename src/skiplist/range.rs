//! Диапазон по score: обе границы включаются, `min > max` — пустой
//! диапазон, который не содержит ни одного элемента.

use ordered_float::OrderedFloat;

/// Закрытый интервал `[min, max]` по score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
}

impl ScoreRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Вырожденный диапазон (`min > max`) не содержит ничего.
    pub fn is_empty(&self) -> bool {
        OrderedFloat(self.min) > OrderedFloat(self.max)
    }

    /// `score >= min`.
    pub fn gte_min(&self, score: f64) -> bool {
        OrderedFloat(score) >= OrderedFloat(self.min)
    }

    /// `score <= max`.
    pub fn lte_max(&self, score: f64) -> bool {
        OrderedFloat(score) <= OrderedFloat(self.max)
    }

    /// Попадает ли score в диапазон.
    pub fn contains(&self, score: f64) -> bool {
        self.gte_min(score) && self.lte_max(score)
    }
}

impl From<(f64, f64)> for ScoreRange {
    fn from((min, max): (f64, f64)) -> Self {
        Self::new(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inclusive_bounds() {
        let r = ScoreRange::new(1.0, 5.0);

        assert!(r.contains(1.0));
        assert!(r.contains(5.0));
        assert!(r.contains(3.0));
        assert!(!r.contains(0.999));
        assert!(!r.contains(5.001));
    }

    #[test]
    fn test_degenerate_range() {
        let r = ScoreRange::new(5.0, 1.0);

        assert!(r.is_empty());
        assert!(!r.contains(3.0));
    }

    #[test]
    fn test_single_point_range() {
        let r = ScoreRange::new(2.0, 2.0);

        assert!(!r.is_empty());
        assert!(r.contains(2.0));
        assert!(!r.contains(2.1));
    }
}
