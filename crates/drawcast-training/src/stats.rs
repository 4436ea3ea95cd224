use serde::{Deserialize, Serialize};

/// Summary of a population's fitness distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessSummary {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    pub median: f32,
    pub std_dev: f32,
}

impl FitnessSummary {
    /// Summarizes `values`, or `None` if there are none.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f32::total_cmp);

        let min = *values.first()?;
        let max = *values.last()?;
        let n = values.len() as f32;
        let mean = values.iter().sum::<f32>() / n;
        let median = values[values.len() / 2];
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n;

        Some(Self {
            min,
            max,
            mean,
            median,
            std_dev: variance.sqrt(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let summary = FitnessSummary::new([40.0, 10.0, 30.0, 20.0, 0.0]).unwrap();
        assert!((summary.min - 0.0).abs() < f32::EPSILON);
        assert!((summary.max - 40.0).abs() < f32::EPSILON);
        assert!((summary.mean - 20.0).abs() < f32::EPSILON);
        assert!((summary.median - 20.0).abs() < f32::EPSILON);
        assert!((summary.std_dev - 200.0_f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn test_empty() {
        assert_eq!(FitnessSummary::new([]), None);
    }
}
