//! Descriptive statistics over slices of values.

use std::fmt;

pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(sum(values) / values.len() as f64)
}

pub fn median(values: &[f64]) -> Option<f64> {
    quantile(&sorted(values), 0.5)
}

/// Sample variance, `None` below two values.
pub fn variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let squares: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some(squares / (values.len() - 1) as f64)
}

pub fn std_dev(values: &[f64]) -> Option<f64> {
    variance(values).map(f64::sqrt)
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Quantile `q` of already sorted values, interpolating linearly between the
/// two closest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Count, moments and quartiles of a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// `None` for a single value.
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

impl Summary {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let sorted = sorted(values);

        Some(Summary {
            count: sorted.len(),
            mean: mean(&sorted)?,
            std: std_dev(&sorted),
            min: *sorted.first()?,
            q25: quantile(&sorted, 0.25)?,
            q50: quantile(&sorted, 0.5)?,
            q75: quantile(&sorted, 0.75)?,
            max: *sorted.last()?,
        })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let std = self.std.map_or("NaN".to_string(), |s| format!("{:.6}", s));

        writeln!(f, "{:<8}{:>14.6}", "count", self.count as f64)?;
        writeln!(f, "{:<8}{:>14.6}", "mean", self.mean)?;
        writeln!(f, "{:<8}{:>14}", "std", std)?;
        writeln!(f, "{:<8}{:>14.6}", "min", self.min)?;
        writeln!(f, "{:<8}{:>14.6}", "25%", self.q25)?;
        writeln!(f, "{:<8}{:>14.6}", "50%", self.q50)?;
        writeln!(f, "{:<8}{:>14.6}", "75%", self.q75)?;
        write!(f, "{:<8}{:>14.6}", "max", self.max)
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_interpolate_quantiles() {
        let values = [1.0, 2.0, 3.0, 4.0];

        assert_eq!(quantile(&values, 0.0), Some(1.0));
        assert_eq!(quantile(&values, 0.25), Some(1.75));
        assert_eq!(quantile(&values, 0.5), Some(2.5));
        assert_eq!(quantile(&values, 0.75), Some(3.25));
        assert_eq!(quantile(&values, 1.0), Some(4.0));
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn should_describe_values() {
        let summary = Summary::from_values(&[4.0, 1.0, 3.0, 2.0]).unwrap();

        assert_eq!(summary.count, 4);
        assert_eq!(summary.mean, 2.5);
        assert!((summary.std.unwrap() - 1.2909944487358056).abs() < 1e-12);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.q25, 1.75);
        assert_eq!(summary.q50, 2.5);
        assert_eq!(summary.q75, 3.25);
        assert_eq!(summary.max, 4.0);
    }

    #[test]
    fn should_leave_std_undefined_for_one_value() {
        let summary = Summary::from_values(&[0.7]).unwrap();

        assert_eq!(summary.std, None);
        assert!(summary.to_string().contains("NaN"));
    }

    #[test]
    fn should_print_like_a_table() {
        let text = Summary::from_values(&[1.0, 2.0]).unwrap().to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "count         2.000000");
        assert_eq!(lines[1], "mean          1.500000");
    }

    #[test]
    fn should_find_extremes() {
        assert_eq!(min(&[2.0, -1.0, 5.0]), Some(-1.0));
        assert_eq!(max(&[2.0, -1.0, 5.0]), Some(5.0));
        assert_eq!(max(&[]), None);
    }
}
