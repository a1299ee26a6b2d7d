use super::views::{CategoryCount, ScatterPoint};
use std::collections::HashMap;

/// Group label for blank categorical cells.
pub const UNSPECIFIED: &str = "Unspecified";

pub(crate) fn label_or_unspecified(value: Option<&str>) -> String {
    value.unwrap_or(UNSPECIFIED).to_string()
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub(crate) fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Pearson coefficient; `None` with fewer than two points or a flat axis.
pub(crate) fn pearson(points: &[ScatterPoint]) -> Option<f64> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|point| point.x).sum::<f64>() / n;
    let mean_y = points.iter().map(|point| point.y).sum::<f64>() / n;

    let (mut covariance, mut variance_x, mut variance_y) = (0.0, 0.0, 0.0);
    for point in points {
        let dx = point.x - mean_x;
        let dy = point.y - mean_y;
        covariance += dx * dy;
        variance_x += dx * dx;
        variance_y += dy * dy;
    }

    if variance_x <= f64::EPSILON || variance_y <= f64::EPSILON {
        return None;
    }
    Some((covariance / (variance_x.sqrt() * variance_y.sqrt())).clamp(-1.0, 1.0))
}

pub(crate) fn share(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total
    } else {
        0.0
    }
}

/// Counts per label, largest first, ties alphabetical.
pub(crate) fn count_by<'a, I>(values: I) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in values {
        *counts.entry(label_or_unspecified(value)).or_default() += 1;
    }

    let mut entries: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(label, count)| CategoryCount { label, count })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    entries
}
