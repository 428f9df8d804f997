// AlumnosAdmin - ui/panels/charts.rs
//
// Horizontal text bar charts for category distributions.

use crate::core::stats::Distribution;
use crate::util::constants::CHART_BAR_WIDTH;
use std::fmt::Write;

const BAR: char = '█';

/// Render one distribution: title, then one `label | bar count` line per bucket.
/// Bars are scaled so the largest bucket spans `CHART_BAR_WIDTH` cells.
pub fn render(dist: &Distribution) -> String {
    let mut out = String::new();
    writeln!(out, "{} (total {})", dist.title, dist.total()).ok();

    let max = dist.max_count();
    let label_width = dist
        .buckets
        .iter()
        .map(|b| b.label.chars().count())
        .max()
        .unwrap_or(0);

    for bucket in &dist.buckets {
        let cells = if max == 0 {
            0
        } else {
            // Any non-zero count gets at least one cell.
            (bucket.count * CHART_BAR_WIDTH).div_ceil(max)
        };
        let bar: String = std::iter::repeat(BAR).take(cells).collect();
        writeln!(
            out,
            "  {:<label_width$} | {bar} {}",
            bucket.label, bucket.count
        )
        .ok();
    }
    out
}
