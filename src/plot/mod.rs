//! Plot data helpers shared by the log viewer
//!
//! - [`partition`] - Grouping of series into stacked plot panes
//! - [`series_color`] - Distinct colors for series indices
//! - [`decimate_points`] - Min/max decimation for long logs
//! - [`split_at_gaps`] - Line runs between empty cells

pub mod partition;

pub use partition::{is_uniform, SeriesPartition};

/// Upper bound of points handed to egui_plot per line
pub const MAX_RENDER_POINTS: usize = 4_000;

/// Generate a distinct color for a series index.
///
/// Hues are spread with the golden ratio; saturation and value stay in the
/// middle so lines read on both light and dark themes.
pub fn series_color(index: usize) -> [u8; 4] {
    const GOLDEN_RATIO: f32 = 0.618_034;

    let hue = ((index as f32 * GOLDEN_RATIO) % 1.0) * 360.0;
    let (r, g, b) = hsv_to_rgb(hue, 0.7, 0.85);
    [r, g, b, 255]
}

/// Convert HSV (hue 0-360, saturation 0-1, value 0-1) to RGB
fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> (u8, u8, u8) {
    let c = value * saturation;
    let x = c * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
    let m = value - c;

    let (r, g, b) = match (hue / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (
        ((r + m) * 255.0) as u8,
        ((g + m) * 255.0) as u8,
        ((b + m) * 255.0) as u8,
    )
}

/// Reduce `points` to about `max_points` while keeping each bucket's extremes.
///
/// NaN samples never count as extremes; a bucket made only of NaN samples
/// keeps its first one so the gap survives.
pub fn decimate_points(points: &[[f64; 2]], max_points: usize) -> Vec<[f64; 2]> {
    if points.len() <= max_points || points.len() < 3 {
        return points.to_vec();
    }

    let bucket_size = (points.len() / (max_points / 2).max(1)).max(1);
    let mut result = Vec::with_capacity(max_points + 2);

    result.push(points[0]);

    for bucket in points[1..points.len() - 1].chunks(bucket_size) {
        let Some(seed) = bucket.iter().find(|pt| !pt[1].is_nan()) else {
            result.push(bucket[0]);
            continue;
        };
        // Comparisons with NaN are false, so later gaps never replace the seed
        let (min_pt, max_pt) = bucket.iter().fold((*seed, *seed), |(min, max), pt| {
            (
                if pt[1] < min[1] { *pt } else { min },
                if pt[1] > max[1] { *pt } else { max },
            )
        });
        if min_pt[0] < max_pt[0] {
            result.push(min_pt);
            result.push(max_pt);
        } else if min_pt[0] > max_pt[0] {
            result.push(max_pt);
            result.push(min_pt);
        } else {
            result.push(min_pt);
        }
    }

    result.push(points[points.len() - 1]);
    result
}

/// Split a line at NaN samples so each run is drawn on its own
pub fn split_at_gaps(points: &[[f64; 2]]) -> Vec<Vec<[f64; 2]>> {
    points
        .split(|p| !p[1].is_finite())
        .filter(|run| !run.is_empty())
        .map(<[[f64; 2]]>::to_vec)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_at_gaps() {
        let nan = f64::NAN;
        let points = [[0.0, 1.0], [1.0, nan], [2.0, 3.0], [3.0, 4.0], [4.0, nan]];
        let runs = split_at_gaps(&points);
        assert_eq!(runs, vec![vec![[0.0, 1.0]], vec![[2.0, 3.0], [3.0, 4.0]]]);
        assert!(split_at_gaps(&[[0.0, nan]]).is_empty());
    }

    #[test]
    fn test_series_colors_are_distinct() {
        let colors: Vec<_> = (0..8).map(series_color).collect();
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(colors.iter().all(|c| c[3] == 255));
    }

    #[test]
    fn test_decimate_short_input_untouched() {
        let points = vec![[0.0, 1.0], [1.0, 2.0]];
        assert_eq!(decimate_points(&points, 10), points);
    }

    #[test]
    fn test_decimate_keeps_ends_and_extremes() {
        let points: Vec<[f64; 2]> = (0..10_000)
            .map(|i| [i as f64, if i == 5_000 { 100.0 } else { 0.0 }])
            .collect();
        let reduced = decimate_points(&points, 1_000);
        assert!(reduced.len() <= 1_100);
        assert_eq!(reduced.first(), points.first());
        assert_eq!(reduced.last(), points.last());
        assert!(reduced.iter().any(|p| p[1] == 100.0));
        assert!(reduced.windows(2).all(|w| w[0][0] <= w[1][0]));
    }

    #[test]
    fn test_decimate_ignores_leading_nan_in_bucket() {
        let points: Vec<[f64; 2]> = (0..1_000)
            .map(|i| {
                let y = match i % 100 {
                    1 => f64::NAN,
                    50 => 10.0,
                    60 => -10.0,
                    _ => 0.0,
                };
                [i as f64, y]
            })
            .collect();
        let reduced = decimate_points(&points, 20);
        assert!(reduced.iter().filter(|p| p[1] == 10.0).count() >= 9);
        assert!(reduced.iter().filter(|p| p[1] == -10.0).count() >= 9);
    }

    #[test]
    fn test_decimate_keeps_all_nan_bucket_as_gap() {
        let points: Vec<[f64; 2]> = (0..100)
            .map(|i| [i as f64, if (40..70).contains(&i) { f64::NAN } else { 1.0 }])
            .collect();
        let reduced = decimate_points(&points, 10);
        assert!(reduced.iter().any(|p| p[1].is_nan()));
        assert!(reduced.windows(2).all(|w| w[0][0] <= w[1][0]));
    }
}
