use airshower::core::histogram::Histogram2D;
use airshower::engine::distribution::GroundDistribution;
use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use tracing::debug;

const CANVAS_SIZE: (u32, u32) = (1200, 1000);
const CAPTION_FONT: (&str, u32) = ("sans-serif", 20);

/// Maps bin contents onto a blue-to-red hue on a log10 scale.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LogColorScale {
    log_low: f64,
    log_high: f64,
}

impl LogColorScale {
    /// `None` when the histogram has no positive bin.
    fn for_histogram(hist: &Histogram2D) -> Option<Self> {
        let low = hist.min_positive_content()?;
        let high = hist.max_bin_content();
        Some(Self {
            log_low: low.log10(),
            log_high: high.log10(),
        })
    }

    fn fraction(&self, content: f64) -> f64 {
        let span = self.log_high - self.log_low;
        if span <= 0.0 {
            return 1.0;
        }
        ((content.log10() - self.log_low) / span).clamp(0.0, 1.0)
    }

    fn color(&self, content: f64) -> HSLColor {
        let t = self.fraction(content);
        HSLColor((240.0 - 240.0 * t) / 360.0, 0.85, 0.22 + 0.50 * t)
    }
}

/// Renders the four species histograms on a 2x2 SVG canvas, left to right, top to bottom.
pub fn render_ground_distribution(distribution: &GroundDistribution, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create directory {}", parent.display()))?;
    }

    let root = SVGBackend::new(path, CANVAS_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((2, 2));

    for ((category, hist), panel) in distribution.iter().zip(panels.iter()) {
        debug!(
            "Drawing {} panel: {} entries, max bin {}",
            category,
            hist.entries(),
            hist.max_bin_content()
        );
        draw_panel(panel, hist)?;
    }

    root.present()
        .with_context(|| format!("cannot write {}", path.display()))?;
    Ok(())
}

fn draw_panel(area: &DrawingArea<SVGBackend<'_>, Shift>, hist: &Histogram2D) -> Result<()> {
    let x = hist.x_axis();
    let y = hist.y_axis();

    let mut chart = ChartBuilder::on(area)
        .caption(
            format!("{} ({} entries)", hist.title, hist.entries()),
            CAPTION_FONT,
        )
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(55)
        .build_cartesian_2d(x.low..x.high, y.low..y.high)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("x")
        .y_desc("y")
        .draw()?;

    // Empty bins stay blank; log(0) has no colour.
    let Some(scale) = LogColorScale::for_histogram(hist) else {
        return Ok(());
    };
    chart.draw_series(
        hist.iter_bins()
            .filter(|&(_, _, content)| content > 0.0)
            .map(|(ix, iy, content)| {
                let ((x0, x1), (y0, y1)) = hist.bin_edges(ix, iy);
                Rectangle::new([(x0, y0), (x1, y1)], scale.color(content).filled())
            }),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use airshower::engine::config::DistributionConfigBuilder;
    use tempfile::tempdir;

    #[test]
    fn log_scale_spans_min_to_max() {
        let mut hist = Histogram2D::square("h", "H", 4, 4.0).unwrap();
        hist.fill_weighted(-1.5, -1.5, 1.0);
        hist.fill_weighted(1.5, 1.5, 100.0);

        let scale = LogColorScale::for_histogram(&hist).unwrap();
        assert_eq!(scale.fraction(1.0), 0.0);
        assert_eq!(scale.fraction(100.0), 1.0);
        assert!((scale.fraction(10.0) - 0.5).abs() < 1e-12);
        assert_eq!(scale.fraction(1e6), 1.0);
    }

    #[test]
    fn single_valued_histogram_uses_top_colour() {
        let mut hist = Histogram2D::square("h", "H", 4, 4.0).unwrap();
        hist.fill(0.5, 0.5);
        let scale = LogColorScale::for_histogram(&hist).unwrap();
        assert_eq!(scale.fraction(1.0), 1.0);
    }

    #[test]
    fn empty_histogram_has_no_scale() {
        let hist = Histogram2D::square("h", "H", 4, 4.0).unwrap();
        assert!(LogColorScale::for_histogram(&hist).is_none());
    }

    #[test]
    fn renders_four_panels_to_svg() {
        let config = DistributionConfigBuilder::new()
            .side(20.0)
            .bins(10)
            .coordinate_divisor(1.0)
            .build()
            .unwrap();
        let distribution = GroundDistribution::new(&config).unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("plots").join("ground.svg");
        render_ground_distribution(&distribution, &path).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        for title in ["Electrons", "Muons", "Photons", "Other"] {
            assert!(svg.contains(title), "missing panel {}", title);
        }
    }
}
