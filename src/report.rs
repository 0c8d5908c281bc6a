use std::fs;
use std::path::{Path, PathBuf};

use crate::chart::{ChartKind, ChartRenderer, PlottersRenderer};
use crate::compose::{compose_report, ReportCharts};
use crate::error::ReportError;
use crate::metrics::compute_metrics;
use crate::workbook::{is_allowed_extension, load_workbook};

/// Working directories for one generator instance.
///
/// Passed in explicitly at construction; there is no process-wide
/// configuration. Concurrent callers must use distinct directories (or
/// distinct report names), since artifacts are plain files overwritten on
/// every call.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Staging area for uploaded spreadsheets.
    pub upload_dir: PathBuf,
    /// Where finished PDF reports are written.
    pub output_dir: PathBuf,
    /// Where intermediate chart images are written.
    pub plot_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            upload_dir: PathBuf::from("spreadsheets"),
            output_dir: PathBuf::from("reports"),
            plot_dir: PathBuf::from("plots"),
        }
    }
}

impl ReportConfig {
    /// All three working directories under one base directory.
    pub fn under(base: &Path) -> Self {
        ReportConfig {
            upload_dir: base.join("spreadsheets"),
            output_dir: base.join("reports"),
            plot_dir: base.join("plots"),
        }
    }
}

/// Result of one successful generation call.
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub pdf_path: PathBuf,
    pub pdf_bytes: Vec<u8>,
    /// Sales rows dropped for lack of a matching inventory code.
    pub unmatched_sales: usize,
}

/// Pixel dimensions the charts are rasterized at before being scaled onto
/// the page.
const CHART_PX: (u32, u32) = (800, 600);

/// Orchestrates the full pipeline: workbook in, PDF out.
pub struct ReportGenerator {
    config: ReportConfig,
    renderer: Box<dyn ChartRenderer>,
}

impl ReportGenerator {
    pub fn new(config: ReportConfig) -> Result<Self, ReportError> {
        Self::with_renderer(config, Box::new(PlottersRenderer))
    }

    /// Swap in a different chart renderer behind the same pipeline.
    pub fn with_renderer(
        config: ReportConfig,
        renderer: Box<dyn ChartRenderer>,
    ) -> Result<Self, ReportError> {
        for dir in [&config.upload_dir, &config.output_dir, &config.plot_dir] {
            fs::create_dir_all(dir)?;
        }
        Ok(ReportGenerator { config, renderer })
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Generate under the fixed output name `report.pdf`.
    pub fn generate(&self, workbook: &Path) -> Result<GeneratedReport, ReportError> {
        self.generate_named(workbook, "report")
    }

    /// Generate with a caller-supplied output identifier; the PDF is
    /// written to `<output_dir>/<report_name>.pdf`.
    pub fn generate_named(
        &self,
        workbook: &Path,
        report_name: &str,
    ) -> Result<GeneratedReport, ReportError> {
        if !is_allowed_extension(workbook) {
            return Err(ReportError::UnsupportedExtension(
                workbook.display().to_string(),
            ));
        }

        log::info!("generating report '{report_name}' from {}", workbook.display());
        let parsed = load_workbook(workbook)?;
        let metrics = compute_metrics(&parsed.sales, &parsed.inventory)?;

        let revenue_pie = self.renderer.render(
            &metrics.revenue_by_salesperson,
            ChartKind::Pie,
            CHART_PX.0,
            CHART_PX.1,
        )?;
        let profit_pie = self.renderer.render(
            &metrics.profit_by_salesperson,
            ChartKind::Pie,
            CHART_PX.0,
            CHART_PX.1,
        )?;
        let discount_bar = self.renderer.render(
            &metrics.average_discount_by_item,
            ChartKind::Bar,
            CHART_PX.0,
            CHART_PX.1,
        )?;

        // Staged for inspection; the composer consumes the in-memory bytes.
        fs::write(self.config.plot_dir.join("revenue_by_salesperson.png"), &revenue_pie)?;
        fs::write(self.config.plot_dir.join("profit_by_salesperson.png"), &profit_pie)?;
        fs::write(self.config.plot_dir.join("item_average_discount.png"), &discount_bar)?;

        let charts = ReportCharts {
            revenue_pie,
            profit_pie,
            discount_bar,
        };
        let pdf_bytes = compose_report(&metrics, &charts)?;

        let pdf_path = self.config.output_dir.join(format!("{report_name}.pdf"));
        fs::write(&pdf_path, &pdf_bytes)?;
        log::info!("wrote {}", pdf_path.display());

        Ok(GeneratedReport {
            pdf_path,
            pdf_bytes,
            unmatched_sales: metrics.unmatched_sales,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{write_fixture_workbook, FixtureCell, FixtureSheet};

    fn make_generator(base: &Path) -> ReportGenerator {
        ReportGenerator::new(ReportConfig::under(base)).unwrap()
    }

    #[test]
    fn creates_working_directories() {
        let dir = tempfile::tempdir().unwrap();
        let generator = make_generator(dir.path());
        assert!(generator.config().upload_dir.is_dir());
        assert!(generator.config().output_dir.is_dir());
        assert!(generator.config().plot_dir.is_dir());
    }

    #[test]
    fn rejects_disallowed_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let generator = make_generator(dir.path());
        assert!(matches!(
            generator.generate(Path::new("sales.csv")),
            Err(ReportError::UnsupportedExtension(_))
        ));
    }

    #[test]
    fn generates_pdf_and_chart_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.xlsx");
        write_fixture_workbook(
            &input,
            FixtureSheet::default_sales(),
            FixtureSheet::default_inventory(),
        );

        let generator = make_generator(dir.path());
        let report = generator.generate(&input).unwrap();

        assert!(report.pdf_bytes.starts_with(b"%PDF"));
        assert_eq!(report.pdf_path, generator.config().output_dir.join("report.pdf"));
        assert!(report.pdf_path.is_file());
        assert_eq!(report.unmatched_sales, 0);
        for name in [
            "revenue_by_salesperson.png",
            "profit_by_salesperson.png",
            "item_average_discount.png",
        ] {
            assert!(generator.config().plot_dir.join(name).is_file());
        }
    }

    #[test]
    fn named_generation_controls_the_output_path() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.xlsx");
        write_fixture_workbook(
            &input,
            FixtureSheet::default_sales(),
            FixtureSheet::default_inventory(),
        );

        let generator = make_generator(dir.path());
        let report = generator.generate_named(&input, "2026-08-weekly").unwrap();
        assert_eq!(
            report.pdf_path,
            generator.config().output_dir.join("2026-08-weekly.pdf")
        );
    }

    #[test]
    fn unmatched_sales_survive_to_the_report_summary() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.xlsx");
        let mut sales = FixtureSheet::default_sales();
        sales
            .rows
            .push(vec![
                FixtureCell::from(999.0),
                FixtureCell::from("Mallory"),
                FixtureCell::from(1.0),
                FixtureCell::from(1.0),
                FixtureCell::from(0.0),
            ]);
        write_fixture_workbook(&input, sales, FixtureSheet::default_inventory());

        let generator = make_generator(dir.path());
        let report = generator.generate(&input).unwrap();
        assert_eq!(report.unmatched_sales, 1);
    }

    #[test]
    fn malformed_workbook_produces_no_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.xlsx");
        let mut sales = FixtureSheet::default_sales();
        sales.rows.clear();
        write_fixture_workbook(&input, sales, FixtureSheet::default_inventory());

        let generator = make_generator(dir.path());
        assert!(generator.generate(&input).is_err());
        assert!(!generator.config().output_dir.join("report.pdf").exists());
    }
}
