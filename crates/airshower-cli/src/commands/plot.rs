use crate::cli::PlotArgs;
use crate::config::{AppConfig, build_config};
use crate::error::{CliError, Result};
use crate::plot;
use crate::utils::progress::CliProgressHandler;
use airshower::core::io::export::write_histogram_csv_to_path;
use airshower::core::io::shower_file::ShowerFile;
use airshower::engine::distribution::{GroundDistribution, ParticleCategory};
use airshower::engine::progress::ProgressReporter;
use airshower::workflows;
use std::path::{Path, PathBuf};
use tracing::info;

pub fn run(args: PlotArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app = build_config(&args)?;
    execute(&app, CliProgressHandler::new())
}

fn execute(app: &AppConfig, progress_handler: CliProgressHandler) -> Result<()> {
    println!("opening {}", app.input_path.display());
    let mut file = ShowerFile::open_with(&app.input_path, app.distribution.shower_file_options())
        .map_err(|source| CliError::Corsika {
            path: app.input_path.clone(),
            source,
        })?;
    println!("File has {} showers", file.n_events());

    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    info!("Invoking the ground distribution workflow...");
    let distribution =
        workflows::ground_distribution::run(&mut file, &app.distribution, &reporter)?;

    plot::render_ground_distribution(&distribution, &app.output_path).map_err(|source| {
        CliError::Render {
            path: app.output_path.clone(),
            source,
        }
    })?;
    println!("Canvas written to: {}", app.output_path.display());

    if let Some(csv_dir) = &app.csv_dir {
        let written = export_csv(&distribution, csv_dir)?;
        println!(
            "{} histogram table(s) written to: {}",
            written.len(),
            csv_dir.display()
        );
    }

    print_summary(&distribution);
    Ok(())
}

fn export_csv(distribution: &GroundDistribution, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    distribution
        .iter()
        .map(|(_, hist)| -> Result<PathBuf> {
            let path = dir.join(format!("{}.csv", hist.name));
            info!("Writing {} histogram to {:?}", hist.title, &path);
            write_histogram_csv_to_path(hist, &path)?;
            Ok(path)
        })
        .collect()
}

fn print_summary(distribution: &GroundDistribution) {
    println!(
        "Accumulated {} particle(s) from {} shower(s):",
        distribution.particles_seen(),
        distribution.showers_seen()
    );
    for category in ParticleCategory::ALL {
        let hist = distribution.histogram(category);
        println!(
            "  {:<10} {:>10} (outside window: {})",
            category,
            hist.entries(),
            hist.underflow() + hist.overflow()
        );
    }
}
