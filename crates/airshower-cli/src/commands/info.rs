use crate::cli::InfoArgs;
use crate::config::resolve_input_path;
use crate::error::{CliError, Result};
use airshower::core::io::compression::Compression;
use airshower::core::io::error::CorsikaIoError;
use airshower::core::io::shower_file::{ShowerFile, ShowerFileOptions};
use std::io::{Read, Seek, Write};
use std::path::Path;
use tracing::info;

/// What the report covers beyond the run and shower summaries.
#[derive(Debug, Clone, Copy)]
struct ReportOptions {
    count_particles: bool,
    event: Option<u32>,
    compression: Compression,
}

pub fn run(args: InfoArgs) -> Result<()> {
    let input = resolve_input_path(args.input.as_deref(), None, args.data_dir.as_deref())?;
    let options = ShowerFileOptions::default()
        .with_observation_level(args.observation_level)
        .with_time_offset(args.time_offset);
    let mut file = ShowerFile::open_with(&input, options).map_err(|source| CliError::Corsika {
        path: input.clone(),
        source,
    })?;

    let report = ReportOptions {
        count_particles: args.count_particles,
        event: args.event,
        compression: file.compression(),
    };
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_report(&mut file, &input, report, &mut out)
}

fn write_report<R: Read + Seek, W: Write>(
    file: &mut ShowerFile<R>,
    input: &Path,
    report: ReportOptions,
    out: &mut W,
) -> Result<()> {
    let corsika_error = |source: CorsikaIoError| CliError::Corsika {
        path: input.to_path_buf(),
        source,
    };

    let run = file.run_header().clone();
    writeln!(out, "File:    {}", input.display())?;
    writeln!(out, "Format:  {}, {}", file.format(), report.compression)?;
    writeln!(
        out,
        "Run {} (CORSIKA {:.3}), date {}",
        run.run_number, run.version, run.date
    )?;
    writeln!(
        out,
        "Energy:  {:.3e} - {:.3e} GeV, slope {:.2}",
        run.energy_min_gev, run.energy_max_gev, run.energy_slope
    )?;
    for (level, height_cm) in run.observation_levels.iter().enumerate() {
        writeln!(out, "Observation level {}: {:.2} m", level + 1, height_cm / 100.0)?;
    }
    match file.run_trailer() {
        Some(trailer) => writeln!(out, "RUNE:    {} event(s) processed", trailer.events_processed)?,
        None => writeln!(out, "RUNE:    missing")?,
    }
    let time_offset = file.options().particle_filter.time_offset;
    if report.count_particles && time_offset != 0.0 {
        writeln!(out, "Time offset: {} ns", time_offset)?;
    }

    let showers = match report.event {
        Some(number) => vec![file.event_by_number(number).map_err(corsika_error)?],
        None => file.events().map_err(corsika_error)?,
    };
    writeln!(out, "Showers: {}", file.n_events())?;
    for shower in &showers {
        let header = &shower.header;
        write!(
            out,
            "  #{:<5} primary {:>5}  E {:.3e} GeV  zenith {:5.1} deg  e+mu {:.0}  written {}",
            shower.event_number(),
            header.primary_id,
            header.energy_gev,
            header.zenith.to_degrees(),
            shower.trailer.charged_leptons(),
            shower.trailer.particles_written
        )?;
        if report.count_particles {
            let mut reached = 0u64;
            let mut first_arrival: Option<f64> = None;
            for particle in file.particles(shower).map_err(corsika_error)? {
                let particle = particle.map_err(corsika_error)?;
                reached += 1;
                first_arrival = Some(
                    first_arrival.map_or(particle.time_or_z, |t| t.min(particle.time_or_z)),
                );
            }
            info!("Shower {}: {} particle(s)", shower.event_number(), reached);
            if let Some(t) = first_arrival {
                write!(out, "  first arrival {:.1} ns", t)?;
            }
            write!(out, "  at level {}", reached)?;
        }
        writeln!(out)?;
    }

    if report.event.is_none() {
        write!(out, "{}", file.index())?;
    }
    Ok(())
}
