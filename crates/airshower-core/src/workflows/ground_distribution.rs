use crate::core::io::shower_file::ShowerFile;
use crate::engine::config::DistributionConfig;
use crate::engine::distribution::{GroundDistribution, ParticleCategory};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use std::io::{Read, Seek};
use tracing::{debug, info, instrument};

/// Bins the ground particles of every shower in `file` by species.
///
/// Showers are visited in file order. When `max_particles` is set, accumulation stops as
/// soon as that many particles have been counted, even in the middle of a shower.
#[instrument(skip_all, name = "ground_distribution_workflow")]
pub fn run<R: Read + Seek>(
    file: &mut ShowerFile<R>,
    config: &DistributionConfig,
    reporter: &ProgressReporter,
) -> Result<GroundDistribution, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Filling ground distributions",
    });

    let mut distribution = GroundDistribution::new(config)?;
    let limit = config.selection.max_particles;
    let limit_reached = |d: &GroundDistribution| limit.is_some_and(|max| d.particles_seen() >= max);

    let n_events = file.n_events();
    info!(
        "Accumulating ground particles of {} shower(s){}.",
        n_events,
        limit.map_or(String::new(), |max| format!(", at most {} particles", max))
    );
    reporter.report(Progress::TaskStart {
        total: n_events as u64,
    });

    for index in 0..n_events {
        if limit_reached(&distribution) {
            info!(
                "Particle limit reached after {} shower(s).",
                distribution.showers_seen()
            );
            break;
        }

        let shower = file.event(index)?;
        let event_number = shower.event_number();
        reporter.report(Progress::StatusUpdate {
            text: format!("shower {}", event_number),
        });

        let before = distribution.particles_seen();
        for particle in file.particles(&shower)? {
            let particle = particle.map_err(|source| EngineError::Shower {
                event_number,
                source,
            })?;
            distribution.accumulate(&particle);
            if limit_reached(&distribution) {
                break;
            }
        }
        distribution.finish_shower();

        debug!(
            "Shower {} (primary {}, {:.3e} GeV): {} particle(s) accumulated",
            event_number,
            shower.header.primary_id,
            shower.header.energy_gev,
            distribution.particles_seen() - before
        );
        reporter.report(Progress::TaskIncrement { amount: 1 });
    }

    reporter.report(Progress::TaskFinish);
    if let Some(max) = limit.filter(|_| limit_reached(&distribution)) {
        reporter.report(Progress::Message(format!(
            "Stopped at the limit of {} particle(s)",
            max
        )));
    }
    for category in ParticleCategory::ALL {
        info!(
            "{}: {} particle(s)",
            category,
            distribution.count(category)
        );
    }
    reporter.report(Progress::PhaseFinish);

    Ok(distribution)
}
