use serde::Serialize;

/// Contents of the `RUNH` sub-block that opens every CORSIKA particle file.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RunHeader {
    pub run_number: u32,
    pub date: u32,
    pub version: f64,
    /// Observation level heights in cm above sea level.
    pub observation_levels: Vec<f64>,
    pub energy_slope: f64,
    pub energy_min_gev: f64,
    pub energy_max_gev: f64,
}

/// Contents of the `RUNE` sub-block that closes a run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RunTrailer {
    pub run_number: u32,
    pub events_processed: u64,
}

/// Contents of an `EVTH` sub-block. Angles are in radians, heights in cm.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EventHeader {
    pub event_number: u32,
    /// CORSIKA particle id of the primary.
    pub primary_id: u32,
    pub energy_gev: f64,
    /// Starting altitude in g/cm^2.
    pub starting_altitude: f64,
    pub first_interaction_height: f64,
    pub zenith: f64,
    pub azimuth: f64,
    pub run_number: u32,
    pub observation_levels: Vec<f64>,
}

/// Contents of an `EVTE` sub-block. Counts are weighted, hence floating point.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EventTrailer {
    pub event_number: u32,
    pub photons: f64,
    pub electrons: f64,
    pub hadrons: f64,
    pub muons: f64,
    pub particles_written: f64,
}

impl EventTrailer {
    pub fn charged_leptons(&self) -> f64 {
        self.electrons + self.muons
    }
}

/// One simulated air shower: its header and trailer records.
///
/// Particles are not held in memory; they are streamed on demand through
/// [`crate::core::io::shower_file::ShowerFile::particles`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shower {
    /// Zero-based position of the shower within its file.
    pub index: usize,
    pub header: EventHeader,
    pub trailer: EventTrailer,
    #[serde(skip)]
    pub(crate) first_block: u64,
}

impl Shower {
    pub fn event_number(&self) -> u32 {
        self.header.event_number
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charged_leptons_sums_electrons_and_muons() {
        let trailer = EventTrailer {
            electrons: 120.0,
            muons: 30.5,
            ..Default::default()
        };
        assert_eq!(trailer.charged_leptons(), 150.5);
    }
}
