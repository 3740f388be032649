use super::pdg::{self, PDG_UNDEFINED};
use crate::core::io::block::RawParticle;
use nalgebra::{Point2, Vector3};

/// A particle recorded at an observation level.
///
/// Positions are in cm relative to the shower core, momenta in GeV/c, and times in ns
/// since the first interaction (minus any configured offset).
#[derive(Debug, Clone, PartialEq)]
pub struct CorsikaParticle {
    pub description: f32,
    pub corsika_id: u32,
    pub pdg_code: i32,
    pub hadronic_generation: u32,
    pub observation_level: u32,
    pub momentum: Vector3<f64>,
    pub position: Point2<f64>,
    pub time_or_z: f64,
    pub weight: f64,
    pub parent: Option<Box<CorsikaParticle>>,
    pub grandparent: Option<Box<CorsikaParticle>>,
    pub muon_info: Option<Box<CorsikaParticle>>,
}

impl CorsikaParticle {
    pub fn from_raw(raw: &RawParticle) -> Self {
        let description = raw.description;
        let magnitude = description.abs() as u32;
        let corsika_id = magnitude / 1000;
        Self {
            description,
            corsika_id,
            pdg_code: pdg::corsika_to_pdg(corsika_id),
            hadronic_generation: (magnitude % 1000) / 10,
            observation_level: magnitude % 10,
            momentum: Vector3::new(raw.px as f64, raw.py as f64, raw.pz as f64),
            position: Point2::new(raw.x as f64, raw.y as f64),
            time_or_z: raw.time_or_z as f64,
            weight: raw.weight as f64,
            parent: None,
            grandparent: None,
            muon_info: None,
        }
    }

    /// History records (mother and grandmother particles) carry a negative description.
    pub fn is_history_record(&self) -> bool {
        self.description < 0.0
    }

    pub fn is_defined(&self) -> bool {
        self.pdg_code != PDG_UNDEFINED
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.position.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.position.y
    }

    pub fn set_parent(&mut self, parent: CorsikaParticle) {
        self.parent = Some(Box::new(parent));
    }

    pub fn set_grandparent(&mut self, grandparent: CorsikaParticle) {
        self.grandparent = Some(Box::new(grandparent));
    }

    pub fn set_muon_info(&mut self, info: CorsikaParticle) {
        self.muon_info = Some(Box::new(info));
    }
}
