use phf::{Map, phf_map};

pub const PDG_UNDEFINED: i32 = 0;
pub const PDG_PHOTON: i32 = 22;
pub const PDG_ELECTRON: i32 = 11;
pub const PDG_POSITRON: i32 = -11;
pub const PDG_MUON: i32 = 13;
pub const PDG_ANTI_MUON: i32 = -13;
pub const PDG_PROTON: i32 = 2212;
pub const PDG_NEUTRON: i32 = 2112;
/// Muons that decayed before reaching the observation level (not a PDG-assigned code).
pub const PDG_DECAYED_MUON: i32 = 9_900_013;
pub const PDG_DECAYED_ANTI_MUON: i32 = -9_900_013;

/// Muon additional information for mu+ and mu-. It applies to the particle record that
/// follows, whatever its species.
pub const CORSIKA_MU_PLUS_INFO: u32 = 75;
pub const CORSIKA_MU_MINUS_INFO: u32 = 76;

const FIRST_NUCLEUS_ID: u32 = 200;
const LAST_NUCLEUS_ID: u32 = 5699;

#[rustfmt::skip]
static CORSIKA_TO_PDG: Map<u32, i32> = phf_map! {
    // --- Leptons and photons ---
    1u32 => 22,
    2u32 => -11, 3u32 => 11,
    5u32 => -13, 6u32 => 13,
    66u32 => 12, 67u32 => -12, 68u32 => 14, 69u32 => -14,
    131u32 => -15, 132u32 => 15, 133u32 => 16, 134u32 => -16,
    85u32 => -9_900_013, 86u32 => 9_900_013,

    // --- Mesons ---
    7u32 => 111, 8u32 => 211, 9u32 => -211,
    10u32 => 130, 11u32 => 321, 12u32 => -321, 16u32 => 310,
    17u32 => 221, 71u32 => 221, 72u32 => 221, 73u32 => 221, 74u32 => 221,
    50u32 => 223, 51u32 => 113, 52u32 => 213, 53u32 => -213,
    62u32 => 313, 63u32 => 323, 64u32 => -323, 65u32 => -313,
    116u32 => 421, 117u32 => 411, 118u32 => -411, 119u32 => -421,
    120u32 => 431, 121u32 => -431,

    // --- Baryons ---
    13u32 => 2112, 14u32 => 2212, 15u32 => -2212, 25u32 => -2112,
    18u32 => 3122, 19u32 => 3222, 20u32 => 3212, 21u32 => 3112,
    22u32 => 3322, 23u32 => 3312, 24u32 => 3334,
    26u32 => -3122, 27u32 => -3222, 28u32 => -3212, 29u32 => -3112,
    30u32 => -3322, 31u32 => -3312, 32u32 => -3334,
    54u32 => 2224, 55u32 => 2214, 56u32 => 2114, 57u32 => 1114,
    58u32 => -2224, 59u32 => -2214, 60u32 => -2114, 61u32 => -1114,
};

/// Converts a CORSIKA particle id into a PDG Monte Carlo code.
///
/// Nuclei are encoded by CORSIKA as `A * 100 + Z` and map onto the PDG ion scheme
/// `10LZZZAAAI`. Ids without a known counterpart map to [`PDG_UNDEFINED`].
pub fn corsika_to_pdg(corsika_id: u32) -> i32 {
    if let Some(&code) = CORSIKA_TO_PDG.get(&corsika_id) {
        return code;
    }
    if (FIRST_NUCLEUS_ID..=LAST_NUCLEUS_ID).contains(&corsika_id) {
        let mass_number = (corsika_id / 100) as i32;
        let charge = (corsika_id % 100) as i32;
        if charge > 0 && charge <= mass_number {
            return 1_000_000_000 + charge * 10_000 + mass_number * 10;
        }
    }
    PDG_UNDEFINED
}

pub fn is_decayed_muon(pdg_code: i32) -> bool {
    pdg_code == PDG_DECAYED_MUON || pdg_code == PDG_DECAYED_ANTI_MUON
}
