//! In-memory CORSIKA particle files for tests.
//!
//! Compiled for this crate's own tests, and for dependents that enable the `fixtures`
//! feature in their dev-dependencies.

use super::format::{PARTICLES_PER_SUB_BLOCK, SUB_BLOCKS_PER_DISK_BLOCK, Thinning};
use std::path::Path;

pub const OBSERVATION_HEIGHT_CM: f32 = 110_000.0;

pub fn tag_word(tag: &[u8; 4]) -> f32 {
    bytemuck::cast(*tag)
}

/// A particle record with unit weight, zero momentum along x/y and a fixed time.
pub fn particle(corsika_id: u32, observation_level: u32, x: f32, y: f32) -> [f32; 8] {
    record((corsika_id * 1000 + observation_level) as f32, x, y)
}

pub fn record(description: f32, x: f32, y: f32) -> [f32; 8] {
    [description, 0.0, 0.0, 1.0, x, y, 250.0, 1.0]
}

struct EventSpec {
    number: u32,
    particles: Vec<[f32; 8]>,
    with_long: bool,
    with_trailer: bool,
}

pub struct FileBuilder {
    thinning: Thinning,
    padded: bool,
    run_number: u32,
    events: Vec<EventSpec>,
}

impl FileBuilder {
    pub fn new(thinning: Thinning, padded: bool) -> Self {
        Self {
            thinning,
            padded,
            run_number: 1,
            events: Vec::new(),
        }
    }

    pub fn run_number(mut self, run_number: u32) -> Self {
        self.run_number = run_number;
        self
    }

    pub fn event(mut self, number: u32, particles: &[[f32; 8]]) -> Self {
        self.events.push(EventSpec {
            number,
            particles: particles.to_vec(),
            with_long: false,
            with_trailer: true,
        });
        self
    }

    pub fn event_with_long(mut self, number: u32, particles: &[[f32; 8]]) -> Self {
        self = self.event(number, particles);
        if let Some(last) = self.events.last_mut() {
            last.with_long = true;
        }
        self
    }

    pub fn without_trailer(mut self) -> Self {
        if let Some(last) = self.events.last_mut() {
            last.with_trailer = false;
        }
        self
    }

    pub fn build(self) -> Vec<u8> {
        let sub_len = self.thinning.words_per_sub_block();
        let per_particle = self.thinning.words_per_particle();
        let mut sub_blocks: Vec<Vec<f32>> = Vec::new();

        let mut runh = vec![0.0f32; sub_len];
        runh[0] = tag_word(b"RUNH");
        runh[1] = self.run_number as f32;
        runh[2] = 250_101.0;
        runh[3] = 7.74;
        runh[4] = 1.0;
        runh[5] = OBSERVATION_HEIGHT_CM;
        sub_blocks.push(runh);

        for event in &self.events {
            let mut evth = vec![0.0f32; sub_len];
            evth[0] = tag_word(b"EVTH");
            evth[1] = event.number as f32;
            evth[2] = 14.0;
            evth[3] = 1.0e6;
            evth[43] = self.run_number as f32;
            evth[46] = 1.0;
            evth[47] = OBSERVATION_HEIGHT_CM;
            sub_blocks.push(evth);

            for chunk in event.particles.chunks(PARTICLES_PER_SUB_BLOCK) {
                let mut block = vec![0.0f32; sub_len];
                for (slot, p) in chunk.iter().enumerate() {
                    let start = slot * per_particle;
                    block[start..start + per_particle].copy_from_slice(&p[..per_particle]);
                }
                sub_blocks.push(block);
            }

            if event.with_long {
                let mut long = vec![0.0f32; sub_len];
                long[0] = tag_word(b"LONG");
                sub_blocks.push(long);
            }

            if event.with_trailer {
                let mut evte = vec![0.0f32; sub_len];
                evte[0] = tag_word(b"EVTE");
                evte[1] = event.number as f32;
                evte[6] = event.particles.len() as f32;
                sub_blocks.push(evte);
            }
        }

        let mut rune = vec![0.0f32; sub_len];
        rune[0] = tag_word(b"RUNE");
        rune[1] = self.run_number as f32;
        rune[2] = self.events.len() as f32;
        sub_blocks.push(rune);

        while sub_blocks.len() % SUB_BLOCKS_PER_DISK_BLOCK != 0 {
            sub_blocks.push(vec![0.0f32; sub_len]);
        }

        let marker = self.thinning.disk_block_payload_bytes() as u32;
        let mut bytes = Vec::new();
        for disk_block in sub_blocks.chunks(SUB_BLOCKS_PER_DISK_BLOCK) {
            if self.padded {
                bytes.extend_from_slice(&marker.to_ne_bytes());
            }
            for sub_block in disk_block {
                bytes.extend_from_slice(bytemuck::cast_slice(sub_block));
            }
            if self.padded {
                bytes.extend_from_slice(&marker.to_ne_bytes());
            }
        }
        bytes
    }

    pub fn write_to(self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.build())
    }
}
