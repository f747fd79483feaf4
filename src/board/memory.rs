// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use serde::Serialize;

use super::{Board, Footprint, Vec2I, BACK_COPPER, FRONT_COPPER};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryFootprint {
    pub reference: String,
    pub layer: String,
    pub locked: bool,
    pub position: Vec2I,
    pub orientation: f64,
    /// How many times the footprint was flipped
    pub flips: usize,
}

impl MemoryFootprint {
    pub fn new(reference: &str, layer: &str) -> Self {
        Self {
            reference: reference.to_string(),
            layer: layer.to_string(),
            locked: false,
            position: Vec2I::default(),
            orientation: 0.0,
            flips: 0,
        }
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    pub fn at(mut self, position: Vec2I) -> Self {
        self.position = position;
        self
    }
}

impl Footprint for MemoryFootprint {
    fn reference(&self) -> &str {
        &self.reference
    }

    fn is_locked(&self) -> bool {
        self.locked
    }

    fn layer_name(&self) -> &str {
        &self.layer
    }

    fn position(&self) -> Vec2I {
        self.position
    }

    fn orientation_degrees(&self) -> f64 {
        self.orientation
    }

    fn set_position(&mut self, position: Vec2I) {
        self.position = position;
    }

    fn set_orientation_degrees(&mut self, degrees: f64) {
        self.orientation = degrees;
    }

    fn flip_left_right(&mut self) {
        self.layer = if self.layer == FRONT_COPPER {
            BACK_COPPER.to_string()
        } else {
            FRONT_COPPER.to_string()
        };
        self.orientation = 180.0 - self.orientation;
        self.flips += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemoryGroup {
    pub name: String,
    pub members: Vec<String>,
}

/// Board held entirely in memory, used for dry runs and tests
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MemoryBoard {
    pub footprints: Vec<MemoryFootprint>,
    pub groups: Vec<MemoryGroup>,
    pub aux_origin: Vec2I,
}

impl MemoryBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_footprint(mut self, footprint: MemoryFootprint) -> Self {
        self.footprints.push(footprint);
        self
    }

    pub fn footprint(&self, refdes: &str) -> Option<&MemoryFootprint> {
        self.find_footprint_by_reference(refdes)
    }
}

impl Board for MemoryBoard {
    type Footprint = MemoryFootprint;

    fn find_footprint_by_reference(&self, refdes: &str) -> Option<&MemoryFootprint> {
        self.footprints.iter().find(|fp| fp.reference == refdes)
    }

    fn find_footprint_by_reference_mut(&mut self, refdes: &str) -> Option<&mut MemoryFootprint> {
        self.footprints.iter_mut().find(|fp| fp.reference == refdes)
    }

    fn add_group(&mut self, name: &str, references: &[&str]) -> usize {
        let members: Vec<String> = references
            .iter()
            .filter(|refdes| self.find_footprint_by_reference(refdes).is_some())
            .map(|refdes| refdes.to_string())
            .collect();
        let added = members.len();
        self.groups.push(MemoryGroup {
            name: name.to_string(),
            members,
        });
        added
    }

    fn group_count(&self) -> usize {
        self.groups.len()
    }

    fn aux_origin(&self) -> Vec2I {
        self.aux_origin
    }
}
