// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Board collaborator
//!
//! The placement pipeline only needs a handful of board operations: find a
//! footprint by reference, read its layer and lock state, move, rotate and
//! flip it, and collect footprints into a named group. `Board` and `Footprint`
//! describe exactly that surface so the pipeline runs unchanged against a
//! KiCad file (`crate::kicad::KicadBoard`) or an in-memory board.

use serde::{Deserialize, Serialize};

/// KiCad internal units per millimetre (1 IU = 1 nm)
pub const IU_PER_MM: f64 = 1_000_000.0;

pub const FRONT_COPPER: &str = "F.Cu";
pub const BACK_COPPER: &str = "B.Cu";

/// Millimetres to native units, rounded to the nearest unit
pub fn from_mm(mm: f64) -> i64 {
    (mm * IU_PER_MM).round() as i64
}

pub fn to_mm(native: i64) -> f64 {
    native as f64 / IU_PER_MM
}

/// Point in native board units. Board Y grows downwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vec2I {
    pub x: i64,
    pub y: i64,
}

impl Vec2I {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub fn from_mm(x_mm: f64, y_mm: f64) -> Self {
        Self::new(from_mm(x_mm), from_mm(y_mm))
    }

    pub fn to_mm(self) -> (f64, f64) {
        (to_mm(self.x), to_mm(self.y))
    }
}

pub trait Footprint {
    fn reference(&self) -> &str;

    fn is_locked(&self) -> bool;

    /// Name of the layer the footprint sits on, e.g. `F.Cu`
    fn layer_name(&self) -> &str;

    fn position(&self) -> Vec2I;

    /// Centre the footprint flips about
    fn center(&self) -> Vec2I {
        self.position()
    }

    fn orientation_degrees(&self) -> f64;

    fn set_position(&mut self, position: Vec2I);

    /// Absolute orientation, not added to the current one
    fn set_orientation_degrees(&mut self, degrees: f64);

    /// Move the footprint to the other board face, mirrored left-right about its centre
    fn flip_left_right(&mut self);

    fn is_on_front(&self) -> bool {
        self.layer_name() == FRONT_COPPER
    }

    fn is_on_back(&self) -> bool {
        self.layer_name() == BACK_COPPER
    }
}

pub trait Board {
    type Footprint: Footprint;

    fn find_footprint_by_reference(&self, refdes: &str) -> Option<&Self::Footprint>;

    fn find_footprint_by_reference_mut(&mut self, refdes: &str) -> Option<&mut Self::Footprint>;

    /// Create a group called `name` holding the footprints with the given
    /// references. References absent from the board are ignored. Returns the
    /// number of members added.
    fn add_group(&mut self, name: &str, references: &[&str]) -> usize;

    fn group_count(&self) -> usize;

    /// Auxiliary (drill/file) origin
    fn aux_origin(&self) -> Vec2I;
}

pub mod memory;

pub use memory::{MemoryBoard, MemoryFootprint};
