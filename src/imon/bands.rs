/*
 *  imon/bands.rs
 *
 *  imonctl - iMON display control
 *  (c) 2020-26 Stuart Hunter
 *
 *  Equalizer band data codec
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

//! Sparse band-level mapping and its dense wire form.
//!
//! The display takes equalizer data as a fixed array of 16 levels. Callers
//! usually only care about a few bands, so the host-side form is a sparse
//! map from band index (1..=16) to level (0..=100). Levels are passed
//! through uninterpreted; range clamping is the hardware's business.

use std::collections::HashMap;

/// Number of equalizer bands the display renders.
pub const BAND_COUNT: usize = 16;

/// Sparse band-index → level mapping. Band indices start at 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BandLevels {
    levels: HashMap<u8, i32>,
}

impl BandLevels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one band's level. Bands outside 1..=16 are accepted but never
    /// reach the wire.
    pub fn set(mut self, band: u8, level: i32) -> Self {
        self.levels.insert(band, level);
        self
    }

    /// Dense input: slot `i` becomes band `i + 1`. Extra slots beyond 16
    /// are ignored.
    pub fn from_slice(levels: &[i32]) -> Self {
        let mut out = Self::new();
        for (i, &level) in levels.iter().take(BAND_COUNT).enumerate() {
            out.levels.insert((i + 1) as u8, level);
        }
        out
    }

    pub fn get(&self, band: u8) -> Option<i32> {
        self.levels.get(&band).copied()
    }

    /// Dense wire form: slot 0 = band 1, unmapped bands default to 0.
    pub fn to_wire(&self) -> [i32; BAND_COUNT] {
        let mut wire = [0i32; BAND_COUNT];
        for (slot, out) in wire.iter_mut().enumerate() {
            if let Some(&level) = self.levels.get(&((slot + 1) as u8)) {
                *out = level;
            }
        }
        wire
    }
}
