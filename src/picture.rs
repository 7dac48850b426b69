//! Picture finalisation (15.4.5, 15.5): pad removal, clipping, DC offset,
//! and the `VideoParameters`/`Picture` data types handed to the decoder's
//! output callback.

use crate::idwt::Band;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoParameters {
    pub frame_width: u32,
    pub frame_height: u32,
    pub luma_width: u32,
    pub luma_height: u32,
    pub color_diff_width: u32,
    pub color_diff_height: u32,
    pub luma_depth: u32,
    pub color_diff_depth: u32,
    pub top_field_first: bool,
}

/// Crop a padded, post-synthesis component plane down to its declared
/// dimensions, discarding trailing rows and columns.
pub fn remove_padding(band: &Band, width: u32, height: u32) -> Band {
    band.iter()
        .take(height as usize)
        .map(|row| row.iter().take(width as usize).copied().collect())
        .collect()
}

/// Clip to `[-(1<<(depth-1)), (1<<(depth-1))-1]` then add the offset
/// `1<<(depth-1)` so the final range is `[0, (1<<depth)-1]`.
pub fn clip_and_offset(band: &Band, depth: u32) -> Vec<Vec<u32>> {
    let lo = -(1i64 << (depth - 1));
    let hi = (1i64 << (depth - 1)) - 1;
    let offset = 1i64 << (depth - 1);
    band.iter()
        .map(|row| {
            row.iter()
                .map(|&v| (v.clamp(lo, hi) + offset) as u32)
                .collect()
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Picture {
    pub y: Vec<Vec<u32>>,
    pub c1: Vec<Vec<u32>>,
    pub c2: Vec<Vec<u32>>,
    pub picture_number: u32,
}

pub fn finalise_component(raw: &Band, width: u32, height: u32, depth: u32) -> Vec<Vec<u32>> {
    let cropped = remove_padding(raw, width, height);
    clip_and_offset(&cropped, depth)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_and_offset_maps_full_range() {
        let band = vec![vec![-128i64, 0, 127, 200, -200]];
        let out = clip_and_offset(&band, 8);
        assert_eq!(out[0], vec![0, 128, 255, 255, 0]);
    }

    #[test]
    fn remove_padding_crops_trailing_rows_and_columns() {
        let band: Band = (0..4).map(|y| (0..4).map(|x| (y * 4 + x) as i64).collect()).collect();
        let cropped = remove_padding(&band, 2, 3);
        assert_eq!(cropped.len(), 3);
        assert_eq!(cropped[0].len(), 2);
    }
}
