//! Upscales the renderer's bitmap into a window-sized `0RGB` buffer.

use rayon::{
    iter::{
        IndexedParallelIterator, IntoParallelRefIterator, IntoParallelRefMutIterator,
        ParallelIterator,
    },
    slice::ParallelSliceMut,
};

use crate::bitmap::{Bitmap, Color};

/// Packs a colour as `0RGB`, the layout softbuffer presents.
#[inline]
pub fn pack_rgb(color: Color) -> u32 {
    (color.b as u32) | ((color.g as u32) << 8) | ((color.r as u32) << 16)
}

/// Source taps and 8.8 fixed-point weight for each destination coordinate
/// along one axis.
#[derive(Debug, Clone, Default)]
struct AxisTaps {
    near: Vec<usize>,
    far: Vec<usize>,
    weight: Vec<u32>,
}

impl AxisTaps {
    fn new(dst: usize, src: usize) -> Self {
        let ratio = src as f32 / dst.max(1) as f32;
        let last = src.saturating_sub(1);
        let mut taps = Self {
            near: Vec::with_capacity(dst),
            far: Vec::with_capacity(dst),
            weight: Vec::with_capacity(dst),
        };
        for i in 0..dst {
            let position = i as f32 * ratio;
            let near = (position.floor() as usize).min(last);
            taps.near.push(near);
            taps.far.push((near + 1).min(last));
            taps.weight
                .push(((position - near as f32).clamp(0.0, 1.0) * 256.0).round() as u32);
        }
        taps
    }
}

/// Precomputed bilinear mapping from a destination size to a source size.
#[derive(Debug, Clone, Default)]
pub struct ScaleLut {
    dst_width: usize,
    src_width: usize,
    columns: AxisTaps,
    rows: AxisTaps,
}

impl ScaleLut {
    pub fn new(dst_width: usize, dst_height: usize, src_width: usize, src_height: usize) -> Self {
        Self {
            dst_width,
            src_width,
            columns: AxisTaps::new(dst_width, src_width),
            rows: AxisTaps::new(dst_height, src_height),
        }
    }

    pub fn matches(&self, dst_width: usize, dst_height: usize, src_width: usize) -> bool {
        self.dst_width == dst_width && self.rows.near.len() == dst_height && self.src_width == src_width
    }
}

#[inline]
fn lerp_packed(a: u32, b: u32, weight: u32) -> u32 {
    let inverse = 256 - weight;
    let rb = (((a & 0x00FF_00FF) * inverse + (b & 0x00FF_00FF) * weight) >> 8) & 0x00FF_00FF;
    let g = (((a & 0x0000_FF00) * inverse + (b & 0x0000_FF00) * weight) >> 8) & 0x0000_FF00;
    rb | g
}

/// Stretches `source` over `dst` with bilinear filtering, one row per task.
/// `packed` is scratch space reused between frames.
pub fn blit_bilinear(dst: &mut [u32], source: &Bitmap, packed: &mut Vec<u32>, lut: &ScaleLut) {
    if lut.dst_width == 0 || source.pixels.is_empty() {
        return;
    }
    packed.resize(source.pixels.len(), 0);
    packed
        .par_iter_mut()
        .zip(source.pixels.par_iter())
        .for_each(|(out, &color)| *out = pack_rgb(color));

    let src = packed.as_slice();
    let sw = lut.src_width;
    dst.par_chunks_mut(lut.dst_width)
        .take(lut.rows.near.len())
        .enumerate()
        .for_each(|(y, row)| {
            let top = lut.rows.near[y] * sw;
            let bottom = lut.rows.far[y] * sw;
            let wy = lut.rows.weight[y];
            for (x, out) in row.iter_mut().enumerate() {
                let (left, right) = (lut.columns.near[x], lut.columns.far[x]);
                let wx = lut.columns.weight[x];
                let upper = lerp_packed(src[top + left], src[top + right], wx);
                let lower = lerp_packed(src[bottom + left], src[bottom + right], wx);
                *out = lerp_packed(upper, lower, wy);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_as_zero_rgb() {
        assert_eq!(pack_rgb(Color::rgb(0x12, 0x34, 0x56)), 0x0012_3456);
    }

    #[test]
    fn lerp_halfway_between_channels() {
        assert_eq!(lerp_packed(0x0000_0000, 0x00FE_FEFE, 128), 0x007F_7F7F);
        assert_eq!(lerp_packed(0x0012_3456, 0x00FF_FFFF, 0), 0x0012_3456);
    }

    #[test]
    fn same_size_blit_is_a_copy() {
        let source = Bitmap::from_pixels(
            2,
            vec![Color::RED, Color::GREEN, Color::BLUE, Color::WHITE],
        );
        let lut = ScaleLut::new(2, 2, 2, 2);
        let mut dst = vec![0; 4];
        let mut packed = Vec::new();
        blit_bilinear(&mut dst, &source, &mut packed, &lut);
        let expected: Vec<u32> = source.pixels.iter().map(|&c| pack_rgb(c)).collect();
        assert_eq!(dst, expected);
    }

    #[test]
    fn upscale_fills_every_pixel() {
        let source = Bitmap::new(3, 2, Color::YELLOW);
        let lut = ScaleLut::new(9, 6, 3, 2);
        let mut dst = vec![0; 54];
        blit_bilinear(&mut dst, &source, &mut Vec::new(), &lut);
        assert!(dst.iter().all(|&pixel| pixel == pack_rgb(Color::YELLOW)));
    }
}
