//! Bilinear sampling and alpha-over blending on RGBA8 buffers.
//!
//! Sampling happens in premultiplied space so that transparent texels do
//! not bleed their (meaningless) color into neighbouring opaque ones.

use crate::decode::RasterBuffer;

/// Read a texel as premultiplied `[r, g, b, a]` in the 0-255 range.
#[inline]
fn premultiplied(image: &RasterBuffer, px: usize, py: usize) -> [f64; 4] {
    let idx = (py * image.width as usize + px) * RasterBuffer::CHANNELS;
    let a = image.pixels[idx + 3] as f64;
    let k = a / 255.0;
    [
        image.pixels[idx] as f64 * k,
        image.pixels[idx + 1] as f64 * k,
        image.pixels[idx + 2] as f64 * k,
        a,
    ]
}

/// Sample the image at continuous texel coordinates using bilinear
/// interpolation. Texel centers sit at integer coordinates; positions
/// beyond the edge clamp to the border texels.
///
/// The image must be non-empty.
pub(crate) fn sample_bilinear(image: &RasterBuffer, x: f64, y: f64) -> [f64; 4] {
    let max_x = (image.width - 1) as f64;
    let max_y = (image.height - 1) as f64;
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(image.width as usize - 1);
    let y1 = (y0 + 1).min(image.height as usize - 1);

    // Fractional distances
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = premultiplied(image, x0, y0);
    let p10 = premultiplied(image, x1, y0);
    let p01 = premultiplied(image, x0, y1);
    let p11 = premultiplied(image, x1, y1);

    let mut result = [0.0f64; 4];
    for i in 0..4 {
        result[i] = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
    }
    result
}

/// Composite a premultiplied source color over a straight-alpha RGBA8 pixel.
#[inline]
pub(crate) fn blend_over(dst: &mut [u8], src: [f64; 4]) {
    let src_alpha = (src[3] / 255.0).clamp(0.0, 1.0);
    let inv = 1.0 - src_alpha;

    let dst_alpha = dst[3] as f64;
    let out_alpha = src[3] + dst_alpha * inv;
    if out_alpha <= 0.0 {
        dst.copy_from_slice(&[0, 0, 0, 0]);
        return;
    }

    let dst_k = dst_alpha / 255.0;
    for i in 0..3 {
        let premul = src[i] + dst[i] as f64 * dst_k * inv;
        dst[i] = to_u8(premul * 255.0 / out_alpha);
    }
    dst[3] = to_u8(out_alpha);
}

#[inline]
fn to_u8(v: f64) -> u8 {
    v.clamp(0.0, 255.0).round() as u8
}
