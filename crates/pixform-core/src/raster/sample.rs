//! Source sampling for inverse-mapped drawing.
//!
//! Coordinates are continuous image space: pixel `(i, j)` covers
//! `[i, i+1) x [j, j+1)` and its center sits at `(i + 0.5, j + 0.5)`.
//! Everything outside the image is transparent, which gives drawn edges a
//! one-pixel antialiased falloff under bilinear sampling.

use image::RgbaImage;

/// Premultiplied RGBA of the pixel at `(px, py)`, or transparent outside.
#[inline]
fn premultiplied(image: &RgbaImage, px: i64, py: i64) -> [f64; 4] {
    if px < 0 || py < 0 || px >= image.width() as i64 || py >= image.height() as i64 {
        return [0.0; 4];
    }
    let [r, g, b, a] = image.get_pixel(px as u32, py as u32).0;
    let alpha = a as f64 / 255.0;
    [r as f64 * alpha, g as f64 * alpha, b as f64 * alpha, a as f64]
}

/// Nearest-neighbour sample.
pub fn sample_nearest(image: &RgbaImage, u: f64, v: f64) -> [u8; 4] {
    let (px, py) = (u.floor(), v.floor());
    if px < 0.0 || py < 0.0 || px >= image.width() as f64 || py >= image.height() as f64 {
        return [0; 4];
    }
    image.get_pixel(px as u32, py as u32).0
}

/// Bilinear sample over the 4 nearest pixel centers.
///
/// Interpolation happens on premultiplied values so transparent neighbours
/// do not bleed their (meaningless) colour into the result.
pub fn sample_bilinear(image: &RgbaImage, u: f64, v: f64) -> [u8; 4] {
    let x = u - 0.5;
    let y = v - 0.5;
    let (w, h) = (image.width() as f64, image.height() as f64);

    if x <= -1.0 || y <= -1.0 || x >= w || y >= h {
        return [0; 4];
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let x1 = x0 + 1;
    let y1 = y0 + 1;

    // Fractional distances
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = premultiplied(image, x0, y0);
    let p10 = premultiplied(image, x1, y0);
    let p01 = premultiplied(image, x0, y1);
    let p11 = premultiplied(image, x1, y1);

    let mut acc = [0.0f64; 4];
    for i in 0..4 {
        acc[i] = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
    }

    let alpha = acc[3];
    if alpha <= 0.0 {
        return [0; 4];
    }
    let unpremultiply = 255.0 / alpha;
    [
        (acc[0] * unpremultiply).clamp(0.0, 255.0).round() as u8,
        (acc[1] * unpremultiply).clamp(0.0, 255.0).round() as u8,
        (acc[2] * unpremultiply).clamp(0.0, 255.0).round() as u8,
        alpha.clamp(0.0, 255.0).round() as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_nearest_bounds() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 4]));
        assert_eq!(sample_nearest(&img, 0.0, 0.0), [1, 2, 3, 4]);
        assert_eq!(sample_nearest(&img, 1.99, 1.99), [1, 2, 3, 4]);
        assert_eq!(sample_nearest(&img, 2.0, 0.5), [0; 4]);
        assert_eq!(sample_nearest(&img, -0.01, 0.5), [0; 4]);
    }

    #[test]
    fn test_bilinear_midpoint() {
        let img = RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([200, 200, 200, 255])
            }
        });
        // halfway between the two pixel centers
        assert_eq!(sample_bilinear(&img, 1.0, 0.5), [100, 100, 100, 255]);
    }

    #[test]
    fn test_bilinear_edge_falls_off() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 255]));
        let edge = sample_bilinear(&img, 1.0, 0.5);
        assert_eq!(&edge[..3], &[255, 0, 0]);
        assert!((127..=128).contains(&edge[3]));
        assert_eq!(sample_bilinear(&img, 1.5, 0.5), [0; 4]);
    }

    #[test]
    fn test_bilinear_ignores_transparent_colour() {
        let img = RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 255, 0, 0])
            }
        });
        let mid = sample_bilinear(&img, 1.0, 0.5);
        assert_eq!(&mid[..3], &[255, 0, 0]);
    }
}
