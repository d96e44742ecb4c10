//! Filter rasterization for the software surface.
//!
//! Applies a [`FilterChain`] to an RGBA layer in chain order. Colour filters
//! work on straight (non-premultiplied) components in `0.0..=1.0` and clamp
//! after every step, the same way chained canvas filters behave.
//!
//! ## Colour Matrices
//! Grayscale, sepia, saturate and hue-rotate use the Filter Effects
//! coefficient matrices, so results line up with what a browser canvas
//! produces for the same filter string.

use image::{imageops, RgbaImage};
use log::warn;

use crate::filter::{Filter, FilterChain};

type Matrix3 = [[f32; 3]; 3];

/// Apply every filter of `chain` to `layer` in place.
pub fn apply_filters(layer: &mut RgbaImage, chain: &FilterChain) {
    for filter in chain {
        match filter {
            Filter::Blur(sigma) => {
                // capped at the layer's longest edge
                let longest = layer.width().max(layer.height()) as f32;
                let sigma = (*sigma as f32).min(longest);
                if sigma >= f32::MIN_POSITIVE {
                    *layer = imageops::blur(&*layer, sigma);
                }
            }
            Filter::Custom(token) => {
                warn!(target: "pixform", "skipping filter {token:?}: not supported by the raster surface");
            }
            other => apply_per_pixel(layer, other),
        }
    }
}

fn apply_per_pixel(layer: &mut RgbaImage, filter: &Filter) {
    for pixel in layer.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let rgba = [
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        ];
        let out = apply_filter(rgba, filter);
        pixel.0 = out.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    }
}

/// Apply one non-spatial filter to a straight RGBA colour.
#[inline]
fn apply_filter([r, g, b, a]: [f32; 4], filter: &Filter) -> [f32; 4] {
    let rgb = [r, g, b];
    let [r, g, b] = match filter {
        Filter::Brightness(amount) => apply_brightness(rgb, *amount as f32),
        Filter::Contrast(amount) => apply_contrast(rgb, *amount as f32),
        Filter::Grayscale(amount) => apply_matrix(rgb, &grayscale_matrix(*amount as f32)),
        Filter::Sepia(amount) => apply_matrix(rgb, &sepia_matrix(*amount as f32)),
        Filter::Saturate(amount) => apply_matrix(rgb, &saturate_matrix(*amount as f32)),
        Filter::HueRotate(angle) => apply_matrix(rgb, &hue_rotate_matrix(*angle as f32)),
        Filter::Invert(amount) => apply_invert(rgb, *amount as f32),
        Filter::Opacity(amount) => return [r, g, b, a * amount.min(1.0) as f32],
        Filter::Blur(_) | Filter::Custom(_) => rgb,
    };
    [r, g, b, a]
}

/// Formula: `output = input * amount`
#[inline]
fn apply_brightness(rgb: [f32; 3], amount: f32) -> [f32; 3] {
    rgb.map(|c| c * amount)
}

/// Contrast around mid-grey.
///
/// Formula: `output = (input - 0.5) * amount + 0.5`
#[inline]
fn apply_contrast(rgb: [f32; 3], amount: f32) -> [f32; 3] {
    let midpoint = 0.5;
    rgb.map(|c| (c - midpoint) * amount + midpoint)
}

/// Formula: `output = amount * (1 - input) + (1 - amount) * input`
#[inline]
fn apply_invert(rgb: [f32; 3], amount: f32) -> [f32; 3] {
    let amount = amount.min(1.0);
    rgb.map(|c| amount * (1.0 - c) + (1.0 - amount) * c)
}

#[inline]
fn apply_matrix([r, g, b]: [f32; 3], m: &Matrix3) -> [f32; 3] {
    [
        m[0][0] * r + m[0][1] * g + m[0][2] * b,
        m[1][0] * r + m[1][1] * g + m[1][2] * b,
        m[2][0] * r + m[2][1] * g + m[2][2] * b,
    ]
}

fn grayscale_matrix(amount: f32) -> Matrix3 {
    let s = 1.0 - amount.min(1.0);
    [
        [0.2126 + 0.7874 * s, 0.7152 - 0.7152 * s, 0.0722 - 0.0722 * s],
        [0.2126 - 0.2126 * s, 0.7152 + 0.2848 * s, 0.0722 - 0.0722 * s],
        [0.2126 - 0.2126 * s, 0.7152 - 0.7152 * s, 0.0722 + 0.9278 * s],
    ]
}

fn sepia_matrix(amount: f32) -> Matrix3 {
    let s = 1.0 - amount.min(1.0);
    [
        [0.393 + 0.607 * s, 0.769 - 0.769 * s, 0.189 - 0.189 * s],
        [0.349 - 0.349 * s, 0.686 + 0.314 * s, 0.168 - 0.168 * s],
        [0.272 - 0.272 * s, 0.534 - 0.534 * s, 0.131 + 0.869 * s],
    ]
}

fn saturate_matrix(s: f32) -> Matrix3 {
    [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ]
}

fn hue_rotate_matrix(angle: f32) -> Matrix3 {
    let (sin, cos) = angle.sin_cos();
    [
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ]
}
