//! Scalar to color mapping for normalized fields.
//!
//! [`turbo`] is the degree-5 polynomial fit of the Turbo colormap published
//! with the colormap itself (dark blue → cyan → green → yellow → red).

/// Linear RGB triple with channels in `[0, 1]`
pub type Rgb = [f64; 3];

/// Alpha written for every pixel by [`scalars_to_rgba`]
pub const RGBA_ALPHA: u8 = 220;

const RED: [f64; 6] = [
    0.13572138,
    4.61539260,
    -42.66032258,
    132.13108234,
    -152.94239396,
    59.28637943,
];
const GREEN: [f64; 6] = [
    0.09140261,
    2.19418839,
    4.84296658,
    -14.18503333,
    4.27729857,
    2.82956604,
];
const BLUE: [f64; 6] = [
    0.10667330,
    12.64194608,
    -60.58204836,
    110.36276771,
    -89.90310912,
    27.34824973,
];

fn polynomial(coefficients: &[f64; 6], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// Turbo color for `t`.
///
/// `t` is clamped to `[0, 1]` first; each channel is clamped afterwards since
/// the fit overshoots near the ends.
pub fn turbo(t: f64) -> Rgb {
    // NaN maps to the low end
    let x = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    [
        polynomial(&RED, x).clamp(0.0, 1.0),
        polynomial(&GREEN, x).clamp(0.0, 1.0),
        polynomial(&BLUE, x).clamp(0.0, 1.0),
    ]
}

fn channel_to_byte(c: f64) -> u8 {
    (c * 255.0).round() as u8
}

/// Convert normalized scalars to an RGBA8 buffer using [`turbo`].
///
/// The buffer holds `4 * scalars.len()` bytes in scalar order.
pub fn scalars_to_rgba(scalars: &[f64]) -> Vec<u8> {
    scalars_to_rgba_with(scalars, turbo)
}

/// Convert normalized scalars to an RGBA8 buffer with any colormap.
pub fn scalars_to_rgba_with<F>(scalars: &[f64], colormap: F) -> Vec<u8>
where
    F: Fn(f64) -> Rgb,
{
    let mut out = Vec::with_capacity(scalars.len() * 4);
    for &s in scalars {
        let [r, g, b] = colormap(s);
        out.extend_from_slice(&[
            channel_to_byte(r),
            channel_to_byte(g),
            channel_to_byte(b),
            RGBA_ALPHA,
        ]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turbo_channels_in_unit_range() {
        for i in 0..=100 {
            let t = i as f64 / 100.0;
            for c in turbo(t) {
                assert!((0.0..=1.0).contains(&c), "t={} channel={}", t, c);
            }
        }
    }

    #[test]
    fn test_turbo_clamps_input() {
        assert_eq!(turbo(-1.0), turbo(0.0));
        assert_eq!(turbo(2.0), turbo(1.0));
        assert_eq!(turbo(f64::NAN), turbo(0.0));
    }

    #[test]
    fn test_turbo_runs_blue_to_red() {
        let low = turbo(0.0);
        let high = turbo(1.0);
        let mid = turbo(0.5);
        // dark start, red end, green middle
        assert!(high[0] > 0.4);
        assert!(high[0] > high[1] && high[0] > high[2]);
        assert!(mid[1] > 0.8);
        assert!(low.iter().sum::<f64>() < 0.6);
    }

    #[test]
    fn test_rgba_layout() {
        let scalars = [0.0, 0.25, 0.5, 1.0, 0.8];
        let rgba = scalars_to_rgba(&scalars);
        assert_eq!(rgba.len(), 4 * scalars.len());
        for (i, pixel) in rgba.chunks_exact(4).enumerate() {
            assert_eq!(pixel[3], RGBA_ALPHA);
            let [r, g, b] = turbo(scalars[i]);
            assert_eq!(pixel[0], (r * 255.0).round() as u8);
            assert_eq!(pixel[1], (g * 255.0).round() as u8);
            assert_eq!(pixel[2], (b * 255.0).round() as u8);
        }
        assert!(scalars_to_rgba(&[]).is_empty());
    }

    #[test]
    fn test_custom_colormap() {
        let grey = |t: f64| [t, t, t];
        let rgba = scalars_to_rgba_with(&[0.0, 1.0], grey);
        assert_eq!(rgba, vec![0, 0, 0, 220, 255, 255, 255, 220]);
    }
}
