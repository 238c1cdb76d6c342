//! Loudness-to-color mapping.

use crate::analyzer::AnalysisFrame;

/// Fill color for a frame: loudness picks the hue, saturation and lightness
/// stay fixed at 1.0 and 0.5.
///
/// Deterministic in the frame contents. No smoothing is applied, so the
/// color may visibly flicker between frames on busy material.
pub fn color_for(frame: &AnalysisFrame) -> [f32; 3] {
    hsl_to_rgb(loudness(frame) / 255.0, 1.0, 0.5)
}

/// Aggregate loudness: the quadratic mean of the frequency bins, 0-255
pub fn loudness(frame: &AnalysisFrame) -> f32 {
    let bins = &frame.frequency_bins;
    if bins.is_empty() {
        return 0.0;
    }
    let sum_of_squares: f64 = bins.iter().map(|&bin| (bin as f64) * (bin as f64)).sum();
    (sum_of_squares / bins.len() as f64).sqrt() as f32
}

/// Standard HSL to RGB conversion; hue is cyclic and wraps at 1.0
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> [f32; 3] {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let sector = hue.rem_euclid(1.0) * 6.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as usize {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    [r + m, g + m, b + m]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(&b).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn test_hsl_primaries() {
        assert!(close(hsl_to_rgb(0.0, 1.0, 0.5), [1.0, 0.0, 0.0]));
        assert!(close(hsl_to_rgb(1.0 / 3.0, 1.0, 0.5), [0.0, 1.0, 0.0]));
        assert!(close(hsl_to_rgb(2.0 / 3.0, 1.0, 0.5), [0.0, 0.0, 1.0]));
        // Hue 1.0 wraps around to red
        assert!(close(hsl_to_rgb(1.0, 1.0, 0.5), [1.0, 0.0, 0.0]));
    }

    #[test]
    fn test_loudness_of_uniform_bins() {
        let frame = AnalysisFrame {
            frequency_bins: vec![200; 4096],
            time_samples: vec![128; 4096],
        };
        assert_eq!(loudness(&frame), 200.0);

        assert_eq!(loudness(&AnalysisFrame::silent(4096)), 0.0);
    }

    #[test]
    fn test_zero_frame_maps_to_red() {
        let frame = AnalysisFrame::silent(4096);
        assert!(close(color_for(&frame), [1.0, 0.0, 0.0]));
    }

    #[test]
    fn test_saturated_frame_wraps_to_red() {
        let frame = AnalysisFrame {
            frequency_bins: vec![255; 4096],
            time_samples: vec![255; 4096],
        };
        // Loudness 255 puts the hue at exactly 1.0
        assert!(close(color_for(&frame), [1.0, 0.0, 0.0]));
    }

    #[test]
    fn test_color_is_pure_in_the_bins() {
        let a = AnalysisFrame {
            frequency_bins: vec![1, 2, 3, 250, 13, 80, 80, 9],
            time_samples: vec![128; 8],
        };
        let b = AnalysisFrame {
            frequency_bins: a.frequency_bins.clone(),
            time_samples: vec![0; 8],
        };
        assert_eq!(color_for(&a), color_for(&b));
    }
}
