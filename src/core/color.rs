use crate::domain::model::{ColorBand, Rgb};

/// Totals under this many hours are flagged red.
pub const UNDER_THRESHOLD_HOURS: f64 = 20.0;

pub const UNDER_THRESHOLD_COLOR: Rgb = Rgb::new(255, 0, 0);

/// Low → high control colors of the gradient, evenly spaced over `[0, 1]`.
pub const GRADIENT_STOPS: [Rgb; 3] = [
    Rgb::new(255, 165, 0), // orange
    Rgb::new(255, 255, 0), // yellow
    Rgb::new(0, 128, 0),   // green
];

pub fn color_for(hours: f64, max_hours_in_batch: f64) -> ColorBand {
    if hours < UNDER_THRESHOLD_HOURS {
        return ColorBand::UnderThreshold;
    }

    let span = max_hours_in_batch.max(UNDER_THRESHOLD_HOURS) - UNDER_THRESHOLD_HOURS;
    let position = if span > 0.0 {
        ((hours - UNDER_THRESHOLD_HOURS) / span).clamp(0.0, 1.0)
    } else {
        0.0
    };

    ColorBand::Gradient { position }
}

impl ColorBand {
    pub fn rgb(&self) -> Rgb {
        match self {
            ColorBand::UnderThreshold => UNDER_THRESHOLD_COLOR,
            ColorBand::Gradient { position } => interpolate(&GRADIENT_STOPS, *position),
        }
    }

    pub fn hex(&self) -> String {
        self.rgb().to_hex()
    }
}

/// Piecewise-linear interpolation over evenly spaced stops, per RGB component.
pub fn interpolate(stops: &[Rgb], position: f64) -> Rgb {
    match stops {
        [] => UNDER_THRESHOLD_COLOR,
        [only] => *only,
        _ => {
            let p = if position.is_nan() {
                0.0
            } else {
                position.clamp(0.0, 1.0)
            };
            let segments = (stops.len() - 1) as f64;
            let scaled = p * segments;
            let idx = (scaled.floor() as usize).min(stops.len() - 2);
            let t = scaled - idx as f64;

            let (from, to) = (stops[idx], stops[idx + 1]);
            Rgb::new(
                lerp(from.r, to.r, t),
                lerp(from.g, to.g, t),
                lerp(from.b, to.b, t),
            )
        }
    }
}

fn lerp(from: u8, to: u8, t: f64) -> u8 {
    let value = from as f64 + (to as f64 - from as f64) * t;
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_under_threshold_is_red() {
        assert_eq!(color_for(19.99, 60.0), ColorBand::UnderThreshold);
        assert_eq!(color_for(0.0, 0.0), ColorBand::UnderThreshold);
        assert_eq!(color_for(19.99, 60.0).hex(), "#FF0000");
    }

    #[test]
    fn test_threshold_starts_at_orange() {
        let band = color_for(20.0, 20.0);
        assert_eq!(band, ColorBand::Gradient { position: 0.0 });
        assert_eq!(band.rgb(), GRADIENT_STOPS[0]);
        assert_eq!(band.hex(), "#FFA500");
    }

    #[test]
    fn test_gradient_midpoint_and_top() {
        assert_eq!(color_for(40.0, 60.0).rgb(), Rgb::new(255, 255, 0));
        assert_eq!(color_for(60.0, 60.0).rgb(), Rgb::new(0, 128, 0));
    }

    #[test]
    fn test_position_is_clamped() {
        // max below threshold collapses the span
        assert_eq!(color_for(35.0, 10.0), ColorBand::Gradient { position: 0.0 });
        assert_eq!(color_for(90.0, 60.0), ColorBand::Gradient { position: 1.0 });
    }

    #[test]
    fn test_interpolation_within_segment() {
        // a quarter of the way: halfway from orange to yellow
        let rgb = color_for(30.0, 60.0).rgb();
        assert_eq!(rgb, Rgb::new(255, 210, 0));

        // three quarters: halfway from yellow to green
        let rgb = color_for(50.0, 60.0).rgb();
        assert_eq!(rgb, Rgb::new(128, 192, 0));
    }
}
