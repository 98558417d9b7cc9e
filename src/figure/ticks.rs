//! Scientific tick labels
//!
//! Every axis shares one power of ten, chosen from the largest absolute bound
//! of its range. Tick labels show the mantissa only and the axis caption
//! carries the factor, e.g. `x [km]  (×1e3)` with ticks `-6.5 … 6.5`.

/// Common power-of-ten scale of one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SciScale {
    pub exponent: i32,
}

impl SciScale {
    pub fn for_range(min: f64, max: f64) -> Self {
        let largest = min.abs().max(max.abs());
        if largest == 0.0 || !largest.is_finite() {
            return Self { exponent: 0 };
        }
        Self {
            exponent: largest.log10().floor() as i32,
        }
    }

    pub fn factor(&self) -> f64 {
        10f64.powi(self.exponent)
    }

    /// Mantissa label of one tick
    pub fn format_tick(&self, value: f64) -> String {
        trim_number(&format!("{:.2}", value / self.factor()))
    }

    /// Axis caption with the scale factor appended
    pub fn caption(&self, label: &str) -> String {
        if self.exponent == 0 {
            label.to_string()
        } else {
            format!("{}  (×1e{})", label, self.exponent)
        }
    }
}

/// Drop trailing zeros and a dangling point; "-0" becomes "0"
fn trim_number(text: &str) -> String {
    let trimmed = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    };
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
