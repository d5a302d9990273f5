use serde::{Deserialize, Serialize};
use std::fmt;

/// How the stored magnitude of a quantity maps to the value shown to callers.
///
/// Quantities always store the *linearized* magnitude, where addition is physically
/// meaningful. A [`Scale::Decibel`] quantity of `20` stores the power ratio `100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    /// Identity transform.
    #[default]
    Linear,
    /// `10 * log10(x)` for display, `10^(x / 10)` to linearize.
    Decibel,
}

impl Scale {
    /// Maps a display value to its stored, linearized form.
    pub fn linearize(&self, value: f64) -> f64 {
        match self {
            Scale::Linear => value,
            Scale::Decibel => 10f64.powf(value / 10.0),
        }
    }

    /// Maps a stored, linearized magnitude to the value shown to callers.
    pub fn display(&self, magnitude: f64) -> f64 {
        match self {
            Scale::Linear => magnitude,
            Scale::Decibel => 10.0 * magnitude.log10(),
        }
    }

    pub fn is_linear(&self) -> bool {
        matches!(self, Scale::Linear)
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scale::Linear => write!(f, "linear"),
            Scale::Decibel => write!(f, "decibel"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    #[test]
    fn test_linear_is_identity() {
        assert_eq!(Scale::Linear.linearize(-3.5), -3.5);
        assert_eq!(Scale::Linear.display(42.0), 42.0);
    }

    #[test]
    fn test_decibel() {
        assert!(is_close!(Scale::Decibel.linearize(30.0), 1000.0));
        assert!(is_close!(Scale::Decibel.display(100.0), 20.0));
        assert!(is_close!(
            Scale::Decibel.display(Scale::Decibel.linearize(3.0)),
            3.0
        ));
        assert_eq!(Scale::Decibel.linearize(0.0), 1.0);
    }

    #[test]
    fn test_serde() {
        assert_eq!(
            serde_json::to_string(&Scale::Decibel).unwrap(),
            "\"decibel\""
        );
        let scale: Scale = serde_json::from_str("\"linear\"").unwrap();
        assert_eq!(scale, Scale::Linear);
    }
}
