use serde::Serialize;
use std::fmt;

/// Temperature band of a normalized (0.0–1.0) temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TempCategory {
    #[serde(rename = "Very Cold")]
    VeryCold,
    Cold,
    Moderate,
    Warm,
    Hot,
}

impl TempCategory {
    pub fn label(self) -> &'static str {
        match self {
            TempCategory::VeryCold => "Very Cold",
            TempCategory::Cold => "Cold",
            TempCategory::Moderate => "Moderate",
            TempCategory::Warm => "Warm",
            TempCategory::Hot => "Hot",
        }
    }
}

impl fmt::Display for TempCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Bins a normalized temperature.
///
/// | Range        | Category  |
/// |--------------|-----------|
/// | < 0.2        | Very Cold |
/// | 0.2 .. 0.4   | Cold      |
/// | 0.4 .. 0.6   | Moderate  |
/// | 0.6 .. 0.8   | Warm      |
/// | >= 0.8       | Hot       |
///
/// Lower bounds are inclusive; 1.0 (and anything above) is Hot.
pub fn categorize(t: f64) -> TempCategory {
    match t {
        t if t >= 0.8 => TempCategory::Hot,
        t if t >= 0.6 => TempCategory::Warm,
        t if t >= 0.4 => TempCategory::Moderate,
        t if t >= 0.2 => TempCategory::Cold,
        _ => TempCategory::VeryCold,
    }
}
