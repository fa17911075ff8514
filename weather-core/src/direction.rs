use serde::{Deserialize, Serialize};

/// 16-point compass label for a wind bearing.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CompassDirection {
    N,
    NNE,
    NE,
    ENE,
    E,
    ESE,
    SE,
    SSE,
    S,
    SSW,
    SW,
    WSW,
    W,
    WNW,
    NW,
    NNW,
    #[default]
    Unknown,
}

/// Upper (inclusive) edge of each sector after north, in clockwise order.
/// The WSW edge sits at 258.76. NNW runs up to, but not including, 348.76
/// where north resumes; that edge is checked before this table.
const SECTORS: [(f64, CompassDirection); 15] = [
    (33.75, CompassDirection::NNE),
    (56.25, CompassDirection::NE),
    (78.75, CompassDirection::ENE),
    (101.25, CompassDirection::E),
    (123.75, CompassDirection::ESE),
    (146.25, CompassDirection::SE),
    (168.75, CompassDirection::SSE),
    (191.25, CompassDirection::S),
    (213.75, CompassDirection::SSW),
    (236.25, CompassDirection::SW),
    (258.76, CompassDirection::WSW),
    (281.25, CompassDirection::W),
    (303.75, CompassDirection::WNW),
    (326.25, CompassDirection::NW),
    (NORTH_WRAP_START, CompassDirection::NNW),
];

const NORTH_END: f64 = 11.25;
const NORTH_WRAP_START: f64 = 348.76;

impl CompassDirection {
    /// Label as displayed; `Unknown` renders empty.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompassDirection::N => "N",
            CompassDirection::NNE => "NNE",
            CompassDirection::NE => "NE",
            CompassDirection::ENE => "ENE",
            CompassDirection::E => "E",
            CompassDirection::ESE => "ESE",
            CompassDirection::SE => "SE",
            CompassDirection::SSE => "SSE",
            CompassDirection::S => "S",
            CompassDirection::SSW => "SSW",
            CompassDirection::SW => "SW",
            CompassDirection::WSW => "WSW",
            CompassDirection::W => "W",
            CompassDirection::WNW => "WNW",
            CompassDirection::NW => "NW",
            CompassDirection::NNW => "NNW",
            CompassDirection::Unknown => "",
        }
    }

    pub fn is_known(&self) -> bool {
        *self != CompassDirection::Unknown
    }
}

impl std::fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a bearing in degrees clockwise from north.
///
/// Every bearing in `[0, 360]` gets one of the 16 labels. Input outside that
/// range and NaN map to [`CompassDirection::Unknown`].
pub fn classify_direction(degrees: f64) -> CompassDirection {
    if !(0.0..=360.0).contains(&degrees) {
        return CompassDirection::Unknown;
    }
    if degrees <= NORTH_END || degrees >= NORTH_WRAP_START {
        return CompassDirection::N;
    }

    SECTORS
        .iter()
        .find(|(upper, _)| degrees <= *upper)
        .map(|(_, direction)| *direction)
        .unwrap_or(CompassDirection::Unknown)
}
