// Raw position strings collapsed to the four roster groups.

use serde::Serialize;
use std::fmt;

/// Coarse position group used for display and roster grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PositionGroup {
    G,
    F,
    C,
    #[serde(rename = "UTIL")]
    Util,
}

impl PositionGroup {
    pub fn as_str(self) -> &'static str {
        match self {
            PositionGroup::G => "G",
            PositionGroup::F => "F",
            PositionGroup::C => "C",
            PositionGroup::Util => "UTIL",
        }
    }
}

impl fmt::Display for PositionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Map a raw position string (e.g. "PG", "sf-pf", "") to its group.
///
/// Only the token before the first hyphen counts. Anything unrecognized,
/// including an empty string, is `UTIL`.
pub fn normalize_position(raw: &str) -> PositionGroup {
    let upper = raw.trim().to_uppercase();
    let primary = upper.split('-').next().unwrap_or("").trim();
    match primary {
        "PG" | "SG" | "G" => PositionGroup::G,
        "SF" | "PF" | "F" => PositionGroup::F,
        "C" => PositionGroup::C,
        _ => PositionGroup::Util,
    }
}
