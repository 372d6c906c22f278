//! Zone categories: the functional classification of floor area.
//!
//! Each category has a fixed display color. Unknown category names are
//! rejected at parse time rather than bucketed as `OTHER`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An RGBA color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Functional classification of a floor area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ZoneCategory {
    /// Circulation (hallways). Painted under every other zone.
    Circ,
    Work,
    Wash,
    Operate,
    Meet,
    /// Entrance lounge.
    Entrance,
    Empty,
    Other,
}

impl ZoneCategory {
    /// Every category, in declaration order.
    pub const ALL: [ZoneCategory; 8] = [
        Self::Circ,
        Self::Work,
        Self::Wash,
        Self::Operate,
        Self::Meet,
        Self::Entrance,
        Self::Empty,
        Self::Other,
    ];

    /// Categories shown in the map legend, in display order. `EMPTY` is
    /// drawn white and has no legend entry.
    pub const LEGEND: [ZoneCategory; 7] = [
        Self::Circ,
        Self::Work,
        Self::Wash,
        Self::Operate,
        Self::Meet,
        Self::Entrance,
        Self::Other,
    ];

    /// Wire name as it appears in floor-plan files and scorer responses.
    pub fn name(self) -> &'static str {
        match self {
            Self::Circ => "CIRC",
            Self::Work => "WORK",
            Self::Wash => "WASH",
            Self::Operate => "OPERATE",
            Self::Meet => "MEET",
            Self::Entrance => "ENTRANCE",
            Self::Empty => "EMPTY",
            Self::Other => "OTHER",
        }
    }

    /// Looks up a category by its wire name (case-sensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    pub fn color(self) -> Rgba {
        match self {
            Self::Circ => Rgba::new(255, 247, 220, 255),
            Self::Work => Rgba::new(227, 243, 246, 255),
            Self::Wash => Rgba::new(195, 195, 195, 255),
            Self::Operate => Rgba::new(254, 176, 177, 255),
            Self::Meet => Rgba::new(184, 240, 218, 255),
            Self::Entrance => Rgba::new(255, 210, 118, 255),
            Self::Empty => Rgba::new(255, 255, 255, 255),
            Self::Other => Rgba::new(0, 0, 0, 255),
        }
    }
}

impl fmt::Display for ZoneCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Share of the usable area a zone should occupy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaTarget {
    pub category: ZoneCategory,
    /// Label shown in the zone-area table.
    pub label: &'static str,
    pub fraction: f64,
}

/// Hardcoded target area fractions for the zone-area table, in row order.
pub const AREA_TARGETS: [AreaTarget; 4] = [
    AreaTarget {
        category: ZoneCategory::Work,
        label: "WORK",
        fraction: 0.54,
    },
    AreaTarget {
        category: ZoneCategory::Meet,
        label: "MEET",
        fraction: 0.06,
    },
    AreaTarget {
        category: ZoneCategory::Entrance,
        label: "ENTRANCE",
        fraction: 0.10,
    },
    AreaTarget {
        category: ZoneCategory::Circ,
        label: "CIRCULATE",
        fraction: 0.20,
    },
];
