use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    #[serde(rename = "width", deserialize_with = "deserialize_u32_from_number")]
    pub w: u32,
    #[serde(rename = "height", deserialize_with = "deserialize_u32_from_number")]
    pub h: u32,
}

impl Rect {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    pub fn rotated(&self) -> Self {
        Self {
            w: self.h,
            h: self.w,
        }
    }

    pub fn fits_in(&self, other: &Rect) -> bool {
        self.w <= other.w && self.h <= other.h
    }

    /// Shorter side over longer side, in (0, 1]. A square scores 1.0.
    pub fn aspect_ratio(&self) -> f64 {
        if self.w == 0 || self.h == 0 {
            return 0.0;
        }
        self.w.min(self.h) as f64 / self.w.max(self.h) as f64
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

/// Grain direction constraint of a part. `Lengthwise` pins the part to its
/// nominal orientation, `Widthwise` to the 90°-rotated one, `Any` allows both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grain {
    Lengthwise,
    Widthwise,
    #[default]
    Any,
}

impl std::str::FromStr for Grain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lengthwise" | "l" => Ok(Grain::Lengthwise),
            "widthwise" | "w" => Ok(Grain::Widthwise),
            "any" | "a" => Ok(Grain::Any),
            _ => Err(format!(
                "invalid grain '{s}', expected lengthwise, widthwise, or any"
            )),
        }
    }
}

/// One required part as submitted by the caller, before quantity expansion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub id: String,
    #[serde(flatten)]
    pub rect: Rect,
    #[serde(default)]
    pub grain: Grain,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub qty: u32,
}

/// A grain-legal placement shape for a part instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Orientation {
    pub rect: Rect,
    pub rotated: bool,
}

/// A committed part-to-sheet assignment. `x`/`y` is the top-left corner in
/// sheet coordinates.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub part_id: String,
    #[serde(flatten)]
    pub rect: Rect,
    pub x: u32,
    pub y: u32,
    pub rotated: bool,
}

/// A rectangle of unused sheet area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FreeRect {
    pub x: u32,
    pub y: u32,
    #[serde(flatten)]
    pub rect: Rect,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetLayout {
    pub index: usize,
    pub placements: Vec<Placement>,
    pub usable_offcuts: Vec<FreeRect>,
    pub scrap_area: u64,
}

impl SheetLayout {
    pub fn placed_area(&self) -> u64 {
        self.placements.iter().map(|p| p.rect.area()).sum()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Solution {
    pub sheets: Vec<SheetLayout>,
    pub stock: Rect,
    /// Placed part area over total stock area across all opened sheets.
    pub utilization: f64,
}

impl Solution {
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn total_waste_percent(&self) -> f64 {
        (1.0 - self.utilization) * 100.0
    }
}

/// Accepts both `5` and `5.0` for quantities and dimensions; quote tools
/// routinely send integral floats.
pub fn deserialize_u32_from_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let v = f64::deserialize(deserializer)?;
    if v < 0.0 || v.fract() != 0.0 || v > u32::MAX as f64 {
        return Err(serde::de::Error::custom(format!(
            "expected a non-negative integer, got {v}"
        )));
    }
    Ok(v as u32)
}
