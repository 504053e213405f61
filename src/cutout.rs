use serde::Deserialize;

pub const CUTOUT_NAMES: [&str; 4] = ["left", "right", "top", "bottom"];

/// How much of the capture region's width/height goes into the edge bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityPreset {
    Low,
    #[default]
    Medium,
    High,
    Extreme,
}

impl SeverityPreset {
    pub fn fraction(&self) -> f64 {
        match self {
            SeverityPreset::Low => 0.05,
            SeverityPreset::Medium => 0.10,
            SeverityPreset::High => 0.15,
            SeverityPreset::Extreme => 0.33,
        }
    }
}

/// The frame axis a cutout is sliced (and later collapsed) along.
/// Rows = vertical pixel index, Columns = horizontal pixel index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Rows,
    Columns,
}

/// One edge band: the half-open index range [lower, upper) along `axis`,
/// spanning the full extent of the other axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cutout {
    pub lower: usize,
    pub upper: usize,
    pub axis: Axis,
}

impl Cutout {
    pub fn new(lower: usize, upper: usize, axis: Axis) -> Cutout {
        Cutout { lower, upper, axis }
    }
}

/// The four named edge bands of a capture region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cutouts {
    pub left: Cutout,
    pub right: Cutout,
    pub top: Cutout,
    pub bottom: Cutout,
}

impl Cutouts {
    /// Side bands restrict columns and span all rows (vertical strips on the
    /// monitor sides), top/bottom restrict rows and span all columns. The
    /// fraction is truncated, never rounded. Bands are allowed to overlap in
    /// the corners.
    pub fn resolve(width: usize, height: usize, preset: SeverityPreset) -> Cutouts {
        let f = preset.fraction();
        let band_width = (width as f64 * f) as usize;
        let band_height = (height as f64 * f) as usize;

        Cutouts {
            left: Cutout::new(0, band_width, Axis::Columns),
            right: Cutout::new((width as f64 * (1.0 - f)) as usize, width, Axis::Columns),
            top: Cutout::new(0, band_height, Axis::Rows),
            bottom: Cutout::new((height as f64 * (1.0 - f)) as usize, height, Axis::Rows),
        }
    }

    pub fn get(&self, name: &str) -> Option<Cutout> {
        match name {
            "left" => Some(self.left),
            "right" => Some(self.right),
            "top" => Some(self.top),
            "bottom" => Some(self.bottom),
            _ => None,
        }
    }
}
