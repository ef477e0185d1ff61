use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Straight,
    Corner,
    Chicane,
}

/// * `kind` - Segment type -> straight, corner, chicane
/// * `length` - (m) Length of the segment
/// * `radius` - (m) Corner radius (not set for straights, optional for chicanes)
/// * `elevation` - (m) Elevation change from segment entry to exit (positive uphill)
/// * `difficulty` - (-) Difficulty in [0.0, 1.0], time loss for inexperienced drivers
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SegmentPars {
    pub kind: SegmentKind,
    pub length: f64,
    #[serde(default)]
    pub radius: Option<f64>,
    #[serde(default)]
    pub elevation: f64,
    pub difficulty: f64,
}

/// * `name` - Track name
/// * `segments` - Segments in driving order, the last segment leads into the first one
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TrackPars {
    pub name: String,
    pub segments: Vec<SegmentPars>,
}

#[derive(Debug, Clone)]
pub struct Track {
    pub name: String,
    pub segments: Vec<SegmentPars>,
    pub length: f64,
}

impl Track {
    pub fn new(track_pars: &TrackPars) -> Track {
        let length = track_pars.segments.iter().map(|segment| segment.length).sum();

        Track {
            name: track_pars.name.to_owned(),
            segments: track_pars.segments.to_owned(),
            length,
        }
    }
}
