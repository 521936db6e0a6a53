use std::sync::Arc;

use kurbo::Point;

use crate::foundation::error::{MakeoverError, MakeoverResult};

/// Normalized landmark in `[0, 1]` frame space (`z` is carried but unused).
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }
}

/// Ordered face-mesh landmarks for one detected face.
///
/// Index assignments follow the 468-point face mesh; refined meshes append ten iris
/// points (468..478). Cloning is cheap.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<Landmark>", into = "Vec<Landmark>")]
pub struct LandmarkSet {
    pub(super) points: Arc<[Landmark]>,
}

impl LandmarkSet {
    pub const MESH_POINTS: usize = 468;
    pub const REFINED_POINTS: usize = 478;

    pub fn new(points: Vec<Landmark>) -> MakeoverResult<Self> {
        if points.len() < Self::MESH_POINTS {
            return Err(MakeoverError::landmarks(format!(
                "expected at least {} landmarks, got {}",
                Self::MESH_POINTS,
                points.len()
            )));
        }
        if let Some(i) = points
            .iter()
            .position(|p| !(p.x.is_finite() && p.y.is_finite()))
        {
            return Err(MakeoverError::landmarks(format!(
                "landmark {i} is not finite"
            )));
        }
        Ok(Self {
            points: points.into(),
        })
    }

    pub fn from_json(json: &str) -> MakeoverResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| MakeoverError::landmarks(format!("parse landmarks: {e}")))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True when the refined iris points are present.
    pub fn has_iris(&self) -> bool {
        self.points.len() >= Self::REFINED_POINTS
    }

    pub fn get(&self, index: usize) -> Option<Landmark> {
        self.points.get(index).copied()
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    /// Landmark `index` scaled to a `width x height` surface.
    pub fn px(&self, index: usize, width: f64, height: f64) -> MakeoverResult<Point> {
        let p = self
            .get(index)
            .ok_or_else(|| MakeoverError::landmarks(format!("landmark {index} missing")))?;
        Ok(Point::new(p.x * width, p.y * height))
    }

    /// Several landmarks scaled to pixel space, in the given order.
    pub fn px_many(&self, indices: &[usize], width: f64, height: f64) -> MakeoverResult<Vec<Point>> {
        indices
            .iter()
            .map(|&i| self.px(i, width, height))
            .collect()
    }
}

impl TryFrom<Vec<Landmark>> for LandmarkSet {
    type Error = MakeoverError;

    fn try_from(value: Vec<Landmark>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LandmarkSet> for Vec<Landmark> {
    fn from(value: LandmarkSet) -> Self {
        value.points.to_vec()
    }
}
