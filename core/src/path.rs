//! Immutable enemy route and the geometric queries performed against it.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed coordinate the enemy route passes through, in traversal order.
pub type Waypoint = Vec2;

/// Errors raised while constructing or indexing a [`PathModel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum PathError {
    /// A path requires at least a start and a goal waypoint.
    #[error("a path requires at least 2 waypoints (received {count})")]
    TooFewWaypoints {
        /// Number of waypoints that were supplied.
        count: usize,
    },
    /// A waypoint has a NaN or infinite coordinate.
    #[error("waypoint {index} has a non-finite coordinate")]
    NonFiniteWaypoint {
        /// Position of the offending waypoint.
        index: usize,
    },
    /// The requested waypoint index lies outside `[0, len)`.
    #[error("waypoint index {index} is out of range for a path of {len} waypoints")]
    IndexOutOfRange {
        /// Index that was requested.
        index: usize,
        /// Number of waypoints contained in the path.
        len: usize,
    },
}

/// Ordered polyline that every enemy follows from spawn to goal.
///
/// The model always holds at least two waypoints, so the start and goal are
/// distinct entries even when they share coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Waypoint>", into = "Vec<Waypoint>")]
pub struct PathModel {
    waypoints: Vec<Waypoint>,
}

impl PathModel {
    /// Creates a path from the provided waypoints.
    ///
    /// Every coordinate must be finite.
    pub fn new(waypoints: Vec<Waypoint>) -> Result<Self, PathError> {
        if waypoints.len() < 2 {
            return Err(PathError::TooFewWaypoints {
                count: waypoints.len(),
            });
        }
        if let Some(index) = waypoints.iter().position(|waypoint| !waypoint.is_finite()) {
            return Err(PathError::NonFiniteWaypoint { index });
        }

        Ok(Self { waypoints })
    }

    /// Returns waypoint `index`, failing when it lies outside the path.
    pub fn waypoint_at(&self, index: usize) -> Result<Waypoint, PathError> {
        self.waypoints
            .get(index)
            .copied()
            .ok_or(PathError::IndexOutOfRange {
                index,
                len: self.waypoints.len(),
            })
    }

    /// Number of waypoints contained in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always `false`; a constructed path holds at least two waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Number of line segments joining consecutive waypoints.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.waypoints.len() - 1
    }

    /// Waypoints in traversal order.
    #[must_use]
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// First waypoint, where enemies spawn.
    #[must_use]
    pub fn start(&self) -> Waypoint {
        self.waypoints[0]
    }

    /// Final waypoint, which enemies attempt to reach.
    #[must_use]
    pub fn goal(&self) -> Waypoint {
        self.waypoints[self.waypoints.len() - 1]
    }

    /// Sum of all segment lengths.
    #[must_use]
    pub fn total_length(&self) -> f32 {
        self.segments().map(|(start, end)| start.distance(end)).sum()
    }

    /// Minimum Euclidean distance from `point` to any segment of the path.
    #[must_use]
    pub fn distance_to_path(&self, point: Vec2) -> f32 {
        self.segments()
            .map(|(start, end)| distance_to_segment(point, start, end))
            .fold(f32::INFINITY, f32::min)
    }

    fn segments(&self) -> impl Iterator<Item = (Waypoint, Waypoint)> + '_ {
        self.waypoints
            .windows(2)
            .map(|pair| (pair[0], pair[1]))
    }
}

impl TryFrom<Vec<Waypoint>> for PathModel {
    type Error = PathError;

    fn try_from(waypoints: Vec<Waypoint>) -> Result<Self, Self::Error> {
        Self::new(waypoints)
    }
}

impl From<PathModel> for Vec<Waypoint> {
    fn from(path: PathModel) -> Self {
        path.waypoints
    }
}

/// Distance from `point` to the segment `start..end` using a clamped projection.
///
/// When the foot of the perpendicular falls outside the segment the distance
/// is measured to the nearer endpoint. Zero-length segments measure to `start`.
fn distance_to_segment(point: Vec2, start: Vec2, end: Vec2) -> f32 {
    let segment = end - start;
    let length_sq = segment.length_squared();
    if length_sq == 0.0 {
        return point.distance(start);
    }

    let t = ((point - start).dot(segment) / length_sq).clamp(0.0, 1.0);
    point.distance(start + segment * t)
}
