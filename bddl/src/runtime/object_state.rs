// Read-only view of simulator state consumed by predicates

use crate::geometry::Quat;
use serde::{Deserialize, Serialize};

/// Horizontal alignment tolerance used by the strict `On` check.
pub const DEFAULT_ONTOP_XY_THRESHOLD: f64 = 0.03;

/// Position and orientation of a body or site in the world frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeomState {
    pub pos: [f64; 3],
    /// Scalar-first `(w, x, y, z)`.
    pub quat: Quat,
}

impl GeomState {
    pub fn new(pos: [f64; 3], quat: Quat) -> Self {
        Self { pos, quat }
    }

    pub fn at(pos: [f64; 3]) -> Self {
        Self {
            pos,
            quat: Quat::identity(),
        }
    }

    pub fn xy_distance(&self, other: &GeomState) -> f64 {
        let dx = self.pos[0] - other.pos[0];
        let dy = self.pos[1] - other.pos[1];
        (dx * dx + dy * dy).sqrt()
    }
}

/// State accessors for one simulated object or region.
///
/// Implementations read the current simulation frame and never mutate it.
pub trait ObjectState {
    fn name(&self) -> &str;

    fn geom_state(&self) -> GeomState;

    fn joint_state(&self) -> Vec<f64> {
        Vec::new()
    }

    fn check_contact(&self, other: &dyn ObjectState) -> bool;

    /// Whether `other` lies inside this object's containment volume.
    fn check_contain(&self, other: &dyn ObjectState) -> bool;

    /// Whether `other` rests on top of this object.
    fn check_ontop(&self, other: &dyn ObjectState, xy_threshold: f64) -> bool {
        let this = self.geom_state();
        let that = other.geom_state();
        this.pos[2] <= that.pos[2]
            && self.check_contact(other)
            && this.xy_distance(&that) < xy_threshold
    }

    fn is_open(&self) -> bool {
        false
    }

    fn is_close(&self) -> bool {
        false
    }

    /// Fraction in `[0, 1]` of how far an articulated object is opened.
    fn open_ratio(&self) -> f64 {
        0.0
    }

    fn turn_on(&self) -> bool {
        false
    }

    fn turn_off(&self) -> bool {
        false
    }
}

/// Name-addressed access to the objects of one simulation frame.
pub trait World {
    fn object_state(&self, name: &str) -> Option<&dyn ObjectState>;

    fn object_names(&self) -> Vec<String>;
}
