//! Recorded simulator frames.
//!
//! A [`WorldSnapshot`] is the JSON form of one frame: object poses, optional
//! containment boxes and articulation joints, and the contact pairs the
//! physics engine reported. [`WorldSnapshot::resolve`] turns it into a
//! [`SnapshotWorld`] the goal evaluator can query.
//!
//! Sites such as `wooden_cabinet_1_top_region` name their body in `parent`;
//! contact is tracked per root body, so a site touches whatever its body touches.

use super::SimError;
use bddl::geometry::Quat;
use bddl::runtime::{GeomState, ObjectState, World};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

const RATIO_EPSILON: f64 = 1e-9;

fn in_range(range: [f64; 2], value: f64) -> bool {
    let (lo, hi) = if range[0] <= range[1] {
        (range[0], range[1])
    } else {
        (range[1], range[0])
    };
    lo <= value && value <= hi
}

/// Single-joint articulation state (drawer, door, knob).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Articulation {
    pub qpos: f64,
    /// `[closed, fully_open]` joint positions, used for the open ratio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_range: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_range: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_range: Option<[f64; 2]>,
}

impl Articulation {
    pub fn is_open(&self) -> bool {
        self.open_range.is_some_and(|r| in_range(r, self.qpos))
    }

    pub fn is_close(&self) -> bool {
        self.close_range.is_some_and(|r| in_range(r, self.qpos))
    }

    pub fn open_ratio(&self) -> f64 {
        match self.limits {
            Some([closed, open]) if (open - closed).abs() > RATIO_EPSILON => {
                ((self.qpos - closed) / (open - closed)).clamp(0.0, 1.0)
            }
            _ if self.is_open() => 1.0,
            _ => 0.0,
        }
    }

    pub fn turn_on(&self) -> bool {
        self.on_range.is_some_and(|r| in_range(r, self.qpos))
    }

    pub fn turn_off(&self) -> bool {
        self.on_range.is_some_and(|r| !in_range(r, self.qpos))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotObject {
    pub pos: [f64; 3],
    /// Scalar-first `(w, x, y, z)`; identity when omitted.
    #[serde(default)]
    pub quat: Quat,
    /// Half sizes of the containment box in the object's local frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub half_extents: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub articulation: Option<Articulation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub joints: Vec<f64>,
}

impl SnapshotObject {
    pub fn at(pos: [f64; 3]) -> Self {
        Self {
            pos,
            quat: Quat::identity(),
            half_extents: None,
            parent: None,
            articulation: None,
            joints: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    #[serde(default)]
    pub objects: IndexMap<String, SnapshotObject>,
    /// Unordered pairs of touching objects or sites.
    #[serde(default)]
    pub contacts: Vec<[String; 2]>,
}

impl WorldSnapshot {
    pub fn resolve(self) -> Result<SnapshotWorld, SimError> {
        let mut roots: HashMap<String, String> = HashMap::new();
        for name in self.objects.keys() {
            roots.insert(name.clone(), self.root_of(name)?);
        }

        let mut root_touch: HashMap<&str, BTreeSet<&str>> = HashMap::new();
        for [a, b] in &self.contacts {
            let ra = roots.get(a).ok_or_else(|| SimError::UnknownContact(a.clone()))?;
            let rb = roots.get(b).ok_or_else(|| SimError::UnknownContact(b.clone()))?;
            if ra != rb {
                root_touch.entry(ra.as_str()).or_default().insert(rb.as_str());
                root_touch.entry(rb.as_str()).or_default().insert(ra.as_str());
            }
        }

        let touching_of = |root: &str| -> BTreeSet<String> {
            let Some(touched_roots) = root_touch.get(root) else {
                return BTreeSet::new();
            };
            roots
                .iter()
                .filter(|(_, r)| touched_roots.contains(r.as_str()))
                .map(|(n, _)| n.clone())
                .collect()
        };

        let bodies = self
            .objects
            .iter()
            .map(|(name, object)| {
                let touching = touching_of(&roots[name]);
                (
                    name.clone(),
                    SnapshotBody {
                        name: name.clone(),
                        object: object.clone(),
                        touching,
                    },
                )
            })
            .collect();
        Ok(SnapshotWorld { bodies })
    }

    fn root_of(&self, name: &str) -> Result<String, SimError> {
        let mut current = name;
        for _ in 0..=self.objects.len() {
            let Some(parent) = self.objects.get(current).and_then(|o| o.parent.as_deref()) else {
                return Ok(current.to_string());
            };
            if !self.objects.contains_key(parent) {
                return Err(SimError::UnknownParent {
                    object: current.to_string(),
                    parent: parent.to_string(),
                });
            }
            current = parent;
        }
        Err(SimError::CyclicParent(name.to_string()))
    }
}

/// One object or site of a resolved frame.
#[derive(Debug, Clone)]
pub struct SnapshotBody {
    name: String,
    object: SnapshotObject,
    /// Every object or site whose root body touches this one's root body.
    touching: BTreeSet<String>,
}

impl SnapshotBody {
    pub fn object(&self) -> &SnapshotObject {
        &self.object
    }
}

impl ObjectState for SnapshotBody {
    fn name(&self) -> &str {
        &self.name
    }

    fn geom_state(&self) -> GeomState {
        GeomState::new(self.object.pos, self.object.quat)
    }

    fn joint_state(&self) -> Vec<f64> {
        match &self.object.articulation {
            Some(a) if self.object.joints.is_empty() => vec![a.qpos],
            _ => self.object.joints.clone(),
        }
    }

    fn check_contact(&self, other: &dyn ObjectState) -> bool {
        self.touching.contains(other.name())
    }

    fn check_contain(&self, other: &dyn ObjectState) -> bool {
        let Some(half) = self.object.half_extents else {
            return false;
        };
        let p = other.geom_state().pos;
        let offset = [
            p[0] - self.object.pos[0],
            p[1] - self.object.pos[1],
            p[2] - self.object.pos[2],
        ];
        let local = self.object.quat.inverse_rotate(offset);
        (0..3).all(|i| local[i].abs() <= half[i])
    }

    fn is_open(&self) -> bool {
        self.object.articulation.as_ref().is_some_and(Articulation::is_open)
    }

    fn is_close(&self) -> bool {
        self.object.articulation.as_ref().is_some_and(Articulation::is_close)
    }

    fn open_ratio(&self) -> f64 {
        self.object
            .articulation
            .as_ref()
            .map_or(0.0, Articulation::open_ratio)
    }

    fn turn_on(&self) -> bool {
        self.object.articulation.as_ref().is_some_and(Articulation::turn_on)
    }

    fn turn_off(&self) -> bool {
        self.object.articulation.as_ref().is_some_and(Articulation::turn_off)
    }
}

/// A resolved frame implementing [`World`].
#[derive(Debug, Clone, Default)]
pub struct SnapshotWorld {
    bodies: IndexMap<String, SnapshotBody>,
}

impl SnapshotWorld {
    pub fn body(&self, name: &str) -> Option<&SnapshotBody> {
        self.bodies.get(name)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl World for SnapshotWorld {
    fn object_state(&self, name: &str) -> Option<&dyn ObjectState> {
        self.bodies.get(name).map(|b| b as &dyn ObjectState)
    }

    fn object_names(&self) -> Vec<String> {
        self.bodies.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cabinet_frame(qpos: f64) -> WorldSnapshot {
        let mut objects = IndexMap::new();
        objects.insert("wooden_cabinet_1".to_string(), SnapshotObject::at([0.0, -0.3, 0.9]));
        let mut top = SnapshotObject::at([0.0, -0.25, 1.05]);
        top.parent = Some("wooden_cabinet_1".to_string());
        top.half_extents = Some([0.08, 0.08, 0.03]);
        top.articulation = Some(Articulation {
            qpos,
            limits: Some([0.0, -0.16]),
            open_range: Some([-0.16, -0.14]),
            close_range: Some([0.0, -0.005]),
            on_range: None,
        });
        objects.insert("wooden_cabinet_1_top_region".to_string(), top);
        objects.insert("akita_black_bowl_1".to_string(), SnapshotObject::at([0.0, -0.25, 1.04]));
        WorldSnapshot {
            objects,
            contacts: vec![["akita_black_bowl_1".to_string(), "wooden_cabinet_1".to_string()]],
        }
    }

    #[test]
    fn test_site_inherits_body_contacts() {
        let world = cabinet_frame(0.0).resolve().unwrap();
        let top = world.object_state("wooden_cabinet_1_top_region").unwrap();
        let bowl = world.object_state("akita_black_bowl_1").unwrap();
        assert!(top.check_contact(bowl));
        assert!(bowl.check_contact(top));
        assert!(top.check_contain(bowl));
        assert!(top.is_close());
    }

    #[test]
    fn test_articulation_ratio_and_state() {
        let world = cabinet_frame(-0.15).resolve().unwrap();
        let top = world.object_state("wooden_cabinet_1_top_region").unwrap();
        assert!(top.is_open());
        assert!(!top.is_close());
        assert!((top.open_ratio() - 0.9375).abs() < 1e-9);
        assert_eq!(top.joint_state(), vec![-0.15]);
    }

    #[test]
    fn test_unknown_parent_is_rejected() {
        let mut frame = cabinet_frame(0.0);
        frame.objects.get_mut("wooden_cabinet_1_top_region").unwrap().parent =
            Some("missing".to_string());
        assert!(matches!(frame.resolve(), Err(SimError::UnknownParent { .. })));
    }

    #[test]
    fn test_snapshot_json_defaults() {
        let frame: WorldSnapshot = serde_json::from_str(
            r#"{"objects": {"plate_1": {"pos": [0.0, 0.25, 0.9]}}, "contacts": []}"#,
        )
        .unwrap();
        let world = frame.resolve().unwrap();
        let plate = world.object_state("plate_1").unwrap();
        assert_eq!(plate.geom_state().quat, Quat::identity());
        assert!(!plate.is_open());
    }
}
