#![allow(dead_code)]
// Shared stub world for integration tests

use bddl::geometry::Quat;
use bddl::runtime::{GeomState, ObjectState, World};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default)]
pub struct StubObject {
    pub name: String,
    pub geom: GeomState,
    pub joints: Vec<f64>,
    pub open: bool,
    pub closed: bool,
    pub ratio: f64,
    pub powered: bool,
    pub contacts: BTreeSet<String>,
    pub contains: BTreeSet<String>,
}

impl StubObject {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn at(mut self, pos: [f64; 3]) -> Self {
        self.geom.pos = pos;
        self
    }

    pub fn oriented(mut self, quat: Quat) -> Self {
        self.geom.quat = quat;
        self
    }

    pub fn opened(mut self, open: bool) -> Self {
        self.open = open;
        self.closed = !open;
        self
    }

    pub fn with_ratio(mut self, ratio: f64) -> Self {
        self.ratio = ratio;
        self
    }

    pub fn powered(mut self, on: bool) -> Self {
        self.powered = on;
        self
    }
}

impl ObjectState for StubObject {
    fn name(&self) -> &str {
        &self.name
    }

    fn geom_state(&self) -> GeomState {
        self.geom
    }

    fn joint_state(&self) -> Vec<f64> {
        self.joints.clone()
    }

    fn check_contact(&self, other: &dyn ObjectState) -> bool {
        self.contacts.contains(other.name())
    }

    fn check_contain(&self, other: &dyn ObjectState) -> bool {
        self.contains.contains(other.name())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn is_close(&self) -> bool {
        self.closed
    }

    fn open_ratio(&self) -> f64 {
        self.ratio
    }

    fn turn_on(&self) -> bool {
        self.powered
    }

    fn turn_off(&self) -> bool {
        !self.powered
    }
}

#[derive(Debug, Clone, Default)]
pub struct StubWorld {
    pub objects: BTreeMap<String, StubObject>,
}

impl StubWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, object: StubObject) -> Self {
        self.objects.insert(object.name.clone(), object);
        self
    }

    pub fn get_mut(&mut self, name: &str) -> &mut StubObject {
        self.objects.get_mut(name).expect("stub object exists")
    }

    /// Symmetric contact between two objects.
    pub fn touch(mut self, a: &str, b: &str) -> Self {
        self.get_mut(a).contacts.insert(b.to_string());
        self.get_mut(b).contacts.insert(a.to_string());
        self
    }

    pub fn untouch(&mut self, a: &str, b: &str) {
        self.get_mut(a).contacts.remove(b);
        self.get_mut(b).contacts.remove(a);
    }

    /// `container` holds `inner`.
    pub fn contain(mut self, container: &str, inner: &str) -> Self {
        self.get_mut(container).contains.insert(inner.to_string());
        self
    }
}

impl World for StubWorld {
    fn object_state(&self, name: &str) -> Option<&dyn ObjectState> {
        self.objects.get(name).map(|o| o as &dyn ObjectState)
    }

    fn object_names(&self) -> Vec<String> {
        self.objects.keys().cloned().collect()
    }
}
