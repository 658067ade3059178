//! Scene templates
//!
//! A scene is a pre-built environment: a workspace fixture, the fixtures and
//! objects placed on it, the regions they start in, and the initial-state
//! predicates. Tasks pick a scene by name and add a goal on top.

pub mod builtin;
pub mod registry;

pub use registry::{SceneFile, SceneRegistry};

use bddl::{ObjectDecl, PredicateCall, RegionDef};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("unknown scene '{name}' (available: {available})")]
    UnknownScene { name: String, available: String },

    #[error("scene '{0}' is already registered")]
    DuplicateScene(String),

    #[error("unknown scene type '{0}' (expected kitchen, living_room, study, tabletop or floor)")]
    UnknownSceneType(String),

    #[error("failed to read scene file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scene file {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("scene '{scene}': invalid initial state '{text}': {source}")]
    InitState {
        scene: String,
        text: String,
        #[source]
        source: bddl::ParseError,
    },
}

/// Kind of environment; decides the workspace fixture and the BDDL problem name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneType {
    Kitchen,
    LivingRoom,
    Study,
    Tabletop,
    Floor,
}

impl SceneType {
    pub const ALL: [SceneType; 5] = [
        SceneType::Kitchen,
        SceneType::LivingRoom,
        SceneType::Study,
        SceneType::Tabletop,
        SceneType::Floor,
    ];

    /// The fixture every object in the scene is placed relative to.
    pub fn workspace_name(self) -> &'static str {
        match self {
            SceneType::Kitchen => "kitchen_table",
            SceneType::LivingRoom => "living_room_table",
            SceneType::Study => "study_table",
            SceneType::Tabletop => "main_table",
            SceneType::Floor => "floor",
        }
    }

    pub fn problem_name(self) -> &'static str {
        match self {
            SceneType::Kitchen => "LIBERO_Kitchen_Tabletop_Manipulation",
            SceneType::LivingRoom => "LIBERO_Living_Room_Tabletop_Manipulation",
            SceneType::Study => "LIBERO_Study_Tabletop_Manipulation",
            SceneType::Tabletop => "LIBERO_Tabletop_Manipulation",
            SceneType::Floor => "LIBERO_Floor_Manipulation",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SceneType::Kitchen => "kitchen",
            SceneType::LivingRoom => "living_room",
            SceneType::Study => "study",
            SceneType::Tabletop => "tabletop",
            SceneType::Floor => "floor",
        }
    }
}

impl fmt::Display for SceneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SceneType {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.to_lowercase().replace('-', "_");
        SceneType::ALL
            .into_iter()
            .find(|t| t.as_str() == key)
            .ok_or_else(|| SceneError::UnknownSceneType(s.to_string()))
    }
}

/// One registered scene.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneTemplate {
    pub name: String,
    pub scene_type: SceneType,
    /// Fixture category -> instance count, in declaration order.
    pub fixture_counts: IndexMap<String, usize>,
    /// Object category -> instance count, in declaration order.
    pub object_counts: IndexMap<String, usize>,
    pub regions: Vec<RegionDef>,
    pub init_states: Vec<PredicateCall>,
}

impl SceneTemplate {
    /// An empty scene holding only its workspace fixture.
    pub fn new(name: &str, scene_type: SceneType) -> Self {
        let mut fixture_counts = IndexMap::new();
        fixture_counts.insert(scene_type.workspace_name().to_string(), 1);
        Self {
            name: name.to_string(),
            scene_type,
            fixture_counts,
            object_counts: IndexMap::new(),
            regions: Vec::new(),
            init_states: Vec::new(),
        }
    }

    pub fn workspace_name(&self) -> &'static str {
        self.scene_type.workspace_name()
    }

    pub fn with_fixture(mut self, category: &str, count: usize) -> Self {
        self.fixture_counts.insert(category.to_string(), count);
        self
    }

    pub fn with_object(mut self, category: &str, count: usize) -> Self {
        self.object_counts.insert(category.to_string(), count);
        self
    }

    /// Adds a square placement region of half-width `half_len` centred at `centroid_xy`.
    pub fn with_region(
        mut self,
        centroid_xy: [f64; 2],
        name: &str,
        target: &str,
        half_len: f64,
        yaw_rotation: [f64; 2],
    ) -> Self {
        let [x, y] = centroid_xy;
        self.regions.push(RegionDef {
            name: name.to_string(),
            target: target.to_string(),
            ranges: vec![[x - half_len, y - half_len, x + half_len, y + half_len]],
            yaw_rotation: vec![yaw_rotation],
            rgba: None,
        });
        self
    }

    /// Same as [`SceneTemplate::with_region`] targeting the workspace fixture.
    pub fn with_workspace_region(
        self,
        centroid_xy: [f64; 2],
        name: &str,
        half_len: f64,
        yaw_rotation: [f64; 2],
    ) -> Self {
        let target = self.workspace_name();
        self.with_region(centroid_xy, name, target, half_len, yaw_rotation)
    }

    /// Exposes a named site of an object instance, e.g. a cabinet drawer.
    pub fn with_object_region(mut self, target: &str, name: &str) -> Self {
        self.regions.push(RegionDef::site(name, target));
        self
    }

    pub fn with_init(mut self, call: PredicateCall) -> Self {
        self.init_states.push(call);
        self
    }

    /// Shorthand for `(On instance region)`.
    pub fn placed(self, instance: &str, region_full_name: &str) -> Self {
        self.with_init(PredicateCall::with_symbols("On", &[instance, region_full_name]))
    }

    fn instances(&self, counts: &IndexMap<String, usize>) -> Vec<ObjectDecl> {
        let workspace = self.workspace_name();
        counts
            .iter()
            .flat_map(|(category, count)| {
                (1..=*count).map(move |i| {
                    if category == workspace {
                        ObjectDecl::new(category, category)
                    } else {
                        ObjectDecl::new(&format!("{}_{}", category, i), category)
                    }
                })
            })
            .collect()
    }

    pub fn fixtures(&self) -> Vec<ObjectDecl> {
        self.instances(&self.fixture_counts)
    }

    pub fn objects(&self) -> Vec<ObjectDecl> {
        self.instances(&self.object_counts)
    }

    /// Names a task may list as objects of interest: objects first, then fixtures.
    pub fn possible_objects_of_interest(&self) -> Vec<String> {
        self.objects()
            .into_iter()
            .chain(self.fixtures())
            .map(|decl| decl.name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instances_are_numbered_per_category() {
        let scene = SceneTemplate::new("demo", SceneType::Kitchen)
            .with_fixture("wooden_cabinet", 1)
            .with_object("akita_black_bowl", 2);
        assert_eq!(
            scene.possible_objects_of_interest(),
            vec![
                "akita_black_bowl_1",
                "akita_black_bowl_2",
                "kitchen_table",
                "wooden_cabinet_1"
            ]
        );
    }

    #[test]
    fn test_region_ranges_follow_centroid() {
        let scene = SceneTemplate::new("demo", SceneType::Study).with_workspace_region(
            [0.1, -0.2],
            "book_init_region",
            0.05,
            [0.0, 0.0],
        );
        let region = &scene.regions[0];
        assert_eq!(region.full_name(), "study_table_book_init_region");
        let r = region.ranges[0];
        assert!((r[0] - 0.05).abs() < 1e-12 && (r[3] + 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_scene_type_parses_loosely() {
        assert_eq!("living-room".parse::<SceneType>().unwrap(), SceneType::LivingRoom);
        assert!("garage".parse::<SceneType>().is_err());
    }
}
