use super::builtin::builtin_scenes;
use super::{SceneError, SceneTemplate, SceneType};
use bddl::parse_predicate_call;
use indexmap::IndexMap;
use itertools::Itertools;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Name-indexed scene collection.
#[derive(Debug, Clone, Default)]
pub struct SceneRegistry {
    scenes: IndexMap<String, SceneTemplate>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with the shipped scenes.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for scene in builtin_scenes() {
            registry.scenes.insert(scene.name.clone(), scene);
        }
        registry
    }

    pub fn register(&mut self, scene: SceneTemplate) -> Result<(), SceneError> {
        let key = scene.name.to_lowercase();
        if self.scenes.contains_key(&key) {
            return Err(SceneError::DuplicateScene(scene.name));
        }
        debug!(scene = %key, scene_type = %scene.scene_type, "registering scene");
        self.scenes.insert(key, scene);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&SceneTemplate, SceneError> {
        self.scenes
            .get(&name.to_lowercase())
            .ok_or_else(|| SceneError::UnknownScene {
                name: name.to_string(),
                available: self.names().join(", "),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scenes.contains_key(&name.to_lowercase())
    }

    pub fn names(&self) -> Vec<String> {
        self.scenes.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneTemplate> {
        self.scenes.values()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Registers every scene in an author-written TOML file. Returns the new scene names.
    pub fn load_toml(&mut self, path: impl AsRef<Path>) -> Result<Vec<String>, SceneError> {
        let path = path.as_ref();
        let file = SceneFile::load(path)?;
        let mut added = Vec::new();
        for def in file.scene {
            let scene = def.into_template()?;
            added.push(scene.name.clone());
            self.register(scene)?;
        }
        info!(path = %path.display(), scenes = %added.iter().join(", "), "loaded scene file");
        Ok(added)
    }
}

/// On-disk scene definitions (`[[scene]]` tables).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneFile {
    #[serde(default)]
    pub scene: Vec<SceneDef>,
}

impl SceneFile {
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let text = std::fs::read_to_string(path).map_err(|source| SceneError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| SceneError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneDef {
    pub name: String,
    pub scene_type: SceneType,
    #[serde(default)]
    pub fixtures: IndexMap<String, usize>,
    #[serde(default)]
    pub objects: IndexMap<String, usize>,
    #[serde(default)]
    pub regions: Vec<RegionSpec>,
    #[serde(default)]
    pub object_regions: Vec<ObjectRegionSpec>,
    /// Initial-state predicates written as BDDL, e.g. `"(On plate_1 kitchen_table_plate_region)"`.
    #[serde(default)]
    pub init: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionSpec {
    pub name: String,
    pub centroid: [f64; 2],
    pub half_len: f64,
    #[serde(default)]
    pub yaw_rotation: Option<[f64; 2]>,
    /// Defaults to the scene's workspace fixture.
    #[serde(default)]
    pub target: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectRegionSpec {
    pub target: String,
    pub name: String,
}

impl SceneDef {
    pub fn into_template(self) -> Result<SceneTemplate, SceneError> {
        let mut scene = SceneTemplate::new(&self.name, self.scene_type);
        for (category, count) in self.fixtures {
            scene = scene.with_fixture(&category, count);
        }
        for (category, count) in self.objects {
            scene = scene.with_object(&category, count);
        }
        for region in self.regions {
            let target = region
                .target
                .unwrap_or_else(|| self.scene_type.workspace_name().to_string());
            scene = scene.with_region(
                region.centroid,
                &region.name,
                &target,
                region.half_len,
                region.yaw_rotation.unwrap_or([0.0, 0.0]),
            );
        }
        for site in self.object_regions {
            scene = scene.with_object_region(&site.target, &site.name);
        }
        for text in self.init {
            let call = parse_predicate_call(&text).map_err(|source| SceneError::InitState {
                scene: self.name.clone(),
                text: text.clone(),
                source,
            })?;
            scene = scene.with_init(call);
        }
        Ok(scene)
    }
}
