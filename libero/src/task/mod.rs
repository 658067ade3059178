//! Task registration
//!
//! A task is a language instruction plus a goal over one scene. Registration
//! checks the scene exists, that every object of interest belongs to it, and
//! runs the assembled problem through load-time validation, so a registered
//! task always emits a BDDL file that the evaluator accepts.

pub mod generation;

pub use generation::{
    bddl_file_name, emit_task, GenerationFailure, GenerationReport, TaskSpec, TaskSpecFile,
};

use crate::scene::{SceneError, SceneRegistry, SceneTemplate};
use bddl::{
    validate_problem, EmitError, GoalExpr, PredicateCall, PredicateRegistry, Problem,
    ValidationError,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error("task language description is empty")]
    EmptyLanguage,

    #[error("task language '{0}' may not contain '(', ')' or ';'")]
    ReservedCharacter(String),

    #[error("task has no goal states")]
    EmptyGoal,

    #[error("'{name}' is not an object of scene '{scene}' (candidates: {})", .candidates.join(", "))]
    ObjectNotInScene {
        name: String,
        scene: String,
        candidates: Vec<String>,
    },

    #[error("scene '{scene}' already has a task with the same file name as '{language}'")]
    DuplicateTask { scene: String, language: String },

    #[error("task '{language}' is invalid: {source}")]
    Invalid {
        language: String,
        #[source]
        source: ValidationError,
    },

    #[error("task '{language}': invalid goal state '{text}': {source}")]
    GoalSyntax {
        language: String,
        text: String,
        #[source]
        source: bddl::ParseError,
    },

    #[error(transparent)]
    Emit(#[from] EmitError),

    #[error("failed to read task file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse task file {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
}

/// A registered task. Immutable once registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInfo {
    pub language: String,
    pub scene_name: String,
    pub objects_of_interest: Vec<String>,
    pub goal_states: Vec<PredicateCall>,
}

impl TaskInfo {
    pub fn goal(&self) -> GoalExpr {
        GoalExpr::conjunction(self.goal_states.iter().cloned())
    }

    /// Assembles the full BDDL problem for this task on top of `scene`.
    pub fn to_problem(&self, scene: &SceneTemplate) -> Problem {
        Problem {
            name: scene.scene_type.problem_name().to_string(),
            domain: "robosuite".to_string(),
            language: self.language.clone(),
            regions: scene.regions.clone(),
            fixtures: scene.fixtures(),
            objects: scene.objects(),
            objects_of_interest: self.objects_of_interest.clone(),
            init: scene.init_states.clone(),
            goal: self.goal(),
        }
    }
}

/// Registered tasks grouped by scene, in registration order.
#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    tasks: IndexMap<String, Vec<TaskInfo>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_task_info(
        &mut self,
        scenes: &SceneRegistry,
        predicates: &PredicateRegistry,
        language: &str,
        scene_name: &str,
        objects_of_interest: &[&str],
        goal_states: Vec<PredicateCall>,
    ) -> Result<&TaskInfo, TaskError> {
        let language = language.split_whitespace().collect::<Vec<_>>().join(" ");
        if language.is_empty() {
            return Err(TaskError::EmptyLanguage);
        }
        // the emitter writes `:language` unquoted
        if language.contains(['(', ')', ';']) {
            return Err(TaskError::ReservedCharacter(language));
        }
        if goal_states.is_empty() {
            return Err(TaskError::EmptyGoal);
        }

        let scene = scenes.get(scene_name)?;
        let candidates = scene.possible_objects_of_interest();
        let mut interest: Vec<String> = Vec::new();
        for name in objects_of_interest {
            if !candidates.iter().any(|c| c == name) {
                return Err(TaskError::ObjectNotInScene {
                    name: name.to_string(),
                    scene: scene.name.clone(),
                    candidates,
                });
            }
            if !interest.iter().any(|n| n == name) {
                interest.push(name.to_string());
            }
        }

        // two tasks of a scene must not write the same BDDL file
        let key = scene.name.to_lowercase();
        let file_name = bddl_file_name(&key, &language);
        if self
            .tasks_for_scene(&key)
            .iter()
            .any(|t| bddl_file_name(&key, &t.language) == file_name)
        {
            return Err(TaskError::DuplicateTask {
                scene: key,
                language,
            });
        }

        let task = TaskInfo {
            language,
            scene_name: key.clone(),
            objects_of_interest: interest,
            goal_states,
        };
        validate_problem(&task.to_problem(scene), predicates).map_err(|source| TaskError::Invalid {
            language: task.language.clone(),
            source,
        })?;

        info!(scene = %key, language = %task.language, "registered task");
        let existing = self.tasks.entry(key.clone()).or_default();
        existing.push(task);
        debug!(scene = %key, count = existing.len(), "scene task count");
        Ok(&existing[existing.len() - 1])
    }

    pub fn tasks(&self) -> impl Iterator<Item = &TaskInfo> {
        self.tasks.values().flatten()
    }

    pub fn tasks_for_scene(&self, scene_name: &str) -> &[TaskInfo] {
        self.tasks
            .get(&scene_name.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.tasks.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
