// BDDL file generation for registered tasks

use super::{TaskError, TaskInfo, TaskRegistry};
use crate::scene::{SceneRegistry, SceneTemplate};
use bddl::{parse_predicate_call, write_problem, PredicateRegistry};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// `{SCENE}_{instruction_words}.bddl`, e.g. `KITCHEN_SCENE1_open_the_top_drawer.bddl`.
pub fn bddl_file_name(scene_name: &str, language: &str) -> String {
    let words = language
        .to_lowercase()
        .replace('.', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    format!("{}_{}.bddl", scene_name.to_uppercase(), words)
}

/// Writes one task into `folder`, which must already exist.
pub fn emit_task(task: &TaskInfo, scene: &SceneTemplate, folder: &Path) -> Result<PathBuf, TaskError> {
    let path = folder.join(bddl_file_name(&task.scene_name, &task.language));
    Ok(write_problem(&task.to_problem(scene), path)?)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationFailure {
    pub scene_name: String,
    pub language: String,
    pub error: String,
}

/// Outcome of a batch generation. One failing task never stops the others.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationReport {
    pub written: Vec<PathBuf>,
    pub failures: Vec<GenerationFailure>,
}

impl GenerationReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

impl TaskRegistry {
    /// Emits every registered task into `folder`.
    pub fn generate_bddl_from_task_info(&self, scenes: &SceneRegistry, folder: &Path) -> GenerationReport {
        let mut report = GenerationReport::default();
        for task in self.tasks() {
            let result = scenes
                .get(&task.scene_name)
                .map_err(TaskError::from)
                .and_then(|scene| emit_task(task, scene, folder));
            match result {
                Ok(path) => report.written.push(path),
                Err(e) => {
                    error!(scene = %task.scene_name, language = %task.language, error = %e, "failed to generate BDDL");
                    report.failures.push(GenerationFailure {
                        scene_name: task.scene_name.clone(),
                        language: task.language.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }
        info!(
            written = report.written.len(),
            failed = report.failures.len(),
            folder = %folder.display(),
            "BDDL generation finished"
        );
        report
    }
}

/// Author-written task list (`[[task]]` tables in TOML).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskSpecFile {
    #[serde(default)]
    pub task: Vec<TaskSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskSpec {
    pub scene: String,
    pub language: String,
    #[serde(default)]
    pub objects_of_interest: Vec<String>,
    /// Each entry is one predicate invocation, e.g. `"(Open wooden_cabinet_1_top_region)"`.
    pub goal: Vec<String>,
}

impl TaskSpecFile {
    pub fn load(path: &Path) -> Result<Self, TaskError> {
        let text = std::fs::read_to_string(path).map_err(|source| TaskError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|message| TaskError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }

    /// Registers every task in order, stopping at the first invalid one.
    pub fn register_all(
        &self,
        registry: &mut TaskRegistry,
        scenes: &SceneRegistry,
        predicates: &PredicateRegistry,
    ) -> Result<usize, TaskError> {
        for entry in &self.task {
            let goal_states = entry
                .goal
                .iter()
                .map(|text| {
                    parse_predicate_call(text).map_err(|source| TaskError::GoalSyntax {
                        language: entry.language.clone(),
                        text: text.clone(),
                        source,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let interest: Vec<&str> = entry.objects_of_interest.iter().map(String::as_str).collect();
            registry.register_task_info(
                scenes,
                predicates,
                &entry.language,
                &entry.scene,
                &interest,
                goal_states,
            )?;
        }
        Ok(self.task.len())
    }
}
