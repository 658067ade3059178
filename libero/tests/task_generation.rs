use bddl::{parse_problem, PredicateCall, PredicateRegistry};
use libero::scene::SceneRegistry;
use libero::task::{bddl_file_name, TaskError, TaskRegistry, TaskSpecFile};
use pretty_assertions::assert_eq;

fn open_drawer_goal() -> Vec<PredicateCall> {
    vec![
        PredicateCall::with_symbols("Open", &["wooden_cabinet_1_top_region"]),
        PredicateCall::with_symbols("In", &["akita_black_bowl_1", "wooden_cabinet_1_bottom_region"]),
    ]
}

fn registry_with_one_task(scenes: &SceneRegistry, predicates: &PredicateRegistry) -> TaskRegistry {
    let mut tasks = TaskRegistry::new();
    tasks
        .register_task_info(
            scenes,
            predicates,
            "open the top drawer and put the bowl inside",
            "kitchen_scene1",
            &["wooden_cabinet_1", "akita_black_bowl_1"],
            open_drawer_goal(),
        )
        .unwrap();
    tasks
}

#[test]
fn test_generation_is_deterministic() {
    let scenes = SceneRegistry::with_builtins();
    let predicates = PredicateRegistry::with_builtins();
    let tasks = registry_with_one_task(&scenes, &predicates);

    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    let a = tasks.generate_bddl_from_task_info(&scenes, first.path());
    let b = tasks.generate_bddl_from_task_info(&scenes, second.path());
    assert!(a.is_success() && b.is_success());
    assert_eq!(a.written.len(), 1);

    let text_a = std::fs::read_to_string(&a.written[0]).unwrap();
    let text_b = std::fs::read_to_string(&b.written[0]).unwrap();
    assert_eq!(text_a, text_b);
    assert_eq!(
        a.written[0].file_name().unwrap().to_str().unwrap(),
        "KITCHEN_SCENE1_open_the_top_drawer_and_put_the_bowl_inside.bddl"
    );

    // overwriting in place gives the same bytes
    let again = tasks.generate_bddl_from_task_info(&scenes, first.path());
    assert_eq!(std::fs::read_to_string(&again.written[0]).unwrap(), text_a);
}

#[test]
fn test_emitted_file_parses_back_to_the_task_problem() {
    let scenes = SceneRegistry::with_builtins();
    let predicates = PredicateRegistry::with_builtins();
    let tasks = registry_with_one_task(&scenes, &predicates);
    let dir = tempfile::tempdir().unwrap();
    let report = tasks.generate_bddl_from_task_info(&scenes, dir.path());

    let text = std::fs::read_to_string(&report.written[0]).unwrap();
    let parsed = parse_problem(&text).unwrap();
    let task = tasks.tasks().next().unwrap();
    let expected = task.to_problem(scenes.get("kitchen_scene1").unwrap());
    assert_eq!(parsed, expected);
    assert_eq!(parsed.name, "LIBERO_Kitchen_Tabletop_Manipulation");
    assert_eq!(parsed.goal.atoms().len(), 2);
}

#[test]
fn test_missing_folder_is_reported_per_task() {
    let scenes = SceneRegistry::with_builtins();
    let predicates = PredicateRegistry::with_builtins();
    let tasks = registry_with_one_task(&scenes, &predicates);
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("not_created");

    let report = tasks.generate_bddl_from_task_info(&scenes, &missing);
    assert!(!report.is_success());
    assert!(report.written.is_empty());
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].error.contains("not_created"));
    assert!(!missing.exists());
}

#[test]
fn test_registration_errors() {
    let scenes = SceneRegistry::with_builtins();
    let predicates = PredicateRegistry::with_builtins();
    let mut tasks = TaskRegistry::new();

    let err = tasks
        .register_task_info(&scenes, &predicates, "x", "garage_scene1", &[], open_drawer_goal())
        .unwrap_err();
    assert!(matches!(err, TaskError::Scene(_)));

    let err = tasks
        .register_task_info(&scenes, &predicates, "x", "kitchen_scene1", &["ketchup_1"], open_drawer_goal())
        .unwrap_err();
    match err {
        TaskError::ObjectNotInScene { name, candidates, .. } => {
            assert_eq!(name, "ketchup_1");
            assert!(candidates.contains(&"akita_black_bowl_1".to_string()));
        }
        other => panic!("unexpected {:?}", other),
    }

    let err = tasks
        .register_task_info(
            &scenes,
            &predicates,
            "lift the bowl",
            "kitchen_scene1",
            &[],
            vec![PredicateCall::with_symbols("Lifted", &["akita_black_bowl_1"])],
        )
        .unwrap_err();
    assert!(matches!(err, TaskError::Invalid { .. }), "{:?}", err);

    let err = tasks
        .register_task_info(&scenes, &predicates, "   ", "kitchen_scene1", &[], open_drawer_goal())
        .unwrap_err();
    assert!(matches!(err, TaskError::EmptyLanguage));
    assert!(tasks.is_empty());
}

#[test]
fn test_duplicate_language_in_one_scene_is_rejected() {
    let scenes = SceneRegistry::with_builtins();
    let predicates = PredicateRegistry::with_builtins();
    let mut tasks = registry_with_one_task(&scenes, &predicates);
    let err = tasks
        .register_task_info(
            &scenes,
            &predicates,
            "Open the top drawer  and put the bowl inside",
            "KITCHEN_SCENE1",
            &[],
            open_drawer_goal(),
        )
        .unwrap_err();
    assert!(matches!(err, TaskError::DuplicateTask { .. }));
    assert_eq!(tasks.len(), 1);
}

#[test]
fn test_language_with_numbers_survives_emit_and_parse() {
    let scenes = SceneRegistry::with_builtins();
    let predicates = PredicateRegistry::with_builtins();
    let mut tasks = TaskRegistry::new();
    tasks
        .register_task_info(
            &scenes,
            &predicates,
            "open the 2 drawers and wait 0.5 seconds",
            "kitchen_scene1",
            &["wooden_cabinet_1"],
            open_drawer_goal(),
        )
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let report = tasks.generate_bddl_from_task_info(&scenes, dir.path());
    assert!(report.is_success(), "{:?}", report.failures);
    let parsed = parse_problem(&std::fs::read_to_string(&report.written[0]).unwrap()).unwrap();
    assert_eq!(parsed.language, "open the 2 drawers and wait 0.5 seconds");
}

#[test]
fn test_language_with_bddl_delimiters_is_rejected() {
    let scenes = SceneRegistry::with_builtins();
    let predicates = PredicateRegistry::with_builtins();
    let mut tasks = TaskRegistry::new();
    for language in ["open the top drawer (slowly)", "open it; then close it"] {
        let err = tasks
            .register_task_info(&scenes, &predicates, language, "kitchen_scene1", &[], open_drawer_goal())
            .unwrap_err();
        assert!(matches!(err, TaskError::ReservedCharacter(ref l) if l == language), "{:?}", err);
    }
    assert!(tasks.is_empty());
}

#[test]
fn test_languages_sharing_a_file_name_are_duplicates() {
    let scenes = SceneRegistry::with_builtins();
    let predicates = PredicateRegistry::with_builtins();
    let mut tasks = registry_with_one_task(&scenes, &predicates);
    let err = tasks
        .register_task_info(
            &scenes,
            &predicates,
            "open the top drawer and put the bowl inside.",
            "kitchen_scene1",
            &[],
            open_drawer_goal(),
        )
        .unwrap_err();
    match err {
        TaskError::DuplicateTask { scene, language } => {
            assert_eq!(scene, "kitchen_scene1");
            assert_eq!(language, "open the top drawer and put the bowl inside.");
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(tasks.len(), 1);

    let dir = tempfile::tempdir().unwrap();
    assert_eq!(tasks.generate_bddl_from_task_info(&scenes, dir.path()).written.len(), 1);
}

#[test]
fn test_task_file_registers_in_order() {
    let scenes = SceneRegistry::with_builtins();
    let predicates = PredicateRegistry::with_builtins();
    let file = TaskSpecFile::from_toml(
        r#"
[[task]]
scene = "kitchen_scene1"
language = "open the top drawer of the cabinet"
objects_of_interest = ["wooden_cabinet_1"]
goal = ["(Open wooden_cabinet_1_top_region)"]

[[task]]
scene = "kitchen_scene2"
language = "put the bowl on the plate"
objects_of_interest = ["akita_black_bowl_1", "plate_1"]
goal = ["(On akita_black_bowl_1 plate_1)"]
"#,
    )
    .unwrap();

    let mut tasks = TaskRegistry::new();
    assert_eq!(file.register_all(&mut tasks, &scenes, &predicates).unwrap(), 2);
    let names: Vec<String> = tasks
        .tasks()
        .map(|t| bddl_file_name(&t.scene_name, &t.language))
        .collect();
    assert_eq!(
        names,
        vec![
            "KITCHEN_SCENE1_open_the_top_drawer_of_the_cabinet.bddl",
            "KITCHEN_SCENE2_put_the_bowl_on_the_plate.bddl"
        ]
    );
}

#[test]
fn test_task_file_goal_syntax_errors_name_the_text() {
    let scenes = SceneRegistry::with_builtins();
    let predicates = PredicateRegistry::with_builtins();
    let file = TaskSpecFile::from_toml(
        r#"
[[task]]
scene = "kitchen_scene1"
language = "open it"
goal = ["(Open wooden_cabinet_1_top_region"]
"#,
    )
    .unwrap();
    let err = file
        .register_all(&mut TaskRegistry::new(), &scenes, &predicates)
        .unwrap_err();
    match err {
        TaskError::GoalSyntax { text, .. } => assert_eq!(text, "(Open wooden_cabinet_1_top_region"),
        other => panic!("unexpected {:?}", other),
    }
}
