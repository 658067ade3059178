// tests/emitter.rs

use bddl::ast::{GoalExpr, ObjectDecl, PredicateCall, Problem, RegionDef, Term};
use bddl::emitter::{to_bddl, write_problem, EmitError};
use bddl::parser::parse_problem;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn open_drawer_problem() -> Problem {
    Problem {
        name: "LIBERO_Kitchen_Tabletop_Manipulation".to_string(),
        domain: "robosuite".to_string(),
        language: "open the top drawer and put the bowl inside".to_string(),
        regions: vec![
            RegionDef {
                name: "wooden_cabinet_init_region".to_string(),
                target: "kitchen_table".to_string(),
                ranges: vec![[-0.01, -0.31, 0.01, -0.29]],
                yaw_rotation: vec![[3.141592653589793, 3.141592653589793]],
                rgba: None,
            },
            RegionDef {
                name: "akita_black_bowl_init_region".to_string(),
                target: "kitchen_table".to_string(),
                ranges: vec![[-0.035, -0.035, 0.035, 0.035]],
                yaw_rotation: vec![[0.0, 0.0]],
                rgba: Some([0.0, 0.0, 1.0, 0.0]),
            },
            RegionDef::site("top_region", "wooden_cabinet_1"),
        ],
        fixtures: vec![ObjectDecl::new("kitchen_table", "kitchen_table")],
        objects: vec![
            ObjectDecl::new("akita_black_bowl_1", "akita_black_bowl"),
            ObjectDecl::new("wooden_cabinet_1", "wooden_cabinet"),
        ],
        objects_of_interest: vec![
            "wooden_cabinet_1".to_string(),
            "akita_black_bowl_1".to_string(),
        ],
        init: vec![
            PredicateCall::with_symbols(
                "On",
                &["akita_black_bowl_1", "kitchen_table_akita_black_bowl_init_region"],
            ),
            PredicateCall::with_symbols(
                "On",
                &["wooden_cabinet_1", "kitchen_table_wooden_cabinet_init_region"],
            ),
        ],
        goal: GoalExpr::conjunction(vec![
            PredicateCall::with_symbols("Open", &["wooden_cabinet_1_top_region"]),
            PredicateCall::with_symbols("In", &["akita_black_bowl_1", "wooden_cabinet_1_top_region"]),
        ]),
    }
}

#[test]
fn test_emitted_layout() {
    let text = to_bddl(&open_drawer_problem());
    assert!(text.starts_with("(define (problem LIBERO_Kitchen_Tabletop_Manipulation)\n"));
    assert!(text.contains("  (:language open the top drawer and put the bowl inside)\n"));
    assert!(text.contains("          (:target kitchen_table)\n"));
    assert!(text.contains("              (-0.01 -0.31 0.01 -0.29)\n"));
    assert!(text.contains("              (0.0 0.0)\n"));
    assert!(text.contains("          (:rgba (0.0 0.0 1.0 0.0))\n"));
    assert!(text.contains("    akita_black_bowl_1 - akita_black_bowl\n"));
    assert!(text.contains(
        "    (And (Open wooden_cabinet_1_top_region) (In akita_black_bowl_1 wooden_cabinet_1_top_region))\n"
    ));
    assert!(text.ends_with(")\n"));
}

#[test]
fn test_emit_then_parse_preserves_problem() {
    let problem = open_drawer_problem();
    let reparsed = parse_problem(&to_bddl(&problem)).expect("emitted BDDL parses");
    assert_eq!(reparsed, problem);
}

#[test]
fn test_write_is_deterministic() {
    let dir = tempfile::tempdir().expect("tempdir");
    let problem = open_drawer_problem();

    let first = write_problem(&problem, dir.path().join("a.bddl")).expect("first write");
    let second = write_problem(&problem, dir.path().join("b.bddl")).expect("second write");

    let a = std::fs::read(first).expect("read a");
    let b = std::fs::read(second).expect("read b");
    assert_eq!(a, b);
}

#[test]
fn test_write_into_missing_directory_fails_with_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let target = dir.path().join("not_created").join("task.bddl");

    let err = write_problem(&open_drawer_problem(), &target).unwrap_err();
    let EmitError::Write { path, source } = &err;
    assert_eq!(path, &target);
    assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
    assert!(err.to_string().contains("task.bddl"));
    assert!(!target.parent().unwrap().exists());
}

#[test]
fn test_numeric_goal_arguments_keep_decimal_point() {
    let mut problem = open_drawer_problem();
    problem.goal = GoalExpr::conjunction(vec![PredicateCall::new(
        "InAir",
        vec![Term::symbol("akita_black_bowl_1"), Term::Number(1.0)],
    )]);
    let text = to_bddl(&problem);
    assert!(text.contains("(And (InAir akita_black_bowl_1 1.0))"), "{}", text);
}

proptest! {
    #[test]
    fn test_region_ranges_survive_emission(
        x in -2.0f64..2.0,
        y in -2.0f64..2.0,
        half in 0.001f64..0.5,
    ) {
        let mut problem = open_drawer_problem();
        problem.regions[0].ranges = vec![[x - half, y - half, x + half, y + half]];
        let reparsed = parse_problem(&to_bddl(&problem)).expect("emitted BDDL parses");
        prop_assert_eq!(&reparsed.regions[0].ranges, &problem.regions[0].ranges);
    }
}
