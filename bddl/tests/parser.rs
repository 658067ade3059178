// tests/parser.rs

use bddl::ast::{GoalExpr, ObjectDecl, PredicateCall, Term};
use bddl::parser::{parse_goal, parse_problem, parse_sexpr, parse_with_enhanced_errors, ParseError, SExpr};
use pretty_assertions::assert_eq;

const KITCHEN_OPEN_DRAWER: &str = r#"
(define (problem LIBERO_Kitchen_Tabletop_Manipulation)
  (:domain robosuite)
  (:language open the top drawer of the cabinet)
    (:regions
      (wooden_cabinet_init_region
          (:target kitchen_table)
          (:ranges (
              (-0.01 -0.31 0.01 -0.29)
            )
          )
          (:yaw_rotation (
              (3.141592653589793 3.141592653589793)
            )
          )
      )
      (top_region
          (:target wooden_cabinet_1)
      )
    )

  ; fixtures are static furniture
  (:fixtures
    kitchen_table - kitchen_table
  )

  (:objects
    akita_black_bowl_1 - akita_black_bowl
    plate_1 - plate
    wooden_cabinet_1 - wooden_cabinet
  )

  (:obj_of_interest
    wooden_cabinet_1
  )

  (:init
    (On akita_black_bowl_1 kitchen_table_akita_black_bowl_init_region)
    (On wooden_cabinet_1 kitchen_table_wooden_cabinet_init_region)
  )

  (:goal
    (And (Open wooden_cabinet_1_top_region))
  )

)
"#;

#[test]
fn test_parse_kitchen_problem() {
    let problem = parse_problem(KITCHEN_OPEN_DRAWER).expect("kitchen problem parses");

    assert_eq!(problem.name, "LIBERO_Kitchen_Tabletop_Manipulation");
    assert_eq!(problem.domain, "robosuite");
    assert_eq!(problem.language, "open the top drawer of the cabinet");
    assert_eq!(problem.fixtures, vec![ObjectDecl::new("kitchen_table", "kitchen_table")]);
    assert_eq!(problem.objects.len(), 3);
    assert_eq!(problem.objects_of_interest, vec!["wooden_cabinet_1".to_string()]);
    assert_eq!(problem.init.len(), 2);

    let region = &problem.regions[0];
    assert_eq!(region.full_name(), "kitchen_table_wooden_cabinet_init_region");
    assert_eq!(region.ranges, vec![[-0.01, -0.31, 0.01, -0.29]]);
    assert_eq!(region.yaw_rotation, vec![[std::f64::consts::PI, std::f64::consts::PI]]);
    assert!(problem.region("wooden_cabinet_1_top_region").is_some());

    assert_eq!(
        problem.goal,
        GoalExpr::And(vec![GoalExpr::Atom(PredicateCall::with_symbols(
            "Open",
            &["wooden_cabinet_1_top_region"]
        ))])
    );
}

#[test]
fn test_language_numbers_keep_their_spelling() {
    let problem =
        parse_problem("(define (problem p) (:language open the 2 drawers within 1.50 s) (:goal (true)))").unwrap();
    assert_eq!(problem.language, "open the 2 drawers within 1.50 s");
}

#[test]
fn test_declarations_share_category() {
    let input = r#"(define (problem p) (:language stack the bowls)
        (:objects bowl_1 bowl_2 - akita_black_bowl plate_1 - plate)
        (:goal (StackBowl bowl_1 bowl_2)))"#;
    let problem = parse_problem(input).expect("parses");
    assert_eq!(
        problem.objects,
        vec![
            ObjectDecl::new("bowl_1", "akita_black_bowl"),
            ObjectDecl::new("bowl_2", "akita_black_bowl"),
            ObjectDecl::new("plate_1", "plate"),
        ]
    );
    // missing :domain falls back to robosuite, bare atom goal is wrapped
    assert_eq!(problem.domain, "robosuite");
    assert!(matches!(problem.goal, GoalExpr::And(ref children) if children.len() == 1));
}

#[test]
fn test_goal_with_numbers_and_connectives() {
    let goal = parse_goal("(and (InAir plate_1 0.95) (not (Close drawer_1)) (Or (Up a) (Up b)))")
        .expect("goal parses");
    let GoalExpr::And(children) = goal else {
        panic!("expected conjunction");
    };
    assert_eq!(
        children[0],
        GoalExpr::Atom(PredicateCall::new(
            "InAir",
            vec![Term::symbol("plate_1"), Term::Number(0.95)]
        ))
    );
    assert!(matches!(children[1], GoalExpr::Not(_)));
    assert!(matches!(children[2], GoalExpr::Or(ref v) if v.len() == 2));
}

#[test]
fn test_negative_and_exponent_numbers() {
    let forms = parse_sexpr("(-0.5 1e-3 - -x 3d_box)").expect("parses");
    let SExpr::List(items, _) = &forms[0] else {
        panic!("expected list");
    };
    assert_eq!(items[0].as_number(), Some(-0.5));
    assert_eq!(items[1].as_number(), Some(0.001));
    assert_eq!(items[2].as_symbol(), Some("-"));
    assert_eq!(items[3].as_symbol(), Some("-x"));
    assert_eq!(items[4].as_symbol(), Some("3d_box"));
}

#[test]
fn test_missing_goal_section() {
    let err = parse_problem("(define (problem p) (:language pick it up))").unwrap_err();
    assert_eq!(err, ParseError::MissingSection("goal".to_string()));
}

#[test]
fn test_duplicate_section_is_rejected() {
    let input = "(define (problem p) (:language a) (:language b) (:goal (true)))";
    let err = parse_problem(input).unwrap_err();
    assert!(matches!(err, ParseError::DuplicateSection { ref section, .. } if section == "language"));
}

#[test]
fn test_unbalanced_parens_report_location() {
    let err = parse_problem("(define (problem p)\n  (:goal (Open a)").unwrap_err();
    let span = err.span().expect("syntax errors carry a span");
    assert!(span.start_line >= 1);
    assert!(matches!(err, ParseError::Syntax { .. }));
}

#[test]
fn test_goal_argument_must_be_atom() {
    let err = parse_goal("(In bowl_1 (cabinet))").unwrap_err();
    assert!(err.to_string().contains("cannot take a list argument"), "{}", err);
}

#[test]
fn test_enhanced_errors_name_the_file() {
    let rendered = parse_with_enhanced_errors("(define (problem p)", Some("broken.bddl")).unwrap_err();
    assert!(rendered.contains("broken.bddl"), "{}", rendered);
    assert!(rendered.contains('^'));
}

#[test]
fn test_parse_single_predicate_call() {
    let call = bddl::parse_predicate_call("(On plate_1 kitchen_table_plate_init_region)").expect("parses");
    assert_eq!(
        call,
        PredicateCall::with_symbols("On", &["plate_1", "kitchen_table_plate_init_region"])
    );
    assert!(bddl::parse_predicate_call("(On plate_1 (x))").is_err());
}
