//! Condition tree evaluation against trial duplicates.

use precond_validator::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

use crate::common::{self, CallCounter};

fn spec(value: Value) -> RuleSpec {
    RuleSpec::from_value(&value).expect("well-formed specification")
}

#[test]
fn short_circuit_skips_remaining_siblings() {
    common::init_tracing();
    let counter = CallCounter::default();
    let registry = ValidatorRegistry::new()
        .with("fail", common::failing)
        .with("count", counter.passing());

    let tree = spec(json!({"group": [["a", "fail"], ["b", "count"], ["c", "count"]]}));
    let mut trial = Model::new();
    let holds = ConditionEvaluator::new(&registry)
        .evaluate(&mut trial, &tree)
        .expect("no configuration error");

    assert!(!holds);
    assert_eq!(counter.count(), 0);
}

#[test]
fn empty_group_passes() {
    let registry = common::registry();
    let mut trial = Model::new();
    assert!(
        ConditionEvaluator::new(&registry)
            .evaluate(&mut trial, &spec(json!({"group": []})))
            .expect("no configuration error")
    );
}

#[rstest]
#[case::all_present(json!({"role": "admin", "status": "on", "age": 30}), true)]
#[case::outer_leaf_fails(json!({"status": "on", "age": 30}), false)]
#[case::nested_leaf_fails(json!({"role": "admin", "status": "on", "age": 12}), false)]
#[case::deepest_leaf_fails(json!({"role": "admin", "age": 30}), false)]
fn nested_groups_are_the_and_of_their_leaves(#[case] attributes: Value, #[case] expected: bool) {
    let registry = common::registry();
    let tree = spec(json!({"group": [
        ["role", "required"],
        {"name": "adult", "group": [
            ["age", "compare", {"compareValue": 18, "operator": ">="}],
            {"group": [["status", "required"]]}
        ]}
    ]}));

    let mut trial = Model::from_json(&attributes).expect("object");
    let holds = ConditionEvaluator::new(&registry)
        .evaluate(&mut trial, &tree)
        .expect("no configuration error");

    assert_eq!(holds, expected);
}

#[test]
fn failed_evaluation_leaves_original_untouched() {
    let registry = common::registry();
    let tree = spec(json!({"group": [["role", "required"]]}));
    let original = Model::new().with_attribute("status", "");

    let holds = {
        let mut trial = Trial::acquire(&original);
        ConditionEvaluator::new(&registry)
            .evaluate(trial.target_mut(), &tree)
            .expect("no configuration error")
    };

    assert!(!holds);
    assert!(!original.has_errors());
}

#[test]
fn failing_leaf_clears_its_errors() {
    let registry = common::registry();
    let mut trial = Model::new();

    let holds = ConditionEvaluator::new(&registry)
        .evaluate(&mut trial, &spec(json!(["a, b", "required"])))
        .expect("no configuration error");

    assert!(!holds);
    assert!(trial.errors().is_empty());
}

#[test]
fn unknown_validator_is_fatal() {
    let registry = common::registry();
    let mut trial = Model::new().with_attribute("email", "x@example.com");

    let error = ConditionEvaluator::new(&registry)
        .evaluate(&mut trial, &spec(json!({"group": [["email", "email"]]})))
        .unwrap_err();

    assert_eq!(
        error,
        ConfigurationError::UnknownValidator {
            id: ValidatorId::new("email")
        }
    );
}

#[test]
fn invalid_parameter_is_fatal() {
    let registry = common::registry();
    let mut trial = Model::new().with_attribute("code", "abc");

    let error = ConditionEvaluator::new(&registry)
        .evaluate(&mut trial, &spec(json!(["code", "match", {"pattern": "("}])))
        .unwrap_err();

    assert!(matches!(error, ConfigurationError::InvalidParameter { .. }));
}

#[test]
fn depth_limit_is_enforced() {
    let registry = common::registry();
    let mut tree = json!(["role", "required"]);
    for _ in 0..5 {
        tree = json!({"group": [tree]});
    }
    let tree = spec(tree);
    assert_eq!(tree.depth(), 5);

    let mut trial = Model::new().with_attribute("role", "admin");
    let evaluator = ConditionEvaluator::new(&registry);
    assert_eq!(evaluator.with_max_depth(5).evaluate(&mut trial, &tree), Ok(true));
    assert_eq!(
        evaluator.with_max_depth(2).evaluate(&mut trial, &tree),
        Err(ConfigurationError::NestingTooDeep { limit: 2 })
    );
}

#[test]
fn scenario_options_apply_inside_conditions() {
    let registry = common::registry();
    let tree = spec(json!({"group": [["role", "required", {"on": "create"}]]}));
    let evaluator = ConditionEvaluator::new(&registry);

    let mut updating = Model::new().with_scenario("update");
    assert_eq!(evaluator.evaluate(&mut updating, &tree), Ok(true));

    let mut creating = Model::new().with_scenario("create");
    assert_eq!(evaluator.evaluate(&mut creating, &tree), Ok(false));
}

#[rstest]
#[case::misspelled_compare_value(json!(["age", "compare", {"compare_value": 18, "operator": ">="}]), "compare", "compare_value")]
#[case::misspelled_length_bound(json!(["name", "length", {"mx": 3}]), "length", "mx")]
#[case::misspelled_pattern(json!(["email", "match", {"pattern": "@", "inverse": true}]), "match", "inverse")]
fn unknown_parameters_abort_evaluation(#[case] notation: Value, #[case] validator: &str, #[case] param: &str) {
    let registry = common::registry();
    let mut trial = Model::new()
        .with_attribute("age", 30)
        .with_attribute("name", "abcdefgh")
        .with_attribute("email", "a@b.c");

    let error = ConditionEvaluator::new(&registry)
        .evaluate(&mut trial, &spec(notation))
        .unwrap_err();

    assert_eq!(
        error,
        ConfigurationError::invalid_parameter(validator, param, "unknown parameter")
    );
    assert!(trial.errors().is_empty());
}
