//! Property-based tests for condition trees.

use precond_validator::prelude::*;
use proptest::prelude::*;

const ATTRIBUTES: [&str; 6] = ["a", "b", "c", "d", "e", "f"];

/// Trees of `required` rules over [`ATTRIBUTES`], up to four groups deep.
fn tree() -> impl Strategy<Value = RuleSpec> {
    let leaf = (0..ATTRIBUTES.len())
        .prop_map(|index| RuleSpec::from(SimpleRule::new(ATTRIBUTES[index], "required")));
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop::collection::vec(inner, 0..4).prop_map(|rules| {
            RuleSpec::Group(GroupRule {
                rules,
                ..GroupRule::new()
            })
        })
    })
}

fn model(present: &[bool]) -> Model {
    ATTRIBUTES
        .iter()
        .zip(present)
        .filter(|(_, present)| **present)
        .fold(Model::new(), |model, (name, _)| model.with_attribute(*name, "set"))
}

fn leaves_hold(spec: &RuleSpec, present: &[bool]) -> bool {
    match spec {
        RuleSpec::Simple(rule) => rule.attributes.names().all(|name| {
            ATTRIBUTES
                .iter()
                .position(|candidate| *candidate == name)
                .is_some_and(|index| present[index])
        }),
        RuleSpec::Group(group) => group.rules.iter().all(|child| leaves_hold(child, present)),
    }
}

proptest! {
    #[test]
    fn tree_holds_iff_every_leaf_holds(
        spec in tree(),
        present in prop::collection::vec(any::<bool>(), ATTRIBUTES.len()),
    ) {
        let registry = ValidatorRegistry::with_defaults();
        let mut trial = model(&present);
        let holds = ConditionEvaluator::new(&registry)
            .evaluate(&mut trial, &spec)
            .expect("no configuration error");

        prop_assert_eq!(holds, leaves_hold(&spec, &present));
        prop_assert!(!trial.has_errors());
    }

    #[test]
    fn conditional_never_touches_attributes_it_does_not_validate(
        spec in tree(),
        present in prop::collection::vec(any::<bool>(), ATTRIBUTES.len()),
    ) {
        let registry = ValidatorRegistry::with_defaults();
        let validator = ConditionalValidator::new(PrimaryRule::new("required")).with_conditions(spec.clone());
        let mut object = model(&present);

        validator
            .validate_attribute(&registry, &mut object, "target")
            .expect("no configuration error");

        let failed: Vec<_> = object.errors().attributes().collect();
        if leaves_hold(&spec, &present) {
            prop_assert_eq!(failed, vec!["target"]);
        } else {
            prop_assert!(failed.is_empty());
        }
    }

    #[test]
    fn notation_round_trip_preserves_structure(spec in tree()) {
        let parsed = RuleSpec::from_value(&spec.to_value()).expect("well-formed");
        prop_assert_eq!(parsed.leaf_count(), spec.leaf_count());
        prop_assert_eq!(parsed.depth(), spec.depth());
    }
}
