//! Building validators from serialized configuration.

use precond_validator::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use crate::common;

fn from_json(value: Value) -> Result<ConditionalValidator, ConfigurationError> {
    let config: ConditionalConfig = serde_json::from_value(value).expect("deserializable config");
    ConditionalValidator::from_config(&config)
}

#[test]
fn full_configuration() {
    let validator = from_json(json!({
        "conditionalRules": {
            "name": "billing",
            "group": [
                ["paymentMethod", "compare", {"compareValue": "card"}],
                ["country", "required", {"except": "draft"}]
            ]
        },
        "rule": ["match", {"pattern": "^\\d{16}$", "message": "Card number is invalid"}],
        "clientValidationJS": "validateCard(value, messages);",
        "maxDepth": 4
    }))
    .expect("valid configuration");

    let registry = common::registry();
    let mut order = Model::new()
        .with_attribute("paymentMethod", "card")
        .with_attribute("country", "NL")
        .with_attribute("cardNumber", "1234");
    validator
        .validate_attribute(&registry, &mut order, "cardNumber")
        .expect("no configuration error");

    assert_eq!(
        order.errors().first("cardNumber").map(|e| e.message.to_string()),
        Some("Card number is invalid".to_owned())
    );
    assert_eq!(
        validator.client_side_script(&order, "cardNumber"),
        Some("validateCard(value, messages);")
    );
}

#[test]
fn missing_rules_mean_no_prerequisites() {
    let validator = from_json(json!({"rule": "required"})).expect("valid configuration");
    assert!(validator.conditions().is_empty_group());
    assert!(!validator.skips_conditional());
}

#[test]
fn malformed_group_is_reported_at_build_time() {
    let error = from_json(json!({
        "conditionalRules": {"name": "outer", "group": [{"name": "inner", "group": {"a": 1}}]},
        "rule": "required"
    }))
    .unwrap_err();

    assert_eq!(
        error,
        ConfigurationError::MalformedGroup {
            group: "inner".into()
        }
    );
    assert_eq!(error.to_string(), "group must be an array of rules (group 'inner')");
}

#[test]
fn lenient_and_strict_group_entries() {
    let rules = json!({"group": [["role", "required"], "role", null, 3]});

    let lenient = from_json(json!({"conditionalRules": rules.clone(), "rule": "required"}))
        .expect("scalars are skipped");
    assert_eq!(lenient.conditions().leaf_count(), 1);

    let strict = from_json(json!({
        "conditionalRules": rules,
        "rule": "required",
        "strictGroups": true
    }));
    assert!(matches!(strict, Err(ConfigurationError::MalformedGroup { .. })));
}

#[test]
fn bad_rule_shapes_are_rejected() {
    assert!(matches!(
        from_json(json!({"conditionalRules": {"rules": []}, "rule": "required"})),
        Err(ConfigurationError::MalformedRule { .. })
    ));
    assert!(matches!(
        from_json(json!({"conditionalRules": ["role"], "rule": "required"})),
        Err(ConfigurationError::MalformedRule { .. })
    ));
    assert!(matches!(
        from_json(json!({"rule": 7})),
        Err(ConfigurationError::MalformedRule { .. })
    ));
}

#[test]
fn configured_depth_limit_applies() {
    let validator = from_json(json!({
        "conditionalRules": {"group": [{"group": [{"group": [["role", "required"]]}]}]},
        "rule": "required",
        "maxDepth": 2
    }))
    .expect("valid configuration");

    let registry = common::registry();
    let mut user = Model::new().with_attribute("role", "admin");
    assert_eq!(
        validator.validate_attribute(&registry, &mut user, "status"),
        Err(ConfigurationError::NestingTooDeep { limit: 2 })
    );
}

#[test]
fn zero_depth_limit_is_rejected() {
    let expected = ConfigurationError::invalid_parameter("conditional", "maxDepth", "must be at least 1");
    assert_eq!(
        from_json(json!({"rule": "required", "maxDepth": 0})).unwrap_err(),
        expected
    );

    let registry = common::registry();
    let error = registry
        .instantiate(
            &ValidatorId::new("conditional"),
            AttributeSelector::single("status"),
            &Params::new().with("rule", "required").with("maxDepth", 0),
        )
        .unwrap_err();
    assert_eq!(error, expected);
}

#[test]
fn factory_parameter_types_are_checked() {
    let registry = common::registry();
    let error = registry
        .instantiate(
            &ValidatorId::new("conditional"),
            AttributeSelector::single("status"),
            &Params::new().with("rule", "required").with("skipConditional", "yes"),
        )
        .unwrap_err();

    assert!(matches!(
        error,
        ConfigurationError::InvalidParameter { ref param, .. } if param == "skipConditional"
    ));
}

#[test]
fn specification_round_trips_through_notation() {
    let notation = json!({"name": "contact", "group": [
        [["phone", "email"], "required"],
        ["age", "compare", {"compareValue": 18, "operator": ">="}]
    ]});
    let spec = RuleSpec::from_value(&notation).expect("well-formed");
    assert_eq!(spec.to_value(), notation);
}
