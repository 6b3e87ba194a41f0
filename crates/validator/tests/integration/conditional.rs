//! End-to-end behaviour of the conditional validator.

use precond_validator::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

use crate::common::{self, CallCounter};

fn status_requires_role() -> ConditionalValidator {
    ConditionalValidator::new(PrimaryRule::new("required"))
        .with_conditions(GroupRule::new().with(SimpleRule::new("role", "required")))
}

#[rstest]
#[case::role_empty("", "", false)]
#[case::role_missing_status_set("", "active", false)]
#[case::role_set_status_empty("admin", "", true)]
#[case::role_set_status_set("admin", "active", false)]
fn status_is_required_only_with_a_role(
    #[case] role: &str,
    #[case] status: &str,
    #[case] status_error: bool,
) {
    common::init_tracing();
    let registry = common::registry();
    let mut user = Model::new()
        .with_attribute("role", role)
        .with_attribute("status", status);

    status_requires_role()
        .validate_attribute(&registry, &mut user, "status")
        .expect("no configuration error");

    assert_eq!(user.has_errors_for("status"), status_error);
    assert!(!user.has_errors_for("role"));
    if status_error {
        assert_eq!(
            user.errors().first("status").map(|e| &*e.code),
            Some("required")
        );
    }
}

#[test]
fn prerequisite_errors_never_reach_the_object() {
    let registry = common::registry();
    let validator = ConditionalValidator::new(PrimaryRule::new("required")).with_conditions(
        GroupRule::new()
            .with(SimpleRule::new("email", "match").with_param("pattern", "@"))
            .with(SimpleRule::new("name", "length").with_param("min", 3)),
    );

    let mut user = Model::new()
        .with_attribute("email", "a@b.c")
        .with_attribute("name", "x");
    validator
        .validate_attribute(&registry, &mut user, "status")
        .expect("no configuration error");

    assert!(user.errors().is_empty());
}

#[test]
fn existing_errors_do_not_fail_prerequisites() {
    let registry = common::registry();
    let mut user = Model::new().with_attribute("role", "admin");
    user.add_error("email", ValidationError::new("taken", "Email already taken"));

    status_requires_role()
        .validate_attribute(&registry, &mut user, "status")
        .expect("no configuration error");

    assert!(user.has_errors_for("status"));
    assert_eq!(user.errors().count_for("email"), 1);
}

#[test]
fn skip_conditional_bypasses_prerequisites() {
    let counter = CallCounter::default();
    let registry = common::registry().with("count", counter.passing());
    let validator = ConditionalValidator::new(PrimaryRule::new("required"))
        .with_conditions(
            GroupRule::new()
                .with(SimpleRule::new("role", "required"))
                .with(SimpleRule::new("role", "count")),
        )
        .skip_conditional(true);

    let mut user = Model::new();
    validator
        .validate_attribute(&registry, &mut user, "status")
        .expect("no configuration error");

    assert!(user.has_errors_for("status"));
    assert_eq!(counter.count(), 0);
}

#[test]
fn malformed_nested_group_stops_evaluation() {
    let counter = CallCounter::default();
    let registry = common::registry().with("count", counter.passing());
    let validator = ConditionalValidator::new(PrimaryRule::new("count")).with_conditions(
        GroupRule::new().with(
            SimpleRule::new("role", "conditional")
                .with_param("conditionalRules", json!({"group": "role"}))
                .with_param("rule", "required"),
        ),
    );

    let mut user = Model::new().with_attribute("role", "admin");
    let error = validator
        .validate_attribute(&registry, &mut user, "status")
        .unwrap_err();

    assert_eq!(
        error,
        ConfigurationError::MalformedGroup {
            group: "group".into()
        }
    );
    assert_eq!(counter.count(), 0);
    assert!(user.errors().is_empty());
}

#[test]
fn nested_conditional_as_prerequisite() {
    let registry = common::registry();
    // `status` must be 'active' for admins, and that must hold before `note`
    // is required.
    let validator = ConditionalValidator::new(PrimaryRule::new("required")).with_conditions(
        GroupRule::new().with(
            SimpleRule::new("status", "conditional")
                .with_param("conditionalRules", json!({"group": [["role", "compare", {"compareValue": "admin"}]]}))
                .with_param("rule", json!(["compare", {"compareValue": "active"}])),
        ),
    );

    let mut guest = Model::new().with_attribute("role", "guest");
    validator
        .validate_attribute(&registry, &mut guest, "note")
        .expect("no configuration error");
    assert!(guest.has_errors_for("note"));

    let mut inactive_admin = Model::new()
        .with_attribute("role", "admin")
        .with_attribute("status", "banned");
    validator
        .validate_attribute(&registry, &mut inactive_admin, "note")
        .expect("no configuration error");
    assert!(inactive_admin.errors().is_empty());
}

#[test]
fn conditional_as_registered_primary_rule() {
    let registry = common::registry();
    let bound = registry
        .instantiate(
            &ValidatorId::new("conditional"),
            AttributeSelector::parse("phone, email"),
            &Params::new()
                .with("conditionalRules", json!({"group": [["contact", "required"]]}))
                .with("rule", json!(["length", {"min": 5}])),
        )
        .expect("valid configuration");

    let mut user = Model::new()
        .with_attribute("contact", "yes")
        .with_attribute("phone", "123")
        .with_attribute("email", "someone@example.com");
    bound.run(&registry, &mut user).expect("no configuration error");

    assert_eq!(
        user.errors().first("phone").map(|e| &*e.code),
        Some("too_short")
    );
    assert!(!user.has_errors_for("email"));
}

#[test]
fn primary_rule_honours_common_options() {
    let registry = common::registry();
    let validator = ConditionalValidator::new(
        PrimaryRule::new("required")
            .with_param("on", "create")
            .with_param("message", "{attribute} is needed for admins"),
    )
    .with_conditions(GroupRule::new().with(SimpleRule::new("role", "required")));

    let mut updating = Model::new()
        .with_attribute("role", "admin")
        .with_scenario("update");
    validator
        .validate_attribute(&registry, &mut updating, "status")
        .expect("no configuration error");
    assert!(updating.errors().is_empty());

    let mut creating = Model::new()
        .with_attribute("role", "admin")
        .with_scenario("create");
    validator
        .validate_attribute(&registry, &mut creating, "status")
        .expect("no configuration error");
    assert_eq!(
        creating.errors().first("status").map(|e| e.message.to_string()),
        Some("status is needed for admins".to_owned())
    );
}

#[test]
fn primary_rule_errors_land_on_the_object() {
    let registry = common::registry().with("fail", common::failing);
    let validator = ConditionalValidator::new(PrimaryRule::new("fail"));

    let mut user = Model::new();
    validator
        .validate(&registry, &mut user, ["a", "b"])
        .expect("no configuration error");

    assert_eq!(user.errors().len(), 2);
    assert_eq!(
        user.errors().first("b").and_then(|e| e.field.as_deref()),
        Some("b")
    );
}

#[test]
fn client_script_pass_through() {
    let user = Model::new();
    let validator = status_requires_role();
    assert_eq!(validator.client_side_script(&user, "status"), None);

    let validator = validator.with_client_script("if (value === '') messages.push('Status is required');");
    assert_eq!(
        validator.client_side_script(&user, "status"),
        Some("if (value === '') messages.push('Status is required');")
    );
}
