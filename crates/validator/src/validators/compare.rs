//! Comparison validator
//!
//! Compares an attribute with another attribute (`compareAttribute`,
//! default `<attribute>_repeat`) or with a constant (`compareValue`).
//! Numbers and numeric strings compare numerically; everything else compares
//! by text.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use super::{NULL, is_empty, scalar_text};
use crate::error::{ConfigurationError, ValidationError};
use crate::registry::{AttributeValidator, ValidatorRegistry};
use crate::rule::Params;
use crate::target::ValidationTarget;

const ID: &str = "compare";
const PARAMS: &[&str] = &["compareAttribute", "compareValue", "operator", "allowEmpty"];

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompareOperator {
    /// `==` (also written `=`)
    #[default]
    Equal,
    /// `!=`
    NotEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterOrEqual,
    /// `<`
    Less,
    /// `<=`
    LessOrEqual,
}

impl CompareOperator {
    /// Applies the operator to an ordering. `None` (incomparable) only
    /// satisfies `!=`.
    #[must_use]
    pub fn holds(self, ordering: Option<Ordering>) -> bool {
        match (self, ordering) {
            (Self::NotEqual, None) => true,
            (_, None) => false,
            (Self::Equal, Some(o)) => o == Ordering::Equal,
            (Self::NotEqual, Some(o)) => o != Ordering::Equal,
            (Self::Greater, Some(o)) => o == Ordering::Greater,
            (Self::GreaterOrEqual, Some(o)) => o != Ordering::Less,
            (Self::Less, Some(o)) => o == Ordering::Less,
            (Self::LessOrEqual, Some(o)) => o != Ordering::Greater,
        }
    }

    /// The operator's symbol.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
        }
    }
}

impl FromStr for CompareOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" | "==" => Ok(Self::Equal),
            "!=" => Ok(Self::NotEqual),
            ">" => Ok(Self::Greater),
            ">=" => Ok(Self::GreaterOrEqual),
            "<" => Ok(Self::Less),
            "<=" => Ok(Self::LessOrEqual),
            other => Err(format!("unknown operator '{other}'")),
        }
    }
}

impl fmt::Display for CompareOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// What the attribute is compared against.
#[derive(Debug, Clone, PartialEq)]
enum Operand {
    /// Another attribute; `None` means `<attribute>_repeat`.
    Attribute(Option<String>),
    /// A constant.
    Value(Value),
}

/// Compares an attribute against another attribute or a constant.
#[derive(Debug, Clone, PartialEq)]
pub struct Compare {
    operand: Operand,
    operator: CompareOperator,
    allow_empty: bool,
}

impl Compare {
    /// Compares against `<attribute>_repeat` for equality.
    #[must_use]
    pub fn repeat() -> Self {
        Self {
            operand: Operand::Attribute(None),
            operator: CompareOperator::Equal,
            allow_empty: false,
        }
    }

    /// Compares against another attribute.
    pub fn attribute(name: impl Into<String>, operator: CompareOperator) -> Self {
        Self {
            operand: Operand::Attribute(Some(name.into())),
            operator,
            allow_empty: false,
        }
    }

    /// Compares against a constant.
    pub fn value(value: impl Into<Value>, operator: CompareOperator) -> Self {
        Self {
            operand: Operand::Value(value.into()),
            operator,
            allow_empty: false,
        }
    }

    /// Controls whether empty values pass.
    #[must_use = "builder methods must be chained or built"]
    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }
}

impl AttributeValidator for Compare {
    fn validate_attribute(
        &self,
        _registry: &ValidatorRegistry,
        target: &mut dyn ValidationTarget,
        attribute: &str,
    ) -> Result<(), ConfigurationError> {
        let value = target.attribute(attribute).unwrap_or(&NULL);
        if self.allow_empty && is_empty(value, false) {
            return Ok(());
        }

        let (other, label) = match &self.operand {
            Operand::Value(constant) => (constant, constant.to_string()),
            Operand::Attribute(name) => {
                let name = name
                    .clone()
                    .unwrap_or_else(|| format!("{attribute}_repeat"));
                (target.attribute(&name).unwrap_or(&NULL), name)
            }
        };

        if self.operator.holds(loose_cmp(value, other)) {
            return Ok(());
        }

        let error = ValidationError::new(
            "compare",
            format!("Must be {} {label}", self.operator),
        )
        .with_field(attribute.to_owned())
        .with_param("operator", self.operator.symbol())
        .with_param("compareTo", label);
        target.add_error(attribute, error);
        Ok(())
    }
}

/// Orders two values: numerically when both read as finite numbers, by text when
/// both are scalars, by JSON equality otherwise.
fn loose_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (as_number(left), as_number(right)) {
        return a.partial_cmp(&b);
    }
    match (scalar_text(left), scalar_text(right)) {
        (Some(a), Some(b)) => Some(a.cmp(&b)),
        _ => (left == right).then_some(Ordering::Equal),
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|n| n.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Registry factory for `compare`.
pub fn factory(params: &Params) -> Result<Box<dyn AttributeValidator>, ConfigurationError> {
    params.deny_unknown(ID, PARAMS)?;
    let operator = match params.str(ID, "operator")? {
        Some(symbol) => symbol
            .parse()
            .map_err(|reason: String| ConfigurationError::invalid_parameter(ID, "operator", reason))?,
        None => CompareOperator::Equal,
    };

    let operand = match (params.get("compareValue"), params.str(ID, "compareAttribute")?) {
        (Some(_), Some(_)) => {
            return Err(ConfigurationError::invalid_parameter(
                ID,
                "compareValue",
                "compareValue and compareAttribute are mutually exclusive",
            ));
        }
        (Some(constant), None) => Operand::Value(constant.clone()),
        (None, name) => Operand::Attribute(name.map(str::to_owned)),
    };

    Ok(Box::new(Compare {
        operand,
        operator,
        allow_empty: params.bool(ID, "allowEmpty")?.unwrap_or(false),
    }))
}
