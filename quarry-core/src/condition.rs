use crate::{AsValue, OrmError, Result, SqlContext, SqlWriter, Value};
use std::{borrow::Cow, fmt};

/// Comparison operator of a [`Condition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operator {
    Equal,
    NotEqual,
    Greater,
    Less,
    GreaterEqual,
    LessEqual,
    Like,
    NotLike,
    In,
    NotIn,
    /// Any other comparison token, for example `ILIKE` or `IS DISTINCT FROM`.
    Custom(Cow<'static, str>),
}

impl Operator {
    /// Map a token (`"="`, `"not in"`, `"<>"`...) to an operator.
    ///
    /// Unknown tokens become [`Operator::Custom`], checked when the condition is written.
    pub fn parse(token: &str) -> Operator {
        let normalized = token.split_whitespace().collect::<Vec<_>>().join(" ");
        match normalized.to_ascii_uppercase().as_str() {
            "=" | "==" => Operator::Equal,
            "!=" | "<>" => Operator::NotEqual,
            ">" => Operator::Greater,
            "<" => Operator::Less,
            ">=" => Operator::GreaterEqual,
            "<=" => Operator::LessEqual,
            "LIKE" => Operator::Like,
            "NOT LIKE" => Operator::NotLike,
            "IN" => Operator::In,
            "NOT IN" => Operator::NotIn,
            _ => Operator::Custom(normalized.into()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::Greater => ">",
            Operator::Less => "<",
            Operator::GreaterEqual => ">=",
            Operator::LessEqual => "<=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Custom(v) => v,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }

    pub fn is_like(&self) -> bool {
        matches!(self, Operator::Like | Operator::NotLike)
    }

    pub fn is_negated(&self) -> bool {
        matches!(self, Operator::NotLike | Operator::NotIn)
    }

    /// Custom tokens are limited to letters, spaces and comparison punctuation.
    pub fn is_valid(&self) -> bool {
        match self {
            Operator::Custom(v) => {
                !v.trim().is_empty()
                    && v.chars().all(|c| {
                        c.is_ascii_alphabetic()
                            || c == ' '
                            || matches!(c, '<' | '>' | '=' | '!' | '~' | '@' | '&' | '|' | '^' | '#' | '*')
                    })
            }
            _ => true,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Operator {
    fn from(value: &str) -> Self {
        Operator::parse(value)
    }
}

/// One `field operator value` comparison. Conditions in a list are AND-ed.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: Cow<'static, str>,
    pub operator: Operator,
    pub value: Value,
}

impl Condition {
    pub fn new(
        field: impl Into<Cow<'static, str>>,
        operator: impl Into<Operator>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }
    pub fn equal(field: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Equal, value)
    }
    pub fn not_equal(field: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::NotEqual, value)
    }
    pub fn greater(field: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Greater, value)
    }
    pub fn less(field: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Less, value)
    }
    pub fn greater_equal(field: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::GreaterEqual, value)
    }
    pub fn less_equal(field: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::LessEqual, value)
    }
    pub fn like(field: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Like, value)
    }
    pub fn not_like(field: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::NotLike, value)
    }
    pub fn is_in<T: AsValue>(
        field: impl Into<Cow<'static, str>>,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        Self::new(
            field,
            Operator::In,
            values.into_iter().collect::<Vec<_>>().as_value(),
        )
    }
    pub fn not_in<T: AsValue>(
        field: impl Into<Cow<'static, str>>,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        Self::new(
            field,
            Operator::NotIn,
            values.into_iter().collect::<Vec<_>>().as_value(),
        )
    }

    pub(crate) fn invalid(&self, reason: impl Into<Cow<'static, str>>) -> crate::Error {
        OrmError::InvalidCondition {
            field: self.field.to_string().into(),
            reason: reason.into(),
        }
        .into()
    }
}

/// Free text search: `text` is matched with LIKE against every field, OR-ed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Search {
    pub fields: Vec<Cow<'static, str>>,
    pub text: String,
}

impl Search {
    pub fn new<F: Into<Cow<'static, str>>>(
        fields: impl IntoIterator<Item = F>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            text: text.into(),
        }
    }

    /// Search contributes a clause only with both fields and text.
    pub fn is_active(&self) -> bool {
        !self.fields.is_empty() && !self.text.is_empty()
    }
}

/// Compiled condition clause, without the `WHERE` keyword.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledConditions {
    pub clause: String,
    pub args: Vec<Value>,
}

/// Compile `conditions` and an optional search into a clause.
///
/// Placeholders continue after the arguments already in `args` and the new
/// arguments are appended to it. The clause is empty when there is nothing
/// to filter on.
pub fn compile_conditions(
    writer: &(impl SqlWriter + ?Sized),
    conditions: &[Condition],
    search: Option<&Search>,
    args: Vec<Value>,
) -> Result<CompiledConditions> {
    let mut args = args;
    let mut clause = String::new();
    let mut context = SqlContext::default();
    writer.write_conditions(&mut context, &mut clause, &mut args, conditions, search)?;
    Ok(CompiledConditions { clause, args })
}
