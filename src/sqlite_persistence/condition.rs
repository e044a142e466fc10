//! Composable `where`/`order by`/`limit` descriptor.
//!
//! Predicates are AND-ed together in the order they are added. Raw fragments
//! are inserted verbatim; nothing is validated here, a malformed fragment only
//! shows up as an executor failure when the query runs.

use super::entity::EntityField;
use super::field_value::FieldValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionOp {
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    Like,
}

impl ConditionOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ConditionOp::Equal => "=",
            ConditionOp::NotEqual => "!=",
            ConditionOp::LessThan => "<",
            ConditionOp::LessEqual => "<=",
            ConditionOp::GreaterThan => ">",
            ConditionOp::GreaterEqual => ">=",
            ConditionOp::Like => "like",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Condition {
    predicates: Vec<String>,
    order: Option<String>,
    limit: Option<usize>,
}

impl Condition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a condition holding a single field predicate.
    pub fn with<F: EntityField>(field: F, value: impl Into<FieldValue>, op: ConditionOp) -> Self {
        let mut condition = Self::new();
        condition.add(field, value, op);
        condition
    }

    pub fn add<F: EntityField>(
        &mut self,
        field: F,
        value: impl Into<FieldValue>,
        op: ConditionOp,
    ) -> &mut Self {
        self.predicates.push(format!(
            "{} {} {}",
            field.qualified(),
            op.as_sql(),
            value.into().to_sql_literal()
        ));
        self
    }

    /// Compares two SQL expressions, typically two qualified columns of
    /// different tables inside a sub-query.
    pub fn add_custom_compare(&mut self, lhs: &str, rhs: &str, op: ConditionOp) -> &mut Self {
        self.predicates
            .push(format!("{} {} {}", lhs, op.as_sql(), rhs));
        self
    }

    pub fn add_custom(&mut self, fragment: impl Into<String>) -> &mut Self {
        let fragment = fragment.into();
        if !fragment.trim().is_empty() {
            self.predicates.push(fragment);
        }
        self
    }

    /// Appends every predicate of `other`. Order and limit of `other` are
    /// ignored, the receiver's win.
    pub fn merge(&mut self, other: &Condition) -> &mut Self {
        self.predicates.extend(other.predicates.iter().cloned());
        self
    }

    /// Replaces the default ordering, e.g. `"season.SeasonIndex desc"`.
    pub fn set_order(&mut self, order: impl Into<String>) -> &mut Self {
        self.order = Some(order.into());
        self
    }

    pub fn set_limit(&mut self, limit: usize) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// The predicates joined with `and`, without the `where` keyword.
    pub fn predicates_sql(&self) -> String {
        self.predicates
            .iter()
            .map(|p| format!("({})", p))
            .collect::<Vec<_>>()
            .join(" and ")
    }

    pub fn where_clause(&self) -> String {
        if self.predicates.is_empty() {
            String::new()
        } else {
            format!(" where {}", self.predicates_sql())
        }
    }

    pub fn order_clause(&self, default_order: Option<&str>) -> String {
        match (&self.order, default_order) {
            (Some(order), _) => format!(" order by {}", order),
            (None, Some(order)) => format!(" order by {}", order),
            (None, None) => String::new(),
        }
    }

    pub fn limit_clause(&self) -> String {
        self.limit
            .map(|limit| format!(" limit {}", limit))
            .unwrap_or_default()
    }
}
