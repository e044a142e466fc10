//! Strongly typed entities with a name-addressable field layer.
//!
//! Each entity is a plain struct. Generic operations (hydration from rows,
//! upserts, bulk updates, migrations) address its fields through a per-entity
//! field enum generated by [`entity_fields!`](crate::entity_fields), which maps
//! column names to variants with a `match` and no runtime reflection.

use super::condition::Condition;
use super::field_value::FieldValue;
use super::table::Table;
use std::fmt::Debug;

/// Declares a field enum for an entity table.
///
/// ```ignore
/// entity_fields! {
///     pub enum SeasonField in "season" {
///         Id => "ID",
///         SeriesId => "SeriesID",
///     }
/// }
/// ```
#[macro_export]
macro_rules! entity_fields {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident in $table:literal {
            $($variant:ident => $column:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant),+
        }

        impl $crate::sqlite_persistence::EntityField for $name {
            fn table_name() -> &'static str {
                $table
            }

            fn column_name(self) -> &'static str {
                match self {
                    $($name::$variant => $column),+
                }
            }

            fn from_column_name(name: &str) -> Option<Self> {
                $(
                    if name.eq_ignore_ascii_case($column) {
                        return Some($name::$variant);
                    }
                )+
                None
            }
        }
    };
}

pub trait EntityField: Copy + Eq + Debug + Send + Sync + 'static {
    fn table_name() -> &'static str;
    fn column_name(self) -> &'static str;
    fn from_column_name(name: &str) -> Option<Self>;

    fn qualified(self) -> String {
        format!("{}.{}", Self::table_name(), self.column_name())
    }
}

/// Option values that shape the default query of an entity type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryContext {
    pub show_hidden_items: bool,
    pub only_show_local_files: bool,
    /// Set by the configuration tooling: viewer-only filters are skipped so
    /// every row stays reachable.
    pub config_mode: bool,
}

/// Source of the [`QueryContext`] used for standard conditions. The options
/// store implements it; a bare `QueryContext` is a fixed source.
pub trait QuerySettings: Send + Sync {
    fn query_context(&self) -> QueryContext;
}

impl QuerySettings for QueryContext {
    fn query_context(&self) -> QueryContext {
        *self
    }
}

pub trait Entity: Default + Clone + Debug + Send + Sync + 'static {
    type Field: EntityField;

    const TABLE: &'static Table;

    fn primary_field() -> Self::Field;

    fn get(&self, field: Self::Field) -> FieldValue;

    fn set(&mut self, field: Self::Field, value: FieldValue);

    /// Rebuilds a composite primary key from the fields it derives from.
    /// Entities with a plain key keep the default no-op.
    fn sync_primary_key(&mut self) {}

    fn primary_key(&self) -> String {
        self.get(Self::primary_field()).as_string()
    }

    /// Ordering applied when a query doesn't set its own.
    fn default_order() -> Option<String> {
        None
    }

    /// Predicates merged into every query unless the caller opts out.
    fn standard_conditions(_ctx: &QueryContext) -> Condition {
        Condition::new()
    }

    fn select_sql(condition: &Condition, include_standard: bool, ctx: &QueryContext) -> String {
        let mut condition = condition.clone();
        if include_standard {
            condition.merge(&Self::standard_conditions(ctx));
        }
        format!(
            "select {} from {}{}{}{}",
            Self::TABLE.select_list(),
            Self::TABLE.name,
            condition.where_clause(),
            condition.order_clause(Self::default_order().as_deref()),
            condition.limit_clause()
        )
    }

    fn get_named(&self, name: &str) -> Option<FieldValue> {
        Self::Field::from_column_name(name).map(|field| self.get(field))
    }

    fn set_named(&mut self, name: &str, value: FieldValue) -> bool {
        match Self::Field::from_column_name(name) {
            Some(field) => {
                self.set(field, value);
                true
            }
            None => false,
        }
    }

    /// Builds an entity from a row laid out like `TABLE.select_list()`.
    fn from_row(values: &[FieldValue]) -> Self {
        let mut entity = Self::default();
        for (column, value) in Self::TABLE.columns.iter().zip(values) {
            entity.set_named(column.name, value.clone());
        }
        entity
    }
}

#[cfg(test)]
pub(crate) fn assert_fields_match_table<E: Entity>() {
    E::TABLE.validate_definition().unwrap();
    for column in E::TABLE.columns {
        let field = E::Field::from_column_name(column.name)
            .unwrap_or_else(|| panic!("column {} has no field", column.name));
        assert_eq!(field.column_name(), column.name);
    }
    assert_eq!(
        E::primary_field().column_name(),
        E::TABLE.primary_column().name
    );
    assert_eq!(E::Field::table_name(), E::TABLE.name);
}
