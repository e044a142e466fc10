mod condition;
pub(crate) mod entity;
mod entity_table;
mod executor;
mod field_value;
mod table;

pub use condition::{Condition, ConditionOp};
pub use entity::{Entity, EntityField, QueryContext, QuerySettings};
pub use entity_table::{CommitListener, EntityTable};
pub use executor::{RowSet, SqliteExecutor, StorageExecutor, StoreError};
pub use field_value::FieldValue;
pub use table::{Column, SqlType, Table};
