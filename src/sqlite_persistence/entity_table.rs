//! Record operations for one entity type.

use super::condition::{Condition, ConditionOp};
use super::entity::{Entity, EntityField, QueryContext, QuerySettings};
use super::executor::{StorageExecutor, StoreError};
use super::field_value::FieldValue;
use std::sync::{Arc, RwLock};
use tracing::info;

pub type CommitListener<E> = Box<dyn Fn(&E) + Send + Sync>;

/// Reads and writes records of entity `E` through a [`StorageExecutor`], and
/// owns the listeners notified after every commit of an `E`.
///
/// Records are never cached here: every read goes to the executor, so a read
/// after a commit always observes the committed values.
pub struct EntityTable<E: Entity> {
    executor: Arc<dyn StorageExecutor>,
    settings: Arc<dyn QuerySettings>,
    listeners: RwLock<Vec<CommitListener<E>>>,
}

impl<E: Entity> EntityTable<E> {
    /// Creates the table if needed and adds any declared column it lacks.
    pub fn open(
        executor: Arc<dyn StorageExecutor>,
        settings: Arc<dyn QuerySettings>,
    ) -> Result<Self, StoreError> {
        let table = Self {
            executor,
            settings,
            listeners: RwLock::new(Vec::new()),
        };
        table.ensure_table()?;
        Ok(table)
    }

    pub fn executor(&self) -> &Arc<dyn StorageExecutor> {
        &self.executor
    }

    pub fn query_context(&self) -> QueryContext {
        self.settings.query_context()
    }

    pub fn ensure_table(&self) -> Result<(), StoreError> {
        let table = E::TABLE;
        self.executor.execute(&table.create_sql())?;

        let info = self.executor.execute(&table.table_info_sql())?;
        let name_index = info.column_index("name").unwrap_or(1);
        let existing: Vec<String> = info
            .rows
            .iter()
            .filter_map(|row| row.get(name_index).map(FieldValue::as_string))
            .collect();
        for column in table.missing_columns(&existing) {
            info!("Adding column {} to table {}", column.name, table.name);
            self.executor.execute(&table.add_column_sql(column))?;
        }

        for index_sql in table.index_sql() {
            self.executor.execute(&index_sql)?;
        }
        Ok(())
    }

    /// Drops the backing table and recreates it empty. The drop error is
    /// returned as-is, the table is only recreated after a successful drop.
    pub fn reset_table(&self) -> Result<(), StoreError> {
        self.executor.execute(&E::TABLE.drop_sql())?;
        self.ensure_table()
    }

    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.listeners.write().unwrap().push(Box::new(listener));
    }

    /// Loads the row with primary key `key` into `record`. Returns false when
    /// there is no such row, leaving `record` with default values.
    pub fn read_primary(&self, record: &mut E, key: &str) -> Result<bool, StoreError> {
        let condition = Condition::with(E::primary_field(), key, ConditionOp::Equal);
        let sql = E::select_sql(&condition, false, &self.query_context());
        let rows = self.executor.execute(&sql)?;
        match rows.rows.first() {
            Some(row) => {
                *record = E::from_row(row);
                Ok(true)
            }
            None => {
                *record = E::default();
                Ok(false)
            }
        }
    }

    pub fn get_by_key(&self, key: &str) -> Result<Option<E>, StoreError> {
        let mut record = E::default();
        Ok(self.read_primary(&mut record, key)?.then_some(record))
    }

    /// Records matching `condition` merged with the standard conditions.
    pub fn get(&self, condition: &Condition) -> Result<Vec<E>, StoreError> {
        self.get_with(condition, true)
    }

    pub fn get_with(
        &self,
        condition: &Condition,
        include_standard: bool,
    ) -> Result<Vec<E>, StoreError> {
        let sql = E::select_sql(condition, include_standard, &self.query_context());
        let rows = self.executor.execute(&sql)?;
        Ok(rows.rows.iter().map(|row| E::from_row(row)).collect())
    }

    /// Every row of the table, for migrations. A table that doesn't exist yet
    /// reads as empty; outside of migrations use [`Self::get_with`], which
    /// reports it as an error.
    pub fn get_all_for_migration(&self) -> Result<Vec<E>, StoreError> {
        match self.get_with(&Condition::new(), false) {
            Err(e) if e.is_missing_table() => Ok(Vec::new()),
            other => other,
        }
    }

    /// Upserts `record` by its primary key, then notifies listeners on the
    /// calling thread before returning.
    pub fn commit(&self, record: &mut E) -> Result<(), StoreError> {
        record.sync_primary_key();

        let values = E::TABLE
            .columns
            .iter()
            .map(|c| {
                record
                    .get_named(c.name)
                    .unwrap_or_default()
                    .to_sql_literal()
            })
            .collect::<Vec<_>>();
        self.executor.execute(&E::TABLE.upsert_sql(&values))?;

        for listener in self.listeners.read().unwrap().iter() {
            listener(record);
        }
        Ok(())
    }

    /// Sets `field` to `value` on every row matching `condition`, without
    /// loading the rows. Returns the number of updated rows.
    pub fn global_set(
        &self,
        field: E::Field,
        value: impl Into<FieldValue>,
        condition: &Condition,
    ) -> Result<usize, StoreError> {
        let rows = self.executor.execute(&format!(
            "update {} set {} = {}{}",
            E::TABLE.name,
            field.column_name(),
            value.into().to_sql_literal(),
            condition.where_clause()
        ))?;
        Ok(rows.changes)
    }

    /// Copies `source` into `target` on every row matching `condition`.
    pub fn global_copy(
        &self,
        target: E::Field,
        source: E::Field,
        condition: &Condition,
    ) -> Result<usize, StoreError> {
        let rows = self.executor.execute(&format!(
            "update {} set {} = {}{}",
            E::TABLE.name,
            target.column_name(),
            source.column_name(),
            condition.where_clause()
        ))?;
        Ok(rows.changes)
    }

    /// Deletes every row matching `condition`. Returns the number of rows removed.
    pub fn clear(&self, condition: &Condition) -> Result<usize, StoreError> {
        let rows = self.executor.execute(&format!(
            "delete from {}{}",
            E::TABLE.name,
            condition.where_clause()
        ))?;
        Ok(rows.changes)
    }
}
