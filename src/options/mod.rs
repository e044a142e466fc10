//! Persisted process options, one row per key.

use crate::entity_fields;
use crate::sqlite_column;
use crate::sqlite_persistence::{
    Entity, EntityTable, FieldValue, QueryContext, QuerySettings, SqlType, StorageExecutor,
    StoreError, Table,
};
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    /// Schema version of the season table.
    DbSeasonVersion,
    RandomFanart,
    RandomBanner,
    ShowHiddenItems,
    OnlyShowLocalFiles,
    SortSpecialSeasonLast,
}

impl OptionKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKey::DbSeasonVersion => "DBSeasonVersion",
            OptionKey::RandomFanart => "FanartRandom",
            OptionKey::RandomBanner => "randomBanner",
            OptionKey::ShowHiddenItems => "ShowHiddenItems",
            OptionKey::OnlyShowLocalFiles => "OnlyShowLocalFiles",
            OptionKey::SortSpecialSeasonLast => "SortSpecialSeasonLast",
        }
    }

    /// Value reported for keys that were never written.
    pub fn default_value(&self) -> i64 {
        match self {
            OptionKey::SortSpecialSeasonLast => 1,
            _ => 0,
        }
    }
}

entity_fields! {
    pub enum OptionField in "options" {
        Property => "property",
        Value => "value",
    }
}

const OPTIONS_TABLE: Table = Table {
    name: "options",
    columns: &[
        sqlite_column!("property", SqlType::Text, is_primary_key = true),
        sqlite_column!("value", SqlType::Text),
    ],
    indices: &[],
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionEntry {
    pub property: String,
    pub value: String,
}

impl Entity for OptionEntry {
    type Field = OptionField;
    const TABLE: &'static Table = &OPTIONS_TABLE;

    fn primary_field() -> OptionField {
        OptionField::Property
    }

    fn get(&self, field: OptionField) -> FieldValue {
        match field {
            OptionField::Property => self.property.clone().into(),
            OptionField::Value => self.value.clone().into(),
        }
    }

    fn set(&mut self, field: OptionField, value: FieldValue) {
        match field {
            OptionField::Property => self.property = value.as_string(),
            OptionField::Value => self.value = value.as_string(),
        }
    }
}

pub struct OptionsStore {
    table: EntityTable<OptionEntry>,
    config_mode: bool,
}

impl OptionsStore {
    pub fn open(executor: Arc<dyn StorageExecutor>, config_mode: bool) -> Result<Self, StoreError> {
        let table = EntityTable::open(executor, Arc::new(QueryContext::default()))?;
        Ok(Self { table, config_mode })
    }

    pub fn get(&self, key: OptionKey) -> Result<i64, StoreError> {
        Ok(self
            .table
            .get_by_key(key.as_str())?
            .map(|entry| FieldValue::from(entry.value).as_i64())
            .unwrap_or_else(|| key.default_value()))
    }

    pub fn get_bool(&self, key: OptionKey) -> Result<bool, StoreError> {
        Ok(self.get(key)? != 0)
    }

    pub fn set(&self, key: OptionKey, value: i64) -> Result<(), StoreError> {
        let mut entry = OptionEntry {
            property: key.as_str().to_string(),
            value: value.to_string(),
        };
        self.table.commit(&mut entry)
    }

    pub fn set_bool(&self, key: OptionKey, value: bool) -> Result<(), StoreError> {
        self.set(key, value as i64)
    }

    pub fn config_mode(&self) -> bool {
        self.config_mode
    }

    fn get_bool_or_default(&self, key: OptionKey) -> bool {
        self.get_bool(key).unwrap_or_else(|e| {
            warn!("Failed to read option {}: {}", key.as_str(), e);
            key.default_value() != 0
        })
    }
}

impl QuerySettings for OptionsStore {
    fn query_context(&self) -> QueryContext {
        QueryContext {
            show_hidden_items: self.get_bool_or_default(OptionKey::ShowHiddenItems),
            only_show_local_files: self.get_bool_or_default(OptionKey::OnlyShowLocalFiles),
            config_mode: self.config_mode,
        }
    }
}
