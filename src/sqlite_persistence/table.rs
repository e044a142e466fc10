//! Static table descriptions for entity types.
//!
//! A [`Table`] is the schema of one entity kind: its name, the ordered column
//! list and which column is the primary key. Tables are `const` items, built
//! with the [`sqlite_column!`](crate::sqlite_column) macro.

#[macro_export]
macro_rules! sqlite_column {
    ($name:expr, $sql_type:expr $(, $field:ident = $value:expr)*) => {
        {
            // Only mutated when optional assignments such as
            // `is_primary_key = true` are passed to the macro.
            #[allow(unused_mut)]
            let mut column = $crate::sqlite_persistence::Column {
                name: $name,
                sql_type: $sql_type,
                is_primary_key: false,
                default_value: None,
            };
            $(
                column.$field = $value;
            )*
            column
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Text,
    Integer,
}

impl SqlType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SqlType::Text => "TEXT",
            SqlType::Integer => "INTEGER",
        }
    }
}

#[derive(Debug)]
pub struct Column {
    pub name: &'static str,
    pub sql_type: SqlType,
    pub is_primary_key: bool,
    pub default_value: Option<&'static str>,
}

impl Column {
    /// Default used both at creation and when the column is added to an
    /// existing table, so old rows read back as empty values.
    pub fn effective_default(&self) -> &'static str {
        match (self.default_value, self.sql_type) {
            (Some(value), _) => value,
            (None, SqlType::Text) => "''",
            (None, SqlType::Integer) => "0",
        }
    }

    fn definition(&self) -> String {
        let mut definition = format!("{} {}", self.name, self.sql_type.as_sql());
        if self.is_primary_key {
            definition.push_str(" PRIMARY KEY");
        } else {
            definition.push_str(&format!(" DEFAULT {}", self.effective_default()));
        }
        definition
    }
}

#[derive(Debug)]
pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column],
    pub indices: &'static [(&'static str, &'static str)],
}

impl Table {
    pub fn primary_column(&self) -> &Column {
        // Checked by `validate_definition` in every entity's tests.
        self.columns
            .iter()
            .find(|c| c.is_primary_key)
            .unwrap_or(&self.columns[0])
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// `table.column` form used in conditions and select lists.
    pub fn qualified(&self, column: &str) -> String {
        format!("{}.{}", self.name, column)
    }

    pub fn select_list(&self) -> String {
        self.columns
            .iter()
            .map(|c| self.qualified(c.name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn create_sql(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(Column::definition)
            .collect::<Vec<_>>()
            .join(", ");
        format!("CREATE TABLE IF NOT EXISTS {} ({})", self.name, columns)
    }

    /// Insert keyed by the primary column that updates the other columns in
    /// place on conflict, keeping the existing row and its rowid.
    pub fn upsert_sql(&self, values: &[String]) -> String {
        let columns = self
            .columns
            .iter()
            .map(|c| c.name)
            .collect::<Vec<_>>()
            .join(", ");
        let updates = self
            .columns
            .iter()
            .filter(|c| !c.is_primary_key)
            .map(|c| format!("{0} = excluded.{0}", c.name))
            .collect::<Vec<_>>();
        let on_conflict = if updates.is_empty() {
            "DO NOTHING".to_string()
        } else {
            format!("DO UPDATE SET {}", updates.join(", "))
        };
        format!(
            "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT({}) {}",
            self.name,
            columns,
            values.join(", "),
            self.primary_column().name,
            on_conflict
        )
    }

    pub fn index_sql(&self) -> Vec<String> {
        self.indices
            .iter()
            .map(|(index_name, columns)| {
                format!(
                    "CREATE INDEX IF NOT EXISTS {} ON {}({})",
                    index_name, self.name, columns
                )
            })
            .collect()
    }

    pub fn add_column_sql(&self, column: &Column) -> String {
        format!("ALTER TABLE {} ADD COLUMN {}", self.name, column.definition())
    }

    pub fn table_info_sql(&self) -> String {
        format!("PRAGMA table_info({})", self.name)
    }

    pub fn drop_sql(&self) -> String {
        format!("DROP TABLE {}", self.name)
    }

    /// Columns declared here but absent from `existing` (case-insensitive, as
    /// SQLite column names are).
    pub fn missing_columns<'a>(&'a self, existing: &[String]) -> Vec<&'a Column> {
        self.columns
            .iter()
            .filter(|c| !existing.iter().any(|e| e.eq_ignore_ascii_case(c.name)))
            .collect()
    }

    /// Checks the static invariants of a table description: exactly one
    /// primary column, which is text typed, and unique column names.
    pub fn validate_definition(&self) -> Result<(), String> {
        let primaries: Vec<&Column> = self.columns.iter().filter(|c| c.is_primary_key).collect();
        if primaries.len() != 1 {
            return Err(format!(
                "Table {} has {} primary columns, expected exactly one",
                self.name,
                primaries.len()
            ));
        }
        if primaries[0].sql_type != SqlType::Text {
            return Err(format!(
                "Table {} primary column {} must be TEXT",
                self.name, primaries[0].name
            ));
        }
        for (i, column) in self.columns.iter().enumerate() {
            if self.columns[..i]
                .iter()
                .any(|other| other.name.eq_ignore_ascii_case(column.name))
            {
                return Err(format!(
                    "Table {} declares column {} twice",
                    self.name, column.name
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_TABLE: Table = Table {
        name: "test_table",
        columns: &[
            sqlite_column!("ID", SqlType::Text, is_primary_key = true),
            sqlite_column!("Name", SqlType::Text),
            sqlite_column!("Count", SqlType::Integer, default_value = Some("3")),
        ],
        indices: &[("idx_test_name", "Name")],
    };

    #[test]
    fn test_builds_create_statement() {
        assert_eq!(
            TEST_TABLE.create_sql(),
            "CREATE TABLE IF NOT EXISTS test_table (ID TEXT PRIMARY KEY, Name TEXT DEFAULT '', Count INTEGER DEFAULT 3)"
        );
        assert_eq!(
            TEST_TABLE.index_sql(),
            vec!["CREATE INDEX IF NOT EXISTS idx_test_name ON test_table(Name)".to_string()]
        );
    }

    #[test]
    fn test_builds_upsert_statement() {
        let values = vec!["'a'".to_string(), "'x'".to_string(), "4".to_string()];
        assert_eq!(
            TEST_TABLE.upsert_sql(&values),
            "INSERT INTO test_table (ID, Name, Count) VALUES ('a', 'x', 4) \
             ON CONFLICT(ID) DO UPDATE SET Name = excluded.Name, Count = excluded.Count"
        );
    }

    #[test]
    fn test_finds_missing_columns_case_insensitively() {
        let existing = vec!["id".to_string(), "NAME".to_string()];
        let missing = TEST_TABLE.missing_columns(&existing);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].name, "Count");
        assert_eq!(
            TEST_TABLE.add_column_sql(missing[0]),
            "ALTER TABLE test_table ADD COLUMN Count INTEGER DEFAULT 3"
        );
    }

    #[test]
    fn test_qualifies_columns() {
        assert_eq!(TEST_TABLE.qualified("Name"), "test_table.Name");
        assert_eq!(
            TEST_TABLE.select_list(),
            "test_table.ID, test_table.Name, test_table.Count"
        );
        assert_eq!(TEST_TABLE.primary_column().name, "ID");
    }

    #[test]
    fn test_validates_definition() {
        TEST_TABLE.validate_definition().unwrap();

        const TWO_PRIMARIES: Table = Table {
            name: "bad",
            columns: &[
                sqlite_column!("A", SqlType::Text, is_primary_key = true),
                sqlite_column!("B", SqlType::Text, is_primary_key = true),
            ],
            indices: &[],
        };
        assert!(TWO_PRIMARIES.validate_definition().is_err());

        const INTEGER_PRIMARY: Table = Table {
            name: "bad",
            columns: &[sqlite_column!("A", SqlType::Integer, is_primary_key = true)],
            indices: &[],
        };
        assert!(INTEGER_PRIMARY.validate_definition().is_err());

        const DUPLICATE: Table = Table {
            name: "bad",
            columns: &[
                sqlite_column!("A", SqlType::Text, is_primary_key = true),
                sqlite_column!("a", SqlType::Integer),
            ],
            indices: &[],
        };
        assert!(DUPLICATE.validate_definition().is_err());
    }
}
