use rusqlite::types::ValueRef;
use std::fmt;

/// A loosely typed column value.
///
/// Every value can be read back as a string, an integer or a boolean. Columns
/// coming out of the store are type-stable, so the coercions below never fail:
/// anything that doesn't parse falls back to the type's zero value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Bool(bool),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    pub fn as_string(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        }
    }

    pub fn as_i64(&self) -> i64 {
        match self {
            FieldValue::Text(s) => {
                let trimmed = s.trim();
                trimmed
                    .parse::<i64>()
                    .or_else(|_| trimmed.parse::<f64>().map(|f| f as i64))
                    .unwrap_or(0)
            }
            FieldValue::Integer(i) => *i,
            FieldValue::Bool(b) => *b as i64,
        }
    }

    pub fn as_i32(&self) -> i32 {
        self.as_i64() as i32
    }

    pub fn as_bool(&self) -> bool {
        match self {
            FieldValue::Text(s) => {
                let trimmed = s.trim();
                trimmed.eq_ignore_ascii_case("true") || trimmed.parse::<i64>().is_ok_and(|i| i != 0)
            }
            FieldValue::Integer(i) => *i != 0,
            FieldValue::Bool(b) => *b,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.is_empty())
    }

    /// Renders the value as an inline SQL literal. Text is single-quoted with
    /// embedded quotes doubled, booleans are stored as 0/1.
    pub fn to_sql_literal(&self) -> String {
        match self {
            FieldValue::Text(s) => format!("'{}'", s.replace('\'', "''")),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Bool(b) => (*b as i64).to_string(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        FieldValue::Text(value.clone())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value as i64)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<ValueRef<'_>> for FieldValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => FieldValue::Text(String::new()),
            ValueRef::Integer(i) => FieldValue::Integer(i),
            ValueRef::Real(r) => FieldValue::Text(r.to_string()),
            ValueRef::Text(t) | ValueRef::Blob(t) => {
                FieldValue::Text(String::from_utf8_lossy(t).into_owned())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerces_text_to_numbers_and_bools() {
        let value = FieldValue::from("42");
        assert_eq!(value.as_i64(), 42);
        assert!(value.as_bool());

        let zero = FieldValue::from("0");
        assert!(!zero.as_bool());

        assert!(FieldValue::from("True").as_bool());
        assert_eq!(FieldValue::from("not a number").as_i64(), 0);
        assert_eq!(FieldValue::from("").as_i64(), 0);
        assert_eq!(FieldValue::from("7.0").as_i64(), 7);
    }

    #[test]
    fn test_coerces_numbers_and_bools_to_text() {
        assert_eq!(FieldValue::from(12).as_string(), "12");
        assert_eq!(FieldValue::from(true).as_string(), "1");
        assert_eq!(FieldValue::from(false).as_i64(), 0);
        assert!(FieldValue::Integer(-3).as_bool());
    }

    #[test]
    fn test_renders_sql_literals() {
        assert_eq!(FieldValue::from("it's").to_sql_literal(), "'it''s'");
        assert_eq!(FieldValue::from(5).to_sql_literal(), "5");
        assert_eq!(FieldValue::from(true).to_sql_literal(), "1");
    }

    #[test]
    fn test_null_reads_as_empty_text() {
        let value = FieldValue::from(ValueRef::Null);
        assert!(value.is_empty());
        assert_eq!(value.as_i64(), 0);
        assert!(!value.as_bool());
    }
}
