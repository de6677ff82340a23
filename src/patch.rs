//! Partial updates.
//!
//! A request field is a [`Patch`]: absent (leave alone), `null` (clear) or a
//! value (set). Every entity merges its patch into an [`UpdateSet`] of
//! column assignments, which the repositories apply as one conditional update.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl Patch<String> {
    /// Reject a present value that is empty after trimming
    pub fn reject_blank(&self, column: &str) -> AppResult<()> {
        match self {
            Patch::Value(v) if v.trim().is_empty() => {
                Err(AppError::validation(format!("{column} cannot be blank")))
            }
            _ => Ok(()),
        }
    }

    /// Same limit the create body enforces, counted in characters
    pub fn check_max_chars(&self, column: &str, max: usize) -> AppResult<()> {
        match self {
            Patch::Value(v) if v.chars().count() > max => Err(AppError::validation(format!(
                "{column} must be at most {max} characters"
            ))),
            _ => Ok(()),
        }
    }
}

impl Patch<i32> {
    pub fn check_range(&self, column: &str, min: i32, max: i32) -> AppResult<()> {
        match self {
            Patch::Value(v) if !(min..=max).contains(v) => Err(AppError::validation(format!(
                "{column} must be between {min} and {max}"
            ))),
            _ => Ok(()),
        }
    }
}

/// Missing keys come from `#[serde(default)]`; a present key is `null` or a value
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(|value| match value {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        })
    }
}

/// A typed value bound into an update statement
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(Option<String>),
    Int(Option<i32>),
    Date(Option<NaiveDate>),
    Timestamp(Option<DateTime<Utc>>),
    Bool(bool),
}

/// Types that can be written into a column, nullable or not
pub trait IntoField: Sized {
    fn into_field(value: Option<Self>) -> FieldValue;
}

impl IntoField for String {
    fn into_field(value: Option<Self>) -> FieldValue {
        FieldValue::Text(value)
    }
}

impl IntoField for i32 {
    fn into_field(value: Option<Self>) -> FieldValue {
        FieldValue::Int(value)
    }
}

impl IntoField for NaiveDate {
    fn into_field(value: Option<Self>) -> FieldValue {
        FieldValue::Date(value)
    }
}

impl IntoField for DateTime<Utc> {
    fn into_field(value: Option<Self>) -> FieldValue {
        FieldValue::Timestamp(value)
    }
}

/// Column assignments for one conditional update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSet {
    assignments: Vec<(&'static str, FieldValue)>,
}

impl UpdateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: &'static str, value: FieldValue) -> &mut Self {
        self.assignments.retain(|(c, _)| *c != column);
        self.assignments.push((column, value));
        self
    }

    /// Merge a patch for a NOT NULL column; `null` is a validation error
    pub fn merge_required<T: IntoField>(&mut self, column: &'static str, patch: Patch<T>) -> AppResult<()> {
        match patch {
            Patch::Absent => Ok(()),
            Patch::Null => Err(AppError::validation(format!("{column} cannot be null"))),
            Patch::Value(v) => {
                self.set(column, T::into_field(Some(v)));
                Ok(())
            }
        }
    }

    /// Merge a patch for a nullable column; `null` clears it
    pub fn merge_optional<T: IntoField>(&mut self, column: &'static str, patch: Patch<T>) {
        match patch {
            Patch::Absent => {}
            Patch::Null => {
                self.set(column, T::into_field(None));
            }
            Patch::Value(v) => {
                self.set(column, T::into_field(Some(v)));
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(&'static str, FieldValue)> {
        self.assignments.iter()
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.assignments
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, v)| v)
    }
}

#[cfg(test)]
impl FieldValue {
    /// JSON form matching the serde representation of the row types
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            FieldValue::Text(v) => v.clone().map(Value::String).unwrap_or(Value::Null),
            FieldValue::Int(v) => v.map(Value::from).unwrap_or(Value::Null),
            FieldValue::Date(v) => serde_json::to_value(v).unwrap_or(Value::Null),
            FieldValue::Timestamp(v) => serde_json::to_value(v).unwrap_or(Value::Null),
            FieldValue::Bool(v) => Value::Bool(*v),
        }
    }
}
