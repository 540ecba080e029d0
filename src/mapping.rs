//! Translation between camelCase attribute names and snake_case columns

use serde_json::{Map, Value};

use crate::{
    error::{AppError, AppResult},
    models::visitor::VisitorField,
};

/// Which way a record is being renamed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// camelCase body → table columns
    ToStorage,
    /// table columns → camelCase body
    FromStorage,
}

impl Direction {
    fn resolve(self, name: &str) -> Option<VisitorField> {
        match self {
            Direction::ToStorage => VisitorField::from_external(name),
            Direction::FromStorage => VisitorField::from_column(name),
        }
    }

    fn target(self, field: VisitorField) -> &'static str {
        match self {
            Direction::ToStorage => field.column_name(),
            Direction::FromStorage => field.external_name(),
        }
    }
}

/// Rename a single attribute
pub fn map_name(direction: Direction, name: &str) -> AppResult<&'static str> {
    direction
        .resolve(name)
        .map(|field| direction.target(field))
        .ok_or_else(|| AppError::UnsupportedField(name.to_string()))
}

/// Rename every key of `record`, keeping the values.
///
/// Any key outside the known schema fails the whole call.
pub fn map_fields(direction: Direction, record: Map<String, Value>) -> AppResult<Map<String, Value>> {
    record
        .into_iter()
        .map(|(name, value)| Ok((map_name(direction, &name)?.to_string(), value)))
        .collect()
}
