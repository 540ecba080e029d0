//! Visitor model

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Stored when a visitor leaves no comment
pub const DEFAULT_COMMENT: &str = "No comment";

/// Returned instead of an error when the table is empty
pub const NO_VISITORS_MESSAGE: &str = "There are currently no visitors in the database.";

/// Visitor record as stored in the `visitors` table
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Visitor {
    pub id: i32,
    pub name: String,
    pub age: i32,
    /// Date of visit (YYYY-MM-DD)
    #[schema(value_type = String, example = "2022-12-31")]
    pub date_of_visit: NaiveDate,
    /// Time of visit (HH:MM, or HH:MM:SS when seconds are set)
    #[schema(value_type = String, example = "12:00")]
    #[serde(serialize_with = "serialize_visit_time")]
    pub time_of_visit: NaiveTime,
    pub assistor_name: String,
    pub comments: Option<String>,
}

/// Writes `HH:MM`, or `HH:MM:SS` when seconds are set.
///
/// Only the value round-trips, not the text: `"12:00:00"` reads back as
/// `"12:00"`. Dates likewise always read back as `YYYY-MM-DD`, so
/// `"12/31/2022"` becomes `"2022-12-31"`.
fn serialize_visit_time<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
    let text = if time.second() == 0 {
        time.format("%H:%M").to_string()
    } else {
        time.format("%H:%M:%S").to_string()
    };
    serializer.serialize_str(&text)
}

/// Short visitor representation for lists
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct VisitorSummary {
    pub id: i32,
    pub name: String,
}

/// Validated, typed visitor ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewVisitor {
    pub name: String,
    pub age: i32,
    pub date_of_visit: NaiveDate,
    pub time_of_visit: NaiveTime,
    pub assistor_name: String,
    pub comments: String,
}

impl NewVisitor {
    /// Build from a record already translated to column names.
    ///
    /// Every value is parsed again into its column type, so a record that
    /// skipped validation still cannot reach the database malformed.
    pub fn from_storage(record: &Map<String, Value>) -> AppResult<Self> {
        let field = |f: VisitorField| -> AppResult<FieldValue> {
            let value = record.get(f.column_name()).unwrap_or(&Value::Null);
            FieldValue::parse(f, value)
        };

        let comments = match record.get(VisitorField::Comments.column_name()) {
            None | Some(Value::Null) => DEFAULT_COMMENT.to_string(),
            Some(_) => field(VisitorField::Comments)?.into_text(),
        };

        Ok(Self {
            name: field(VisitorField::Name)?.into_text(),
            age: match field(VisitorField::Age)? {
                FieldValue::Integer(age) => age,
                other => return Err(AppError::Internal(format!("age parsed as {:?}", other))),
            },
            date_of_visit: match field(VisitorField::DateOfVisit)? {
                FieldValue::Date(date) => date,
                other => return Err(AppError::Internal(format!("date parsed as {:?}", other))),
            },
            time_of_visit: match field(VisitorField::TimeOfVisit)? {
                FieldValue::Time(time) => time,
                other => return Err(AppError::Internal(format!("time parsed as {:?}", other))),
            },
            assistor_name: field(VisitorField::AssistorName)?.into_text(),
            comments,
        })
    }
}

// ---------------------------------------------------------------------------
// VisitorField
// ---------------------------------------------------------------------------

/// Every attribute a visitor record carries.
///
/// Validation rules, column names and update binding are all selected by
/// matching on this enum; names outside it never reach a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisitorField {
    Id,
    Name,
    Age,
    DateOfVisit,
    TimeOfVisit,
    AssistorName,
    Comments,
}

impl VisitorField {
    pub const ALL: [VisitorField; 7] = [
        VisitorField::Id,
        VisitorField::Name,
        VisitorField::Age,
        VisitorField::DateOfVisit,
        VisitorField::TimeOfVisit,
        VisitorField::AssistorName,
        VisitorField::Comments,
    ];

    /// camelCase name used in JSON bodies
    pub fn external_name(self) -> &'static str {
        match self {
            VisitorField::Id => "id",
            VisitorField::Name => "name",
            VisitorField::Age => "age",
            VisitorField::DateOfVisit => "dateOfVisit",
            VisitorField::TimeOfVisit => "timeOfVisit",
            VisitorField::AssistorName => "assistorName",
            VisitorField::Comments => "comments",
        }
    }

    /// snake_case column in the `visitors` table
    pub fn column_name(self) -> &'static str {
        match self {
            VisitorField::Id => "id",
            VisitorField::Name => "name",
            VisitorField::Age => "age",
            VisitorField::DateOfVisit => "date_of_visit",
            VisitorField::TimeOfVisit => "time_of_visit",
            VisitorField::AssistorName => "assistor_name",
            VisitorField::Comments => "comments",
        }
    }

    pub fn from_external(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.external_name() == name)
    }

    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.column_name() == name)
    }

    /// Explanation appended to invalid input errors
    pub fn hint(self) -> &'static str {
        match self {
            VisitorField::Id => "The visitor id must be a positive integer.",
            VisitorField::Name => {
                "The name should at least contain the first name of the visitor and/or the last name of the visitor i.e \"Spider Man\"."
            }
            VisitorField::Age => "The age should be a positive integer less than 130.",
            VisitorField::DateOfVisit => {
                "The date of visit should be in the format YYYY-MM-DD or MM/DD/YYYY."
            }
            VisitorField::TimeOfVisit => {
                "The time of visit should be in the format HH:MM:SS or HH:MM."
            }
            VisitorField::AssistorName => {
                "The assistor's name should be a string containing only alphabetic characters."
            }
            VisitorField::Comments => {
                "The comments should be a string no longer than 200 characters."
            }
        }
    }
}

impl std::fmt::Display for VisitorField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.external_name())
    }
}

// ---------------------------------------------------------------------------
// FieldValue
// ---------------------------------------------------------------------------

/// A single attribute value converted to its column type
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i32),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
}

impl FieldValue {
    /// Validate `value` against the rule for `field` and convert it
    pub fn parse(field: VisitorField, value: &Value) -> AppResult<Self> {
        crate::validation::check_field(field, value)?;

        let invalid = || AppError::invalid_input(field, value.clone());
        let parsed = match field {
            VisitorField::Id | VisitorField::Age => value
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .map(FieldValue::Integer),
            VisitorField::Name | VisitorField::AssistorName | VisitorField::Comments => {
                value.as_str().map(|s| FieldValue::Text(s.to_string()))
            }
            VisitorField::DateOfVisit => value
                .as_str()
                .and_then(crate::validation::parse_visit_date)
                .map(FieldValue::Date),
            VisitorField::TimeOfVisit => value
                .as_str()
                .and_then(crate::validation::parse_visit_time)
                .map(FieldValue::Time),
        };
        parsed.ok_or_else(invalid)
    }

    fn into_text(self) -> String {
        match self {
            FieldValue::Text(s) => s,
            FieldValue::Integer(n) => n.to_string(),
            FieldValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            FieldValue::Time(t) => t.format("%H:%M:%S").to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Operation outcomes
// ---------------------------------------------------------------------------

/// Result of looking up the most recent visit
#[derive(Debug, Clone, PartialEq)]
pub enum LatestVisitor {
    Found(Visitor),
    NoVisitors,
}

/// Result of clearing the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteAllOutcome {
    Deleted(u64),
    NoVisitors,
}

impl std::fmt::Display for DeleteAllOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeleteAllOutcome::Deleted(count) => {
                write!(f, "Deleted all visitors successfully ({} removed).", count)
            }
            DeleteAllOutcome::NoVisitors => write!(f, "{}", NO_VISITORS_MESSAGE),
        }
    }
}

/// Visitor fields accepted on creation (camelCase)
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVisitor {
    /// Letters and spaces, at most 20 characters
    #[schema(example = "Name Surname")]
    pub name: String,
    /// 0 to 129
    #[schema(example = 26)]
    pub age: i32,
    /// YYYY-MM-DD or MM/DD/YYYY
    #[schema(example = "2022-12-31")]
    pub date_of_visit: String,
    /// HH:MM or HH:MM:SS
    #[schema(example = "12:00")]
    pub time_of_visit: String,
    /// Letters and spaces, at most 20 characters
    #[schema(example = "Assistor")]
    pub assistor_name: String,
    /// At most 200 characters, defaults to "No comment"
    pub comments: Option<String>,
}
