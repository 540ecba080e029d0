//! Visitors service
//!
//! Validation and name mapping run before any storage call, so a rejected
//! request never touches the database. Existence is only known after the
//! round trip, from the affected-row count.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::{
    error::{AppError, AppResult},
    mapping::{self, Direction},
    models::visitor::{
        DeleteAllOutcome, FieldValue, LatestVisitor, NewVisitor, Visitor, VisitorField,
        VisitorSummary, DEFAULT_COMMENT,
    },
    repository::VisitorStore,
    validation,
};

pub const TABLE_CREATED_MESSAGE: &str = "Table created successfully.";

#[derive(Clone)]
pub struct VisitorsService {
    store: Arc<dyn VisitorStore>,
}

impl VisitorsService {
    pub fn new(store: Arc<dyn VisitorStore>) -> Self {
        Self { store }
    }

    /// Ensure the visitors table exists
    pub async fn create_table(&self) -> AppResult<&'static str> {
        self.store.create_table().await?;
        Ok(TABLE_CREATED_MESSAGE)
    }

    /// Validate and insert a visitor given in camelCase JSON.
    ///
    /// An absent or null `comments` is replaced by the default before
    /// validation, so callers never have to supply it.
    pub async fn add_visitor(&self, data: &Value) -> AppResult<Visitor> {
        let mut record: Map<String, Value> = match data.as_object() {
            Some(object) if !object.is_empty() => object.clone(),
            _ => return Err(AppError::NoDataProvided),
        };

        let key = VisitorField::Comments.external_name();
        if record.get(key).map_or(true, Value::is_null) {
            record.insert(key.to_string(), Value::from(DEFAULT_COMMENT));
        }
        // id is assigned by the database
        if record.contains_key(VisitorField::Id.external_name()) {
            return Err(AppError::UnsupportedField(VisitorField::Id.external_name().to_string()));
        }

        validation::validate_record(&record)?;
        let storage = mapping::map_fields(Direction::ToStorage, record)?;
        let visitor = NewVisitor::from_storage(&storage)?;

        let created = self.store.insert(&visitor).await?;
        tracing::info!(id = created.id, "Visitor added");
        Ok(created)
    }

    /// `id` and `name` of every visitor
    pub async fn list_visitors(&self) -> AppResult<Vec<VisitorSummary>> {
        self.store.list_summaries().await
    }

    pub async fn get_visitor(&self, id: i32) -> AppResult<Visitor> {
        validation::validate_id(id)?;
        self.store
            .find_by_id(id)
            .await?
            .ok_or(AppError::NonExistentVisitor(id))
    }

    /// Most recent visit by date, then time
    pub async fn get_latest_visitor(&self) -> AppResult<LatestVisitor> {
        Ok(match self.store.find_latest().await? {
            Some(visitor) => LatestVisitor::Found(visitor),
            None => LatestVisitor::NoVisitors,
        })
    }

    /// Change a single attribute of one visitor
    pub async fn update_visitor(&self, id: i32, field_name: &str, value: &Value) -> AppResult<String> {
        validation::validate_id(id)?;

        let mut single = Map::new();
        single.insert(field_name.to_string(), value.clone());
        validation::validate_record(&single)?;

        let column = mapping::map_name(Direction::ToStorage, field_name)?;
        let field = VisitorField::from_column(column)
            .ok_or_else(|| AppError::UnsupportedField(field_name.to_string()))?;
        if field == VisitorField::Id {
            return Err(AppError::UnsupportedField(field_name.to_string()));
        }

        let value = FieldValue::parse(field, value)?;
        let affected = self.store.update_field(id, field, value).await?;
        if affected == 0 {
            return Err(AppError::NonExistentVisitor(id));
        }

        tracing::info!(id, field = column, "Visitor updated");
        Ok(format!("Visitor with ID {} updated successfully.", id))
    }

    pub async fn delete_visitor(&self, id: i32) -> AppResult<String> {
        validation::validate_id(id)?;

        let affected = self.store.delete_by_id(id).await?;
        if affected == 0 {
            return Err(AppError::NonExistentVisitor(id));
        }

        tracing::info!(id, "Visitor deleted");
        Ok(format!("Visitor with ID {} deleted successfully.", id))
    }

    /// Delete every visitor; an empty table is reported, not cleared
    pub async fn delete_all_visitors(&self) -> AppResult<DeleteAllOutcome> {
        if self.store.count().await? == 0 {
            return Ok(DeleteAllOutcome::NoVisitors);
        }

        let deleted = self.store.delete_all().await?;
        tracing::info!(deleted, "All visitors deleted");
        Ok(DeleteAllOutcome::Deleted(deleted))
    }
}
