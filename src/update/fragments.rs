//! SET / WHERE fragment builder

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::{Clause, UpdateError, UpdateResult};
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::schema::{FieldSpec, SchemaMap};

/// How keys without a physical column are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FragmentMode {
    /// Skip the key silently (logged); the fragment may be malformed
    #[default]
    Lenient,
    /// Fail on the first unmapped key or an empty clause
    Strict,
}

fn default_operator() -> String {
    "=".to_string()
}

/// Condition of an UPDATE: `{ "where": {...}, "operator": "=" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhereClause {
    #[serde(rename = "where")]
    conditions: Map<String, Value>,
    #[serde(default = "default_operator")]
    operator: String,
}

impl WhereClause {
    /// Equality conditions on every key.
    pub fn new(conditions: Map<String, Value>) -> Self {
        Self {
            conditions,
            operator: default_operator(),
        }
    }

    /// Comparison operator placed between each column and its placeholder.
    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = operator.into();
        self
    }

    pub fn conditions(&self) -> &Map<String, Value> {
        &self.conditions
    }

    pub fn operator(&self) -> &str {
        &self.operator
    }
}

/// Raw SQL pieces for a caller-assembled UPDATE statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFragments {
    pub set_fields: String,
    pub where_fields: String,
}

impl UpdateFragments {
    /// `UPDATE {table} SET{set_fields}{where_fields}`
    pub fn statement(&self, table: &str) -> String {
        format!("UPDATE {} SET{}{}", table, self.set_fields, self.where_fields)
    }
}

/// Builds fragments against one schema map.
#[derive(Debug, Clone, Copy)]
pub struct UpdateBuilder<'a> {
    schema: &'a SchemaMap,
    mode: FragmentMode,
}

impl<'a> UpdateBuilder<'a> {
    pub fn new(schema: &'a SchemaMap, mode: FragmentMode) -> Self {
        Self { schema, mode }
    }

    /// Produces the fragments for `record` under `clause`.
    ///
    /// Where keys are numbered `$1..$n` by position, whether or not they map
    /// to a column. Record keys continue from `$n+1`, counting only the keys
    /// that were written.
    pub fn build(
        &self,
        record: &Map<String, Value>,
        clause: &WhereClause,
    ) -> UpdateResult<UpdateFragments> {
        if self.mode == FragmentMode::Strict {
            if record.is_empty() {
                return Err(UpdateError::EmptyAssignment);
            }
            if clause.conditions.is_empty() {
                return Err(UpdateError::EmptyCondition);
            }
        }

        let where_count = clause.conditions.len();
        let mut where_fields = String::from(" WHERE ");

        for (i, key) in clause.conditions.keys().enumerate() {
            match self.column(key) {
                Some(column) => {
                    where_fields.push_str(&format!(" {} {} ${}", column, clause.operator, i + 1));
                }
                None => self.skip(key, Clause::Where)?,
            }
            if i + 1 < where_count {
                where_fields.push_str(" AND ");
            }
        }
        where_fields.push_str(" RETURNING *");

        let record_count = record.len();
        let mut set_fields = String::new();
        let mut param = where_count + 1;

        for (j, key) in record.keys().enumerate() {
            match self.column(key) {
                Some(column) => {
                    set_fields.push_str(&format!(" {} = ${}", column, param));
                    param += 1;
                    if j + 1 < record_count {
                        set_fields.push_str(", ");
                    }
                }
                None => self.skip(key, Clause::Set)?,
            }
        }

        if Logger::enabled(Event::FragmentsBuilt.severity()) {
            let placeholders = (param - 1).to_string();
            log_event_with_fields(Event::FragmentsBuilt, &[("placeholders", &placeholders)]);
        }

        Ok(UpdateFragments {
            set_fields,
            where_fields,
        })
    }

    fn column(&self, key: &str) -> Option<&'a str> {
        self.schema.get(key).and_then(FieldSpec::column_name)
    }

    fn skip(&self, key: &str, clause: Clause) -> UpdateResult<()> {
        match self.mode {
            FragmentMode::Strict => Err(UpdateError::UnmappedField {
                field: key.to_string(),
                clause,
            }),
            FragmentMode::Lenient => {
                let clause = clause.to_string();
                log_event_with_fields(
                    Event::UnmappedFieldSkipped,
                    &[("field", key), ("clause", &clause)],
                );
                Ok(())
            }
        }
    }
}
