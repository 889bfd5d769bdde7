//! Field projection.
//!
//! A projected entry is a fresh object holding only the selected fields,
//! in selection order, with values moved over untouched.
use std::str::FromStr;

use serde_json::{Map, Value};

/// Fields kept by default, in output order.
pub const DEFAULT_FIELDS: [&str; 10] = [
    "word",
    "related",
    "derived",
    "forms",
    "categories",
    "pos",
    "head_templates",
    "senses",
    "etymology_text",
    "etymology_templates",
];

/// What to do with a selected field that the source entry lacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    /// emit the field with a `null` value
    Null,
    /// leave the field out
    Omit,
}

impl FromStr for Missing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "null" => Ok(Missing::Null),
            "omit" => Ok(Missing::Omit),
            other => Err(format!("unknown missing field policy: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    fields: Vec<String>,
    missing: Missing,
}

impl Projection {
    /// Duplicate fields are only kept once, at their first position.
    pub fn new(fields: Vec<String>, missing: Missing) -> Self {
        let mut dedup: Vec<String> = Vec::with_capacity(fields.len());
        for field in fields {
            if !dedup.contains(&field) {
                dedup.push(field);
            }
        }
        Self {
            fields: dedup,
            missing,
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Build the projection of `entry`, consuming it.
    pub fn project(&self, mut entry: Map<String, Value>) -> Map<String, Value> {
        let mut projected = Map::new();
        for field in &self.fields {
            match (entry.remove(field), self.missing) {
                (Some(value), _) => {
                    projected.insert(field.clone(), value);
                }
                (None, Missing::Null) => {
                    projected.insert(field.clone(), Value::Null);
                }
                (None, Missing::Omit) => (),
            }
        }
        projected
    }
}

impl Default for Projection {
    fn default() -> Self {
        Projection::new(
            DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect(),
            Missing::Null,
        )
    }
}
