//! Storage type resolution: a pure function from column profiles to a table
//! schema.
//!
//! Resolution walks [`TYPE_RULES`] in order and takes the first rule that
//! applies, so the precedence is explicit and each rule is testable on its
//! own. The same profile always yields the same [`TableSchema`].

use log::debug;

use crate::{
    error::ImportError,
    profile::{ColumnProfile, FileProfile},
};

/// The only column ever treated as a primary key. No other uniqueness is
/// inferred.
pub const PRIMARY_KEY_NAME: &str = "issue_key";

const ISSUE_KEY_WIDTH: u32 = 20;
const MAX_INLINE_VARCHAR: usize = 255;
const VARCHAR_ROUNDING: usize = 50;

/// Normalized names with a declared fixed width.
const KNOWN_IDENTIFIER_WIDTHS: &[(&str, u32)] = &[
    ("project_key", 20),
    ("priority_id", 50),
    ("status_id", 50),
    ("resolution_id", 50),
    ("assignee_id", 128),
    ("reporter_id", 128),
    ("creator_id", 128),
    ("email", 255),
    ("phone", 50),
    ("url", 500),
];

/// Name fragments that mark a column as free-form text regardless of its
/// observed values.
const FREE_TEXT_FRAGMENTS: &[&str] = &[
    "summary",
    "description",
    "comments",
    "details",
    "environment",
    "custom_field_value",
    "resolution",
    "priority",
    "labels",
    "components",
    "assignee",
    "reporter",
    "creator",
    "project",
    "status",
    "issue_type",
    "workflow_status",
    "team_name",
    "business_unit",
    "department",
    "division",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    VarChar(u32),
    Text,
    Integer,
    Numeric,
}

impl StorageType {
    pub fn ddl(&self) -> String {
        match self {
            StorageType::VarChar(width) => format!("VARCHAR({width})"),
            StorageType::Text => "TEXT".to_string(),
            StorageType::Integer => "INTEGER".to_string(),
            StorageType::Numeric => "NUMERIC".to_string(),
        }
    }

    pub fn is_textual(&self) -> bool {
        matches!(self, StorageType::VarChar(_) | StorageType::Text)
    }
}

/// One entry in the resolution decision table. First match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRule {
    /// `issue_key` is a fixed-width key column and the sole primary-key
    /// candidate.
    IssueKey,
    /// Known identifier-like fields carry a declared width.
    KnownIdentifier,
    /// Names containing a free-text fragment become unbounded text.
    FreeTextFragment,
    /// Columns whose every non-empty value parsed as a number.
    NumericColumn,
    /// Fallback: a sized string derived from the observed maximum length.
    SizedString,
}

/// Resolution precedence, evaluated top to bottom.
pub const TYPE_RULES: &[TypeRule] = &[
    TypeRule::IssueKey,
    TypeRule::KnownIdentifier,
    TypeRule::FreeTextFragment,
    TypeRule::NumericColumn,
    TypeRule::SizedString,
];

impl TypeRule {
    pub fn apply(&self, profile: &ColumnProfile) -> Option<StorageType> {
        match self {
            TypeRule::IssueKey => (profile.name == PRIMARY_KEY_NAME)
                .then_some(StorageType::VarChar(ISSUE_KEY_WIDTH)),
            TypeRule::KnownIdentifier => KNOWN_IDENTIFIER_WIDTHS
                .iter()
                .find(|(name, _)| *name == profile.name)
                .map(|(_, width)| StorageType::VarChar(*width)),
            TypeRule::FreeTextFragment => FREE_TEXT_FRAGMENTS
                .iter()
                .any(|fragment| profile.name.contains(fragment))
                .then_some(StorageType::Text),
            TypeRule::NumericColumn => profile.is_numeric.then(|| {
                if profile.has_decimal {
                    StorageType::Numeric
                } else {
                    StorageType::Integer
                }
            }),
            TypeRule::SizedString => Some(sized_string_type(profile.max_length)),
        }
    }
}

/// Rounds the padded length up to the nearest multiple of 50:
/// `round_up_50(max(max_length * 2, 100, max_length + 50))`.
pub fn safe_varchar_length(max_length: usize) -> u32 {
    let wanted = (max_length * 2).max(100).max(max_length + 50);
    (wanted.div_ceil(VARCHAR_ROUNDING) * VARCHAR_ROUNDING) as u32
}

fn sized_string_type(max_length: usize) -> StorageType {
    if max_length > MAX_INLINE_VARCHAR {
        StorageType::Text
    } else {
        StorageType::VarChar(safe_varchar_length(max_length))
    }
}

pub fn resolve_column(profile: &ColumnProfile) -> StorageType {
    TYPE_RULES
        .iter()
        .find_map(|rule| rule.apply(profile))
        .unwrap_or_else(|| sized_string_type(profile.max_length))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub name: String,
    pub storage: StorageType,
}

/// Ordered columns plus the optional primary key, immutable after resolution.
/// Reused for the DDL statement and for every row's upsert.
#[derive(Debug, Clone)]
pub struct TableSchema {
    columns: Vec<ResolvedColumn>,
    primary_key: Option<String>,
}

impl TableSchema {
    pub fn columns(&self) -> &[ResolvedColumn] {
        &self.columns
    }

    pub fn primary_key(&self) -> Option<&str> {
        self.primary_key.as_deref()
    }
}

/// Consumes a file profile into a table schema. Fails with a configuration
/// error if any header normalizes to an empty identifier.
pub fn resolve_schema(profile: &FileProfile) -> Result<TableSchema, ImportError> {
    let mut columns = Vec::with_capacity(profile.columns().len());
    let mut primary_key = None;

    for column in profile.columns() {
        if column.name.is_empty() {
            return Err(ImportError::Config(format!(
                "header '{}' normalizes to an empty identifier",
                column.raw_name
            )));
        }
        let storage = resolve_column(column);
        debug!(
            "column '{}': max_length={} is_numeric={} has_decimal={} -> {}",
            column.name,
            column.max_length,
            column.is_numeric,
            column.has_decimal,
            storage.ddl()
        );
        if column.name == PRIMARY_KEY_NAME {
            primary_key = Some(column.name.clone());
        }
        columns.push(ResolvedColumn {
            name: column.name.clone(),
            storage,
        });
    }

    Ok(TableSchema {
        columns,
        primary_key,
    })
}
