//! Statement text builders.
//!
//! Pure functions over a resolved [`TableSchema`]: an idempotent
//! `CREATE TABLE IF NOT EXISTS` and a parameterized upsert. Identifiers are
//! always quoted through [`quote_identifier`]; row values never appear in
//! statement text, they bind as `$n` parameters.
//!
//! Parameters all bind as text. Non-text columns cast server-side through
//! `NULLIF($n, '')`, so an empty cell lands as NULL instead of an unparseable
//! empty literal.

use itertools::Itertools;

use crate::{
    identifier::quote_identifier,
    resolve::{StorageType, TableSchema},
};

pub fn create_table_sql(table: &str, schema: &TableSchema) -> String {
    let mut parts: Vec<String> = schema
        .columns()
        .iter()
        .map(|column| format!("{} {}", quote_identifier(&column.name), column.storage.ddl()))
        .collect();
    if let Some(key) = schema.primary_key() {
        parts.push(format!("PRIMARY KEY ({})", quote_identifier(key)));
    }
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quote_identifier(table),
        parts.iter().join(", ")
    )
}

fn placeholder(index: usize, storage: &StorageType) -> String {
    let n = index + 1;
    match storage {
        StorageType::Integer => format!("NULLIF(${n}, '')::integer"),
        StorageType::Numeric => format!("NULLIF(${n}, '')::numeric"),
        StorageType::VarChar(_) | StorageType::Text => format!("${n}"),
    }
}

/// Builds the per-row statement: insert the full column set; on a primary-key
/// conflict, overwrite every non-key column with the incoming value
/// (last-write-wins). Without a primary key the statement is a plain insert.
pub fn upsert_sql(table: &str, schema: &TableSchema) -> String {
    let columns = schema
        .columns()
        .iter()
        .map(|column| quote_identifier(&column.name))
        .join(", ");
    let values = schema
        .columns()
        .iter()
        .enumerate()
        .map(|(index, column)| placeholder(index, &column.storage))
        .join(", ");
    let insert = format!(
        "INSERT INTO {} ({columns}) VALUES ({values})",
        quote_identifier(table)
    );

    let Some(key) = schema.primary_key() else {
        return insert;
    };
    let updates = schema
        .columns()
        .iter()
        .filter(|column| column.name != key)
        .map(|column| {
            let quoted = quote_identifier(&column.name);
            format!("{quoted} = EXCLUDED.{quoted}")
        })
        .join(", ");
    if updates.is_empty() {
        // Key-only table: nothing to overwrite on collision.
        format!("{insert} ON CONFLICT ({}) DO NOTHING", quote_identifier(key))
    } else {
        format!(
            "{insert} ON CONFLICT ({}) DO UPDATE SET {updates}",
            quote_identifier(key)
        )
    }
}
