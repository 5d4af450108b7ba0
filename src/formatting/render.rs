//! Renderers: table (boxed), raw (script friendly), json (text) and python (native).

use super::{Alignment, KeyValueTable, Output, OutputFormat, Table};
use crate::error::CliError;
use comfy_table::presets::{NOTHING, UTF8_FULL};
use comfy_table::CellAlignment;
use serde::Serialize;
use std::fmt;

/// A rendered output: text for table/raw/json, a native value for python.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Text(String),
    Native(serde_json::Value),
}

impl Rendered {
    pub fn into_native(self) -> Option<serde_json::Value> {
        match self {
            Rendered::Native(v) => Some(v),
            Rendered::Text(_) => None,
        }
    }
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rendered::Text(s) => f.write_str(s),
            Rendered::Native(v) => write!(f, "{}", v),
        }
    }
}

/// Render an output in the requested format.
pub fn format_output(output: &Output, format: OutputFormat) -> Result<Rendered, CliError> {
    match format {
        OutputFormat::Table | OutputFormat::Raw => Ok(Rendered::Text(render_text(output, format))),
        OutputFormat::Json => to_json_text(&to_python(output)).map(Rendered::Text),
        OutputFormat::Python => Ok(Rendered::Native(to_python(output))),
    }
}

/// Deep conversion into plain JSON-compatible values.
///
/// Tables become a list of objects keyed by column, key/value tables one object,
/// sequences a list. Formatted values contribute their raw form.
pub fn to_python(output: &Output) -> serde_json::Value {
    match output {
        Output::Scalar(value) => value.to_json(),
        Output::Table(table) => serde_json::Value::Array(
            table
                .rows()
                .iter()
                .map(|row| {
                    let object: serde_json::Map<String, serde_json::Value> = table
                        .columns()
                        .iter()
                        .zip(row)
                        .map(|(column, cell)| (column.clone(), to_python(cell)))
                        .collect();
                    serde_json::Value::Object(object)
                })
                .collect(),
        ),
        Output::KeyValue(kv) => {
            let mut object = serde_json::Map::new();
            for (name, value) in kv.entries() {
                object.insert(name.clone(), to_python(value));
            }
            serde_json::Value::Object(object)
        }
        Output::Sequential(seq) => {
            serde_json::Value::Array(seq.items.iter().map(to_python).collect())
        }
    }
}

fn to_json_text(value: &serde_json::Value) -> Result<String, CliError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .map_err(|e| CliError::Internal(format!("failed to encode JSON: {}", e)))?;
    String::from_utf8(buf).map_err(|e| CliError::Internal(format!("invalid UTF-8 in JSON: {}", e)))
}

fn render_text(output: &Output, format: OutputFormat) -> String {
    match output {
        Output::Scalar(value) => value.display(),
        Output::Table(table) => render_table(table, format),
        Output::KeyValue(kv) => render_key_value(kv, format),
        Output::Sequential(seq) => seq
            .items
            .iter()
            .map(|item| render_text(item, format))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(&seq.separator),
    }
}

fn render_table(table: &Table, format: OutputFormat) -> String {
    let mut rows: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| row.iter().map(|cell| render_text(cell, format)).collect())
        .collect();

    if let Some(key) = table.sort_key() {
        match table.columns().iter().position(|c| c == key) {
            // sort_by is stable: equal keys keep insertion order
            Some(idx) => rows.sort_by(|a, b| a[idx].cmp(&b[idx])),
            None => tracing::debug!(
                sort_key = key,
                "sort key is not a column; leaving rows unsorted"
            ),
        }
    }

    let columns: Vec<&str> = table.columns().iter().map(String::as_str).collect();
    let alignments: Vec<Option<Alignment>> =
        columns.iter().map(|c| table.alignment(c)).collect();
    layout(&columns, &alignments, rows, format)
}

fn render_key_value(kv: &KeyValueTable, format: OutputFormat) -> String {
    let rows: Vec<Vec<String>> = kv
        .entries()
        .iter()
        .map(|(name, value)| vec![name.clone(), render_text(value, format)])
        .collect();
    let columns = KeyValueTable::COLUMNS;
    let alignments: Vec<Option<Alignment>> = columns.iter().map(|c| kv.alignment(c)).collect();
    layout(&columns, &alignments, rows, format)
}

fn layout(
    columns: &[&str],
    alignments: &[Option<Alignment>],
    rows: Vec<Vec<String>>,
    format: OutputFormat,
) -> String {
    let mut table = comfy_table::Table::new();
    match format {
        OutputFormat::Raw => {
            if rows.is_empty() {
                return String::new();
            }
            table.load_preset(NOTHING);
            for row in rows {
                table.add_row(row);
            }
            for column in table.column_iter_mut() {
                column.set_padding((0, 2));
                column.set_cell_alignment(CellAlignment::Left);
            }
            // the padding leaves trailing blanks that scripts should not have to strip
            table
                .to_string()
                .lines()
                .map(str::trim_end)
                .collect::<Vec<_>>()
                .join("\n")
        }
        _ => {
            table.load_preset(UTF8_FULL);
            table.set_header(columns.to_vec());
            for row in rows {
                table.add_row(row);
            }
            for (idx, alignment) in alignments.iter().enumerate() {
                if let (Some(alignment), Some(column)) = (alignment, table.column_mut(idx)) {
                    column.set_cell_alignment(match alignment {
                        Alignment::Left => CellAlignment::Left,
                        Alignment::Center => CellAlignment::Center,
                        Alignment::Right => CellAlignment::Right,
                    });
                }
            }
            table.to_string()
        }
    }
}
