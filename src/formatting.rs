//! Output Algebra
//!
//! Commands return an [`Output`]: a scalar, a table, a key/value table, or a sequence
//! of other outputs. Cells are outputs too, so a table can hold a table. The
//! renderers in [`render`] turn one output into any [`OutputFormat`] without the
//! command knowing which format was asked for.

use crate::error::CliError;
use std::collections::HashMap;
use std::fmt;
use std::io::IsTerminal;
use std::str::FromStr;

mod render;

pub use render::{format_output, to_python, Rendered};

/// Requested output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Raw,
    Json,
    Python,
}

impl OutputFormat {
    pub const ALL: [&'static str; 4] = ["table", "raw", "json", "python"];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Raw => "raw",
            OutputFormat::Json => "json",
            OutputFormat::Python => "python",
        }
    }

    /// `table` on an interactive terminal, `raw` when piped.
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            OutputFormat::Table
        } else {
            OutputFormat::Raw
        }
    }
}

impl FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "table" => Ok(OutputFormat::Table),
            "raw" => Ok(OutputFormat::Raw),
            "json" => Ok(OutputFormat::Json),
            "python" => Ok(OutputFormat::Python),
            other => Err(CliError::usage(format!(
                "Invalid format: {} (must be one of {})",
                other,
                OutputFormat::ALL.join(", ")
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single printable value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// A value with separate machine (`raw`) and human (`display`) forms.
    /// json/python use `raw`; table/raw use `display`.
    Formatted {
        raw: serde_json::Value,
        display: String,
    },
}

impl Value {
    /// Human form used by the table and raw renderers.
    pub fn display(&self) -> String {
        match self {
            Value::Null => "-".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Text(s) => s.clone(),
            Value::Formatted { display, .. } => display.clone(),
        }
    }

    /// Machine form used by the json and python renderers.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Formatted { raw, .. } => raw.clone(),
        }
    }
}

/// Column alignment for the table renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

/// Rows of cells under named columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Output>>,
    sort_key: Option<String>,
    align: HashMap<String, Alignment>,
}

impl Table {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            sort_key: None,
            align: HashMap::new(),
        }
    }

    /// Append a row. The row must have exactly one cell per column.
    pub fn add_row<I, T>(&mut self, row: I) -> Result<(), CliError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Output>,
    {
        let row: Vec<Output> = row.into_iter().map(Into::into).collect();
        if row.len() != self.columns.len() {
            return Err(CliError::Internal(format!(
                "table row has {} cells but {} columns ({})",
                row.len(),
                self.columns.len(),
                self.columns.join(", ")
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Sort rows by this column's rendered text before printing.
    pub fn sort_by(mut self, column: impl Into<String>) -> Self {
        self.sort_key = Some(column.into());
        self
    }

    pub fn set_sort_key(&mut self, column: Option<String>) {
        self.sort_key = column;
    }

    pub fn align(mut self, column: impl Into<String>, alignment: Alignment) -> Self {
        self.align.insert(column.into(), alignment);
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Output>] {
        &self.rows
    }

    pub fn sort_key(&self) -> Option<&str> {
        self.sort_key.as_deref()
    }

    pub fn alignment(&self, column: &str) -> Option<Alignment> {
        self.align.get(column).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Ordered `(name, value)` pairs, rendered as a two-column table.
///
/// Names are not unique: every entry is rendered, lookups see the last one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KeyValueTable {
    entries: Vec<(String, Output)>,
    align: HashMap<String, Alignment>,
}

impl KeyValueTable {
    pub const COLUMNS: [&'static str; 2] = ["name", "value"];

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            align: HashMap::from([
                ("name".to_string(), Alignment::Right),
                ("value".to_string(), Alignment::Left),
            ]),
        }
    }

    pub fn add(&mut self, name: impl Into<String>, value: impl Into<Output>) -> &mut Self {
        self.entries.push((name.into(), value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Output> {
        self.entries
            .iter()
            .rev()
            .find(|(entry, _)| entry == name)
            .map(|(_, value)| value)
    }

    pub fn entries(&self) -> &[(String, Output)] {
        &self.entries
    }

    pub fn alignment(&self, column: &str) -> Option<Alignment> {
        self.align.get(column).copied()
    }
}

/// Independently formatted outputs joined by a separator.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    pub items: Vec<Output>,
    pub separator: String,
}

/// The result of a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Scalar(Value),
    Table(Table),
    KeyValue(KeyValueTable),
    Sequential(Sequence),
}

impl Output {
    /// Several logical outputs printed one after another, one per line.
    pub fn sequential<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Output>,
    {
        Output::Sequential(Sequence {
            items: items.into_iter().map(Into::into).collect(),
            separator: "\n".to_string(),
        })
    }

    pub fn text(s: impl Into<String>) -> Self {
        Output::Scalar(Value::Text(s.into()))
    }
}

impl From<Value> for Output {
    fn from(v: Value) -> Self {
        Output::Scalar(v)
    }
}

impl From<Table> for Output {
    fn from(t: Table) -> Self {
        Output::Table(t)
    }
}

impl From<KeyValueTable> for Output {
    fn from(t: KeyValueTable) -> Self {
        Output::KeyValue(t)
    }
}

impl From<&str> for Output {
    fn from(s: &str) -> Self {
        Output::Scalar(Value::Text(s.to_string()))
    }
}

impl From<String> for Output {
    fn from(s: String) -> Self {
        Output::Scalar(Value::Text(s))
    }
}

impl From<&String> for Output {
    fn from(s: &String) -> Self {
        Output::Scalar(Value::Text(s.clone()))
    }
}

impl From<bool> for Output {
    fn from(b: bool) -> Self {
        Output::Scalar(Value::Bool(b))
    }
}

impl From<i64> for Output {
    fn from(i: i64) -> Self {
        Output::Scalar(Value::Int(i))
    }
}

impl From<i32> for Output {
    fn from(i: i32) -> Self {
        Output::Scalar(Value::Int(i64::from(i)))
    }
}

impl From<u32> for Output {
    fn from(i: u32) -> Self {
        Output::Scalar(Value::Int(i64::from(i)))
    }
}

impl From<f64> for Output {
    fn from(f: f64) -> Self {
        Output::Scalar(Value::Float(f))
    }
}

impl<T: Into<Output>> From<Option<T>> for Output {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or_else(blank)
    }
}

/// API values map onto scalars; arrays and objects keep their JSON form and print compactly.
impl From<&serde_json::Value> for Output {
    fn from(v: &serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => blank(),
            serde_json::Value::Bool(b) => Output::Scalar(Value::Bool(*b)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Output::Scalar(Value::Int(i)),
                None => Output::Scalar(Value::Float(n.as_f64().unwrap_or_default())),
            },
            serde_json::Value::String(s) => Output::Scalar(Value::Text(s.clone())),
            other => Output::Scalar(Value::Formatted {
                raw: other.clone(),
                display: other.to_string(),
            }),
        }
    }
}

impl From<serde_json::Value> for Output {
    fn from(v: serde_json::Value) -> Self {
        Output::from(&v)
    }
}

/// The "no data" placeholder: `-` in table/raw, `null` in json/python.
pub fn blank() -> Output {
    Output::Scalar(Value::Formatted {
        raw: serde_json::Value::Null,
        display: "-".to_string(),
    })
}

/// A value with distinct machine and display forms.
pub fn formatted(raw: impl Into<serde_json::Value>, display: impl Into<String>) -> Output {
    Output::Scalar(Value::Formatted {
        raw: raw.into(),
        display: display.into(),
    })
}

/// Several scalars in one cell: a joined string in table/raw, a list in json/python.
pub fn listing<I, T>(items: I, separator: &str) -> Output
where
    I: IntoIterator<Item = T>,
    T: Into<Output>,
{
    Output::Sequential(Sequence {
        items: items.into_iter().map(Into::into).collect(),
        separator: separator.to_string(),
    })
}

/// Megabytes shown as whole gigabytes, e.g. `2048` → `2G`.
pub fn mb_to_gb(megabytes: i64) -> Output {
    formatted(megabytes, format!("{}G", megabytes / 1024))
}

/// Gigabytes kept as megabytes underneath, e.g. `2` → raw `2048`, display `2G`.
pub fn gb(gigabytes: i64) -> Output {
    formatted(gigabytes * 1024, format!("{}G", gigabytes))
}

/// API timestamp shown as `YYYY-MM-DD HH:MM`; json/python keep the original text.
pub fn date(raw: Option<&str>) -> Output {
    match raw {
        None | Some("") => blank(),
        Some(raw) => match chrono::DateTime::parse_from_rfc3339(raw) {
            Ok(parsed) => formatted(raw, parsed.format("%Y-%m-%d %H:%M").to_string()),
            Err(_) => Output::from(raw),
        },
    }
}

/// Status of the active transaction on an API object, or blank when idle.
pub fn active_txn(item: &serde_json::Value) -> Output {
    transaction_status(item.get("activeTransaction"))
}

/// Name and friendly name of a transaction's status, or blank.
pub fn transaction_status(transaction: Option<&serde_json::Value>) -> Output {
    let status = match transaction.and_then(|t| t.get("transactionStatus")) {
        Some(status) if status.is_object() => status,
        _ => return blank(),
    };
    let name = status.get("name").cloned().unwrap_or(serde_json::Value::Null);
    let friendly = status
        .get("friendlyName")
        .and_then(|f| f.as_str())
        .map(str::to_string)
        .or_else(|| name.as_str().map(str::to_string));
    match friendly {
        Some(display) => formatted(name, display),
        None => blank(),
    }
}
