//! Integration tests for the output formatter across every format.

use proptest::prelude::*;
use serde_json::json;
use slcli::formatting::{
    blank, format_output, formatted, to_python, KeyValueTable, Output, OutputFormat, Rendered,
    Table,
};

fn render(output: &Output, format: OutputFormat) -> String {
    format_output(output, format).unwrap().to_string()
}

fn id_name_table() -> Table {
    let mut table = Table::new(["id", "name"]).sort_by("name");
    table.add_row([Output::from(2i64), Output::from("b")]).unwrap();
    table.add_row([Output::from(1i64), Output::from("a")]).unwrap();
    table
}

#[test]
fn test_sorted_table_scenario() {
    let table = Output::Table(id_name_table());

    let out = render(&table, OutputFormat::Table);
    let header = out.lines().nth(1).unwrap();
    assert!(header.contains("id") && header.contains("name"), "{}", out);
    let a = out.find(" a ").unwrap();
    let b = out.find(" b ").unwrap();
    assert!(a < b);

    let native = format_output(&table, OutputFormat::Python).unwrap();
    assert_eq!(
        native,
        Rendered::Native(json!([{"id": 2, "name": "b"}, {"id": 1, "name": "a"}]))
    );
}

#[test]
fn test_blank_sentinel_per_format() {
    let mut kv = KeyValueTable::new();
    kv.add("notes", blank());
    let kv = Output::KeyValue(kv);

    assert!(render(&kv, OutputFormat::Table).contains('-'));
    assert_eq!(render(&kv, OutputFormat::Raw), "notes  -");
    assert_eq!(render(&kv, OutputFormat::Json), "{\n    \"notes\": null\n}");
}

#[test]
fn test_key_value_json_preserves_entry_order() {
    let mut kv = KeyValueTable::new();
    kv.add("id", 1001i64)
        .add("hostname", "web1")
        .add("price", formatted(json!(0.08), "$0.08"));
    let out = render(&Output::KeyValue(kv.clone()), OutputFormat::Json);
    let id = out.find("\"id\"").unwrap();
    let host = out.find("\"hostname\"").unwrap();
    assert!(id < host);
    assert!(out.contains("\"price\": 0.08"));
    assert!(render(&Output::KeyValue(kv), OutputFormat::Table).contains("$0.08"));
}

#[test]
fn test_sequence_of_table_and_text() {
    let seq = Output::sequential([Output::Table(id_name_table()), Output::text("done")]);
    let out = render(&seq, OutputFormat::Raw);
    assert_eq!(out, "1  a\n2  b\ndone");
    assert_eq!(
        to_python(&seq),
        json!([[{"id": 2, "name": "b"}, {"id": 1, "name": "a"}], "done"])
    );
}

#[test]
fn test_empty_table_renders_header_only_as_table() {
    let out = render(&Output::Table(Table::new(["id", "name"])), OutputFormat::Table);
    assert!(out.contains("id"));
    assert_eq!(render(&Output::Table(Table::new(["id"])), OutputFormat::Json), "[]");
}

proptest! {
    #[test]
    fn prop_python_has_one_object_per_row(
        rows in prop::collection::vec((any::<i64>(), "[a-z]{1,8}"), 0..12),
    ) {
        let mut table = Table::new(["id", "name"]);
        for (id, name) in &rows {
            table.add_row([Output::from(*id), Output::from(name.as_str())]).unwrap();
        }
        let native = to_python(&Output::Table(table));
        let list = native.as_array().unwrap();
        prop_assert_eq!(list.len(), rows.len());
        for (object, (id, name)) in list.iter().zip(&rows) {
            prop_assert_eq!(object.as_object().unwrap().len(), 2);
            prop_assert_eq!(&object["id"], &json!(id));
            prop_assert_eq!(&object["name"], &json!(name));
        }
    }

    #[test]
    fn prop_raw_has_one_line_per_row(names in prop::collection::vec("[a-z]{1,8}", 1..10)) {
        let mut table = Table::new(["name"]);
        for name in &names {
            table.add_row([name.as_str()]).unwrap();
        }
        let out = render(&Output::Table(table), OutputFormat::Raw);
        prop_assert_eq!(out.lines().count(), names.len());
    }
}
