use serde_json::json;
use table2csv_rs::{CsvExporter, Dialect, Field};

fn main() {
    println!("=== table2csv_rs examples ===\n");

    // Example 1: header-driven table. The header values double as the keys
    // used to project each record.
    println!("1. Header-driven table:");
    let records = vec![
        json!({"id": 1, "name": "Alice", "score": 9.5})
            .as_object()
            .unwrap()
            .clone(),
        json!({"id": 2, "name": "Bob", "score": 7.0})
            .as_object()
            .unwrap()
            .clone(),
    ];
    let exporter = CsvExporter::from_table(&["id", "name", "score"], &records).unwrap();
    println!("{}\n", exporter.to_csv_string());

    // Example 2: manual rows with a comma dialect. Note that the string "42"
    // stays quoted while the number 42 does not.
    println!("2. Comma dialect, numbers vs. numeric-looking text:");
    let mut custom = CsvExporter::with_dialect(Dialect {
        separator: ",".to_string(),
        terminator: "\n".to_string(),
        charset: "UTF-8".to_string(),
        ..Dialect::default()
    });
    custom.append_row(vec![Field::from(42), Field::from("42")]);
    custom.append_row(vec![Field::from(2.5), Field::from("he said \"hi\"")]);
    println!("{}\n", custom.to_csv_string());

    // Example 3: rendered bytes carry the BOM registered for the charset.
    println!("3. Rendered bytes (UTF-8 dialect, first bytes are the BOM):");
    let bytes = custom.render().unwrap();
    println!("{:02X?}", &bytes[..8.min(bytes.len())]);
}
