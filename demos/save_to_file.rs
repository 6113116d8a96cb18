use serde_json::json;
use table2csv_rs::CsvExporter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let records = vec![
        json!({"city": "Lisbon", "population": 545000})
            .as_object()
            .unwrap()
            .clone(),
        json!({"city": "Porto", "population": 232000})
            .as_object()
            .unwrap()
            .clone(),
    ];

    let exporter = CsvExporter::from_table(&["city", "population"], &records)?;

    // Refuse to clobber an existing file.
    if exporter.save_as("cities.csv", false)? {
        println!("wrote cities.csv ({} rows)", exporter.len());
    } else {
        println!("cities.csv already exists, not overwriting");
    }

    // Package the same bytes for an HTTP layer.
    let download = exporter.to_download("cities")?;
    println!(
        "download: {} ({} bytes, content-type {:?})",
        download.file_name,
        download.bytes.len(),
        download.content_type
    );

    Ok(())
}
