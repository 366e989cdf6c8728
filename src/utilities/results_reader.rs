use std::path::Path;

use anyhow::{Context, Result};
use csv_async::AsyncReaderBuilder;
use futures::stream::StreamExt;
use serde::Deserialize;
use tokio::fs::File as AsyncFile;
use tokio::io::BufReader;

use crate::utilities::format_price::PriceFormatter;

/// One exported search result, price still as scraped.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductRow {
    pub platform: String,
    pub title: String,
    #[serde(default)]
    pub price: String,
}

/// Reads `platform,title,price` rows from an exported results file.
///
/// # Errors
///
/// Fails if the file can't be opened or a record doesn't match the header.
pub async fn read_results(source_path: impl AsRef<Path>) -> Result<Vec<ProductRow>> {
    let source_path = source_path.as_ref();
    let file = AsyncFile::open(source_path)
        .await
        .with_context(|| format!("Failed to open results file {}", source_path.display()))?;
    let reader = BufReader::new(file);
    let mut csv_reader = AsyncReaderBuilder::new().create_deserializer(reader);

    let records: Vec<_> = csv_reader.deserialize::<ProductRow>().collect().await;
    let rows = records
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to read results record")?;

    log::debug!("Read {} result rows from {}", rows.len(), source_path.display());
    Ok(rows)
}

/// Pairs every row with its display price.
pub fn format_rows<'a>(
    rows: &'a [ProductRow],
    formatter: &PriceFormatter,
) -> Vec<(&'a ProductRow, String)> {
    rows.iter()
        .map(|row| (row, formatter.format(&row.price)))
        .collect()
}
