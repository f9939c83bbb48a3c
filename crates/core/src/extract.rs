use crate::model::{PriceRecord, Table};
use crate::patterns::{extract_item_id, has_item_id, looks_monetary, normalize_label, parse_price_cents};

const MIN_DESCRIPTION_CHARS: usize = 10;

/// Pull every priced cell out of a pricing table's data rows.
///
/// Column 0 holds the item code and is never read as a price; neither is any
/// other cell carrying an item code. Unparseable cells are skipped.
pub fn extract_prices(table: &Table) -> Vec<PriceRecord> {
    let labels: Vec<String> = table.headers.iter().map(|h| normalize_label(h)).collect();
    let mut records = Vec::new();

    for (row_index, row) in table.data_rows() {
        let item_id = row.iter().find_map(|c| extract_item_id(c)).map(str::to_string);
        let item_description = row
            .iter()
            .find(|c| {
                c.chars().count() > MIN_DESCRIPTION_CHARS && !looks_monetary(c) && !has_item_id(c)
            })
            .cloned();

        for (col_index, cell) in row.iter().enumerate().skip(1) {
            if has_item_id(cell) {
                continue;
            }
            let Some(price_cents) = parse_price_cents(cell) else {
                continue;
            };
            records.push(PriceRecord {
                table_index: table.index,
                page: table.page,
                row_index,
                col_index,
                item_id: item_id.clone(),
                item_description: item_description.clone(),
                price_cents,
                raw_text: cell.clone(),
                column_label: labels.get(col_index).cloned().unwrap_or_default(),
            });
        }
    }

    tracing::debug!(table = table.index, prices = records.len(), "extracted prices");
    records
}
