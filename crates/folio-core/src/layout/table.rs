use crate::config::schema::LayoutConfig;
use crate::model::{Cell, DetectedTable, Row};

/// Detect tables among a page's rows.
///
/// Rows with fewer than two fragments cannot evidence a column structure and
/// are ignored. The remaining rows are split into contiguous regions wherever
/// two consecutive rows are more than `max_row_gap` apart, and each region
/// becomes one table with its own column edges. A region holding a single row
/// joins the region above it (or below, at the top of the page), so every
/// qualifying row lands in exactly one table.
pub fn detect_tables(rows: &[Row<'_>], page_height: f32, config: &LayoutConfig) -> Vec<DetectedTable> {
    let qualifying: Vec<&Row<'_>> = rows.iter().filter(|r| r.fragments.len() >= 2).collect();
    if qualifying.len() < 2 {
        return Vec::new();
    }

    let regions = absorb_single_rows(split_regions(&qualifying, config.max_row_gap));
    let tables: Vec<DetectedTable> = regions
        .iter()
        .map(|region| build_table(region, config))
        .collect();

    for table in &tables {
        let span = table.start_y - table.end_y;
        tracing::debug!(
            rows = table.row_count(),
            columns = table.column_count(),
            "table spans {:.0}% of page height",
            if page_height > 0.0 { span / page_height * 100.0 } else { 0.0 }
        );
    }

    tables
}

/// Split rows (already top-to-bottom) at vertical gaps larger than `max_gap`.
fn split_regions<'r, 'a>(rows: &[&'r Row<'a>], max_gap: f32) -> Vec<Vec<&'r Row<'a>>> {
    let mut regions: Vec<Vec<&Row>> = Vec::new();
    let mut current: Vec<&Row> = Vec::new();

    for &row in rows {
        if let Some(prev) = current.last() {
            if prev.quantized_y - row.quantized_y > max_gap {
                regions.push(std::mem::take(&mut current));
            }
        }
        current.push(row);
    }

    if !current.is_empty() {
        regions.push(current);
    }

    regions
}

fn absorb_single_rows<'r, 'a>(regions: Vec<Vec<&'r Row<'a>>>) -> Vec<Vec<&'r Row<'a>>> {
    let mut merged: Vec<Vec<&Row>> = Vec::new();
    let mut pending: Vec<&Row> = Vec::new();

    for region in regions {
        if region.len() >= 2 {
            pending.extend(region);
            merged.push(std::mem::take(&mut pending));
        } else if let Some(last) = merged.last_mut() {
            last.extend(region);
        } else {
            pending.extend(region);
        }
    }

    // Only isolated rows: keep them together rather than lose them.
    if !pending.is_empty() {
        merged.push(pending);
    }
    merged
}

/// Cluster X positions into column left edges.
///
/// Positions are sorted and a new column starts whenever a value is more than
/// `gap` to the right of the current column's edge. Each edge is the leftmost
/// value of its cluster.
pub fn cluster_columns(positions: &[f32], gap: f32) -> Vec<f32> {
    let mut sorted = positions.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mut edges: Vec<f32> = Vec::new();
    for x in sorted {
        match edges.last() {
            Some(&edge) if x - edge <= gap => {}
            _ => edges.push(x),
        }
    }
    edges
}

fn build_table(rows: &[&Row<'_>], config: &LayoutConfig) -> DetectedTable {
    let positions: Vec<f32> = rows
        .iter()
        .flat_map(|r| r.fragments.iter().map(|f| f.x))
        .collect();
    let edges = cluster_columns(&positions, config.column_gap);
    let slack = config.column_slack;

    let cells = rows
        .iter()
        .enumerate()
        .map(|(row_idx, row)| {
            edges
                .iter()
                .enumerate()
                .map(|(col_idx, &edge)| {
                    let next = edges.get(col_idx + 1).copied().unwrap_or(f32::INFINITY);
                    let text = row
                        .fragments
                        .iter()
                        .filter(|f| f.x >= edge - slack && f.x < next - slack)
                        .map(|f| f.text.as_str())
                        .collect::<Vec<_>>()
                        .join(" ");
                    Cell {
                        text: text.trim().to_string(),
                        row: row_idx,
                        col: col_idx,
                    }
                })
                .collect()
        })
        .collect();

    DetectedTable {
        cells,
        start_y: rows.first().map(|r| r.quantized_y).unwrap_or(0.0),
        end_y: rows.last().map(|r| r.quantized_y).unwrap_or(0.0),
    }
}

/// Fallback grid for pages without tables: one row per row cluster, one cell
/// per fragment, so no content is dropped.
pub fn raw_rows(rows: &[Row<'_>]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| r.fragments.iter().map(|f| f.text.clone()).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::rows::cluster_rows;
    use crate::model::TextFragment;

    fn frag(text: &str, x: f32, y: f32) -> TextFragment {
        TextFragment::new(text, x, y, 30.0, 10.0)
    }

    fn invoice_grid() -> Vec<TextFragment> {
        vec![
            frag("Item", 50.0, 500.0),
            frag("Qty", 250.0, 500.0),
            frag("Price", 350.0, 500.0),
            frag("Widget", 50.0, 485.0),
            frag("2", 255.0, 485.0),
            frag("$10.00", 352.0, 485.0),
            frag("Gadget", 50.0, 470.0),
            frag("large", 65.0, 470.0),
            frag("$99.00", 351.0, 470.0),
        ]
    }

    #[test]
    fn test_cluster_columns() {
        let edges = cluster_columns(&[50.0, 255.0, 52.0, 250.0, 350.0, 369.0, 371.0], 20.0);
        assert_eq!(edges, vec![50.0, 250.0, 350.0, 371.0]);
    }

    #[test]
    fn test_cluster_columns_empty() {
        assert!(cluster_columns(&[], 20.0).is_empty());
    }

    #[test]
    fn test_detect_single_table() {
        let fragments = invoice_grid();
        let rows = cluster_rows(&fragments, 5.0);
        let tables = detect_tables(&rows, 792.0, &LayoutConfig::default());

        assert_eq!(tables.len(), 1);
        let table = &tables[0];
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.start_y, 500.0);
        assert_eq!(table.end_y, 470.0);
        assert_eq!(table.cells[0][1].text, "Qty");
        assert_eq!(table.cells[2][0].text, "Gadget large");
        // Qty column is empty for the gadget row; grid stays rectangular.
        assert_eq!(table.cells[2][1].text, "");
        assert_eq!(table.cells[2][2].text, "$99.00");
        assert_eq!(table.cells[2][2].row, 2);
        assert_eq!(table.cells[2][2].col, 2);
    }

    #[test]
    fn test_grid_is_rectangular() {
        let fragments = vec![
            frag("a", 10.0, 700.0),
            frag("b", 100.0, 700.0),
            frag("c", 10.0, 690.0),
            frag("d", 200.0, 690.0),
            frag("e", 300.0, 690.0),
            frag("f", 100.0, 680.0),
            frag("g", 400.0, 680.0),
        ];
        let rows = cluster_rows(&fragments, 5.0);
        let tables = detect_tables(&rows, 792.0, &LayoutConfig::default());
        let table = &tables[0];
        let width = table.column_count();
        assert_eq!(width, 5);
        assert!(table.cells.iter().all(|r| r.len() == width));
    }

    #[test]
    fn test_single_fragment_rows_yield_no_tables() {
        let fragments = vec![
            frag("Heading", 10.0, 700.0),
            frag("Some prose", 10.0, 680.0),
            frag("More prose", 10.0, 660.0),
        ];
        let rows = cluster_rows(&fragments, 5.0);
        assert!(detect_tables(&rows, 792.0, &LayoutConfig::default()).is_empty());

        let fallback = raw_rows(&rows);
        assert_eq!(fallback.len(), 3);
        assert_eq!(fallback[1], vec!["Some prose".to_string()]);
    }

    #[test]
    fn test_one_qualifying_row_is_not_a_table() {
        let fragments = vec![
            frag("Name", 10.0, 700.0),
            frag("Value", 200.0, 700.0),
            frag("Footer", 10.0, 50.0),
        ];
        let rows = cluster_rows(&fragments, 5.0);
        assert!(detect_tables(&rows, 792.0, &LayoutConfig::default()).is_empty());
    }

    #[test]
    fn test_vertical_gap_splits_tables() {
        let mut fragments = invoice_grid();
        fragments.extend([
            frag("Tax", 300.0, 200.0),
            frag("$5.00", 400.0, 200.0),
            frag("Total", 300.0, 185.0),
            frag("$114.00", 400.0, 185.0),
        ]);
        let rows = cluster_rows(&fragments, 5.0);
        let tables = detect_tables(&rows, 792.0, &LayoutConfig::default());

        assert_eq!(tables.len(), 2);
        assert_eq!(tables[1].start_y, 200.0);
        assert_eq!(tables[1].column_count(), 2);
        assert_eq!(tables[1].cells[1][1].text, "$114.00");
    }

    #[test]
    fn test_isolated_row_joins_neighbouring_table() {
        let fragments = vec![
            frag("Bill To", 10.0, 700.0),
            frag("Ship To", 200.0, 700.0),
            frag("Item", 10.0, 300.0),
            frag("Amt", 200.0, 300.0),
            frag("Widget", 10.0, 290.0),
            frag("5.00", 200.0, 290.0),
        ];
        let rows = cluster_rows(&fragments, 5.0);
        let tables = detect_tables(&rows, 792.0, &LayoutConfig::default());

        assert_eq!(tables.len(), 1);
        let texts: Vec<&str> = tables[0]
            .cells
            .iter()
            .flatten()
            .map(|c| c.text.as_str())
            .collect();
        assert_eq!(texts, vec!["Bill To", "Ship To", "Item", "Amt", "Widget", "5.00"]);
        assert_eq!(tables[0].start_y, 700.0);
    }

    #[test]
    fn test_trailing_isolated_row_joins_table_above() {
        let mut fragments = invoice_grid();
        fragments.extend([frag("Total", 300.0, 100.0), frag("$119.00", 400.0, 100.0)]);
        let rows = cluster_rows(&fragments, 5.0);
        let tables = detect_tables(&rows, 792.0, &LayoutConfig::default());

        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].row_count(), 4);
        assert_eq!(tables[0].end_y, 100.0);
        assert!(tables[0].cells[3].iter().any(|c| c.text == "$119.00"));
    }

    #[test]
    fn test_isolated_rows_only_form_one_table() {
        let fragments = vec![
            frag("a", 10.0, 700.0),
            frag("b", 200.0, 700.0),
            frag("c", 10.0, 400.0),
            frag("d", 200.0, 400.0),
        ];
        let rows = cluster_rows(&fragments, 5.0);
        let tables = detect_tables(&rows, 792.0, &LayoutConfig::default());
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].row_count(), 2);
    }

    #[test]
    fn test_detection_is_idempotent() {
        let fragments = invoice_grid();
        let rows = cluster_rows(&fragments, 5.0);
        let cfg = LayoutConfig::default();
        assert_eq!(detect_tables(&rows, 792.0, &cfg), detect_tables(&rows, 792.0, &cfg));
    }
}
