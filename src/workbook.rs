use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use polars::prelude::*;

use crate::error::ReportError;
use crate::schema::{inventory, sales, sheet};

/// The two parsed input sheets.
#[derive(Debug)]
pub struct SalesWorkbook {
    pub sales: DataFrame,
    pub inventory: DataFrame,
}

/// File extensions accepted at the upload boundary.
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["xlsx", "xls", "ods"];

/// How a required column's cells are interpreted.
#[derive(Clone, Copy)]
enum ColumnKind {
    /// Join key: string or numeric cells, normalized to a canonical string
    /// so a Sales `Item Code` of `1` matches an Inventory `Code` of `1`
    /// whether the cell is typed as int, float or text.
    Key,
    Text,
    Number,
}

const SALES_COLUMNS: [(&str, ColumnKind); 5] = [
    (sales::ITEM_CODE, ColumnKind::Key),
    (sales::SALES_PERSON, ColumnKind::Text),
    (sales::QUANTITY_SOLD, ColumnKind::Number),
    (sales::SALE_PRICE, ColumnKind::Number),
    (sales::DISCOUNT, ColumnKind::Number),
];

const INVENTORY_COLUMNS: [(&str, ColumnKind); 4] = [
    (inventory::CODE, ColumnKind::Key),
    (inventory::ITEM_NAME, ColumnKind::Text),
    (inventory::COST_PRICE, ColumnKind::Number),
    (inventory::STOCK, ColumnKind::Number),
];

/// True if the path carries an extension from the allow-list
/// (case-insensitive).
pub fn is_allowed_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.iter().any(|a| *a == e)
        })
        .unwrap_or(false)
}

/// Load the "Sales" and "Inventory" sheets from a workbook file.
///
/// Header names are matched exactly after trimming surrounding whitespace.
pub fn load_workbook(path: &Path) -> Result<SalesWorkbook, ReportError> {
    let mut workbook = open_workbook_auto(path)?;

    let names = workbook.sheet_names();
    for required in [sheet::SALES, sheet::INVENTORY] {
        if !names.iter().any(|n| n.as_str() == required) {
            return Err(ReportError::MissingSheet(required.to_string()));
        }
    }

    let sales_range = workbook.worksheet_range(sheet::SALES)?;
    let inventory_range = workbook.worksheet_range(sheet::INVENTORY)?;

    Ok(SalesWorkbook {
        sales: sheet_to_frame(&sales_range, sheet::SALES, &SALES_COLUMNS)?,
        inventory: sheet_to_frame(&inventory_range, sheet::INVENTORY, &INVENTORY_COLUMNS)?,
    })
}

/// Convert one sheet into a DataFrame holding exactly the required columns.
fn sheet_to_frame(
    range: &Range<Data>,
    sheet_name: &str,
    required: &[(&str, ColumnKind)],
) -> Result<DataFrame, ReportError> {
    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| ReportError::EmptySheet(sheet_name.to_string()))?;
    let header: Vec<String> = header.iter().map(|c| c.to_string().trim().to_string()).collect();

    let data_rows: Vec<&[Data]> = rows.collect();
    if data_rows.is_empty() {
        return Err(ReportError::EmptySheet(sheet_name.to_string()));
    }

    let mut columns: Vec<Column> = Vec::with_capacity(required.len());
    for &(name, kind) in required {
        let idx = header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ReportError::MissingColumn(name.to_string()))?;

        match kind {
            ColumnKind::Key | ColumnKind::Text => {
                let mut values = Vec::with_capacity(data_rows.len());
                for (i, row) in data_rows.iter().enumerate() {
                    values.push(string_cell(row.get(idx), name, i, kind)?);
                }
                columns.push(Series::new(name.into(), values).into());
            }
            ColumnKind::Number => {
                let mut values = Vec::with_capacity(data_rows.len());
                for (i, row) in data_rows.iter().enumerate() {
                    values.push(numeric_cell(row.get(idx), name, i)?);
                }
                columns.push(Series::new(name.into(), values).into());
            }
        }
    }

    Ok(DataFrame::new(columns)?)
}

// ── Cell conversion ─────────────────────────────────────────────────────────

/// Canonical string form of a key or text cell.
///
/// Integral floats print without a decimal point so numeric keys join
/// consistently across cell types.
fn string_cell(
    cell: Option<&Data>,
    column: &str,
    data_row: usize,
    kind: ColumnKind,
) -> Result<String, ReportError> {
    let bad = || ReportError::NonNumeric {
        column: column.to_string(),
        // header is sheet row 1
        row: data_row + 2,
    };

    match cell {
        Some(Data::String(s)) => Ok(s.trim().to_string()),
        Some(Data::Int(i)) => Ok(i.to_string()),
        Some(Data::Float(f)) if matches!(kind, ColumnKind::Key) && f.fract() == 0.0 => {
            Ok(format!("{}", *f as i64))
        }
        Some(Data::Float(f)) => Ok(f.to_string()),
        Some(Data::Bool(b)) => Ok(b.to_string()),
        _ => Err(bad()),
    }
}

fn numeric_cell(cell: Option<&Data>, column: &str, data_row: usize) -> Result<f64, ReportError> {
    match cell {
        Some(Data::Float(f)) => Ok(*f),
        Some(Data::Int(i)) => Ok(*i as f64),
        _ => Err(ReportError::NonNumeric {
            column: column.to_string(),
            row: data_row + 2,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{write_fixture_workbook, FixtureCell, FixtureSheet};

    #[test]
    fn accepts_allow_listed_extensions_only() {
        assert!(is_allowed_extension(Path::new("report.xlsx")));
        assert!(is_allowed_extension(Path::new("report.XLS")));
        assert!(is_allowed_extension(Path::new("report.ods")));
        assert!(!is_allowed_extension(Path::new("report.csv")));
        assert!(!is_allowed_extension(Path::new("report")));
    }

    #[test]
    fn loads_both_sheets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.xlsx");
        write_fixture_workbook(&path, FixtureSheet::default_sales(), FixtureSheet::default_inventory());

        let wb = load_workbook(&path).unwrap();
        assert_eq!(wb.sales.height(), 3);
        assert_eq!(wb.inventory.height(), 2);
        assert_eq!(
            wb.sales.get_column_names_str(),
            vec![
                sales::ITEM_CODE,
                sales::SALES_PERSON,
                sales::QUANTITY_SOLD,
                sales::SALE_PRICE,
                sales::DISCOUNT
            ]
        );
    }

    #[test]
    fn numeric_item_codes_normalize_to_strings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.xlsx");
        write_fixture_workbook(&path, FixtureSheet::default_sales(), FixtureSheet::default_inventory());

        let wb = load_workbook(&path).unwrap();
        let codes = wb.sales.column(sales::ITEM_CODE).unwrap();
        let codes = codes.str().unwrap();
        assert_eq!(codes.get(0), Some("1"));
    }

    #[test]
    fn missing_sheet_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.xlsx");
        let mut sales_only = FixtureSheet::default_sales();
        sales_only.name = "Sales";
        let mut not_inventory = FixtureSheet::default_inventory();
        not_inventory.name = "Stocktake";
        write_fixture_workbook(&path, sales_only, not_inventory);

        match load_workbook(&path) {
            Err(ReportError::MissingSheet(name)) => assert_eq!(name, "Inventory"),
            other => panic!("expected MissingSheet, got {other:?}"),
        }
    }

    #[test]
    fn missing_column_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.xlsx");
        let mut sheet = FixtureSheet::default_sales();
        sheet.headers[4] = "Rebate";
        write_fixture_workbook(&path, sheet, FixtureSheet::default_inventory());

        match load_workbook(&path) {
            Err(ReportError::MissingColumn(name)) => assert_eq!(name, sales::DISCOUNT),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn empty_sheet_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.xlsx");
        let mut sheet = FixtureSheet::default_sales();
        sheet.rows.clear();
        write_fixture_workbook(&path, sheet, FixtureSheet::default_inventory());

        assert!(matches!(
            load_workbook(&path),
            Err(ReportError::EmptySheet(name)) if name == "Sales"
        ));
    }

    #[test]
    fn text_in_numeric_column_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.xlsx");
        let mut sheet = FixtureSheet::default_sales();
        sheet.rows[1][2] = FixtureCell::from("lots");
        write_fixture_workbook(&path, sheet, FixtureSheet::default_inventory());

        match load_workbook(&path) {
            Err(ReportError::NonNumeric { column, row }) => {
                assert_eq!(column, sales::QUANTITY_SOLD);
                assert_eq!(row, 3);
            }
            other => panic!("expected NonNumeric, got {other:?}"),
        }
    }
}
