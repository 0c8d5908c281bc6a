//! Workbook fixtures shared by the unit tests.

use std::path::Path;

use rust_xlsxwriter::Workbook;

#[derive(Clone, Debug)]
pub enum FixtureCell {
    Str(String),
    Num(f64),
}

impl From<&str> for FixtureCell {
    fn from(s: &str) -> Self {
        FixtureCell::Str(s.to_string())
    }
}

impl From<f64> for FixtureCell {
    fn from(n: f64) -> Self {
        FixtureCell::Num(n)
    }
}

#[derive(Clone, Debug)]
pub struct FixtureSheet {
    pub name: &'static str,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<FixtureCell>>,
}

impl FixtureSheet {
    /// Three sales rows for two items and two salespeople. The second row
    /// stores its item code as text to exercise key normalization.
    pub fn default_sales() -> Self {
        FixtureSheet {
            name: "Sales",
            headers: vec![
                "Item Code",
                "Sales Person",
                "Quantity Sold",
                "Sale Price",
                "Discount",
            ],
            rows: vec![
                vec![1.0.into(), "Alice".into(), 10.0.into(), 5.0.into(), 0.1.into()],
                vec!["1".into(), "Bob".into(), 2.0.into(), 5.0.into(), 0.0.into()],
                vec![2.0.into(), "Alice".into(), 1.0.into(), 20.0.into(), 0.25.into()],
            ],
        }
    }

    pub fn default_inventory() -> Self {
        FixtureSheet {
            name: "Inventory",
            headers: vec!["Code", "Item Name", "Cost Price", "Stock"],
            rows: vec![
                vec![1.0.into(), "Widget".into(), 2.0.into(), 100.0.into()],
                vec![2.0.into(), "Gadget".into(), 8.0.into(), 50.0.into()],
            ],
        }
    }
}

pub fn write_fixture_workbook(path: &Path, sales: FixtureSheet, inventory: FixtureSheet) {
    let mut workbook = Workbook::new();
    for sheet in [sales, inventory] {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name).unwrap();
        for (col, header) in sheet.headers.iter().enumerate() {
            worksheet.write_string(0, col as u16, *header).unwrap();
        }
        for (row, cells) in sheet.rows.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                match cell {
                    FixtureCell::Str(s) => {
                        worksheet.write_string(row as u32 + 1, col as u16, s).unwrap()
                    }
                    FixtureCell::Num(n) => {
                        worksheet.write_number(row as u32 + 1, col as u16, *n).unwrap()
                    }
                };
            }
        }
    }
    workbook.save(path).unwrap();
}
