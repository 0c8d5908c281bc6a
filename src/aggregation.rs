use std::cmp::Ordering;
use std::collections::HashMap;

use polars::prelude::*;

use crate::error::ReportError;
use crate::schema::inventory;

/// Built-in reducers for grouped columns.
#[derive(Debug, Clone, Copy)]
pub enum Reducer {
    Sum,
    Mean,
}

/// An ordered mapping from a group label to a scalar value.
///
/// This is the unit handed to chart rendering and report composition.
/// Construction preserves group insertion order; callers apply an explicit
/// sort when display order matters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedSeries {
    entries: Vec<(String, f64)>,
}

impl NamedSeries {
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (String, f64)> {
        self.entries.iter()
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v).sum()
    }

    pub fn value(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| *v)
    }

    /// Stable descending sort by value; ties keep first-seen group order.
    pub fn sort_desc(mut self) -> Self {
        self.entries
            .sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        self
    }

    /// Stable ascending sort by label.
    pub fn sort_by_label(mut self) -> Self {
        self.entries.sort_by(|a, b| a.0.cmp(&b.0));
        self
    }
}

/// Group `value_key` by exact equality of `group_key` and reduce each group.
///
/// Group order in the result is insertion order of first appearance.
pub fn group_reduce(
    df: &DataFrame,
    group_key: &str,
    value_key: &str,
    reducer: Reducer,
) -> Result<NamedSeries, ReportError> {
    let agg = match reducer {
        Reducer::Sum => col(value_key).sum(),
        Reducer::Mean => col(value_key).mean(),
    };

    let reduced = df
        .clone()
        .lazy()
        .group_by_stable([col(group_key)])
        .agg([agg.alias(value_key)])
        .collect()?;

    let labels = reduced.column(group_key)?.str()?;
    let values = reduced.column(value_key)?.f64()?;

    let mut entries = Vec::with_capacity(reduced.height());
    for i in 0..reduced.height() {
        entries.push((
            labels.get(i).unwrap_or("").to_string(),
            values.get(i).unwrap_or(0.0),
        ));
    }
    Ok(NamedSeries::new(entries))
}

/// One inventory item with its derived stock balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockRow {
    pub item: String,
    pub stock: i64,
    pub stock_sold: i64,
    pub stock_left: i64,
}

/// Merge quantity-sold figures onto the inventory table by item name and
/// derive `StockLeft = Stock - StockSold`.
///
/// The inventory table drives the result: an item with no matching sales
/// keeps `StockSold = 0` rather than being dropped. Rows come back sorted
/// ascending by item name.
pub fn stock_balances(
    inventory: &DataFrame,
    sold_by_item: &NamedSeries,
) -> Result<Vec<StockRow>, ReportError> {
    let sold: HashMap<&str, f64> = sold_by_item
        .iter()
        .map(|(label, value)| (label.as_str(), *value))
        .collect();

    let sorted = inventory.sort([inventory::ITEM_NAME], SortMultipleOptions::default())?;
    let names = sorted.column(inventory::ITEM_NAME)?.str()?;
    let stock = sorted.column(inventory::STOCK)?.f64()?;

    let mut rows = Vec::with_capacity(sorted.height());
    for i in 0..sorted.height() {
        let item = names.get(i).unwrap_or("").to_string();
        let in_stock = stock.get(i).unwrap_or(0.0);
        let stock_sold = sold.get(item.as_str()).copied().unwrap_or(0.0);
        rows.push(StockRow {
            stock: in_stock as i64,
            stock_sold: stock_sold as i64,
            stock_left: (in_stock - stock_sold) as i64,
            item,
        });
    }
    Ok(rows)
}
