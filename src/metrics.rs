use polars::prelude::*;

use crate::aggregation::{group_reduce, stock_balances, NamedSeries, Reducer, StockRow};
use crate::currency::floor_currency_expr;
use crate::error::ReportError;
use crate::schema::{inventory, sales};

/// The four result series of one report run, plus the join diagnostic.
#[derive(Debug, Clone)]
pub struct ReportMetrics {
    /// Revenue summed per salesperson, descending.
    pub revenue_by_salesperson: NamedSeries,
    /// Profit summed per salesperson, descending.
    pub profit_by_salesperson: NamedSeries,
    /// Mean discount per item name, descending.
    pub average_discount_by_item: NamedSeries,
    /// Stock balances per inventory item, ascending by item name.
    pub stock: Vec<StockRow>,
    /// Sales rows dropped by the inner join for lack of a matching
    /// inventory code. Diagnostic only, never an error.
    pub unmatched_sales: usize,
}

/// Run the metric pipeline over the two parsed sheets.
///
/// Revenue is derived before profit because profit reads the already
/// floor-rounded revenue column. Both derived columns are truncated to
/// cents per row before any aggregation, so group totals equal the sum of
/// the displayed per-row values.
pub fn compute_metrics(
    sales_data: &DataFrame,
    inventory_data: &DataFrame,
) -> Result<ReportMetrics, ReportError> {
    let enriched = sales_data
        .clone()
        .lazy()
        .join(
            inventory_data.clone().lazy(),
            [col(sales::ITEM_CODE)],
            [col(inventory::CODE)],
            JoinArgs::new(JoinType::Inner),
        )
        .with_columns([floor_currency_expr(
            col(sales::QUANTITY_SOLD)
                * col(sales::SALE_PRICE)
                * (lit(1.0) - col(sales::DISCOUNT)),
        )
        .alias(sales::SALE_REVENUE)])
        .with_columns([floor_currency_expr(
            col(sales::SALE_REVENUE) - col(inventory::COST_PRICE) * col(sales::QUANTITY_SOLD),
        )
        .alias(sales::SALE_PROFIT)])
        .collect()?;

    let unmatched_sales = count_unmatched(sales_data, inventory_data)?;
    if unmatched_sales > 0 {
        log::warn!(
            "{unmatched_sales} sales row(s) reference no inventory code and were dropped"
        );
    }

    let revenue_by_salesperson =
        group_reduce(&enriched, sales::SALES_PERSON, sales::SALE_REVENUE, Reducer::Sum)?
            .sort_desc();
    let profit_by_salesperson =
        group_reduce(&enriched, sales::SALES_PERSON, sales::SALE_PROFIT, Reducer::Sum)?
            .sort_desc();
    let average_discount_by_item =
        group_reduce(&enriched, inventory::ITEM_NAME, sales::DISCOUNT, Reducer::Mean)?
            .sort_desc();

    let sold_by_item =
        group_reduce(&enriched, inventory::ITEM_NAME, sales::QUANTITY_SOLD, Reducer::Sum)?;
    let stock = stock_balances(inventory_data, &sold_by_item)?;

    Ok(ReportMetrics {
        revenue_by_salesperson,
        profit_by_salesperson,
        average_discount_by_item,
        stock,
        unmatched_sales,
    })
}

/// Sales rows whose item code matches no inventory code.
fn count_unmatched(
    sales_data: &DataFrame,
    inventory_data: &DataFrame,
) -> Result<usize, ReportError> {
    let missing = sales_data
        .clone()
        .lazy()
        .join(
            inventory_data.clone().lazy(),
            [col(sales::ITEM_CODE)],
            [col(inventory::CODE)],
            JoinArgs::new(JoinType::Anti),
        )
        .collect()?;
    Ok(missing.height())
}
