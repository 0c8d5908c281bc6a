/// Column-name constants for the report schema.
/// Names match the workbook headers exactly (case- and spacing-sensitive).

// ── Sheet names ─────────────────────────────────────────────────────────────
pub mod sheet {
    pub const SALES: &str = "Sales";
    pub const INVENTORY: &str = "Inventory";
}

// ── Sales sheet columns ─────────────────────────────────────────────────────
pub mod sales {
    pub const ITEM_CODE: &str = "Item Code";
    pub const SALES_PERSON: &str = "Sales Person";
    pub const QUANTITY_SOLD: &str = "Quantity Sold";
    pub const SALE_PRICE: &str = "Sale Price";
    pub const DISCOUNT: &str = "Discount";

    // Derived by the metric pipeline
    pub const SALE_REVENUE: &str = "Sale Revenue";
    pub const SALE_PROFIT: &str = "Sale Profit";
}

// ── Inventory sheet columns ─────────────────────────────────────────────────
pub mod inventory {
    pub const CODE: &str = "Code";
    pub const ITEM_NAME: &str = "Item Name";
    pub const COST_PRICE: &str = "Cost Price";
    pub const STOCK: &str = "Stock";

    // Derived by the metric pipeline
    pub const STOCK_SOLD: &str = "StockSold";
    pub const STOCK_LEFT: &str = "StockLeft";
}
