//! Column names of the retail transaction dataset and of the tables derived
//! from it.

pub const QUANTITY: &str = "Quantity";
pub const INVOICE_DATE: &str = "InvoiceDate";
pub const PRICE: &str = "Price";
pub const COUNTRY: &str = "Country";

pub const YEAR: &str = "Year";
pub const MONTH: &str = "Month";
pub const TOTAL_SPENDING: &str = "TotalSpending";
pub const AVERAGE_MONTHLY_SPENDING: &str = "AverageMonthlySpending";

pub const TRANSACTION_COUNT: &str = "transaction_count";
pub const COUNT: &str = "count";
pub const MONTH_YEAR: &str = "MonthYear";

pub const UNITED_KINGDOM: &str = "United Kingdom";
