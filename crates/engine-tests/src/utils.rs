#![allow(dead_code)]

use engine_runtime::execution::executor::RunReport;
use polars::prelude::{AnyValue, DataFrame, DataType};

/// Ten transactions: six from the United Kingdom and four from France, one
/// of each with a non-positive quantity. The three valid UK rows of 2011-03
/// spend 10, 20 and 30.
pub const RETAIL_CSV: &str = "\
Invoice,StockCode,Description,Quantity,InvoiceDate,Price,Customer ID,Country
536365,85123A,WHITE HANGING HEART,1,2011-03-01 08:26:00,10.00,17850,United Kingdom
536366,71053,WHITE METAL LANTERN,2,2011-03-08 09:01:00,10.00,17850,United Kingdom
536367,84406B,CREAM CUPID HEARTS,3,2011-03-21 10:15:00,10.00,13047,United Kingdom
536368,22752,GLASS STAR FROSTED,4,2011-04-05 11:30:00,2.50,13047,United Kingdom
536369,21730,DOORMAT NEW ENGLAND,1,2011-05-12 12:00:00,7.25,13047,United Kingdom
C536370,22632,HAND WARMER RED,0,2011-05-13 12:10:00,3.00,13047,United Kingdom
536371,22633,HAND WARMER UNION JACK,6,2011-03-02 08:45:00,1.25,12583,France
536372,84879,ASSORTED BIRD ORNAMENT,2,2011-04-14 14:20:00,4.00,12583,France
536373,22745,POPPY'S PLAYHOUSE,12,2011-04-20 15:05:00,0.85,12583,France
C536374,22748,POPPY'S KITCHEN,-3,2011-04-21 16:40:00,2.00,12583,France
";

/// Same shape, but without a `Price` column.
pub const MISSING_PRICE_CSV: &str = "\
Invoice,Quantity,InvoiceDate,Country
536365,1,2011-03-01 08:26:00,United Kingdom
536366,2,2011-03-08 09:01:00,France
";

/// Valid rows, none of them from the United Kingdom.
pub const NO_UK_CSV: &str = "\
Invoice,Quantity,InvoiceDate,Price,Country
536371,6,2011-03-02 08:45:00,1.25,France
536372,2,2011-04-14 14:20:00,4.00,Germany
";

pub fn stage_names(report: &RunReport) -> Vec<String> {
    report
        .measurements
        .iter()
        .map(|m| m.stage.clone())
        .collect()
}

/// Rows of `frame` rendered as strings, one vector per row. Nulls read
/// `null`.
pub fn rows_as_strings(frame: &DataFrame) -> Vec<Vec<String>> {
    (0..frame.height())
        .map(|row| {
            frame
                .get_column_names_str()
                .into_iter()
                .map(|column| cell_as_string(frame, row, column).unwrap_or_else(|| "null".into()))
                .collect()
        })
        .collect()
}

pub fn cell_as_f64(frame: &DataFrame, row: usize, column: &str) -> Option<f64> {
    let series = frame.column(column).ok()?.as_materialized_series();
    series.cast(&DataType::Float64).ok()?.f64().ok()?.get(row)
}

pub fn cell_as_string(frame: &DataFrame, row: usize, column: &str) -> Option<String> {
    let series = frame.column(column).ok()?.as_materialized_series();
    match series.get(row).ok()? {
        AnyValue::Null => None,
        AnyValue::String(s) => Some(s.to_string()),
        other => Some(other.to_string()),
    }
}

/// Every value of `column`, rendered as strings, nulls skipped.
pub fn column_as_strings(frame: &DataFrame, column: &str) -> Vec<String> {
    (0..frame.height())
        .filter_map(|row| cell_as_string(frame, row, column))
        .collect()
}
