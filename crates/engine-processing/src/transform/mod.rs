pub mod computed;
pub mod filter;
pub mod pipeline;

use crate::columns::{INVOICE_DATE, MONTH, PRICE, QUANTITY, TOTAL_SPENDING, YEAR};
use computed::ComputedTransform;
use filter::PositiveValuesFilter;
use pipeline::TransformPipeline;
use polars::prelude::{DataType, Expr, StrptimeOptions, col};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Drops transactions without a positive quantity and price, normalizes the
/// invoice date to a date, and derives `Year`, `Month` and `TotalSpending`.
pub fn cleaning_pipeline() -> TransformPipeline {
    TransformPipeline::new()
        .add_transform(PositiveValuesFilter::new(&[QUANTITY, PRICE]))
        .add_transform(ComputedTransform::new(INVOICE_DATE, invoice_date()))
        .add_transform(ComputedTransform::new(YEAR, date_part(col(INVOICE_DATE).dt().year())))
        .add_transform(ComputedTransform::new(MONTH, date_part(col(INVOICE_DATE).dt().month())))
        .add_transform(ComputedTransform::new(
            TOTAL_SPENDING,
            col(QUANTITY).cast(DataType::Float64) * col(PRICE).cast(DataType::Float64),
        ))
}

/// Calendar date of the invoice. Only the leading `YYYY-MM-DD` is read, so
/// date-only and date-time cells parse alike; anything else becomes null.
fn invoice_date() -> Expr {
    let options = StrptimeOptions {
        format: Some(DATE_FORMAT.into()),
        strict: false,
        exact: false,
        ..Default::default()
    };
    col(INVOICE_DATE).cast(DataType::String).str().to_date(options)
}

fn date_part(part: Expr) -> Expr {
    part.cast(DataType::Int32)
}
