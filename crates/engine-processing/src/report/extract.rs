use crate::columns::{
    COUNT, COUNTRY, MONTH, MONTH_YEAR, QUANTITY, TRANSACTION_COUNT, UNITED_KINGDOM, YEAR,
};
use connectors::{
    engine::table::{Table, desc},
    error::EngineError,
};
use polars::prelude::{DataFrame, DataType, Int32Chunked, NamedFrom, Series, col, len, lit};

/// Name of the raw table's country column, matched ignoring case and
/// surrounding whitespace.
pub fn find_country_column(raw: &Table) -> Option<String> {
    raw.columns()
        .into_iter()
        .find(|name| name.trim().eq_ignore_ascii_case(COUNTRY))
}

/// Top `top_n` countries by number of raw transactions, as
/// `(<country column>, transaction_count)`.
pub fn transactions_by_country(
    raw: &Table,
    country_column: &str,
    top_n: usize,
) -> Result<Table, EngineError> {
    raw.group_by(&[country_column])?
        .agg(vec![len().alias(TRANSACTION_COUNT)])?
        .order_by(vec![desc(TRANSACTION_COUNT)])?
        .limit(top_n)
}

/// The `top_n` most frequent raw quantities, as `(Quantity, count)`.
pub fn quantity_distribution(raw: &Table, top_n: usize) -> Result<Table, EngineError> {
    raw.group_by(&[QUANTITY])?
        .agg(vec![len().alias(COUNT)])?
        .order_by(vec![desc(COUNT)])?
        .limit(top_n)
}

/// United Kingdom rows of the monthly aggregate, with a `MonthYear`
/// category label appended.
pub fn uk_monthly_spending(monthly: &Table) -> Result<DataFrame, EngineError> {
    let uk = monthly
        .filter(col(COUNTRY).eq(lit(UNITED_KINGDOM)))?
        .collect()?;
    with_month_year(uk)
}

/// `frame` with a `MonthYear` column built from `Year` and `Month`.
pub fn with_month_year(mut frame: DataFrame) -> Result<DataFrame, EngineError> {
    let years = int_column(&frame, YEAR)?;
    let months = int_column(&frame, MONTH)?;

    let labels: Vec<Option<String>> = (&years)
        .into_iter()
        .zip(&months)
        .map(|(year, month)| Some(month_year_label(year?, month?)))
        .collect();
    frame.with_column(Series::new(MONTH_YEAR.into(), labels))?;
    Ok(frame)
}

fn int_column(frame: &DataFrame, name: &str) -> Result<Int32Chunked, EngineError> {
    let series = frame.column(name)?.as_materialized_series();
    Ok(series.cast(&DataType::Int32)?.i32()?.clone())
}

/// `YYYY-MM` label with a zero-padded month.
pub fn month_year_label(year: i32, month: i32) -> String {
    format!("{year}-{month:02}")
}
