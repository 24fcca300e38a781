pub mod chart;
pub mod extract;

use crate::{
    columns::{AVERAGE_MONTHLY_SPENDING, COUNT, MONTH_YEAR, QUANTITY, TRANSACTION_COUNT},
    error::ReportError,
};
use chart::{AxisLabels, ChartKind, ChartRenderer};
use connectors::engine::table::Table;
use std::path::PathBuf;
use tracing::{info, warn};

pub const TRANSACTIONS_BY_COUNTRY_PNG: &str = "transactions_by_country.png";
pub const QUANTITY_DISTRIBUTION_PNG: &str = "quantity_distribution.png";
pub const UK_MONTHLY_SPENDING_PNG: &str = "uk_monthly_spending.png";

/// Builds the three report extracts from the raw and monthly tables and
/// hands each to `renderer`, appending every written artifact to
/// `artifacts` as soon as it exists. The country chart is skipped when the
/// raw table has no country column.
pub fn generate_reports(
    raw: &Table,
    monthly: &Table,
    renderer: &dyn ChartRenderer,
    top_n: usize,
    artifacts: &mut Vec<PathBuf>,
) -> Result<(), ReportError> {
    let written = artifacts.len();

    match extract::find_country_column(raw) {
        Some(country) => {
            let frame = extract::transactions_by_country(raw, &country, top_n)?.collect()?;
            let kind = ChartKind::Bar {
                category: country.clone(),
                value: TRANSACTION_COUNT.to_string(),
            };
            let labels = AxisLabels::new(
                &format!("Top {top_n} Countries by Transaction Count"),
                &country,
                TRANSACTION_COUNT,
            );
            artifacts.push(renderer.render(&frame, &kind, &labels, TRANSACTIONS_BY_COUNTRY_PNG)?);
        }
        None => warn!(
            "No country column among [{}], skipping '{}'",
            raw.columns().join(", "),
            TRANSACTIONS_BY_COUNTRY_PNG
        ),
    }

    let frame = extract::quantity_distribution(raw, top_n)?.collect()?;
    let kind = ChartKind::Bar {
        category: QUANTITY.to_string(),
        value: COUNT.to_string(),
    };
    let labels = AxisLabels::new(
        &format!("Quantity Distribution (Top {top_n})"),
        QUANTITY,
        COUNT,
    );
    artifacts.push(renderer.render(&frame, &kind, &labels, QUANTITY_DISTRIBUTION_PNG)?);

    let frame = extract::uk_monthly_spending(monthly)?;
    let kind = ChartKind::Bar {
        category: MONTH_YEAR.to_string(),
        value: AVERAGE_MONTHLY_SPENDING.to_string(),
    };
    let labels = AxisLabels::new(
        "Monthly Average Spending in United Kingdom",
        MONTH_YEAR,
        AVERAGE_MONTHLY_SPENDING,
    );
    artifacts.push(renderer.render(&frame, &kind, &labels, UK_MONTHLY_SPENDING_PNG)?);

    info!("Rendered {} report charts", artifacts.len() - written);
    Ok(())
}
