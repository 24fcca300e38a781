use crate::columns::{AVERAGE_MONTHLY_SPENDING, COUNTRY, MONTH, TOTAL_SPENDING, YEAR};
use connectors::{
    engine::table::{Table, asc},
    error::EngineError,
};
use polars::prelude::col;

/// Number of transactions per country, as `(Country, count)`.
pub fn country_counts(cleaned: &Table) -> Result<Table, EngineError> {
    cleaned.group_by(&[COUNTRY])?.count()
}

/// Average spending per transaction for every country and calendar month,
/// ordered by country, year and month.
pub fn monthly_average_spending(cleaned: &Table) -> Result<Table, EngineError> {
    cleaned
        .group_by(&[COUNTRY, YEAR, MONTH])?
        .agg(vec![col(TOTAL_SPENDING).mean().alias(AVERAGE_MONTHLY_SPENDING)])?
        .order_by(vec![asc(COUNTRY), asc(YEAR), asc(MONTH)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test_support::{TRANSACTIONS, load, numbers, strings},
        transform::cleaning_pipeline,
    };
    use std::collections::HashSet;

    #[test]
    fn test_country_counts() {
        let fixture = load(TRANSACTIONS);
        let cleaned = cleaning_pipeline().apply(&fixture.table).unwrap();
        let counts = country_counts(&cleaned).unwrap().collect().unwrap();

        assert_eq!(cleaned.columns().len(), 11);
        assert_eq!(counts.get_column_names_str(), vec!["Country", "count"]);
        assert_eq!(strings(&counts, COUNTRY), vec!["United Kingdom", "France"]);
        assert_eq!(numbers(&counts, "count"), vec![3.0, 1.0]);
    }

    #[test]
    fn test_repeated_counts_are_identical() {
        let fixture = load(TRANSACTIONS);
        let cleaned = cleaning_pipeline().apply(&fixture.table).unwrap();
        let first = country_counts(&cleaned).unwrap().collect().unwrap();
        let second = country_counts(&cleaned).unwrap().collect().unwrap();
        assert!(first.equals_missing(&second));
    }

    #[test]
    fn test_monthly_average_spending() {
        let csv = "\
Quantity,InvoiceDate,Price,Country
1,2011-03-02 10:00:00,10,United Kingdom
2,2011-03-15 11:00:00,10,United Kingdom
3,2011-03-28 12:00:00,10,United Kingdom
1,2011-02-01 09:00:00,4.50,United Kingdom
5,2011-03-02 10:00:00,1.00,France
";
        let fixture = load(csv);
        let cleaned = cleaning_pipeline().apply(&fixture.table).unwrap();
        let monthly = monthly_average_spending(&cleaned).unwrap().collect().unwrap();

        assert_eq!(
            monthly.get_column_names_str(),
            vec!["Country", "Year", "Month", "AverageMonthlySpending"]
        );
        let keys: Vec<(String, String, String)> = strings(&monthly, COUNTRY)
            .into_iter()
            .zip(strings(&monthly, YEAR))
            .zip(strings(&monthly, MONTH))
            .map(|((country, year), month)| (country, year, month))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("France".into(), "2011".into(), "3".into()),
                ("United Kingdom".into(), "2011".into(), "2".into()),
                ("United Kingdom".into(), "2011".into(), "3".into()),
            ]
        );
        let unique: HashSet<_> = keys.iter().collect();
        assert_eq!(unique.len(), keys.len());

        let averages = numbers(&monthly, AVERAGE_MONTHLY_SPENDING);
        assert_eq!(averages[2], 20.0);
        assert_eq!(averages[1], 4.5);
    }

    #[test]
    fn test_monthly_requires_derived_columns() {
        let fixture = load(TRANSACTIONS);
        let err = monthly_average_spending(&fixture.table).err().unwrap();
        assert!(!err.is_data_access());
    }
}
