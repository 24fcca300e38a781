#[cfg(test)]
mod tests {
    use crate::{
        Dataset, FixedSampler, RecordingRenderer, run_pipeline,
        utils::{
            MISSING_PRICE_CSV, NO_UK_CSV, RETAIL_CSV, cell_as_f64, column_as_strings,
            rows_as_strings, stage_names,
        },
    };
    use connectors::engine::local::LocalEngine;
    use engine_processing::report::{
        QUANTITY_DISTRIBUTION_PNG, TRANSACTIONS_BY_COUNTRY_PNG, UK_MONTHLY_SPENDING_PNG,
    };
    use engine_runtime::{error::ErrorKind, execution::executor::run};
    use std::sync::Arc;
    use tracing_test::traced_test;

    const STAGES: [&str; 7] = [
        "Read Data",
        "Data Filtering",
        "Aggregate Country Counts - Iteration 1",
        "Aggregate Country Counts - Iteration 2",
        "Aggregate Country Counts - Iteration 3",
        "Calculate Avg Spending",
        "Plot Generation",
    ];

    // Test Settings: default mode (no caching).
    // Scenario: the ten-row dataset is processed end to end.
    // Expected Outcome:
    // - Seven measurements, in stage order.
    // - Three artifacts in the output directory.
    // - The summary block and the teardown line are logged.
    #[traced_test]
    #[test]
    fn tc01() {
        let data = Dataset::new(RETAIL_CSV);
        let config = data.config(false);
        let (report, renderer) = run_pipeline(&config);

        assert!(report.is_success(), "{:?}", report.error);
        assert_eq!(stage_names(&report), STAGES);
        assert!(report.measurements.iter().all(|m| m.memory_mb == Some(128.0)));
        assert_eq!(
            report.artifacts,
            vec![
                config.output_dir.join(TRANSACTIONS_BY_COUNTRY_PNG),
                config.output_dir.join(QUANTITY_DISTRIBUTION_PNG),
                config.output_dir.join(UK_MONTHLY_SPENDING_PNG),
            ]
        );
        assert_eq!(renderer.calls().len(), 3);

        assert!(logs_contain("--- Performance Measurements ---"));
        assert!(logs_contain("Time taken for 'Read Data':"));
        assert!(logs_contain("--- RAM Usage Measurements (at the end of each stage) ---"));
        assert!(logs_contain("RAM usage after 'Plot Generation': 128.00 MB"));
        assert!(logs_contain("RetailAnalysis finished."));
        assert!(!logs_contain("Cached the cleaned table."));
        assert!(!logs_contain("An error occurred"));
    }

    // Test Settings: optimized mode.
    // Scenario: the same dataset is processed with caching enabled.
    // Expected Outcome:
    // - Both tables are cached before the repeated aggregation starts.
    // - The monthly aggregate is persisted.
    // - Fewer source scans than the default mode, identical extracts.
    #[traced_test]
    #[test]
    fn tc02() {
        let data = Dataset::new(RETAIL_CSV);
        let (plain, plain_renderer) = run_pipeline(&data.config(false));
        let (optimized, optimized_renderer) = run_pipeline(&data.config(true));

        assert!(optimized.is_success(), "{:?}", optimized.error);
        assert_eq!(stage_names(&optimized), STAGES);

        assert_eq!(plain.engine_stats.scans, 8);
        assert_eq!(plain.engine_stats.cached_tables, 0);
        assert_eq!(optimized.engine_stats.scans, 2);
        assert_eq!(optimized.engine_stats.cached_tables, 3);

        let plain_calls = plain_renderer.calls();
        let optimized_calls = optimized_renderer.calls();
        assert_eq!(plain_calls.len(), optimized_calls.len());
        for (a, b) in plain_calls.iter().zip(&optimized_calls) {
            assert_eq!(a.file_name, b.file_name);
            assert!(a.extract.equals_missing(&b.extract));
        }

        assert!(logs_contain("Cached the initial table."));
        assert!(logs_contain("Persisted the monthly aggregate."));
        logs_assert(|lines: &[&str]| {
            let cached = lines
                .iter()
                .position(|l| l.contains("Cached the cleaned table."))
                .ok_or("cleaned table was never cached")?;
            let aggregation = lines
                .iter()
                .rposition(|l| l.contains("Stage 3: Performing repetitive aggregation"))
                .ok_or("stage 3 never started")?;
            if cached < aggregation {
                Ok(())
            } else {
                Err("cache marker placed after stage 3 started".to_string())
            }
        });
    }

    // Scenario: extracts handed to the renderer for the ten-row dataset.
    // Expected Outcome: country counts over the raw rows, UK monthly bars
    // labelled YYYY-MM with 20.0 for 2011-03.
    #[test]
    fn tc03() {
        let data = Dataset::new(RETAIL_CSV);
        let (report, renderer) = run_pipeline(&data.config(true));
        assert!(report.is_success());

        let by_country = renderer.call(TRANSACTIONS_BY_COUNTRY_PNG).unwrap();
        assert_eq!(
            rows_as_strings(&by_country.extract),
            vec![vec!["United Kingdom", "6"], vec!["France", "4"]]
        );
        assert_eq!(by_country.labels.y, "transaction_count");

        let quantities = renderer.call(QUANTITY_DISTRIBUTION_PNG).unwrap();
        assert_eq!(quantities.extract.height(), 8);
        assert_eq!(rows_as_strings(&quantities.extract)[0], vec!["1", "2"]);

        let uk = renderer.call(UK_MONTHLY_SPENDING_PNG).unwrap();
        assert_eq!(
            column_as_strings(&uk.extract, "MonthYear"),
            vec!["2011-03", "2011-04", "2011-05"]
        );
        assert_eq!(cell_as_f64(&uk.extract, 0, "AverageMonthlySpending"), Some(20.0));
    }

    // Scenario: the configured dataset path does not exist.
    // Expected Outcome:
    // - No artifacts and fewer than seven measurements.
    // - A data-access error is reported and logged once.
    // - The session is still torn down.
    #[traced_test]
    #[test]
    fn tc04() {
        let data = Dataset::new(RETAIL_CSV);
        let config = data
            .config(false)
            .with_data_path(data.output.path().join("missing.csv"));
        let (report, renderer) = run_pipeline(&config);

        let error = report.error.as_ref().unwrap();
        assert_eq!(error.kind(), ErrorKind::DataAccess);
        assert_eq!(error.stage(), "Read Data");
        assert!(report.artifacts.is_empty());
        assert!(report.measurements.len() < 7);
        assert!(renderer.calls().is_empty());

        assert!(logs_contain("An error occurred:"));
        assert!(logs_contain("--- Performance Measurements ---"));
        assert!(logs_contain("RetailAnalysis finished."));
    }

    // Scenario: the dataset has no Price column.
    // Expected Outcome: the cleaning stage fails with an aggregation error after
    // the load stage was measured.
    #[traced_test]
    #[test]
    fn tc05() {
        let data = Dataset::new(MISSING_PRICE_CSV);
        let (report, _) = run_pipeline(&data.config(true));

        let error = report.error.as_ref().unwrap();
        assert_eq!(error.kind(), ErrorKind::Aggregation);
        assert_eq!(error.stage(), "Data Filtering");
        assert_eq!(stage_names(&report), vec!["Read Data"]);
        assert!(logs_contain("RetailAnalysis finished."));
    }

    // Scenario: no transaction comes from the United Kingdom.
    // Expected Outcome: the UK chart fails as a rendering error; the two charts
    // drawn before it are still reported.
    #[traced_test]
    #[test]
    fn tc06() {
        let data = Dataset::new(NO_UK_CSV);
        let (report, _) = run_pipeline(&data.config(false));

        let error = report.error.as_ref().unwrap();
        assert_eq!(error.kind(), ErrorKind::Rendering);
        assert_eq!(report.artifacts.len(), 2);
        assert_eq!(report.measurements.len(), 6);
        assert!(logs_contain("An error occurred: Rendering failed in 'Plot Generation'"));
    }

    // Test Settings: custom application name, memory unavailable.
    // Expected Outcome: the usual seven measurements without memory figures,
    // RAM readings logged as n/a, three aggregation iterations and no more.
    #[traced_test]
    #[test]
    fn tc07() {
        let data = Dataset::new(RETAIL_CSV);
        let mut config = data.config(false);
        config.app_name = "NightlyRetail".to_string();

        let engine = LocalEngine::new();
        let renderer = RecordingRenderer::new(&config.output_dir);
        let report = run(&config, &engine, &renderer, Arc::new(FixedSampler(None)));

        assert!(report.is_success());
        assert_eq!(stage_names(&report), STAGES);
        assert!(report.measurements.iter().all(|m| m.memory_mb.is_none()));
        assert!(logs_contain("Aggregate Country Counts - Iteration 3"));
        assert!(!logs_contain("Aggregate Country Counts - Iteration 4"));
        assert!(logs_contain("RAM usage after 'Read Data': n/a"));
        assert!(logs_contain("NightlyRetail finished."));
    }

    // Scenario: invoice dates mix date-only and date-time cells.
    // Expected Outcome: no row loses its month, so the UK extract has a bar
    // for each month present in the file.
    #[test]
    fn tc08() {
        let csv = "\
Quantity,InvoiceDate,Price,Country
1,2011-03-01,10.00,United Kingdom
2,2011-03-08 09:01:00,10.00,United Kingdom
4,2011-04-05,2.50,United Kingdom
1,2011-05-12 12:00:00,7.25,United Kingdom
";
        let data = Dataset::new(csv);
        let (report, renderer) = run_pipeline(&data.config(false));
        assert!(report.is_success(), "{:?}", report.error);

        let uk = renderer.call(UK_MONTHLY_SPENDING_PNG).unwrap();
        assert_eq!(
            column_as_strings(&uk.extract, "MonthYear"),
            vec!["2011-03", "2011-04", "2011-05"]
        );
        assert_eq!(cell_as_f64(&uk.extract, 0, "AverageMonthlySpending"), Some(15.0));
    }
}
