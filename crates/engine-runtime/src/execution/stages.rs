pub const READ_DATA: &str = "Read Data";
pub const DATA_FILTERING: &str = "Data Filtering";
pub const CALCULATE_AVG_SPENDING: &str = "Calculate Avg Spending";
pub const PLOT_GENERATION: &str = "Plot Generation";

/// Number of times the country counts are recomputed in stage 3.
pub const COUNTRY_COUNT_REPETITIONS: usize = 3;

/// Name of the `iteration`-th (1-based) country-count aggregation stage.
pub fn country_counts_iteration(iteration: usize) -> String {
    format!("Aggregate Country Counts - Iteration {iteration}")
}
