use connectors::{
    engine::{DatasetEngine, local::LocalEngine, table::Table},
    file::csv::settings::CsvSettings,
};
use polars::prelude::{DataFrame, DataType};
use std::io::Write;
use tempfile::NamedTempFile;

pub const TRANSACTIONS: &str = "\
Invoice,StockCode,Description,Quantity,InvoiceDate,Price,Customer ID,Country
489434,85048,LIGHT CUSHION,12,2011-03-01 07:45:00,6.95,13085,United Kingdom
489434,79323P,PINK CHERRY LIGHTS,12,2011-03-01 07:45:00,6.75,13085,United Kingdom
489435,22350,CAT BOWL,-12,2011-03-01 07:46:00,2.55,13085,United Kingdom
489436,48173C,DOOR MAT,10,2011-03-09 09:06:00,5.95,13078,France
489436,21755,LOVE BUILDING BLOCK,18,2011-04-09 09:06:00,0,13078,France
489437,22143,CHRISTMAS CRAFT,3,2011-04-09 09:08:00,2.10,15362,United Kingdom
";

pub struct Fixture {
    pub engine: LocalEngine,
    pub table: Table,
    _file: NamedTempFile,
}

pub fn load(csv: &str) -> Fixture {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(csv.as_bytes()).unwrap();
    let engine = LocalEngine::new();
    let table = engine
        .read_csv(file.path().to_str().unwrap(), CsvSettings::default())
        .unwrap();
    Fixture {
        engine,
        table,
        _file: file,
    }
}

/// Every value of `column` rendered as text, nulls skipped.
pub fn strings(frame: &DataFrame, column: &str) -> Vec<String> {
    let series = frame.column(column).unwrap().as_materialized_series();
    let values = series.cast(&DataType::String).unwrap();
    values.str().unwrap().into_iter().flatten().map(str::to_string).collect()
}

/// Every value of `column` as a float, nulls skipped.
pub fn numbers(frame: &DataFrame, column: &str) -> Vec<f64> {
    let series = frame.column(column).unwrap().as_materialized_series();
    let values = series.cast(&DataType::Float64).unwrap();
    values.f64().unwrap().into_iter().flatten().collect()
}
