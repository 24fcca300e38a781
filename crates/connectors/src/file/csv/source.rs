use crate::file::csv::{error::FileError, settings::CsvSettings};
use polars::prelude::*;
use std::fs::File;
use tracing::debug;

/// A delimited file on disk. Every `scan` builds a fresh lazy reader, so a
/// plan that is collected twice reads the file twice.
#[derive(Debug, Clone)]
pub struct CsvSource {
    pub path: String,
    pub settings: CsvSettings,
}

impl CsvSource {
    pub fn new(path: &str, settings: CsvSettings) -> Result<Self, FileError> {
        File::open(path).map_err(|err| FileError::from_open(path, err))?;
        if settings.delimiter.len_utf8() != 1 {
            return Err(FileError::InvalidFormat(format!(
                "delimiter `{}` is not a single byte",
                settings.delimiter
            )));
        }

        Ok(CsvSource {
            path: path.to_string(),
            settings,
        })
    }

    fn reader(&self) -> LazyCsvReader {
        LazyCsvReader::new(&self.path)
            .with_has_header(self.settings.has_headers)
            .with_separator(self.settings.delimiter as u8)
    }

    /// Infers column types over every row of the file.
    pub fn infer_schema(&self) -> Result<SchemaRef, FileError> {
        let mut lf = self.reader().with_infer_schema_length(None).finish()?;
        let schema = lf.collect_schema()?;
        debug!("Inferred {} columns from {}", schema.len(), self.path);
        Ok(schema)
    }

    /// Lazy read of the file with a previously inferred schema.
    pub fn scan(&self, schema: SchemaRef) -> Result<LazyFrame, FileError> {
        Ok(self.reader().with_schema(Some(schema)).finish()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file() {
        let err = CsvSource::new("/definitely/not/here.csv", CsvSettings::default()).unwrap_err();
        assert!(matches!(err, FileError::NotFound(_)));
    }

    #[test]
    fn test_infer_widens_over_all_rows() {
        let file = write("Quantity,Price,Note\n1,2,a\n2,2.5,b\n3,4,\n");
        let source = CsvSource::new(file.path().to_str().unwrap(), CsvSettings::default()).unwrap();
        let schema = source.infer_schema().unwrap();

        assert_eq!(schema.get("Quantity"), Some(&DataType::Int64));
        assert_eq!(schema.get("Price"), Some(&DataType::Float64));
        assert_eq!(schema.get("Note"), Some(&DataType::String));
    }

    #[test]
    fn test_semicolon_delimiter() {
        let file = write("a;b\n1;x\n");
        let source =
            CsvSource::new(file.path().to_str().unwrap(), CsvSettings::new(';', true)).unwrap();
        let schema = source.infer_schema().unwrap();
        let frame = source.scan(schema).unwrap().collect().unwrap();

        assert_eq!(frame.shape(), (1, 2));
    }
}
