use crate::{
    error::AlgaforgeError,
    simulation::result::{Metric, SimulationResult, SPECIES_LABEL},
};
use csv::{Reader, Writer};
use std::{fs, io, path::Path};

/// File name used for a single-run export.
pub const EXPORT_FILE_NAME: &str = "simulation_result.csv";

/// One exported row, read back from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub species: String,
    pub metrics: Vec<(Metric, f64)>,
}

impl ExportRow {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.metrics.iter().find(|(m, _)| *m == metric).map(|(_, v)| *v)
    }
}

/// Writes results as spreadsheet rows whose column headers are the result labels.
pub struct ResultExporter<W: io::Write> {
    writer: Writer<W>,
    target: String,
    header_written: bool,
}

impl ResultExporter<fs::File> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, AlgaforgeError> {
        let target = path.as_ref().display().to_string();
        let writer = Writer::from_path(path.as_ref())
            .map_err(|e| AlgaforgeError::CsvError(target.clone(), e))?;
        Ok(Self {
            writer,
            target,
            header_written: false,
        })
    }
}

impl<W: io::Write> ResultExporter<W> {
    pub fn from_writer(writer: W) -> Self {
        Self {
            writer: Writer::from_writer(writer),
            target: "<writer>".to_string(),
            header_written: false,
        }
    }

    pub fn write_result(&mut self, result: &SimulationResult) -> Result<(), AlgaforgeError> {
        if !self.header_written {
            let header = std::iter::once(SPECIES_LABEL).chain(Metric::ALL.iter().map(|m| m.label()));
            self.writer
                .write_record(header)
                .map_err(|e| AlgaforgeError::CsvError(self.target.clone(), e))?;
            self.header_written = true;
        }

        let mut record = vec![result.species().to_string()];
        record.extend(result.metrics().map(|(_, value)| value.to_string()));
        self.writer
            .write_record(&record)
            .map_err(|e| AlgaforgeError::CsvError(self.target.clone(), e))?;
        self.writer
            .flush()
            .map_err(|e| AlgaforgeError::FileIO(self.target.clone(), e))?;
        Ok(())
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W, AlgaforgeError> {
        let target = self.target;
        self.writer.into_inner().map_err(|e| {
            let cause = e.error();
            AlgaforgeError::FileIO(target, io::Error::new(cause.kind(), cause.to_string()))
        })
    }
}

/// Reads rows written by `ResultExporter`. Unknown columns are ignored.
pub fn read_results<P: AsRef<Path>>(path: P) -> Result<Vec<ExportRow>, AlgaforgeError> {
    let path_name = path.as_ref().display().to_string();
    let mut reader =
        Reader::from_path(path.as_ref()).map_err(|e| AlgaforgeError::CsvError(path_name.clone(), e))?;

    let headers = reader
        .headers()
        .map_err(|e| AlgaforgeError::CsvError(path_name.clone(), e))?
        .clone();
    let species_col = headers
        .iter()
        .position(|h| h == SPECIES_LABEL)
        .ok_or_else(|| {
            AlgaforgeError::ConfigError(format!("'{}' has no '{}' column", path_name, SPECIES_LABEL))
        })?;
    let metric_cols: Vec<(usize, Metric)> = headers
        .iter()
        .enumerate()
        .filter_map(|(i, h)| Metric::from_label(h).map(|m| (i, m)))
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| AlgaforgeError::CsvError(path_name.clone(), e))?;
        let mut metrics = Vec::with_capacity(metric_cols.len());
        for (col, metric) in &metric_cols {
            let raw = record.get(*col).unwrap_or_default();
            let value = raw.trim().parse::<f64>().map_err(|_| {
                AlgaforgeError::validation(metric.key(), format!("'{}' is not a number", raw))
            })?;
            metrics.push((*metric, value));
        }
        rows.push(ExportRow {
            species: record.get(species_col).unwrap_or_default().to_string(),
            metrics,
        });
    }
    Ok(rows)
}
