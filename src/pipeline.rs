use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::PathBuf;

use crossbeam_utils::thread::scope;
use static_assertions::assert_impl_all;
use thiserror::Error;
use tracing::debug;

use crate::numeric_vector::{NumericParseErr, NumericVector};
use crate::report::SumReport;
use crate::sum_config::SumSettings;

// Reports and errors cross from the worker threads back to the caller
assert_impl_all!(SumReport: Send);
assert_impl_all!(SumError: Send);
assert_impl_all!(SumSettings: Send, Sync);
assert_impl_all!(NumericVector: Send, Sync);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf)
}
impl InputSource {
    pub fn from_arg(arg: &str) -> Self {
        match arg {
            "-" => Self::Stdin,
            path => Self::File(PathBuf::from(path))
        }
    }
    pub fn name(&self) -> String {
        match self {
            Self::Stdin => "-".to_owned(),
            Self::File(path) => path.display().to_string()
        }
    }
}

#[derive(Error, Debug)]
pub enum SumError {
    #[error("Error reading {source_name}: {err}")]
    Io {
        source_name: String,
        #[source]
        err: io::Error
    },
    #[error("Error parsing {source_name}: {err}")]
    Parse {
        source_name: String,
        #[source]
        err: NumericParseErr
    },
    #[error("Standard input given more than once")]
    StdinReused,
    #[error("Summation worker panicked")]
    WorkerPanicked,
}

/// Reads the whole of `reader` as one numeric vector and sums it.
pub fn sum_reader(source_name: &str, mut reader: impl Read, settings: &SumSettings) -> Result<SumReport, SumError> {
    let mut contents = String::new();
    reader.read_to_string(&mut contents).map_err(|err| SumError::Io {
        source_name: source_name.to_owned(),
        err
    })?;
    let vector = NumericVector::parse_with(&contents, &settings.input).map_err(|err| SumError::Parse {
        source_name: source_name.to_owned(),
        err
    })?;
    let report = SumReport::new(source_name, &vector, settings.output.running);
    debug!(source = source_name, length = report.length, total = report.total, "summed input");
    Ok(report)
}

pub fn sum_source(source: &InputSource, settings: &SumSettings) -> Result<SumReport, SumError> {
    let source_name = source.name();
    match source {
        InputSource::Stdin => sum_reader(&source_name, io::stdin().lock(), settings),
        InputSource::File(path) => {
            let file = File::open(path).map_err(|err| SumError::Io {
                source_name: source_name.clone(),
                err
            })?;
            sum_reader(&source_name, BufReader::new(file), settings)
        }
    }
}

/// Sums every source on its own scoped thread. Results come back in the
/// order of `sources`; each one is still a single sequential sum.
pub fn sum_sources(sources: &[InputSource], settings: &SumSettings) -> Result<Vec<Result<SumReport, SumError>>, SumError> {
    if sources.iter().filter(|source| **source == InputSource::Stdin).count() > 1 {
        return Err(SumError::StdinReused);
    }

    // Sized so that no worker ever blocks on send
    let (tx_result, rx_result) = crossbeam_channel::bounded(sources.len().max(1));
    scope(|s| {
        for (index, source) in sources.iter().enumerate() {
            let tx_result = tx_result.clone();
            s.spawn(move |_| {
                let result = sum_source(source, settings);
                // The receiver is alive until after the scope ends
                let _ = tx_result.send((index, result));
            });
        }
    }).map_err(|_| SumError::WorkerPanicked)?;
    drop(tx_result);

    let mut results: Vec<Option<Result<SumReport, SumError>>> = sources.iter().map(|_| None).collect();
    for (index, result) in rx_result {
        results[index] = Some(result);
    }
    Ok(results.into_iter().flatten().collect())
}
