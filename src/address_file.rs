use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::Context;

use crate::balance::{Address, BalanceResults};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SaveSummary {
    pub saved: usize,
    pub total: usize,
}

/// Reads one address per line, trimmed, skipping blank lines.
///
/// A missing file is reported and treated as an empty list.
pub fn load_addresses(path: &Path) -> anyhow::Result<Vec<Address>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::warn!("File {} not found.", path.display());
            return Ok(vec![]);
        }
        Err(err) => {
            return Err(err).with_context(|| {
                format!("Cannot read address file {path}", path = path.display())
            })
        }
    };

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Writes `<address> => <amount> XRP` for every positive amount.
///
/// Failures are reported and `None` is returned; the file may be left partially written.
pub fn save_results(results: &BalanceResults, path: &Path) -> Option<SaveSummary> {
    match write_results(results, path) {
        Ok(summary) => {
            tracing::info!("Results saved to: {}", path.display());
            tracing::info!(
                "Saved {} addresses with balance out of {} total addresses",
                summary.saved,
                summary.total
            );
            Some(summary)
        }
        Err(err) => {
            tracing::error!("Failed to save results: {:#}", err);
            None
        }
    }
}

fn write_results(results: &BalanceResults, path: &Path) -> anyhow::Result<SaveSummary> {
    let file = File::create(path)
        .with_context(|| format!("Cannot create output file {path}", path = path.display()))?;
    let mut output = BufWriter::new(file);

    let mut saved = 0;
    for (address, result) in results.iter() {
        if let Some(amount) = result.reportable_amount() {
            output.write_all(format!("{} => {} XRP\n", address, amount).as_bytes())?;
            saved += 1;
        }
    }
    output.flush()?;

    Ok(SaveSummary {
        saved,
        total: results.len(),
    })
}
