//! Newline-delimited JSON adapter feeding product records to the importer.
//!
//! Each non-blank line is one product. Malformed lines and per-record import
//! failures are logged and counted; they never stop the run.

use std::path::Path;

use futures::stream::{self, StreamExt};
use mbimport_core::{AppConfig, Product};
use mbimport_importer::{ImportOutcome, ProductImporter};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::Instrument;

/// Counters reported at the end of an import run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ImportTotals {
    pub received: usize,
    pub malformed: usize,
    /// Records that passed validation in a dry run.
    pub planned: usize,
    pub imported: usize,
    pub created: usize,
    pub images: usize,
    pub failed: usize,
}

impl ImportTotals {
    fn record(&mut self, outcome: &RecordOutcome) {
        match outcome {
            RecordOutcome::Blank | RecordOutcome::ReadError(_) => return,
            RecordOutcome::Malformed => self.malformed += 1,
            RecordOutcome::Planned => self.planned += 1,
            RecordOutcome::Imported(outcome) => {
                self.imported += 1;
                if outcome.created {
                    self.created += 1;
                }
                self.images += outcome.images_uploaded;
            }
            RecordOutcome::Failed => self.failed += 1,
        }
        self.received += 1;
    }
}

#[derive(Debug)]
enum RecordOutcome {
    Blank,
    Malformed,
    Planned,
    Imported(ImportOutcome),
    Failed,
    ReadError(std::io::Error),
}

/// Import records from `file`, or stdin when `None`, and print the totals.
///
/// # Errors
///
/// Returns an error if the input cannot be read or if any record failed to
/// import.
pub(crate) async fn run_import(
    importer: &ProductImporter,
    config: &AppConfig,
    file: Option<&Path>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let max_concurrent = config.max_concurrent_products.max(1);
    tracing::info!(
        marketplace = %config.marketplace_name,
        marketplace_id = config.marketplace_id,
        max_concurrent,
        dry_run,
        "starting import"
    );

    let totals = match file {
        Some(path) => {
            let file = tokio::fs::File::open(path).await.map_err(|e| {
                anyhow::anyhow!("failed to open {}: {e}", path.display())
            })?;
            consume(BufReader::new(file), importer, max_concurrent, dry_run).await?
        }
        None => {
            consume(
                BufReader::new(tokio::io::stdin()),
                importer,
                max_concurrent,
                dry_run,
            )
            .await?
        }
    };

    if dry_run {
        println!(
            "dry-run: received {}, malformed {}, valid {}, invalid {}",
            totals.received, totals.malformed, totals.planned, totals.failed
        );
    } else {
        println!(
            "import complete: received {}, malformed {}, imported {}, created {}, images {}, failed {}",
            totals.received,
            totals.malformed,
            totals.imported,
            totals.created,
            totals.images,
            totals.failed
        );
    }

    if totals.failed > 0 {
        anyhow::bail!("{} of {} records failed", totals.failed, totals.received);
    }
    Ok(())
}

/// Drive every line of `reader` through the importer with at most
/// `max_concurrent` records in flight.
///
/// Lines are pulled as the importer makes room, so records on a pipe that
/// stays open are imported before EOF. A read error stops intake; records
/// already in flight still finish before it is returned.
pub(crate) async fn consume<R>(
    reader: R,
    importer: &ProductImporter,
    max_concurrent: usize,
    dry_run: bool,
) -> std::io::Result<ImportTotals>
where
    R: AsyncBufRead + Unpin,
{
    let lines = stream::try_unfold(reader.lines(), |mut lines| async move {
        Ok::<_, std::io::Error>(lines.next_line().await?.map(|line| (line, lines)))
    });

    let (totals, read_error) = lines
        .enumerate()
        .map(|(index, line)| {
            let span = tracing::info_span!("record", line = index + 1);
            process_line(importer, line, dry_run).instrument(span)
        })
        .buffer_unordered(max_concurrent.max(1))
        .fold(
            (ImportTotals::default(), None),
            |(mut totals, mut read_error), outcome| async move {
                match outcome {
                    RecordOutcome::ReadError(e) => read_error = Some(e),
                    outcome => totals.record(&outcome),
                }
                (totals, read_error)
            },
        )
        .await;

    match read_error {
        Some(e) => Err(e),
        None => Ok(totals),
    }
}

async fn process_line(
    importer: &ProductImporter,
    line: std::io::Result<String>,
    dry_run: bool,
) -> RecordOutcome {
    let line = match line {
        Ok(line) => line,
        Err(e) => {
            tracing::error!(error = %e, "failed to read input");
            return RecordOutcome::ReadError(e);
        }
    };

    if line.trim().is_empty() {
        return RecordOutcome::Blank;
    }

    let product: Product = match serde_json::from_str(&line) {
        Ok(product) => product,
        Err(e) => {
            tracing::warn!(error = %e, "skipping malformed record");
            return RecordOutcome::Malformed;
        }
    };

    if dry_run {
        return match importer.plan(product) {
            Ok(plan) => {
                println!(
                    "would import sku {} '{}': category '{}', brand '{}', {} characteristics, {} images",
                    plan.external_id,
                    plan.name,
                    plan.category,
                    plan.brand,
                    plan.characteristics.len(),
                    plan.images.len()
                );
                RecordOutcome::Planned
            }
            Err(e) => {
                tracing::error!(error = %e, "record rejected");
                RecordOutcome::Failed
            }
        };
    }

    match importer.send(product).await {
        Ok(outcome) => RecordOutcome::Imported(outcome),
        Err(e) => {
            tracing::error!(error = %e, "record import failed");
            RecordOutcome::Failed
        }
    }
}

#[cfg(test)]
#[path = "import_test.rs"]
mod tests;
