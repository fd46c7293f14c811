//! Catalog graph build: read, filter, enrich, extract, write.
//!
//! A run is all-or-nothing. Every input is read and every table is built
//! in memory before the first file is written, so a malformed input never
//! leaves a partial export behind.

pub mod extractors;

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, instrument};

use crate::catalog::reader::{read_jsonl, write_jsonl_gz};
use crate::catalog::{filter_catalog, BudgetRecord, FinancialIndex, GrossRecord, Name, Title};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::graph::{write_tables, GraphTable};
use crate::metrics::GraphMetrics;
use extractors::{all_extractors, ExtractContext};

/// Row count of one written table
#[derive(Debug, Clone, Serialize)]
pub struct TableSummary {
    pub kind: &'static str,
    pub name: &'static str,
    pub rows: usize,
    pub path: PathBuf,
}

/// Result of a complete graph build
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub raw_titles: usize,
    pub raw_names: usize,
    pub movies: usize,
    pub people: usize,
    pub financial_titles: usize,
    pub tables: Vec<TableSummary>,
    pub staging_dir: Option<PathBuf>,
    /// Seconds spent per stage, in execution order
    pub stage_seconds: Vec<(&'static str, f64)>,
}

impl PipelineResult {
    pub fn rows(&self, kind: &str, name: &str) -> Option<usize> {
        self.tables
            .iter()
            .find(|t| t.kind == kind && t.name == name)
            .map(|t| t.rows)
    }
}

struct StageTimer {
    stages: Vec<(&'static str, f64)>,
}

impl StageTimer {
    fn new() -> Self {
        Self { stages: Vec::new() }
    }

    fn run<T>(&mut self, stage: &'static str, f: impl FnOnce() -> T) -> T {
        let started = Instant::now();
        let out = f();
        let secs = started.elapsed().as_secs_f64();
        GraphMetrics::record_stage_duration(stage, secs);
        self.stages.push((stage, secs));
        out
    }
}

pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the whole build, overwriting prior output
    #[instrument(skip(self), fields(raw = %self.config.raw_data_path.display(), output = %self.config.output_path.display()))]
    pub fn run(&self) -> Result<PipelineResult> {
        let outcome = self.run_stages();
        GraphMetrics::record_run(outcome.is_ok());
        outcome
    }

    fn run_stages(&self) -> Result<PipelineResult> {
        info!("Starting catalog graph build");
        let mut timer = StageTimer::new();

        let (titles, names, grosses, budgets) = timer.run("read", || self.read_inputs())?;
        let (raw_titles, raw_names) = (titles.len(), names.len());

        let catalog = timer.run("filter", || filter_catalog(titles, names));
        let financials = timer.run("financials", || FinancialIndex::build(&grosses, &budgets));
        info!("Financial facts for {} titles", financials.len());

        let extractors = all_extractors();
        let tables: Vec<GraphTable> = timer.run("extract", || {
            let ctx = ExtractContext {
                catalog: &catalog,
                financials: &financials,
            };
            extractors
                .iter()
                .flat_map(|extractor| {
                    info!(extractor = extractor.name(), "Running extractor");
                    extractor.extract(&ctx)
                })
                .collect()
        });

        let staging_dir = if self.config.write_staging {
            let dir = self.config.output_path.join("staging");
            timer.run("staging", || -> Result<()> {
                write_jsonl_gz(&dir.join("movies.jsonl.gz"), &catalog.movies)?;
                write_jsonl_gz(&dir.join("people.jsonl.gz"), &catalog.people)
            })?;
            info!("Wrote staging snapshot to {}", dir.display());
            Some(dir)
        } else {
            None
        };

        let paths = timer.run("write", || write_tables(&self.config.output_path, &tables))?;

        let summaries = tables
            .iter()
            .zip(paths)
            .map(|(table, path)| TableSummary {
                kind: table.kind.directory(),
                name: table.name,
                rows: table.len(),
                path,
            })
            .collect();

        info!("Catalog graph build finished");
        Ok(PipelineResult {
            raw_titles,
            raw_names,
            movies: catalog.movies.len(),
            people: catalog.people.len(),
            financial_titles: financials.len(),
            tables: summaries,
            staging_dir,
            stage_seconds: timer.stages,
        })
    }

    fn read_inputs(&self) -> Result<(Vec<Title>, Vec<Name>, Vec<GrossRecord>, Vec<BudgetRecord>)> {
        let titles: Vec<Title> = read_logged(&self.config.title_path())?;
        let names: Vec<Name> = read_logged(&self.config.name_path())?;
        let grosses: Vec<GrossRecord> = read_logged(&self.config.grosses_path())?;
        let budgets: Vec<BudgetRecord> = read_logged(&self.config.budgets_path())?;
        Ok((titles, names, grosses, budgets))
    }
}

fn read_logged<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let records = read_jsonl(path)?;
    info!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}
