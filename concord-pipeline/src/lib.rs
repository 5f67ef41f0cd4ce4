//! # concord-pipeline
//!
//! The reconciliation pipeline: Source Loader → Validator → Differ →
//! Applier, wrapped by [`Reconciler`] which exposes the forward (`up`)
//! and rollback (`down`) migration contract.
//!
//! A run moves `Loaded → Validated → Planned → Applied`, or ends
//! `Aborted` at the first failure with the store untouched. Both entry
//! points take only an active connection; everything else is captured
//! at construction.
//!
//! ```no_run
//! use concord_core::ReconcileConfig;
//! use concord_pipeline::{DocumentSource, Reconciler};
//! use concord_storage::DatabaseManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = DatabaseManager::open(std::path::Path::new("concord.db"))?;
//! let source = DocumentSource::new("/srv/baselines");
//! let reconciler = Reconciler::new(source, ReconcileConfig::default());
//! let report = manager.with_writer(|conn| Ok(reconciler.up(conn)))??;
//! println!("inserted {}", report.inserted);
//! # Ok(())
//! # }
//! ```

pub mod applier;
pub mod differ;
pub mod loader;
pub mod validator;

pub use loader::{DocumentSource, StaticSource};
pub use validator::Validator;

use rusqlite::Connection;

use concord_core::config::{ReconcileConfig, ReconcileScope};
use concord_core::models::{ApplyReport, RunState};
use concord_core::time::now_ms;
use concord_core::traits::{CatalogSource, MappingSource};
use concord_core::PipelineResult;
use concord_storage::queries::{load_history, mapping_ops};
use concord_storage::SqlCatalog;

/// Drives one source through the full pipeline against one database.
pub struct Reconciler<S> {
    source: S,
    config: ReconcileConfig,
}

/// What a successful forward run recorded, for the history row.
struct RunOutcome {
    report: ApplyReport,
    format_version: u32,
    standards_affected: i64,
    records_in: i64,
}

impl<S: MappingSource> Reconciler<S> {
    pub fn new(source: S, config: ReconcileConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Forward migration: load, validate, plan, apply.
    ///
    /// Idempotent for an unchanged source: re-running yields a plan of
    /// NoOps and leaves every row (ids and stamps included) untouched.
    /// Side effect: the identity sequence ends at least at the maximum
    /// assigned id. Every run is recorded in `load_history`.
    pub fn up(&self, conn: &Connection) -> PipelineResult<ApplyReport> {
        let started = now_ms();
        let run_id = load_history::insert_run_start(conn, started, &self.source.describe())?;

        match self.run_up(conn) {
            Ok(outcome) => {
                // The data is committed; a history bookkeeping failure
                // must not turn the run into an error.
                if let Err(e) = load_history::update_run_complete(
                    conn,
                    run_id,
                    now_ms(),
                    Some(outcome.format_version),
                    outcome.standards_affected,
                    outcome.records_in,
                    &outcome.report,
                    RunState::Applied.as_str(),
                    None,
                ) {
                    tracing::warn!(run_id, error = %e, "failed to record run completion");
                }
                Ok(outcome.report)
            }
            Err(e) => {
                tracing::error!(error = %e, "reconcile run aborted");
                if let Err(he) = load_history::update_run_complete(
                    conn,
                    run_id,
                    now_ms(),
                    None,
                    0,
                    0,
                    &ApplyReport::default(),
                    RunState::Aborted.as_str(),
                    Some(&e.to_string()),
                ) {
                    tracing::warn!(run_id, error = %he, "failed to record run abort");
                }
                Err(e)
            }
        }
    }

    fn run_up(&self, conn: &Connection) -> PipelineResult<RunOutcome> {
        let batch = self.source.load()?;
        let format_version = batch.format_version;
        let records_in = batch.records.len() as i64;
        tracing::debug!(
            state = %RunState::Loaded,
            records = batch.records.len(),
            standards = batch.standards.len(),
            "source loaded"
        );

        let snapshot = SqlCatalog::new(conn).snapshot()?;
        let validated = Validator::new(&self.config, &snapshot).validate(batch)?;
        tracing::debug!(
            state = %RunState::Validated,
            records = validated.records.len(),
            duplicate_warnings = validated.warnings.len(),
            "batch validated"
        );

        let current = match self.config.scope {
            ReconcileScope::AffectedStandards => {
                mapping_ops::rows_for_standards(conn, &validated.standards)?
            }
            ReconcileScope::AllStandards => mapping_ops::all_rows(conn)?,
        };
        let standards_affected = validated.standards.len() as i64;
        let plan = differ::diff(&validated, &current, &self.config);
        tracing::debug!(
            state = %RunState::Planned,
            inserts = plan.inserts(),
            updates = plan.updates(),
            deletes = plan.deletes(),
            unchanged = plan.unchanged(),
            "plan computed"
        );

        let report = applier::apply_plan(conn, &plan, now_ms())?;
        Ok(RunOutcome {
            report,
            format_version,
            standards_affected,
            records_in,
        })
    }

    /// Rollback migration: delete the rows this pipeline owns and reset
    /// the identity sequence to the maximum surviving id. On a table
    /// emptied by the rollback the next id is 1 again; rows written by
    /// unrelated processes keep their ids out of circulation.
    pub fn down(&self, conn: &Connection) -> PipelineResult<()> {
        let managed: Option<Vec<i64>> = match self.config.scope {
            ReconcileScope::AllStandards => None,
            ReconcileScope::AffectedStandards => Some(self.source.load()?.standards),
        };

        let (deleted, seq) = applier::rollback(
            conn,
            managed.as_deref(),
            &self.config.protected_standards,
        )?;
        tracing::info!(deleted, sequence = seq, "rollback applied");
        Ok(())
    }
}
