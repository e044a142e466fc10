//! Stepwise data migrations driven by a persisted version option.
//!
//! A [`MigrationPlan`] moves an entity type from the version stored in the
//! options table to its compiled target, one [`MigrationStep`] at a time. The
//! target is written back once the loop exits.
//!
//! Failure handling depends on the step kind:
//! - [`StepKind::TableReset`] failures (typically dropping a table that was
//!   never created) are logged and the step counts as applied.
//! - Any other failure stops the loop and leaves the stored version untouched,
//!   so the same step runs again on the next start.

use crate::options::{OptionKey, OptionsStore};
use anyhow::{Context, Result};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Drops and recreates a table whose shape changed incompatibly.
    TableReset,
    /// Bulk field initialization without loading rows.
    BulkUpdate,
    /// Loads every row, derives a value per row and commits it back.
    RowRecompute,
}

pub struct MigrationStep<C: 'static> {
    /// The step upgrades data from this version to the next one.
    pub from_version: i64,
    pub kind: StepKind,
    pub description: &'static str,
    pub apply: fn(&C) -> Result<()>,
}

pub struct MigrationPlan<C: 'static> {
    pub name: &'static str,
    pub version_key: OptionKey,
    pub target_version: i64,
    pub steps: &'static [MigrationStep<C>],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationOutcome {
    pub from_version: i64,
    pub to_version: i64,
    /// Versions whose step ran to completion.
    pub applied: Vec<i64>,
    /// Versions whose table reset failed and was counted as applied.
    pub skipped: Vec<i64>,
}

impl<C: 'static> MigrationPlan<C> {
    fn step_for(&self, version: i64) -> Option<&MigrationStep<C>> {
        if version >= self.target_version {
            return None;
        }
        self.steps.iter().find(|s| s.from_version == version)
    }

    /// Runs all pending steps for the version found in `options`.
    pub fn run(&self, ctx: &C, options: &OptionsStore) -> Result<MigrationOutcome> {
        let from_version = options
            .get(self.version_key)
            .with_context(|| format!("Failed to read {} schema version", self.name))?;

        let mut outcome = MigrationOutcome {
            from_version,
            to_version: self.target_version,
            applied: Vec::new(),
            skipped: Vec::new(),
        };

        let mut version = from_version;
        while version != self.target_version {
            let Some(step) = self.step_for(version) else {
                // Unknown or out-of-range version: nothing to upgrade from,
                // the target is stored as-is.
                break;
            };

            info!(
                "Migrating {} from version {} to {}: {}",
                self.name,
                version,
                version + 1,
                step.description
            );
            match (step.apply)(ctx) {
                Ok(()) => outcome.applied.push(version),
                Err(e) if step.kind == StepKind::TableReset => {
                    warn!(
                        "{} table reset at version {} failed, treating it as applied: {:#}",
                        self.name, version, e
                    );
                    outcome.skipped.push(version);
                }
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!(
                            "{} migration from version {} to {} failed",
                            self.name,
                            version,
                            version + 1
                        )
                    });
                }
            }
            version += 1;
        }

        options
            .set(self.version_key, self.target_version)
            .with_context(|| format!("Failed to store {} schema version", self.name))?;
        if from_version != self.target_version {
            info!(
                "{} schema is now at version {}",
                self.name, self.target_version
            );
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite_persistence::SqliteExecutor;
    use anyhow::bail;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<&'static str>>,
        fail_rows: Mutex<bool>,
    }

    fn reset_fails(ctx: &Recorder) -> Result<()> {
        ctx.calls.lock().unwrap().push("reset");
        bail!("no such table: things")
    }

    fn bulk(ctx: &Recorder) -> Result<()> {
        ctx.calls.lock().unwrap().push("bulk");
        Ok(())
    }

    fn rows(ctx: &Recorder) -> Result<()> {
        ctx.calls.lock().unwrap().push("rows");
        if *ctx.fail_rows.lock().unwrap() {
            bail!("cannot derive value");
        }
        Ok(())
    }

    const PLAN: MigrationPlan<Recorder> = MigrationPlan {
        name: "things",
        version_key: OptionKey::DbSeasonVersion,
        target_version: 4,
        steps: &[
            MigrationStep {
                from_version: 1,
                kind: StepKind::TableReset,
                description: "reset",
                apply: reset_fails,
            },
            MigrationStep {
                from_version: 2,
                kind: StepKind::BulkUpdate,
                description: "bulk",
                apply: bulk,
            },
            MigrationStep {
                from_version: 3,
                kind: StepKind::RowRecompute,
                description: "rows",
                apply: rows,
            },
        ],
    };

    fn options() -> OptionsStore {
        let executor = Arc::new(SqliteExecutor::open_in_memory().unwrap());
        OptionsStore::open(executor, false).unwrap()
    }

    #[test]
    fn test_runs_every_step_from_first_version() {
        let options = options();
        options.set(OptionKey::DbSeasonVersion, 1).unwrap();
        let ctx = Recorder::default();

        let outcome = PLAN.run(&ctx, &options).unwrap();
        assert_eq!(*ctx.calls.lock().unwrap(), vec!["reset", "bulk", "rows"]);
        assert_eq!(outcome.applied, vec![2, 3]);
        assert_eq!(outcome.skipped, vec![1]);
        assert_eq!(options.get(OptionKey::DbSeasonVersion).unwrap(), 4);
    }

    #[test]
    fn test_row_failure_keeps_stored_version() {
        let options = options();
        options.set(OptionKey::DbSeasonVersion, 2).unwrap();
        let ctx = Recorder::default();
        *ctx.fail_rows.lock().unwrap() = true;

        let err = PLAN.run(&ctx, &options).unwrap_err();
        assert!(format!("{:#}", err).contains("cannot derive value"));
        assert_eq!(options.get(OptionKey::DbSeasonVersion).unwrap(), 2);

        // the next start retries from the same version
        *ctx.fail_rows.lock().unwrap() = false;
        ctx.calls.lock().unwrap().clear();
        PLAN.run(&ctx, &options).unwrap();
        assert_eq!(*ctx.calls.lock().unwrap(), vec!["bulk", "rows"]);
        assert_eq!(options.get(OptionKey::DbSeasonVersion).unwrap(), 4);
    }

    #[test]
    fn test_unknown_versions_jump_to_target() {
        let ctx = Recorder::default();

        for start in [0, 7] {
            let options = options();
            options.set(OptionKey::DbSeasonVersion, start).unwrap();
            let outcome = PLAN.run(&ctx, &options).unwrap();
            assert!(outcome.applied.is_empty());
            assert_eq!(options.get(OptionKey::DbSeasonVersion).unwrap(), 4);
        }
        assert!(ctx.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_at_target_is_a_no_op() {
        let options = options();
        options.set(OptionKey::DbSeasonVersion, 4).unwrap();
        let ctx = Recorder::default();
        let outcome = PLAN.run(&ctx, &options).unwrap();
        assert_eq!(outcome.from_version, 4);
        assert!(outcome.applied.is_empty());
        assert!(ctx.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_every_start_version_reaches_target() {
        for start in 0..=5 {
            let options = options();
            options.set(OptionKey::DbSeasonVersion, start).unwrap();
            PLAN.run(&Recorder::default(), &options).unwrap();
            assert_eq!(options.get(OptionKey::DbSeasonVersion).unwrap(), 4);
        }
    }
}
