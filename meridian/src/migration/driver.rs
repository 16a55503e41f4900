//! The migration driver.

use std::sync::Arc;

use once_cell::sync::Lazy;
use tokio::sync::Mutex;

use crate::catalog::entry::BuiltinMedia;
use crate::logger::LogContext;
use crate::store::SettingsStore;

use super::error::{MigrationError, MigrationResult};
use super::step::MigrationStep;
use super::steps::default_steps;
use super::version::{current_version, set_version, LATEST_SCHEMA_VERSION};

/// Process-wide guard so two migration runs never overlap. Cross-process
/// concurrency is the host's problem; the store file itself is not locked.
static MIGRATION_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// The outcome of a migration run.
#[derive(Debug, Clone, uniffi::Record)]
pub struct MigrationSummary {
    /// Schema version the run started from.
    pub from_version: u32,
    /// Schema version the run ended at.
    pub to_version: u32,
    /// Number of steps applied.
    pub steps_applied: u32,
}

/// Drives the persisted settings forward through every schema version, one
/// step at a time, bumping the stored version only after each step
/// succeeds.
#[derive(uniffi::Object)]
pub struct SettingsMigrator {
    store: Arc<dyn SettingsStore>,
    steps: Vec<Box<dyn MigrationStep>>,
}

#[uniffi::export(async_runtime = "tokio")]
impl SettingsMigrator {
    /// Creates a migrator with the full built-in step table.
    #[uniffi::constructor]
    #[must_use]
    pub fn new(store: Arc<dyn SettingsStore>, builtin_media: Vec<BuiltinMedia>) -> Arc<Self> {
        let builtins = Arc::new(builtin_media);
        let steps = default_steps(&store, &builtins);
        Arc::new(Self { store, steps })
    }

    /// Runs every pending migration step, in order.
    ///
    /// Already up to date is a cheap no-op. A step failure leaves the
    /// persisted version at the last completed step, so the next call
    /// resumes from there.
    ///
    /// # Errors
    ///
    /// [`MigrationError::InvalidOperation`] when a run is already in
    /// progress or the step table has a gap; store and encoding failures
    /// propagate.
    pub async fn migrate(&self) -> Result<MigrationSummary, MigrationError> {
        let _guard = MIGRATION_LOCK.try_lock().map_err(|_| {
            MigrationError::InvalidOperation("migration already in progress".to_string())
        })?;
        self.run_steps().await
    }
}

impl SettingsMigrator {
    /// Creates a migrator over an explicit step table.
    #[must_use]
    pub const fn with_steps(
        store: Arc<dyn SettingsStore>,
        steps: Vec<Box<dyn MigrationStep>>,
    ) -> Self {
        Self { store, steps }
    }

    async fn run_steps(&self) -> MigrationResult<MigrationSummary> {
        let _log_ctx = LogContext::new("SettingsMigrator");
        let started_at = chrono::Utc::now();
        let from_version = current_version(self.store.as_ref())?;

        if from_version >= LATEST_SCHEMA_VERSION {
            crate::debug!(
                "settings_migration.noop version={from_version} timestamp={}",
                started_at.timestamp()
            );
            return Ok(MigrationSummary {
                from_version,
                to_version: from_version,
                steps_applied: 0,
            });
        }

        crate::info!(
            "settings_migration.started from_version={from_version} latest_version={LATEST_SCHEMA_VERSION} timestamp={}",
            started_at.timestamp()
        );

        let mut current = from_version;
        let mut steps_applied = 0u32;
        while current < LATEST_SCHEMA_VERSION {
            let step = self
                .steps
                .iter()
                .find(|step| step.from_version() == current)
                .ok_or_else(|| {
                    MigrationError::InvalidOperation(format!(
                        "no migration step registered for version {current}"
                    ))
                })?;

            step.apply().await?;
            set_version(self.store.as_ref(), step.to_version())?;

            crate::info!(
                "settings_migration.step_applied from_version={current} to_version={}",
                step.to_version()
            );
            current = step.to_version();
            steps_applied += 1;
        }

        let duration_ms = (chrono::Utc::now() - started_at).num_milliseconds();
        crate::info!(
            "settings_migration.completed from_version={from_version} to_version={current} steps_applied={steps_applied} duration_ms={duration_ms}"
        );
        Ok(MigrationSummary {
            from_version,
            to_version: current,
            steps_applied,
        })
    }
}
