//! The concurrent diff engine.
//!
//! The engine lists the requested object categories from both databases,
//! indexes the target listing by identity key, and fans the source objects
//! out over a fixed pool of worker tasks. Each worker compares one object at
//! a time: fetch definitions, normalize, and synthesize a remediation script
//! when the definitions differ. Outcomes flow over a channel to a single
//! collector task; nothing is shared between workers except the atomic work
//! cursor.
//!
//! Failure policy: listing failures abort the run; a failed or timed-out
//! fetch skips that one object and never disturbs its siblings.

mod collector;

pub use collector::DiffReport;

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{error, info, warn};
use thiserror::Error;
use tokio::sync::mpsc::{self, Sender};

use crate::model::{DiffOutcome, ObjectCategory, ObjectIdentity, SchemaObject, Side};
use crate::normalize::normalize;
use crate::remediation::{drop_statement_for, terminate_batch, DropStatement};
use crate::repository::{FetchError, ObjectRepository};
use crate::script::DebugSink;

use collector::{collect, TaskOutcome};

/// Default bound on simultaneously in-flight comparisons.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Default deadline for a single repository fetch.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

const OUTCOME_CHANNEL_CAPACITY: usize = 64;

/// Fatal comparison errors. Everything inside the per-object fan-out is
/// recovered locally and reported through the [`DiffReport`] counters.
#[derive(Debug, Error)]
pub enum DiffError {
    #[error("failed to list schema objects from the {side} database: {source}")]
    List {
        side: Side,
        #[source]
        source: crate::repository::RepositoryError,
    },

    #[error("internal error: the result collector task failed")]
    Collector,
}

/// Inputs the caller supplies for one comparison run.
#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// Requested object categories, ordered and deduplicated.
    pub categories: Vec<ObjectCategory>,
    /// Maximum number of in-flight comparisons.
    pub concurrency: usize,
    /// Deadline for each repository fetch inside the fan-out.
    pub fetch_timeout: Duration,
    /// Persist normalized snapshots of differing definitions.
    pub debug_logging: bool,
    /// Run identifier embedded in artifact and debug-directory names.
    pub run_id: String,
}

impl CompareOptions {
    pub fn new(categories: Vec<ObjectCategory>, run_id: impl Into<String>) -> Self {
        Self {
            categories,
            concurrency: DEFAULT_CONCURRENCY,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            debug_logging: false,
            run_id: run_id.into(),
        }
    }
}

/// Compares the schema objects of a source and a target database.
pub struct DiffEngine {
    source: Arc<dyn ObjectRepository>,
    target: Arc<dyn ObjectRepository>,
    options: CompareOptions,
}

impl DiffEngine {
    pub fn new(
        source: Arc<dyn ObjectRepository>,
        target: Arc<dyn ObjectRepository>,
        options: CompareOptions,
    ) -> Self {
        Self {
            source,
            target,
            options,
        }
    }

    /// Run the comparison and return the aggregated, sorted report.
    pub async fn compare(&self) -> Result<DiffReport, DiffError> {
        if self.options.categories.is_empty() {
            return Ok(DiffReport::default());
        }

        let source_objects = self
            .source
            .list_objects(&self.options.categories)
            .await
            .map_err(|source| DiffError::List {
                side: Side::Source,
                source,
            })?;
        info!(
            "found {} objects to compare in the source database",
            source_objects.len()
        );

        let target_objects = self
            .target
            .list_objects(&self.options.categories)
            .await
            .map_err(|source| DiffError::List {
                side: Side::Target,
                source,
            })?;

        // Identity keys must be unique within a listing; if a listing
        // violates that, the last entry wins.
        let target_map: HashMap<ObjectIdentity, SchemaObject> = target_objects
            .into_iter()
            .map(|object| (object.identity(), object))
            .collect();

        let debug_sink = self.create_debug_sink();

        let total = source_objects.len();
        let context = WorkerContext {
            source: Arc::clone(&self.source),
            target: Arc::clone(&self.target),
            objects: Arc::new(source_objects),
            target_map: Arc::new(target_map),
            cursor: Arc::new(AtomicUsize::new(0)),
            fetch_timeout: self.options.fetch_timeout,
            debug_sink,
        };

        let (tx, rx) = mpsc::channel(OUTCOME_CHANNEL_CAPACITY);
        let collector = tokio::spawn(collect(rx, total));

        let worker_count = self.options.concurrency.clamp(1, total.max(1));
        let mut workers = Vec::with_capacity(worker_count);
        for _ in 0..worker_count {
            workers.push(tokio::spawn(run_worker(context.clone(), tx.clone())));
        }
        drop(tx);
        drop(context);

        // Join barrier: the report is read only after every worker is done.
        for joined in futures::future::join_all(workers).await {
            if joined.is_err() {
                error!("a comparison worker task failed");
            }
        }

        collector.await.map_err(|_| DiffError::Collector)
    }

    fn create_debug_sink(&self) -> Option<Arc<DebugSink>> {
        if !self.options.debug_logging {
            return None;
        }
        match DebugSink::create(
            self.source.database_name(),
            self.target.database_name(),
            &self.options.run_id,
        ) {
            Ok(sink) => Some(Arc::new(sink)),
            Err(e) => {
                warn!("failed to create debug log directory, snapshots disabled: {e}");
                None
            }
        }
    }
}

struct WorkerContext {
    source: Arc<dyn ObjectRepository>,
    target: Arc<dyn ObjectRepository>,
    objects: Arc<Vec<SchemaObject>>,
    target_map: Arc<HashMap<ObjectIdentity, SchemaObject>>,
    cursor: Arc<AtomicUsize>,
    fetch_timeout: Duration,
    debug_sink: Option<Arc<DebugSink>>,
}

impl Clone for WorkerContext {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            target: Arc::clone(&self.target),
            objects: Arc::clone(&self.objects),
            target_map: Arc::clone(&self.target_map),
            cursor: Arc::clone(&self.cursor),
            fetch_timeout: self.fetch_timeout,
            debug_sink: self.debug_sink.clone(),
        }
    }
}

/// One worker: pull the next source object off the shared cursor, compare
/// it, report the outcome, repeat until the listing is exhausted.
async fn run_worker(context: WorkerContext, outcomes: Sender<TaskOutcome>) {
    loop {
        let index = context.cursor.fetch_add(1, Ordering::Relaxed);
        let Some(object) = context.objects.get(index) else {
            break;
        };

        let outcome = compare_object(&context, object).await;
        if outcomes.send(outcome).await.is_err() {
            break;
        }
    }
}

async fn compare_object(context: &WorkerContext, object: &SchemaObject) -> TaskOutcome {
    let Some(target_object) = context.target_map.get(&object.identity()) else {
        return missing_in_target(context, object).await;
    };

    let source_definition = match fetch_definition(context, Side::Source, object).await {
        Ok(definition) => definition,
        Err(_) => return TaskOutcome::Skipped,
    };
    let target_definition = match fetch_definition(context, Side::Target, target_object).await {
        Ok(definition) => definition,
        Err(_) => return TaskOutcome::Skipped,
    };

    let normalized_source = normalize(&source_definition);
    let normalized_target = normalize(&target_definition);

    if normalized_source == normalized_target {
        return TaskOutcome::Identical;
    }

    warn!("differences found in {object}");

    if let Some(sink) = &context.debug_sink {
        sink.write_snapshot(Side::Source, object, &normalized_source)
            .await;
        sink.write_snapshot(Side::Target, object, &normalized_target)
            .await;
    }

    let statement = match drop_statement_for(object) {
        DropStatement::Inline(statement) => statement,
        DropStatement::FromRepository => {
            let fetched = with_deadline(
                context.fetch_timeout,
                context.source.get_table_drop_statement(object),
            )
            .await;
            match fetched {
                Ok(statement) => statement,
                Err(e) => {
                    error!("failed to generate drop statement for {object}: {e}");
                    return TaskOutcome::Skipped;
                }
            }
        }
    };

    TaskOutcome::Differs(DiffOutcome {
        object: object.clone(),
        exists_in_target: true,
        has_difference: true,
        // The raw source definition goes to the output; normalization is
        // for comparison only.
        remediation_script: format!("{}\n{}", terminate_batch(&statement), source_definition),
    })
}

/// The object exists only in the source: emit its definition verbatim, with
/// no drop statement.
async fn missing_in_target(context: &WorkerContext, object: &SchemaObject) -> TaskOutcome {
    warn!("object {object} does not exist in the target database");

    match fetch_definition(context, Side::Source, object).await {
        Ok(definition) => TaskOutcome::Differs(DiffOutcome {
            object: object.clone(),
            exists_in_target: false,
            has_difference: true,
            remediation_script: definition,
        }),
        Err(_) => TaskOutcome::Skipped,
    }
}

async fn fetch_definition(
    context: &WorkerContext,
    side: Side,
    object: &SchemaObject,
) -> Result<String, FetchError> {
    let repository = match side {
        Side::Source => &context.source,
        Side::Target => &context.target,
    };

    let result = with_deadline(context.fetch_timeout, repository.get_definition(object)).await;
    if let Err(e) = &result {
        error!("failed to fetch {side} definition for {object}: {e}");
    }
    result
}

async fn with_deadline<T>(
    deadline: Duration,
    fetch: impl Future<Output = Result<T, FetchError>>,
) -> Result<T, FetchError> {
    match tokio::time::timeout(deadline, fetch).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout(deadline)),
    }
}
