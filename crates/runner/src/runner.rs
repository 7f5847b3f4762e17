use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use payout_config::{RunnerConfig, WorkerEnv};
use payout_types::ProtectedInput;
use serde::Serialize;
use tracing::{error, info, Instrument};

use crate::{
    confidential_transfer_stage, cross_chain_stage, erc20_params, erc20_stage,
    protected_data_stage, write_artifacts, ArtifactError, ArtifactPaths, Connector, RunId, Stage,
    StageReport, StageStatus, StatusDocument, RUN_FAILED_MESSAGE,
};

/// Outcome of one stage, as logged at the end of a run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct StageSummary {
    pub stage: Stage,
    pub status: StageStatus,
}

/// What a finished run produced
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub run_id: RunId,
    pub stages: Vec<StageSummary>,
    pub document: StatusDocument,
    pub paths: ArtifactPaths,
    /// Whether the stage sequence was cut short
    pub aborted: bool,
}

impl RunSummary {
    pub fn status_of(&self, stage: Stage) -> Option<StageStatus> {
        self.stages
            .iter()
            .find(|s| s.stage == stage)
            .map(|s| s.status)
    }
}

/// Runs every stage once, in order, then writes both artifacts
pub struct Runner {
    config: RunnerConfig,
    worker_env: WorkerEnv,
    connector: Arc<dyn Connector>,
    run_id: RunId,
}

impl Runner {
    pub fn new(config: RunnerConfig, worker_env: WorkerEnv, connector: Arc<dyn Connector>) -> Self {
        Self {
            config,
            worker_env,
            connector,
            run_id: RunId::new(),
        }
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Execute the run
    ///
    /// Stage failures are recorded in the document; only a failure to write
    /// the artifacts is returned as an error.
    pub async fn run(&self) -> Result<RunSummary, ArtifactError> {
        self.execute().instrument(self.run_id.span()).await
    }

    async fn execute(&self) -> Result<RunSummary, ArtifactError> {
        if self.worker_env.app_secret.is_set() {
            info!(secret = %self.worker_env.app_secret.redacted(), "app secret provided");
        } else {
            info!("app secret is not set");
        }

        let mut reports = Vec::with_capacity(Stage::ALL.len());
        let outcome = AssertUnwindSafe(self.run_stages(&mut reports))
            .catch_unwind()
            .await;

        let error_message = match outcome {
            Ok(()) => None,
            Err(panic) => {
                error!(detail = %panic_detail(panic.as_ref()), completed = reports.len(), "stage sequence aborted");
                Some(RUN_FAILED_MESSAGE)
            }
        };

        let paths = ArtifactPaths::new(&self.config.output);
        let document = StatusDocument::fold(&reports, &paths.result, error_message);
        write_artifacts(&document, &paths.result, &paths.computed).await?;

        let stages: Vec<StageSummary> = reports
            .iter()
            .map(|r| StageSummary {
                stage: r.stage,
                status: r.status,
            })
            .collect();
        info!(stages = ?stages, aborted = error_message.is_some(), "run finished");

        Ok(RunSummary {
            run_id: self.run_id,
            stages,
            document,
            paths,
            aborted: error_message.is_some(),
        })
    }

    async fn run_stages(&self, reports: &mut Vec<StageReport>) {
        let connector = self.connector.as_ref();
        let sender_key = self.worker_env.sender_private_key();
        let sender_key = sender_key.as_deref();

        let confidential = &self.config.confidential_transfer;
        if confidential.enabled {
            let result = confidential_transfer_stage(connector, confidential, sender_key).await;
            reports.push(StageReport::confidential_transfer(&result));
        } else {
            info!(stage = %Stage::ConfidentialTransfer, "stage disabled");
            reports.push(StageReport::skipped(Stage::ConfidentialTransfer));
        }

        let cross_chain = &self.config.cross_chain;
        if cross_chain.enabled {
            let result = cross_chain_stage(connector, cross_chain, sender_key).await;
            reports.push(StageReport::cross_chain(&result));
        } else {
            info!(stage = %Stage::CrossChain, "stage disabled");
            reports.push(StageReport::skipped(Stage::CrossChain));
        }

        let protected = protected_data_stage(connector).await;
        reports.push(StageReport::protected_data(&protected));
        let protected = protected.unwrap_or_else(|_| ProtectedInput::unavailable());

        let params = erc20_params(&self.config.erc20, &protected, sender_key);
        let result = erc20_stage(connector, &params).await;
        reports.push(StageReport::erc20(&result));
    }
}

fn panic_detail(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
