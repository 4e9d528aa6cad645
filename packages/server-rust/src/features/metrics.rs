//! Metrics: runtime telemetry over the command API.
//!
//! Reports uptime and the dispatcher's command counters. Counters cover
//! executed envelopes and batch items; top-level transport failures never
//! reach the dispatch path and are not counted.

use std::sync::Arc;

use serde::Serialize;
use switchyard_core::behavior::KIND_METRICS;
use switchyard_core::{BaseRequest, BaseResponse, BehaviorKey, Outcome};

use super::{Feature, Supported};
use crate::dispatch::{DispatchStats, RequireRequestId, UseCase, UseCaseAdapter};

const ENDPOINT: &str = "/api/v2/metrics";

/// Response carrying runtime telemetry alongside the base envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResponse {
    #[serde(flatten)]
    pub base: BaseResponse,
    pub uptime_seconds: u64,
    pub commands_dispatched: u64,
    pub commands_failed: u64,
}

/// Metrics business logic over shared dispatch counters.
pub struct MetricsUseCase {
    stats: Arc<DispatchStats>,
}

impl MetricsUseCase {
    #[must_use]
    pub fn new(stats: Arc<DispatchStats>) -> Self {
        Self { stats }
    }
}

impl UseCase for MetricsUseCase {
    type Request = BaseRequest;
    type Response = MetricsResponse;

    fn execute(&self, request: Self::Request) -> (Self::Response, Outcome) {
        let snapshot = self.stats.snapshot();
        (
            MetricsResponse {
                base: BaseResponse::success(&request.request_id),
                uptime_seconds: snapshot.uptime_seconds,
                commands_dispatched: snapshot.dispatched,
                commands_failed: snapshot.failed,
            },
            Outcome::Success,
        )
    }
}

/// Feature wiring for the metrics behavior.
pub struct MetricsFeature {
    stats: Arc<DispatchStats>,
}

impl MetricsFeature {
    #[must_use]
    pub fn new(stats: Arc<DispatchStats>) -> Self {
        Self { stats }
    }
}

impl Feature for MetricsFeature {
    fn endpoint(&self) -> &'static str {
        ENDPOINT
    }

    fn behavior(&self) -> BehaviorKey {
        BehaviorKey::v2_command(KIND_METRICS)
    }

    fn supported(&self) -> Vec<Supported> {
        vec![Supported {
            behavior: self.behavior(),
            routable: UseCaseAdapter::shared(MetricsUseCase::new(Arc::clone(&self.stats))),
            handlers: vec![Arc::new(RequireRequestId)],
        }]
    }
}
