//! Version: reports the service build version.

use std::sync::Arc;

use serde::Serialize;
use switchyard_core::behavior::KIND_VERSION;
use switchyard_core::{BaseRequest, BaseResponse, BehaviorKey, Outcome};

use super::{Feature, Supported};
use crate::dispatch::{RequireRequestId, UseCase, UseCaseAdapter};

const ENDPOINT: &str = "/api/v2/version";

/// Response carrying the service version alongside the base envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionResponse {
    #[serde(flatten)]
    pub base: BaseResponse,
    pub version: String,
}

/// Version business logic.
pub struct VersionUseCase;

impl UseCase for VersionUseCase {
    type Request = BaseRequest;
    type Response = VersionResponse;

    fn execute(&self, request: Self::Request) -> (Self::Response, Outcome) {
        (
            VersionResponse {
                base: BaseResponse::success(&request.request_id),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            Outcome::Success,
        )
    }
}

/// Feature wiring for the version behavior.
pub struct VersionFeature;

impl Feature for VersionFeature {
    fn endpoint(&self) -> &'static str {
        ENDPOINT
    }

    fn behavior(&self) -> BehaviorKey {
        BehaviorKey::v2_command(KIND_VERSION)
    }

    fn supported(&self) -> Vec<Supported> {
        vec![Supported {
            behavior: self.behavior(),
            routable: UseCaseAdapter::shared(VersionUseCase),
            handlers: vec![Arc::new(RequireRequestId)],
        }]
    }
}
