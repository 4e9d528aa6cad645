//! Ping: liveness echo over the command API.

use std::sync::Arc;

use switchyard_core::behavior::KIND_PING;
use switchyard_core::{BaseRequest, BaseResponse, BehaviorKey, Outcome};

use super::{Feature, Supported};
use crate::dispatch::{RequireRequestId, UseCase, UseCaseAdapter};

const ENDPOINT: &str = "/api/v2/ping";

/// Ping business logic: acknowledge with the caller's request id.
pub struct PingUseCase;

impl UseCase for PingUseCase {
    type Request = BaseRequest;
    type Response = BaseResponse;

    fn execute(&self, request: Self::Request) -> (Self::Response, Outcome) {
        (BaseResponse::success(&request.request_id), Outcome::Success)
    }
}

/// Feature wiring for the ping behavior.
pub struct PingFeature;

impl Feature for PingFeature {
    fn endpoint(&self) -> &'static str {
        ENDPOINT
    }

    fn behavior(&self) -> BehaviorKey {
        BehaviorKey::v2_command(KIND_PING)
    }

    fn supported(&self) -> Vec<Supported> {
        vec![Supported {
            behavior: self.behavior(),
            routable: UseCaseAdapter::shared(PingUseCase),
            handlers: vec![Arc::new(RequireRequestId)],
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execute_echoes_request_id() {
        let (response, outcome) = PingUseCase.execute(BaseRequest::new("abc"));
        assert_eq!(outcome, Outcome::Success);
        assert_eq!(response, BaseResponse::success("abc"));
    }

    #[test]
    fn feature_declares_one_validated_behavior() {
        let supported = PingFeature.supported();
        assert_eq!(supported.len(), 1);
        assert_eq!(supported[0].behavior, BehaviorKey::v2_command(KIND_PING));
        assert_eq!(supported[0].handlers.len(), 1);
    }
}
