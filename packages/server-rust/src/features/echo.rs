//! Echo: acceptance-test use case.
//!
//! Echoes a message after an optional blocking delay, making the serial
//! execution of batch items observable from the outside. Carries no
//! `requestId` and therefore no validation handler. Registered only in
//! acceptance-test mode.

use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use switchyard_core::behavior::KIND_ECHO;
use switchyard_core::{BehaviorKey, Outcome};

use super::{Feature, Supported};
use crate::dispatch::{UseCase, UseCaseAdapter};

const ENDPOINT: &str = "/api/v2/echo";

/// Echo request: the message to return and how long to block first.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EchoRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub delay_ms: u64,
}

/// Echo response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EchoResponse {
    pub message: String,
}

/// Echo business logic.
pub struct EchoUseCase;

impl UseCase for EchoUseCase {
    type Request = EchoRequest;
    type Response = EchoResponse;

    fn execute(&self, request: Self::Request) -> (Self::Response, Outcome) {
        if request.delay_ms > 0 {
            thread::sleep(Duration::from_millis(request.delay_ms));
        }
        (
            EchoResponse {
                message: request.message,
            },
            Outcome::Success,
        )
    }
}

/// Feature wiring for the echo behavior.
pub struct EchoFeature;

impl Feature for EchoFeature {
    fn endpoint(&self) -> &'static str {
        ENDPOINT
    }

    fn behavior(&self) -> BehaviorKey {
        BehaviorKey::v2_command(KIND_ECHO)
    }

    fn supported(&self) -> Vec<Supported> {
        vec![Supported {
            behavior: self.behavior(),
            routable: UseCaseAdapter::shared(EchoUseCase),
            handlers: Vec::new(),
        }]
    }
}
