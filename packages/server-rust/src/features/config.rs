//! Config: sanitized service configuration retrieval.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use switchyard_core::behavior::KIND_CONFIG;
use switchyard_core::{BaseRequest, BaseResponse, BehaviorKey, Outcome};

use super::{Feature, Supported};
use crate::dispatch::{RequireRequestId, UseCase, UseCaseAdapter};

const ENDPOINT: &str = "/api/v2/config";

/// Startup-time configuration snapshot exposed through the config use case.
///
/// Contains only values safe to disclose to callers; secrets (TLS key paths
/// and the like) stay out of this snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSettings {
    pub service_name: String,
    pub version: String,
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub debug_mode: bool,
    pub acceptance_test_mode: bool,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            service_name: "switchyard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            host: "0.0.0.0".to_string(),
            port: 0,
            request_timeout_secs: 30,
            debug_mode: false,
            acceptance_test_mode: false,
        }
    }
}

/// Response carrying the settings snapshot alongside the base envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    #[serde(flatten)]
    pub base: BaseResponse,
    pub config: ServiceSettings,
}

/// Config business logic over the startup snapshot.
pub struct ConfigUseCase {
    settings: ServiceSettings,
}

impl ConfigUseCase {
    #[must_use]
    pub fn new(settings: ServiceSettings) -> Self {
        Self { settings }
    }
}

impl UseCase for ConfigUseCase {
    type Request = BaseRequest;
    type Response = ConfigResponse;

    fn execute(&self, request: Self::Request) -> (Self::Response, Outcome) {
        (
            ConfigResponse {
                base: BaseResponse::success(&request.request_id),
                config: self.settings.clone(),
            },
            Outcome::Success,
        )
    }
}

/// Feature wiring for the config behavior.
pub struct ConfigFeature {
    settings: ServiceSettings,
}

impl ConfigFeature {
    #[must_use]
    pub fn new(settings: ServiceSettings) -> Self {
        Self { settings }
    }
}

impl Feature for ConfigFeature {
    fn endpoint(&self) -> &'static str {
        ENDPOINT
    }

    fn behavior(&self) -> BehaviorKey {
        BehaviorKey::v2_command(KIND_CONFIG)
    }

    fn supported(&self) -> Vec<Supported> {
        vec![Supported {
            behavior: self.behavior(),
            routable: UseCaseAdapter::shared(ConfigUseCase::new(self.settings.clone())),
            handlers: vec![Arc::new(RequireRequestId)],
        }]
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn execute_returns_the_startup_snapshot() {
        let settings = ServiceSettings {
            port: 4711,
            debug_mode: true,
            ..ServiceSettings::default()
        };
        let (response, outcome) = ConfigUseCase::new(settings.clone()).execute(BaseRequest::new("abc"));

        assert_eq!(outcome, Outcome::Success);
        assert_eq!(response.config, settings);
        assert_eq!(response.base.request_id, "abc");
    }

    #[test]
    fn settings_serialize_camel_case() {
        let json = serde_json::to_value(ServiceSettings::default()).unwrap();
        assert_eq!(json["serviceName"], json!("switchyard"));
        assert!(json.get("requestTimeoutSecs").is_some());
        assert!(json.get("acceptanceTestMode").is_some());
    }
}
