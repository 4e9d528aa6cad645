//! Outcome codes carried alongside every command response.
//!
//! Every execution path terminates in an `Outcome` value; success and each
//! distinct failure reason are distinguishable codes, not exceptions. The
//! codes appear on the wire as the numeric `statusCode` field of response
//! envelopes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Result tag for a single command execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum Outcome {
    /// Execute completed normally.
    #[default]
    Success,
    /// Top-level payload was not decodable as an object or an array.
    TransportUnmarshalFailure,
    /// Item content was not decodable into the behavior's request shape.
    UseCaseUnmarshalFailure,
    /// No routable registered for the `(version, kind, action)` triple.
    NotRoutableFailure,
    /// Request failed pre-execution checks (e.g. empty `requestId`).
    ValidationFailure,
}

impl Outcome {
    /// Returns true for the success code.
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// The numeric wire code.
    #[must_use]
    pub fn code(self) -> u16 {
        match self {
            Self::Success => 0,
            Self::TransportUnmarshalFailure => 1,
            Self::UseCaseUnmarshalFailure => 2,
            Self::NotRoutableFailure => 3,
            Self::ValidationFailure => 4,
        }
    }
}

impl From<Outcome> for u16 {
    fn from(outcome: Outcome) -> Self {
        outcome.code()
    }
}

/// Error produced when decoding an unknown numeric outcome code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown outcome code: {0}")]
pub struct UnknownOutcomeCode(pub u16);

impl TryFrom<u16> for Outcome {
    type Error = UnknownOutcomeCode;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Success),
            1 => Ok(Self::TransportUnmarshalFailure),
            2 => Ok(Self::UseCaseUnmarshalFailure),
            3 => Ok(Self::NotRoutableFailure),
            4 => Ok(Self::ValidationFailure),
            other => Err(UnknownOutcomeCode(other)),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "success",
            Self::TransportUnmarshalFailure => "transport-unmarshal-failure",
            Self::UseCaseUnmarshalFailure => "use-case-unmarshal-failure",
            Self::NotRoutableFailure => "not-routable-failure",
            Self::ValidationFailure => "validation-failure",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
