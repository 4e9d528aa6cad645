//! `Switchyard` Core — behavior keys, outcome codes, and command envelope schemas.

pub mod behavior;
pub mod messages;
pub mod outcome;

pub use behavior::BehaviorKey;
pub use messages::batch::{BatchItem, STRATEGY_SYNCHRONOUS};
pub use messages::envelope::{BaseRequest, BaseResponse};
pub use outcome::Outcome;
