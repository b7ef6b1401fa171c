//! Request and advisory data shapes.

pub mod advisory;
pub mod request;

pub use advisory::{
    AdvisoryPayload, AdvisoryReport, ErrorPayload, ModelReply, RiskLevel, INVALID_JSON_MESSAGE,
};
pub use request::{AdvisoryRequest, AdvisoryResponse, Disease, Gender, PeopleType};
