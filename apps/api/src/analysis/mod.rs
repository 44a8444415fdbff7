// Analysis: request/response contract with the remote function, the
// orchestrator state machine, and the HTTP handlers that drive it.
// All remote calls go through client::AnalysisFunction.

pub mod client;
pub mod handlers;
pub mod models;
pub mod orchestrator;
pub mod pricing;
