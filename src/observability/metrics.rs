//! Metrics collection.
//!
//! # Metrics
//! - `anonex_lifecycle_transitions_total` (counter): transitions by `status`
//! - `anonex_confirmation_polls_total` (counter): polls by `outcome`
//! - `anonex_confirmations_assumed_total` (counter): lifecycles confirmed
//!   after the poll budget ran out
//! - `anonex_uploads_total` (counter): storage uploads by `result`
//! - `anonex_wallet_connects_total` (counter): connects by `mode` and `result`
//! - `anonex_network_requests_total` (counter): ledger REST calls by `result`
//!
//! # Design Decisions
//! - Helpers only record; installing an exporter is left to the host binary
//! - Label values are static strings to keep cardinality bounded

use metrics::counter;

pub fn record_lifecycle_transition(status: &'static str) {
    counter!("anonex_lifecycle_transitions_total", "status" => status).increment(1);
}

pub fn record_poll_attempt(outcome: &'static str) {
    counter!("anonex_confirmation_polls_total", "outcome" => outcome).increment(1);
}

pub fn record_assumed_confirmation() {
    counter!("anonex_confirmations_assumed_total").increment(1);
}

pub fn record_upload(result: &'static str) {
    counter!("anonex_uploads_total", "result" => result).increment(1);
}

pub fn record_wallet_connect(mode: &'static str, result: &'static str) {
    counter!("anonex_wallet_connects_total", "mode" => mode, "result" => result).increment(1);
}

pub fn record_network_request(result: &'static str) {
    counter!("anonex_network_requests_total", "result" => result).increment(1);
}
