//! Dispatch router for ledger invocations.
//!
//! Maps `(function, args)` onto the typed API after checking the argument
//! count, and shapes the result into the host response envelope.

use super::operation::Operation;
use super::response::InvocationResponse;
use crate::domain::codec::encode_results;
use crate::domain::errors::RecordError;
use crate::ports::inbound::RecordLedgerApi;
use crate::ports::outbound::{LedgerStore, RandomSource, TimeSource};
use crate::service::RecordLedgerService;
use tracing::{debug, info_span, warn};

/// Record Ledger IPC Handler
///
/// Wraps RecordLedgerService behind the string-argument invocation surface.
pub struct RecordLedgerHandler<S, T, R>
where
    S: LedgerStore,
    T: TimeSource,
    R: RandomSource,
{
    service: RecordLedgerService<S, T, R>,
}

impl<S, T, R> RecordLedgerHandler<S, T, R>
where
    S: LedgerStore,
    T: TimeSource,
    R: RandomSource,
{
    pub fn new(service: RecordLedgerService<S, T, R>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &RecordLedgerService<S, T, R> {
        &self.service
    }

    /// Runs one invocation and wraps the result for the host.
    pub fn invoke(&self, function: &str, args: &[String]) -> InvocationResponse {
        let span = info_span!("invoke", operation = function, args = args.len());
        let _enter = span.enter();

        match self.dispatch(function, args) {
            Ok(payload) => {
                debug!(bytes = payload.len(), "Invocation succeeded");
                InvocationResponse::success(payload)
            }
            Err(e) => {
                warn!(error = %e, "Invocation failed");
                InvocationResponse::error(e.to_string())
            }
        }
    }

    /// Runs one invocation, returning the payload bytes or the typed error.
    pub fn dispatch(&self, function: &str, args: &[String]) -> Result<Vec<u8>, RecordError> {
        let operation: Operation = function.parse()?;
        operation.check_arity(args)?;

        let service = &self.service;
        match operation {
            Operation::InitLedger => {
                service.init_ledger()?;
                Ok(Vec::new())
            }
            Operation::QueryAllGroups => encode(&service.query_all_groups()?),
            Operation::AddGroup => {
                service.add_group(&args[0], &args[1])?;
                Ok(Vec::new())
            }
            Operation::QueryAllUsers => encode(&service.query_all_users()?),
            Operation::GenerateSetForGroup => {
                service.generate_set_for_group(&args[0], &args[1], &args[2])?;
                Ok(Vec::new())
            }
            Operation::PrepareForDelivery => {
                encode(&service.prepare_for_delivery(&args[0], &args[1])?)
            }
            Operation::DeliveryItem => Ok(service
                .delivery_item(&args[0], &args[1], &args[2])?
                .into_response_bytes()),
            Operation::AddUser => {
                service.add_user(&args[0], &args[1], &args[2], &args[3])?;
                Ok(Vec::new())
            }
            Operation::GetUserRecord => service.get_user_record(&args[0]),
        }
    }
}

fn encode<T: serde::Serialize>(rows: &[T]) -> Result<Vec<u8>, RecordError> {
    encode_results(rows).map_err(|e| RecordError::Serialization(e.message))
}
