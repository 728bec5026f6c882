//! Invocation names and their argument counts.

use crate::domain::errors::RecordError;
use std::fmt;
use std::str::FromStr;

/// Every operation reachable through the dispatch router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    InitLedger,
    QueryAllGroups,
    AddGroup,
    QueryAllUsers,
    GenerateSetForGroup,
    PrepareForDelivery,
    DeliveryItem,
    AddUser,
    GetUserRecord,
}

impl Operation {
    pub const ALL: [Operation; 9] = [
        Operation::InitLedger,
        Operation::QueryAllGroups,
        Operation::AddGroup,
        Operation::QueryAllUsers,
        Operation::GenerateSetForGroup,
        Operation::PrepareForDelivery,
        Operation::DeliveryItem,
        Operation::AddUser,
        Operation::GetUserRecord,
    ];

    /// Wire name used by callers.
    pub const fn name(self) -> &'static str {
        match self {
            Operation::InitLedger => "initLedger",
            Operation::QueryAllGroups => "queryAllGroups",
            Operation::AddGroup => "addGroup",
            Operation::QueryAllUsers => "queryAllUsers",
            Operation::GenerateSetForGroup => "generateSetForGroup",
            Operation::PrepareForDelivery => "prepareForDelivery",
            Operation::DeliveryItem => "deliveryItem",
            Operation::AddUser => "addUser",
            Operation::GetUserRecord => "getUserRecord",
        }
    }

    /// Exact number of string arguments required.
    pub const fn arity(self) -> usize {
        match self {
            Operation::InitLedger | Operation::QueryAllGroups | Operation::QueryAllUsers => 0,
            Operation::GetUserRecord => 1,
            Operation::AddGroup | Operation::PrepareForDelivery => 2,
            Operation::GenerateSetForGroup | Operation::DeliveryItem => 3,
            Operation::AddUser => 4,
        }
    }

    pub fn check_arity<A>(self, args: &[A]) -> Result<(), RecordError> {
        if args.len() != self.arity() {
            return Err(RecordError::ArgumentCount {
                operation: self.name(),
                expected: self.arity(),
                actual: args.len(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = RecordError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == name)
            .ok_or_else(|| RecordError::UnknownOperation(name.to_string()))
    }
}
