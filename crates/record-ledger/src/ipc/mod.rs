//! # IPC Module
//!
//! The invocation surface of the ledger: an operation name plus ordered
//! string arguments in, a status/payload envelope out.
//!
//! | Operation | Args | Payload |
//! |-----------|------|---------|
//! | `initLedger` | - | empty |
//! | `queryAllGroups` | - | `[{"Key","Record"}]` |
//! | `addGroup` | groupName, description | empty |
//! | `queryAllUsers` | - | `[{"Key","Record"}]` |
//! | `generateSetForGroup` | groupName, course, teacher | empty |
//! | `prepareForDelivery` | groupName, course | `[{"Key","Record"}]` projections |
//! | `deliveryItem` | studentKey, course, rate | record bytes before the call |
//! | `addUser` | userId, userName, groupName, description | empty |
//! | `getUserRecord` | key | record bytes |

mod handler;
mod operation;
mod response;

pub use handler::RecordLedgerHandler;
pub use operation::Operation;
pub use response::{InvocationResponse, STATUS_ERROR, STATUS_OK};
