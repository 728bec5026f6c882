/// Status code of a successful invocation.
pub const STATUS_OK: i32 = 200;

/// Status code of a failed invocation.
pub const STATUS_ERROR: i32 = 500;

/// Outcome of one invocation as handed back to the host.
///
/// Success carries raw payload bytes; failure carries a textual message and
/// an empty payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationResponse {
    pub status: i32,
    pub message: String,
    pub payload: Vec<u8>,
}

impl InvocationResponse {
    pub fn success(payload: Vec<u8>) -> Self {
        Self {
            status: STATUS_OK,
            message: String::new(),
            payload,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR,
            message: message.into(),
            payload: Vec::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}
