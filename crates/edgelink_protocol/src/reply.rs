//! Server reply strings and reply formatters.
//!
//! Clients match on these strings verbatim, so they are fixed protocol
//! surface, not presentation.

use crate::command::StatOp;

/// Prompt sent after a `login` request.
pub const LOGIN_PROMPT: &str = "user credentials request";

/// Successful authentication.
pub const WELCOME: &str = "Welcome";

/// Rejected credential pair, further attempts allowed.
pub const INVALID: &str = "Invalid";

/// Rejected credential pair, attempt limit reached.
pub const BLOCKED: &str = "block";

/// Upload notice recorded.
pub const UPLOAD_DONE: &str = "successfully moved to server";

/// Referenced data file is absent.
pub const FILE_MISSING: &str = "file does not exist";

/// Data file deleted.
pub const FILE_REMOVED: &str = "File removed";

/// AED found no registry entries besides the requester's.
pub const NO_OTHER_DEVICES: &str = "no other active edge devices";

/// AED found at least one other registered device.
pub const OTHER_DEVICES_ACTIVE: &str = "There is/are other device(s) active";

/// OUT completed and the registry was rewritten.
pub const LOG_REMOVED: &str = "removed log";

/// Unrecognized token or malformed exchange.
pub const UNRECOGNIZED: &str = "Cannot understand this message";

/// Acknowledges the username field of a `UED` exchange.
pub fn username_ack(username: &str) -> String {
    format!("username is {username}")
}

/// Confirms the target file of a `DTE` exchange.
pub fn file_name_ack(file_id: &str) -> String {
    format!("file name is {file_id}.txt")
}

/// Acknowledges the username field of a `DTE` exchange.
pub fn log_info_ack(username: &str) -> String {
    format!("log info {username}")
}

/// Formats a computed `SCS` result.
pub fn stat_result(op: StatOp, file_id: &str, result: impl std::fmt::Display) -> String {
    format!("result of {op} in file {file_id}.txt is {result}")
}

/// The data file exists but holds no values.
pub fn file_empty(file_id: &str) -> String {
    format!("file {file_id}.txt is empty")
}

/// The data file holds a line that does not parse as an integer.
pub fn file_invalid(file_id: &str) -> String {
    format!("file {file_id}.txt contains invalid data")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_result_formats_integer() {
        let msg = stat_result(StatOp::Sum, "alice-1", 14);
        assert_eq!(msg, "result of SUM in file alice-1.txt is 14");
    }

    #[test]
    fn stat_result_formats_float() {
        let msg = stat_result(StatOp::Average, "alice-1", 2.8);
        assert_eq!(msg, "result of AVERAGE in file alice-1.txt is 2.8");
    }

    #[test]
    fn ack_formatters() {
        assert_eq!(username_ack("bob"), "username is bob");
        assert_eq!(file_name_ack("bob-3"), "file name is bob-3.txt");
        assert_eq!(log_info_ack("bob"), "log info bob");
    }
}
