//! Command and statistic operation tokens.

use std::fmt;

/// A command token sent by an authenticated client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Upload notice for a data file transferred out-of-band.
    Ued,
    /// Compute a statistic over a data file.
    Scs,
    /// Delete a data file.
    Dte,
    /// List other currently-registered devices.
    Aed,
    /// Deregister and log out.
    Out,
}

impl Command {
    /// Parses a wire token into a command.
    ///
    /// Returns `None` for anything that is not one of the five recognized
    /// tokens; the server answers those with the generic unrecognized reply.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "UED" => Some(Command::Ued),
            "SCS" => Some(Command::Scs),
            "DTE" => Some(Command::Dte),
            "AED" => Some(Command::Aed),
            "OUT" => Some(Command::Out),
            _ => None,
        }
    }

    /// Returns the wire token for this command.
    ///
    /// The server echoes this token as the acknowledgement that opens each
    /// command exchange.
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Ued => "UED",
            Command::Scs => "SCS",
            Command::Dte => "DTE",
            Command::Aed => "AED",
            Command::Out => "OUT",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A statistic operation name for the `SCS` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatOp {
    /// Arithmetic sum of all values.
    Sum,
    /// Sum divided by count.
    Average,
    /// Largest value.
    Max,
    /// Smallest value.
    Min,
}

impl StatOp {
    /// Parses a wire token into a statistic operation.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "SUM" => Some(StatOp::Sum),
            "AVERAGE" => Some(StatOp::Average),
            "MAX" => Some(StatOp::Max),
            "MIN" => Some(StatOp::Min),
            _ => None,
        }
    }

    /// Returns the wire token for this operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatOp::Sum => "SUM",
            StatOp::Average => "AVERAGE",
            StatOp::Max => "MAX",
            StatOp::Min => "MIN",
        }
    }
}

impl fmt::Display for StatOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_commands() {
        assert_eq!(Command::parse("UED"), Some(Command::Ued));
        assert_eq!(Command::parse("SCS"), Some(Command::Scs));
        assert_eq!(Command::parse("DTE"), Some(Command::Dte));
        assert_eq!(Command::parse("AED"), Some(Command::Aed));
        assert_eq!(Command::parse("OUT"), Some(Command::Out));
    }

    #[test]
    fn reject_unknown_command() {
        assert_eq!(Command::parse("EDG"), None);
        assert_eq!(Command::parse("ued"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn command_token_roundtrip() {
        for cmd in [
            Command::Ued,
            Command::Scs,
            Command::Dte,
            Command::Aed,
            Command::Out,
        ] {
            assert_eq!(Command::parse(cmd.as_str()), Some(cmd));
        }
    }

    #[test]
    fn parse_stat_ops() {
        assert_eq!(StatOp::parse("SUM"), Some(StatOp::Sum));
        assert_eq!(StatOp::parse("AVERAGE"), Some(StatOp::Average));
        assert_eq!(StatOp::parse("MAX"), Some(StatOp::Max));
        assert_eq!(StatOp::parse("MIN"), Some(StatOp::Min));
        assert_eq!(StatOp::parse("MEDIAN"), None);
    }
}
