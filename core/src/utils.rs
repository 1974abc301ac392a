//! Utility functions and types.

use std::fmt::Debug;

/// Redacts a secret when formatting debug output.
///
/// Values shorter than 16 characters are hidden entirely; longer values keep
/// the first and last four characters so distinct credentials remain
/// distinguishable in logs without leaking anything useful.
pub struct Redact<'a>(&'a str);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(value)
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(value.as_str())
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        match value {
            None => Redact(""),
            Some(v) => Redact(v),
        }
    }
}

impl<'a> Debug for Redact<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let length = self.0.len();
        if length == 0 {
            f.write_str("UNSET")
        } else if length < 16 {
            f.write_str("***")
        } else {
            f.write_str(&self.0[..4])?;
            f.write_str("***")?;
            f.write_str(&self.0[length - 4..])
        }
    }
}
