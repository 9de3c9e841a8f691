//! The usage block printed for malformed invocations

use std::io::{self, Write};

pub const USAGE: &str = "\
certutil: Command line utility for listing and cleaning certificates from a credential store (Version 3.0)

   Usage:
   certutil -list <name>           List all certificates with <name> in CN
   certutil -list_exp <name>       List all expired certificates with <name> in CN
   certutil -verify <name>         List and verify all certificates with <name> in CN
   certutil -delete <name>         Delete all certificates except the most recent one with <name> in CN
   certutil -delete_exp <name>     Delete all expired certificates with <name> in CN
   certutil -count <name>          Count all certificates with <name> in CN
   certutil -count_exp <name>      Count all expired certificates with <name> in CN
";

/// # Errors
///
/// Fails when `out` cannot be written.
pub fn print_usage<W: Write>(out: &mut W) -> io::Result<()> {
    out.write_all(USAGE.as_bytes())?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_lists_every_operation() {
        for op in ["list", "list_exp", "verify", "delete", "delete_exp", "count", "count_exp"] {
            assert!(USAGE.contains(&format!("certutil -{op} <name>")), "missing {op}");
        }
    }

    #[test]
    fn test_print_usage() {
        let mut out = Vec::new();
        print_usage(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("certutil: Command line utility"));
        assert!(text.ends_with("in CN\n"));
    }
}
