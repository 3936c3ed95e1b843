use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::error::{Result, VmError};
use crate::translation::{Statistics, Translation};

/// Read an address trace: one non-negative integer per line.
///
/// Blank lines are skipped; any other line that does not parse is rejected
/// with its line number (the legacy behavior of treating junk as address 0
/// is deliberately not reproduced).
pub fn read_logical_addresses<P: AsRef<Path>>(path: P) -> Result<Vec<u32>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| VmError::AddressSource {
        path: path.to_path_buf(),
        source,
    })?;
    parse_addresses(&content)
}

/// Parse trace content already in memory. Split out of
/// `read_logical_addresses` so it can be tested without touching the
/// filesystem.
pub fn parse_addresses(content: &str) -> Result<Vec<u32>> {
    let mut addresses = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let token = line.trim();
        if token.is_empty() {
            continue;
        }
        let raw: u32 = token.parse().map_err(|_| VmError::MalformedAddress {
            line: index + 1,
            token: token.to_string(),
        })?;
        addresses.push(raw);
    }
    Ok(addresses)
}

/// Write one per-address record line
pub fn write_translation<W: Write>(out: &mut W, t: &Translation) -> io::Result<()> {
    writeln!(
        out,
        "Virtual address = {:>4}, page number = {:>4}, offset = {:>4}, physical address = {:>8}, value = {:>4}",
        t.logical, t.page, t.offset, t.physical, t.value
    )
}

/// Write the final statistics report
pub fn write_report<W: Write>(out: &mut W, stats: &Statistics) -> io::Result<()> {
    writeln!(out, "Number of translated addresses = {}", stats.translated)?;
    writeln!(out, "Number of page faults = {}", stats.page_faults)?;
    writeln!(out, "Page fault rate = {:.3}", stats.page_fault_rate())?;
    writeln!(out, "Number of TLB hits = {}", stats.tlb_hits)?;
    writeln!(out, "TLB hit rate = {:.3}", stats.tlb_hit_rate())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_addresses() {
        let addresses = parse_addresses("16916\n62493\n30198\n").unwrap();
        assert_eq!(addresses, vec![16916, 62493, 30198]);
    }

    #[test]
    fn test_parse_trims_and_skips_blank_lines() {
        let addresses = parse_addresses("  1 \n\n   \n256\n").unwrap();
        assert_eq!(addresses, vec![1, 256]);
    }

    #[test]
    fn test_parse_empty_trace() {
        assert_eq!(parse_addresses("").unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn test_parse_rejects_malformed_line() {
        let err = parse_addresses("1\nbogus\n3\n").unwrap_err();
        match err {
            VmError::MalformedAddress { line, token } => {
                assert_eq!(line, 2);
                assert_eq!(token, "bogus");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_negative() {
        let err = parse_addresses("-5\n").unwrap_err();
        assert!(matches!(err, VmError::MalformedAddress { line: 1, .. }));
    }

    #[test]
    fn test_read_missing_trace_file() {
        let err = read_logical_addresses("/nonexistent/addresses.txt").unwrap_err();
        assert!(matches!(err, VmError::AddressSource { .. }));
    }

    #[test]
    fn test_write_translation_format() {
        let t = Translation {
            logical: 1,
            page: 0,
            offset: 1,
            physical: 1,
            value: -73,
            tlb_hit: false,
            page_fault: true,
        };

        let mut out = Vec::new();
        write_translation(&mut out, &t).unwrap();
        let line = String::from_utf8(out).unwrap();

        assert!(line.contains("Virtual address ="));
        assert!(line.contains("page number ="));
        assert!(line.contains("physical address ="));
        assert!(line.contains("-73"));
    }

    #[test]
    fn test_write_report_format() {
        let stats = Statistics {
            translated: 1000,
            page_faults: 244,
            tlb_hits: 54,
        };

        let mut out = Vec::new();
        write_report(&mut out, &stats).unwrap();
        let report = String::from_utf8(out).unwrap();

        assert!(report.contains("Number of translated addresses = 1000"));
        assert!(report.contains("Number of page faults = 244"));
        assert!(report.contains("Page fault rate = 0.244"));
        assert!(report.contains("Number of TLB hits = 54"));
        assert!(report.contains("TLB hit rate = 0.054"));
    }
}
