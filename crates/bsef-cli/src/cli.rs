//! CLI argument definitions for bsef.

use bsef_core::config::limits::DEFAULT_BUFFER_SIZE;
use bsef_core::{BoundaryMode, Encoding, Endianness, Input, ScanConfig, StartPolicy};
use clap::Parser;

use crate::address::parse_address;

#[derive(Parser, Debug)]
#[command(name = "bsef")]
#[command(about = "Binary signature enhanced finder", version)]
pub struct Args {
    /// Signature to search for (hex digits for raw-hex, plain text for ascii)
    pub search_param: String,

    /// File to scan, or - for standard input
    #[arg(default_value = "-")]
    pub file_path: String,

    /// Byte address to start looking from (decimal, or hex with 0x)
    #[arg(short, long, value_name = "ADDRESS", default_value = "0", value_parser = parse_address)]
    pub start_byte_address: u64,

    /// Byte address to stop looking at, exclusive (default: end of file)
    #[arg(short, long, value_name = "ADDRESS", value_parser = parse_address)]
    pub end_byte_address: Option<u64>,

    /// Only consider offsets on this stride (0 = every byte; otherwise even)
    #[arg(short, long, value_name = "BYTES", default_value = "0", value_parser = parse_address)]
    pub alignment_bytes_count: u64,

    /// Byte string encoding [raw-hex, ascii]
    #[arg(short = 'E', long, default_value = "raw-hex", value_parser = parse_encoding)]
    pub encoding: Encoding,

    /// Endianness [little, big, middle] (raw-hex only)
    #[arg(short = 'n', long, default_value = "little", value_parser = parse_endianness)]
    pub endianness: Endianness,

    /// Round the start address up to the alignment instead of the legacy skew
    #[arg(long)]
    pub round_start: bool,

    /// Overlap buffer refills so matches crossing a refill boundary are found
    #[arg(long)]
    pub overlap: bool,

    /// Scan buffer size in bytes
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_BUFFER_SIZE)]
    pub buffer_size: usize,

    /// Print one JSON object per match
    #[arg(long)]
    pub json: bool,

    /// Log refills and the scan summary to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn to_config(&self) -> ScanConfig {
        ScanConfig {
            encoding: self.encoding,
            endianness: self.endianness,
            pattern: self.search_param.clone(),
            start: self.start_byte_address,
            end: self.end_byte_address,
            alignment: self.alignment_bytes_count,
            input: Input::from_arg(&self.file_path),
            buffer_size: self.buffer_size,
            start_policy: if self.round_start {
                StartPolicy::RoundUp
            } else {
                StartPolicy::Legacy
            },
            boundary_mode: if self.overlap {
                BoundaryMode::Overlap
            } else {
                BoundaryMode::Strict
            },
            ..ScanConfig::default()
        }
    }
}

fn parse_encoding(s: &str) -> Result<Encoding, String> {
    Encoding::parse(s).map_err(|e| e.to_string())
}

fn parse_endianness(s: &str) -> Result<Endianness, String> {
    Endianness::parse(s).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let args = Args::try_parse_from(["bsef", "DEADBEEF"]).unwrap();
        assert_eq!(args.search_param, "DEADBEEF");
        assert_eq!(args.file_path, "-");
        assert_eq!(args.start_byte_address, 0);
        assert!(args.end_byte_address.is_none());
        assert_eq!(args.alignment_bytes_count, 0);
        assert_eq!(args.encoding, Encoding::RawHex);
        assert_eq!(args.endianness, Endianness::Little);
        assert_eq!(args.buffer_size, 32768);
        assert!(!args.json);
    }

    #[test]
    fn test_parse_short_options() {
        let args = Args::try_parse_from([
            "bsef", "-s", "16", "-e", "0x100", "-a", "4", "-E", "ascii", "-n", "big", "MZ",
            "image.bin",
        ])
        .unwrap();
        assert_eq!(args.start_byte_address, 16);
        assert_eq!(args.end_byte_address, Some(0x100));
        assert_eq!(args.alignment_bytes_count, 4);
        assert_eq!(args.encoding, Encoding::Ascii);
        assert_eq!(args.endianness, Endianness::Big);
        assert_eq!(args.search_param, "MZ");
        assert_eq!(args.file_path, "image.bin");
    }

    #[test]
    fn test_parse_long_options() {
        let args = Args::try_parse_from([
            "bsef",
            "--start-byte-address",
            "8",
            "--end-byte-address",
            "64",
            "--alignment-bytes-count",
            "2",
            "--encoding",
            "raw-hex",
            "--endianness",
            "middle",
            "--overlap",
            "--round-start",
            "--json",
            "CAFEBABE",
            "-",
        ])
        .unwrap();
        let config = args.to_config();
        assert_eq!(config.start, 8);
        assert_eq!(config.end, Some(64));
        assert_eq!(config.alignment, 2);
        assert_eq!(config.endianness, Endianness::Middle);
        assert_eq!(config.boundary_mode, BoundaryMode::Overlap);
        assert_eq!(config.start_policy, StartPolicy::RoundUp);
        assert_eq!(config.input, Input::Stdin);
        assert!(args.json);
    }

    #[test]
    fn test_invalid_selectors_rejected() {
        assert!(Args::try_parse_from(["bsef", "-E", "utf16", "00"]).is_err());
        assert!(Args::try_parse_from(["bsef", "-n", "pdp", "00"]).is_err());
        assert!(Args::try_parse_from(["bsef", "-s", "ten", "00"]).is_err());
    }

    #[test]
    fn test_search_param_required() {
        assert!(Args::try_parse_from(["bsef"]).is_err());
    }

    #[test]
    fn test_too_many_positionals() {
        assert!(Args::try_parse_from(["bsef", "00", "a.bin", "b.bin"]).is_err());
    }

    #[test]
    fn test_config_defaults() {
        let config = Args::try_parse_from(["bsef", "00", "disk.img"])
            .unwrap()
            .to_config();
        assert_eq!(config.input, Input::Path("disk.img".into()));
        assert_eq!(config.boundary_mode, BoundaryMode::Strict);
        assert_eq!(config.start_policy, StartPolicy::Legacy);
        assert_eq!(config.max_signature_len, 32768);
    }
}
