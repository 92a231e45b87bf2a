//! Line parsers for the three telemetry text layouts
//!
//! Each parser is a pure text-to-record transformation; file I/O lives in
//! the ingestion pipeline. Malformed lines produce `Error::Parse` and the
//! pipeline aborts the whole file on the first one.

pub mod abbreviations;
pub mod lap_log;
pub mod race_header;

pub use abbreviations::AbbreviationRecord;
pub use lap_log::LapEvent;
pub use race_header::RaceHeader;
