/// Dataset loading: JSON problem sets with per-record error reporting.
pub mod load_from_file;
/// simplelog setup for the binary
pub mod logger;
