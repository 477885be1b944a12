// Command-line front end: argument parsing, data loading, console reports,
// and file export.

pub mod cli;
pub mod export;
pub mod pipeline;
pub mod report;
