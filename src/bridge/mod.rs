pub mod config;
pub mod dates;
pub mod mappings;
pub mod merge;
pub mod output;
pub mod paths;
pub mod tags;
