pub mod backend;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod csv;
pub mod export;
pub mod pipeline;
pub mod report;
pub mod runner;
pub mod table;

pub use domscout_common::error;
pub use domscout_common::formatter;
pub use domscout_common::protocol;
pub use domscout_common::record;
