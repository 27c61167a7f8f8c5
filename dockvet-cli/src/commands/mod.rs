//! Command handlers -- one module per subcommand

pub mod history;
pub mod scan;
