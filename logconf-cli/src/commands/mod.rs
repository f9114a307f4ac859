//! Command handlers -- one module per subcommand

pub mod render;
pub mod technologies;
pub mod validate;
