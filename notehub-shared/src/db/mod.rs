/// Database layer: connection pooling and schema migrations.
///
/// Models live in [`crate::models`]; this module only owns the pool and
/// the migration runner.
pub mod migrations;
pub mod pool;
