/// Database access helpers
///
/// - `pool`: PostgreSQL connection pool construction and health check

pub mod pool;
