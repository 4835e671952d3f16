/// Domain services.
///
/// Each service is a plain struct holding its dependencies (a pool clone,
/// possibly another service), constructed once at process start and cloned
/// into application state. There is no registry or ambient wiring; the
/// dependency graph is exactly what the constructors say it is.
///
/// - [`users::UserDirectory`]: registration and username lookup
/// - [`notes::NoteService`]: note CRUD, share tokens, starter provisioning
/// - [`problems::ProblemService`]: problem catalog CRUD
///
/// Services return typed errors (`thiserror` enums); mapping to HTTP status
/// codes happens once, in the API crate's error boundary.
pub mod notes;
pub mod problems;
pub mod users;

/// Name of the unique constraint violated by a database error, if any.
///
/// Uniqueness races (duplicate signup, concurrent starter-problem creation)
/// are resolved by matching on these names rather than parsing messages.
pub(crate) fn violated_constraint(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint().map(|c| c.to_string()),
        _ => None,
    }
}
