use crate::error::AppError;

/// State that belongs to the signed-in session and is wiped on logout,
/// both in memory and in storage.
pub trait SessionScoped {
    fn scope_name(&self) -> &'static str;

    fn purge(&mut self) -> Result<(), AppError>;
}

/// Purges every scoped store. All stores are attempted; the first failure is
/// returned after the rest have run.
pub fn run_teardown(scoped: &mut [&mut dyn SessionScoped]) -> Result<(), AppError> {
    let mut first_error = None;
    for store in scoped.iter_mut() {
        if let Err(err) = store.purge() {
            tracing::warn!(scope = store.scope_name(), error = %err, "session teardown failed");
            first_error.get_or_insert(err);
        } else {
            tracing::debug!(scope = store.scope_name(), "session data purged");
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
