//! Functional programming utilities

/// Run the closure only when the predicate holds, otherwise return `Ok(())`.
pub fn when<W, E, F>(predicate: bool, f: F) -> Result<(), E>
where
    F: FnOnce() -> Result<W, E>,
{
    if predicate {
        f().map(|_| ())
    } else {
        Ok(())
    }
}
