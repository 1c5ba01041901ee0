/// A value that was produced together with a list of non-fatal issues.
///
/// Batch operations (parsing every manifest line, loading a file whose
/// contents are partly malformed) keep going after a failure. The caller
/// gets whatever could be built plus every problem found along the way.
#[derive(Debug)]
pub struct Partial<T, E> {
    pub value: T,
    pub errors: Vec<E>,
}

impl<T, E> Partial<T, E> {
    pub fn new(value: T) -> Self {
        Self { value, errors: Vec::new() }
    }

    pub fn with_errors(value: T, errors: Vec<E>) -> Self {
        Self { value, errors }
    }

    /// `true` when no issue was recorded.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn push_error(&mut self, error: E) {
        self.errors.push(error);
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Partial<U, E> {
        Partial { value: f(self.value), errors: self.errors }
    }

    pub fn into_parts(self) -> (T, Vec<E>) {
        (self.value, self.errors)
    }

    /// Converts into a `Result`, failing with the first recorded issue.
    pub fn into_result(self) -> Result<T, E> {
        match self.errors.into_iter().next() {
            None => Ok(self.value),
            Some(e) => Err(e),
        }
    }
}
