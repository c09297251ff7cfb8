/// A GL object together with the diagnostics the driver reported while creating it.
///
/// The object is always handed out, even when creation failed, so the caller decides
/// whether a broken program is fatal ([`Checked::check`]) or just worth a log line
/// ([`Checked::ignore`] after reading [`Checked::diagnostics`]).
#[must_use = "diagnostics are lost unless checked or explicitly ignored"]
#[derive(Debug)]
pub struct Checked<T, E> {
    value: T,
    diagnostics: Vec<E>,
}

impl<T, E> Checked<T, E> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            diagnostics: Vec::new(),
        }
    }

    pub fn push(&mut self, diagnostic: E) {
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[E] {
        &self.diagnostics
    }

    /// Fails with the first reported diagnostic. The object is dropped in that case.
    pub fn check(self) -> Result<T, E> {
        match self.diagnostics.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.value),
        }
    }

    pub fn ignore(self) -> T {
        self.value
    }
}
