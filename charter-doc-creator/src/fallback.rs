//! Ordered resource loading with a guaranteed last resort
//!
//! A [`FallbackChain`] holds fallible loaders that are tried in the order
//! they were added. The first one that succeeds wins; if every loader fails,
//! the infallible last-resort loader runs instead. Failures are logged and
//! kept on the [`Resolved`] value so callers can report what was skipped.

use anyhow::Result;
use log::debug;

type Loader<'a, T> = Box<dyn Fn() -> Result<T> + 'a>;

pub struct FallbackChain<'a, T> {
    candidates: Vec<(String, Loader<'a, T>)>,
    last_resort: (String, Box<dyn Fn() -> T + 'a>),
}

/// Outcome of [`FallbackChain::resolve`].
#[derive(Debug)]
pub struct Resolved<T> {
    pub value: T,
    /// Label of the loader that produced `value`.
    pub source: String,
    /// Zero-based position of the winning loader; equals the number of
    /// candidates when the last resort was used.
    pub tier: usize,
    /// Candidates that were tried and failed, in order.
    pub failures: Vec<(String, anyhow::Error)>,
    last_resort: bool,
}

impl<T> Resolved<T> {
    pub fn used_last_resort(&self) -> bool {
        self.last_resort
    }
}

impl<'a, T> FallbackChain<'a, T> {
    pub fn new(label: impl Into<String>, last_resort: impl Fn() -> T + 'a) -> Self {
        Self {
            candidates: Vec::new(),
            last_resort: (label.into(), Box::new(last_resort)),
        }
    }

    /// Append a candidate after the ones already registered.
    pub fn then(mut self, label: impl Into<String>, load: impl Fn() -> Result<T> + 'a) -> Self {
        self.candidates.push((label.into(), Box::new(load)));
        self
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn resolve(self) -> Resolved<T> {
        let mut failures = Vec::new();

        for (tier, (label, load)) in self.candidates.into_iter().enumerate() {
            match load() {
                Ok(value) => {
                    return Resolved {
                        value,
                        source: label,
                        tier,
                        failures,
                        last_resort: false,
                    };
                }
                Err(e) => {
                    debug!("fallback candidate '{}' failed: {:#}", label, e);
                    failures.push((label, e));
                }
            }
        }

        let (label, load) = self.last_resort;
        Resolved {
            value: load(),
            source: label,
            tier: failures.len(),
            failures,
            last_resort: true,
        }
    }
}
