//! Output sink for template execution.

use std::fmt;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Accumulates template output and owns the randomness source used by
/// statements such as `lorem ... random`.
///
/// A renderer is owned by a single render invocation; compiled templates
/// are shared, renderers are not.
pub struct Renderer {
    output: String,
    rng: Box<dyn RngCore + Send>,
}

impl Renderer {
    /// Create a renderer with an entropy-seeded random source.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create a renderer whose random output is reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Create a renderer around a caller-supplied random source.
    pub fn with_rng(rng: impl RngCore + Send + 'static) -> Self {
        Self {
            output: String::new(),
            rng: Box::new(rng),
        }
    }

    /// Append text to the output.
    pub fn write_str(&mut self, s: &str) {
        self.output.push_str(s);
    }

    /// The random source for statements that need one.
    pub fn rng(&mut self) -> &mut dyn RngCore {
        self.rng.as_mut()
    }

    /// Output written so far.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn into_output(self) -> String {
        self.output
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

impl fmt::Write for Renderer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.output.push_str(s);
        Ok(())
    }
}
