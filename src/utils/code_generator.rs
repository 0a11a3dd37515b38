//! Short code generation.
//!
//! Codes are drawn uniformly from a fixed 62-character alphabet. The random
//! source is owned by the generator so callers can inject a seeded one.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Characters a generated code may contain: `a-z`, `A-Z`, `0-9`.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Default number of characters in a generated code.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Upper bound accepted for the code length; matches the `code` column width.
pub const MAX_CODE_LENGTH: usize = 32;

/// Codes that would be shadowed by a static route and so never redirect.
/// Compared case-sensitively, like the router.
pub const RESERVED_CODES: &[&str] = &["api", "health"];

/// Produces candidate short codes.
///
/// Implementations are pure: they never consult storage, so a candidate may
/// collide with an existing mapping. Collision handling belongs to
/// [`crate::application::services::MappingService`].
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    /// Returns a fresh candidate code.
    fn generate(&self) -> String;

    /// Number of characters in every generated code.
    fn code_length(&self) -> usize;
}

enum Source {
    Thread,
    Seeded(Mutex<StdRng>),
}

/// Uniform random generator over [`ALPHABET`].
///
/// # Examples
///
/// ```ignore
/// let generator = RandomCodeGenerator::default();
/// let code = generator.generate();
/// assert_eq!(code.len(), 6);
/// ```
pub struct RandomCodeGenerator {
    length: usize,
    source: Source,
}

impl RandomCodeGenerator {
    /// Creates a generator backed by the thread-local, OS-seeded RNG.
    ///
    /// Returns `None` if `length` is zero or exceeds [`MAX_CODE_LENGTH`].
    pub fn new(length: usize) -> Option<Self> {
        Self::validate_length(length)?;
        Some(Self {
            length,
            source: Source::Thread,
        })
    }

    /// Creates a generator with a deterministic sequence derived from `seed`.
    ///
    /// Two generators with the same seed and length yield the same codes.
    pub fn seeded(length: usize, seed: u64) -> Option<Self> {
        Self::validate_length(length)?;
        Some(Self {
            length,
            source: Source::Seeded(Mutex::new(StdRng::seed_from_u64(seed))),
        })
    }

    fn validate_length(length: usize) -> Option<()> {
        (1..=MAX_CODE_LENGTH).contains(&length).then_some(())
    }

    fn fill<R: Rng>(length: usize, rng: &mut R) -> String {
        (0..length)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self {
            length: DEFAULT_CODE_LENGTH,
            source: Source::Thread,
        }
    }
}

impl std::fmt::Debug for RandomCodeGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let source = match self.source {
            Source::Thread => "thread",
            Source::Seeded(_) => "seeded",
        };
        f.debug_struct("RandomCodeGenerator")
            .field("length", &self.length)
            .field("source", &source)
            .finish()
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        match &self.source {
            Source::Thread => Self::fill(self.length, &mut rand::rng()),
            Source::Seeded(rng) => {
                // A poisoned lock still holds a usable RNG state.
                let mut rng = rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                Self::fill(self.length, &mut *rng)
            }
        }
    }

    fn code_length(&self) -> usize {
        self.length
    }
}

/// Reports whether `code` looks like something [`RandomCodeGenerator`] could
/// have produced at the given length.
pub fn is_valid_code(code: &str, length: usize) -> bool {
    code.len() == length && code.bytes().all(|b| ALPHABET.contains(&b))
}

/// Reports whether `code` collides with a path the router serves itself.
pub fn is_reserved_code(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}
