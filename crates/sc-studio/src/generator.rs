//! Collaborators that produce text and images.
//!
//! Both traits are blocking and `Send + Sync`; jobs call them from
//! blocking tasks. Plain closures implement them, which keeps test doubles
//! and thin adapters short:
//!
//! ```
//! use sc_studio::{GenerateError, TextGenerator};
//!
//! let echo = |prompt: &str| -> Result<String, GenerateError> { Ok(prompt.to_string()) };
//! assert_eq!(echo.generate("hi").unwrap(), "hi");
//! ```

use crate::error::GenerateError;

/// Produces text for a prompt.
pub trait TextGenerator: Send + Sync {
    /// Generate a reply to `prompt`.
    fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

impl<F> TextGenerator for F
where
    F: Fn(&str) -> Result<String, GenerateError> + Send + Sync,
{
    fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        self(prompt)
    }
}

/// Produces one image reference per scene prompt.
pub trait ImageGenerator: Send + Sync {
    /// Generate images for `prompts`, returning references in the same order.
    ///
    /// Returning fewer references than prompts is allowed; the missing
    /// scenes get the placeholder image.
    fn generate_scenes(&self, prompts: &[String]) -> Result<Vec<String>, GenerateError>;
}

impl<F> ImageGenerator for F
where
    F: Fn(&[String]) -> Result<Vec<String>, GenerateError> + Send + Sync,
{
    fn generate_scenes(&self, prompts: &[String]) -> Result<Vec<String>, GenerateError> {
        self(prompts)
    }
}

/// An image generator that never produces images, so every scene gets the
/// placeholder.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

impl ImageGenerator for NoImages {
    fn generate_scenes(&self, _prompts: &[String]) -> Result<Vec<String>, GenerateError> {
        Ok(Vec::new())
    }
}
