//! External text generation.
//!
//! The rest of the crate only sees [`TextGenerator`]: a prompt goes in,
//! text comes out. Network and authentication failures surface as
//! [`StudyError::GeneratorUnavailable`](crate::error::StudyError).

mod openai;
pub mod prompts;

pub use openai::{resolve_api_key, OpenAiGenerator};

use crate::error::Result;

pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<String>;
}

impl<T: TextGenerator + ?Sized> TextGenerator for &T {
    fn generate(&self, prompt: &str) -> Result<String> {
        (**self).generate(prompt)
    }
}
