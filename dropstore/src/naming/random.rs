use crate::store::config::TenantConfig;
use crate::utils::random::generate_random_from_charset;
use super::{parse_alphabet, NameError, NameGenerator};

/// Draws every symbol independently at random from the alphabet.
///
/// Capability tokens use this rather than a counter: a sequential token
/// would let the holder of one token guess its neighbours.
#[derive(Debug, Clone)]
pub struct RandomCode {
    alphabet: Vec<char>,
    width: usize,
}

impl RandomCode {
    pub fn new(alphabet: &str, width: usize) -> Result<Self, NameError> {
        Ok(RandomCode {
            alphabet: parse_alphabet(alphabet)?,
            width,
        })
    }
}

impl NameGenerator for RandomCode {
    fn generate(&mut self, _tenant: &TenantConfig) -> Result<String, NameError> {
        Ok(generate_random_from_charset(self.width, &self.alphabet))
    }
}
