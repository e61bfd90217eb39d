//! Candidate-name generation for public object names and capability tokens.
//!
//! Generators are pure producers: they never look at what already exists on
//! disk or in the token table. Callers check each candidate for collisions
//! and retry within their own bound.

mod allocator;
mod random;

pub use allocator::NameAllocator;
pub use random::RandomCode;

use crate::store::config::TenantConfig;

/// Defines errors that can occur while producing a candidate name.
//
// // 定义在生成候选名称时可能发生的错误。
#[derive(Debug, thiserror::Error)]
pub enum NameError {
    /// Every code of the configured width has already been issued.
    //
    // // 当前宽度下的所有编码都已发放完毕。
    #[error("Name sequence exhausted: all {width}-symbol codes have been issued.")]
    SequenceExhausted { width: usize },

    /// The alphabet handed to a generator was unusable.
    //
    // // 提供给生成器的字母表不可用。
    #[error("Invalid alphabet: {0}")]
    InvalidAlphabet(String),
}

/// Anything that can produce candidate names.
///
/// The built-in [`NameAllocator`] and [`RandomCode`] implement it, and so does
/// any `FnMut(&TenantConfig) -> String` closure, which is how a tenant plugs
/// in its own word-list or slug generator.
pub trait NameGenerator: Send {
    /// Produces the next candidate. The tenant is passed for generators that
    /// tailor names per tenant; the built-in ones ignore it.
    fn generate(&mut self, tenant: &TenantConfig) -> Result<String, NameError>;
}

impl<F> NameGenerator for F
where
    F: FnMut(&TenantConfig) -> String + Send,
{
    fn generate(&mut self, tenant: &TenantConfig) -> Result<String, NameError> {
        Ok(self(tenant))
    }
}

/// Validates an alphabet: non-empty, no repeated symbols.
pub(crate) fn parse_alphabet(alphabet: &str) -> Result<Vec<char>, NameError> {
    let symbols: Vec<char> = alphabet.chars().collect();
    if symbols.is_empty() {
        return Err(NameError::InvalidAlphabet("alphabet is empty".to_string()));
    }
    let mut seen = std::collections::HashSet::new();
    for symbol in &symbols {
        if !seen.insert(*symbol) {
            return Err(NameError::InvalidAlphabet(format!("symbol '{}' repeats", symbol)));
        }
    }
    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_a_generator() {
        let mut counter = 0;
        let mut generator = move |tenant: &TenantConfig| {
            counter += 1;
            format!("{}-{}", tenant.name, counter)
        };
        let tenant = TenantConfig { name: "gfy".to_string(), ..TenantConfig::default() };
        assert_eq!(generator.generate(&tenant).unwrap(), "gfy-1");
        assert_eq!(generator.generate(&tenant).unwrap(), "gfy-2");
    }

    #[test]
    fn test_parse_alphabet_rejects_bad_input() {
        assert!(matches!(parse_alphabet(""), Err(NameError::InvalidAlphabet(_))));
        assert!(matches!(parse_alphabet("abca"), Err(NameError::InvalidAlphabet(_))));
        assert_eq!(parse_alphabet("xyz").unwrap(), vec!['x', 'y', 'z']);
    }
}
