use rand::Rng;

/// Picks a uniformly random page number in `[1, total_pages]`.
/// An empty result set has no pages; page 1 is returned so callers can treat
/// it as the first page of nothing.
pub fn random_page(total_pages: usize) -> usize {
    if total_pages == 0 {
        return 1;
    }
    rand::thread_rng().gen_range(1..=total_pages)
}

/// Generates a random string of `length` symbols drawn uniformly from `charset`.
pub fn generate_random_from_charset(length: usize, charset: &[char]) -> String {
    if charset.is_empty() {
        return String::new();
    }
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| charset[rng.gen_range(0..charset.len())])
        .collect()
}
