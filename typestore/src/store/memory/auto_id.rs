use crate::common::AUTO_ID_ALPHABET;
use rand::rngs::OsRng;
use rand::Rng;

/// Generates random alphanumeric document ids, e.g. `R9L38yZ0BYWNYjvJ9odK`.
///
/// With the default length of 20 there are 62^20 possible ids, so the store
/// only retries on the (practically impossible) collision.
pub struct AutoIdGenerator {
    length: usize,
}

impl AutoIdGenerator {
    pub fn new(length: usize) -> Self {
        AutoIdGenerator { length }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn next_id(&self) -> String {
        let mut rng = OsRng;
        (0..self.length)
            .map(|_| AUTO_ID_ALPHABET[rng.gen_range(0..AUTO_ID_ALPHABET.len())] as char)
            .collect()
    }
}
