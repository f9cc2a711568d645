//! Sequential observation-number generation.

use std::sync::{Arc, Mutex};

/// Hands out consecutive observation numbers. The next number can be reset,
/// e.g. after loading a document, to continue its numbering.
#[derive(Debug, Clone, Default)]
pub struct SerialNumberGenerator {
    next: i64,
}

impl SerialNumberGenerator {
    pub fn new() -> SerialNumberGenerator {
        SerialNumberGenerator::default()
    }

    pub fn starting_at(next: i64) -> SerialNumberGenerator {
        SerialNumberGenerator { next }
    }

    /// The number that will be handed out next.
    pub fn peek(&self) -> i64 {
        self.next
    }

    pub fn set_next(&mut self, next: i64) {
        self.next = next;
    }

    /// Hand out the next number and advance.
    pub fn next_number(&mut self) -> i64 {
        let number = self.next;
        self.next += 1;
        number
    }
}

/// Generator shared between command default providers.
pub type SharedSerial = Arc<Mutex<SerialNumberGenerator>>;

pub fn shared_serial(start: i64) -> SharedSerial {
    Arc::new(Mutex::new(SerialNumberGenerator::starting_at(start)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_sequence(generator: &mut SerialNumberGenerator, first: i64) {
        for i in 0..10 {
            assert_eq!(generator.next_number(), first + i);
        }
    }

    #[test]
    fn starts_at_zero_or_a_given_number() {
        assert_sequence(&mut SerialNumberGenerator::new(), 0);
        assert_sequence(&mut SerialNumberGenerator::starting_at(100), 100);
    }

    #[test]
    fn next_number_is_settable() {
        let mut generator = SerialNumberGenerator::new();
        assert_sequence(&mut generator, 0);

        generator.set_next(0);
        assert_sequence(&mut generator, 0);

        generator.set_next(100);
        assert_eq!(generator.peek(), 100);
        assert_sequence(&mut generator, 100);
    }
}
