//! Key-sequence detector for the multi-shot cheat
//!
//! A strict exact-sequence matcher: progress advances on the expected key and
//! drops to zero on anything else. The mismatching key is not re-tested as the
//! start of a new attempt.

use serde::{Deserialize, Serialize};

/// Discrete key presses the host forwards to the core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Fire,
    /// Any key the core has no meaning for
    Other,
}

impl Key {
    pub const DEFAULT_SEQUENCE: [Key; 9] = [
        Key::Up,
        Key::Up,
        Key::Down,
        Key::Down,
        Key::Left,
        Key::Right,
        Key::Left,
        Key::Right,
        Key::Fire,
    ];
}

/// Outcome of feeding one key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub progress: usize,
    pub completed: bool,
}

/// Advance the matcher by one key.
///
/// `progress` is the number of keys matched so far. A completed sequence
/// reports `completed` and returns progress to zero.
pub fn step(sequence: &[Key], progress: usize, key: Key) -> Step {
    let matched = sequence.get(progress).is_some_and(|&expected| expected == key);
    if !matched {
        return Step {
            progress: 0,
            completed: false,
        };
    }

    let progress = progress + 1;
    if progress == sequence.len() {
        Step {
            progress: 0,
            completed: true,
        }
    } else {
        Step {
            progress,
            completed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(keys: &[Key]) -> (usize, usize) {
        let mut progress = 0;
        let mut completions = 0;
        for &key in keys {
            let s = step(&Key::DEFAULT_SEQUENCE, progress, key);
            progress = s.progress;
            completions += s.completed as usize;
        }
        (progress, completions)
    }

    #[test]
    fn test_full_sequence_completes() {
        assert_eq!(feed(&Key::DEFAULT_SEQUENCE), (0, 1));
    }

    #[test]
    fn test_partial_sequence_keeps_progress() {
        assert_eq!(feed(&Key::DEFAULT_SEQUENCE[..4]), (4, 0));
    }

    #[test]
    fn test_wrong_key_resets() {
        let mut keys = Key::DEFAULT_SEQUENCE.to_vec();
        keys[5] = Key::Other;
        assert_eq!(feed(&keys), (0, 0));
    }

    #[test]
    fn test_strict_reset_does_not_restart_on_mismatch() {
        // Up, Up, Up: the third Up mismatches (expected Down) and resets to 0
        // instead of counting as the start of a new attempt.
        assert_eq!(feed(&[Key::Up, Key::Up, Key::Up]), (0, 0));
    }

    #[test]
    fn test_two_sequences_complete_twice() {
        let mut keys = Key::DEFAULT_SEQUENCE.to_vec();
        keys.extend_from_slice(&Key::DEFAULT_SEQUENCE);
        assert_eq!(feed(&keys), (0, 2));
    }
}
