//! Collision-free naming.
//!
//! Names of tasks, inputs, and outputs must be unique within their
//! namespace. When a desired name is taken the first free `"{name} {n}"`
//! with `n >= 2` is used instead.

/// Return `base` if it is free, otherwise `"{base} 2"`, `"{base} 3"`, ...
///
/// `is_taken` decides membership, so callers can check several namespaces
/// at once (existing ids plus names introduced earlier in the same rewrite).
pub fn unique_name(base: &str, is_taken: impl Fn(&str) -> bool) -> String {
    if !is_taken(base) {
        return base.to_string();
    }
    let mut n = 2usize;
    loop {
        let candidate = format!("{base} {n}");
        if !is_taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn free_name_unchanged() {
        let taken: HashSet<&str> = HashSet::new();
        assert_eq!(unique_name("train", |n| taken.contains(n)), "train");
    }

    #[test]
    fn suffix_increments() {
        let taken: HashSet<&str> = ["train", "train 2"].into_iter().collect();
        assert_eq!(unique_name("train", |n| taken.contains(n)), "train 3");
    }

    #[test]
    fn gaps_are_filled_first() {
        let taken: HashSet<&str> = ["x", "x 3"].into_iter().collect();
        assert_eq!(unique_name("x", |n| taken.contains(n)), "x 2");
    }
}
