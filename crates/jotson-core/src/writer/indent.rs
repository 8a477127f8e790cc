//! Memoized indentation prefixes
//!
//! The pretty writer asks for the same few depths over and over; prefixes
//! are synthesized once per depth and reused for the rest of the session.

/// Lazily grown table of indentation prefixes, one per nesting depth.
///
/// `indent(depth)` is observably equivalent to `" ".repeat(depth * factor)`
/// for every depth, including depths never seen before.
#[derive(Debug)]
pub struct IndentCache {
    factor: usize,
    prefixes: Vec<String>,
}

impl IndentCache {
    /// Create a cache producing `factor` spaces per nesting level.
    pub fn new(factor: usize) -> Self {
        Self {
            factor,
            prefixes: vec![String::new()],
        }
    }

    /// Spaces per nesting level.
    pub fn factor(&self) -> usize {
        self.factor
    }

    /// The whitespace prefix for `depth` levels of nesting.
    pub fn indent(&mut self, depth: usize) -> &str {
        while self.prefixes.len() <= depth {
            let next = self.prefixes.len() * self.factor;
            self.prefixes.push(" ".repeat(next));
        }
        &self.prefixes[depth]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_repeat_for_every_depth() {
        let mut cache = IndentCache::new(2);
        for depth in 0..12 {
            assert_eq!(cache.indent(depth), " ".repeat(depth * 2));
        }
    }

    #[test]
    fn test_idempotent_per_depth() {
        let mut cache = IndentCache::new(4);
        let first = cache.indent(3).to_owned();
        let second = cache.indent(3).to_owned();
        assert_eq!(first, second);
        assert_eq!(first.len(), 12);
    }

    #[test]
    fn test_out_of_order_requests() {
        let mut cache = IndentCache::new(2);
        assert_eq!(cache.indent(5), "          ");
        assert_eq!(cache.indent(1), "  ");
        assert_eq!(cache.indent(0), "");
    }

    #[test]
    fn test_zero_factor() {
        let mut cache = IndentCache::new(0);
        assert_eq!(cache.indent(7), "");
    }
}
