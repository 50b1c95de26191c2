use rand::seq::SliceRandom;

/// How many search results a handler shows at once.
pub const DISPLAY_LIMIT: usize = 5;

/// Picks up to [`DISPLAY_LIMIT`] rows uniformly at random, without
/// replacement, so long result sets stay digestible.
pub fn pick_for_display<T>(rows: &[T]) -> Vec<&T> {
    let mut rng = rand::thread_rng();
    rows.choose_multiple(&mut rng, DISPLAY_LIMIT.min(rows.len()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_empty_input_yields_no_rows() {
        let rows: Vec<u32> = Vec::new();
        assert!(pick_for_display(&rows).is_empty());
    }

    #[test]
    fn test_small_input_is_returned_whole() {
        let rows = vec![1, 2, 3];
        let picked = pick_for_display(&rows);
        assert_eq!(picked.len(), 3);
    }

    #[test]
    fn test_large_input_is_capped_without_duplicates() {
        let rows: Vec<u32> = (0..100).collect();
        for _ in 0..20 {
            let picked = pick_for_display(&rows);
            assert_eq!(picked.len(), DISPLAY_LIMIT);
            let distinct: HashSet<u32> = picked.iter().map(|&&v| v).collect();
            assert_eq!(distinct.len(), DISPLAY_LIMIT, "sampling must not repeat rows");
        }
    }
}
