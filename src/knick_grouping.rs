//! Collapse clusters of neighbouring knick points to one representative each

/// Greedy left-to-right clustering of ascending positions: a position joins
/// the current group while it is less than `gap` past the last member.
pub fn group_knick_points(sorted_positions: &[usize], gap: usize) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();

    for &position in sorted_positions {
        let extends_current = groups
            .last()
            .and_then(|group| group.last())
            .is_some_and(|&last| position - last < gap);

        match groups.last_mut() {
            Some(group) if extends_current => group.push(position),
            _ => groups.push(vec![position]),
        }
    }

    groups
}

/// `|(N - p) - (p - 1)|` for a profile of `profile_len` samples.
pub fn representative_score(position: usize, profile_len: usize) -> usize {
    let from_end = profile_len as i64 - position as i64;
    let from_start = position as i64 - 1;
    (from_end - from_start).unsigned_abs() as usize
}

/// Member with the lowest score; ties go to the smaller position.
pub fn select_representative(group: &[usize], profile_len: usize) -> Option<usize> {
    group
        .iter()
        .copied()
        .min_by_key(|&p| (representative_score(p, profile_len), p))
}

/// One representative position per group, in position order.
pub fn representatives(groups: &[Vec<usize>], profile_len: usize) -> Vec<usize> {
    let mut selected: Vec<usize> = groups
        .iter()
        .filter_map(|g| select_representative(g, profile_len))
        .collect();
    selected.sort_unstable();
    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_partition_input() {
        let inputs: [&[usize]; 4] = [
            &[],
            &[7],
            &[1, 2, 3, 8, 9, 15],
            &[2, 5, 8, 11, 30, 31, 33, 40],
        ];
        for positions in inputs {
            for gap in 1..6 {
                let groups = group_knick_points(positions, gap);
                let flattened: Vec<usize> = groups.iter().flatten().copied().collect();
                assert_eq!(flattened, positions.to_vec());
                assert!(groups.iter().all(|g| !g.is_empty()));
            }
        }
    }

    #[test]
    fn test_gap_is_strict() {
        assert_eq!(
            group_knick_points(&[1, 2, 3, 8, 9, 15], 3),
            vec![vec![1, 2, 3], vec![8, 9], vec![15]]
        );
        // A difference of exactly `gap` starts a new group
        assert_eq!(group_knick_points(&[4, 7, 10], 3), vec![vec![4], vec![7], vec![10]]);
        assert_eq!(group_knick_points(&[4, 7, 10], 4), vec![vec![4, 7, 10]]);
        // gap 1 never merges distinct positions
        assert_eq!(group_knick_points(&[3, 4], 1), vec![vec![3], vec![4]]);
    }

    #[test]
    fn test_representative_minimises_score() {
        // 20 samples: the member nearest mid-profile wins
        assert_eq!(select_representative(&[3, 4, 5], 20), Some(5));
        assert_eq!(select_representative(&[15, 16, 17], 20), Some(15));
    }

    #[test]
    fn test_representative_tie_goes_to_smaller_position() {
        // N = 10: score(5) = |5 - 4| = 1, score(6) = |4 - 5| = 1
        assert_eq!(representative_score(5, 10), 1);
        assert_eq!(representative_score(6, 10), 1);
        assert_eq!(select_representative(&[5, 6], 10), Some(5));
        assert_eq!(select_representative(&[], 10), None);
    }

    #[test]
    fn test_representatives_are_ordered() {
        let groups = vec![vec![2, 3], vec![9], vec![14, 15, 16]];
        assert_eq!(representatives(&groups, 20), vec![3, 9, 14]);
    }
}
