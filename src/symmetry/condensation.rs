use std::collections::BTreeSet;

/// Condenses pairwise symmetrizations into maximal groups.
///
/// Starts from one group per pair and repeatedly merges two intersecting
/// groups, but only if every element added to a group forms a candidate pair
/// with every element already in it. Groups contained in a merged group are
/// dropped. Runs until no merge applies. The result is sorted.
///
/// # Arguments
/// * `pairs` - unordered candidate pairs; `(a, b)` and `(b, a)` are the same pair
pub fn condense<T>(pairs: &[(T, T)]) -> Vec<BTreeSet<T>>
where
    T: Ord + Copy,
{
    let candidates = pairs
        .iter()
        .map(|&(a, b)| ordered(a, b))
        .collect::<BTreeSet<_>>();
    let mut groups = candidates
        .iter()
        .map(|&(a, b)| BTreeSet::from([a, b]))
        .collect::<Vec<_>>();

    while let Some((i, j)) = find_merge(&groups, &candidates) {
        let absorbed = groups.swap_remove(j);
        groups[i].extend(absorbed);
        let merged = groups[i].clone();
        let mut position = 0;
        groups.retain(|group| {
            let keep = position == i || !group.is_subset(&merged);
            position += 1;
            keep
        });
    }

    groups.sort();
    groups
}

fn ordered<T: Ord>(a: T, b: T) -> (T, T) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Returns the positions `(i, j)`, `i < j`, of the first pair of groups that
/// can be merged.
fn find_merge<T>(groups: &[BTreeSet<T>], candidates: &BTreeSet<(T, T)>) -> Option<(usize, usize)>
where
    T: Ord + Copy,
{
    (0..groups.len())
        .flat_map(|i| (i + 1..groups.len()).map(move |j| (i, j)))
        .find(|&(i, j)| {
            let (present, added) = (&groups[i], &groups[j]);
            !present.is_disjoint(added)
                && added.difference(present).all(|&new| {
                    present
                        .iter()
                        .all(|&old| candidates.contains(&ordered(new, old)))
                })
        })
}
