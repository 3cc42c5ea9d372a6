//! Groups tournament winners into mating pairs.

use std::collections::{BTreeMap, BTreeSet};

/// Pairs selected indices while avoiding pairing the same two indices twice.
///
/// Distinct indices are paired smallest first, each with the smallest partner
/// it has not been paired with yet, consuming one selection of each. Once no
/// fresh pair can be formed, the distinct indices that still have selections
/// left are paired in ascending order, and a final odd one is paired with
/// itself.
///
/// # Examples
///
/// ```
/// use fjsp_evo::selection::unique_pairs;
///
/// assert_eq!(unique_pairs(&[3, 1, 2, 1]), vec![(1, 2), (1, 3)]);
/// assert_eq!(unique_pairs(&[4, 4, 4]), vec![(4, 4)]);
/// ```
pub fn unique_pairs(selected: &[usize]) -> Vec<(usize, usize)> {
    let mut remaining: BTreeMap<usize, usize> = BTreeMap::new();
    for &index in selected {
        *remaining.entry(index).or_insert(0) += 1;
    }

    let mut unpaired: BTreeSet<usize> = remaining.keys().copied().collect();
    let mut used: BTreeSet<(usize, usize)> = BTreeSet::new();
    let mut pairs = Vec::new();

    while unpaired.len() > 1 {
        let mut candidates = unpaired.iter().copied();
        let Some(first) = candidates.next() else {
            break;
        };
        let Some(second) = candidates.find(|&c| !used.contains(&(first, c))) else {
            break;
        };

        pairs.push((first, second));
        used.insert((first, second));
        used.insert((second, first));

        for index in [first, second] {
            if let Some(count) = remaining.get_mut(&index) {
                *count -= 1;
                if *count == 0 {
                    unpaired.remove(&index);
                }
            }
        }
    }

    unpaired.extend(
        remaining
            .iter()
            .filter(|&(_, &count)| count > 0)
            .map(|(&index, _)| index),
    );

    let leftovers: Vec<usize> = unpaired.into_iter().collect();
    let mut chunks = leftovers.chunks_exact(2);
    for chunk in &mut chunks {
        pairs.push((chunk[0], chunk[1]));
    }
    if let [single] = chunks.remainder() {
        pairs.push((*single, *single));
    }

    pairs
}
