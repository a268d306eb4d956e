use crate::path_key::PathKey;

/// Computes the ancestors missing from `keys`.
///
/// Every strict, non-empty prefix of every input key ends up either in the
/// input or in the returned list. Keys are walked in sorted order while
/// remembering the previous key; for each key only the prefixes deeper than
/// what it shares with the previous key are emitted, so an ancestor implied
/// by an earlier sibling is not produced twice.
///
/// The root (empty key) is never emitted. Inputs are expected to be unique;
/// a duplicated key does not add extra ancestors.
///
/// # Arguments
///
/// * `keys` - Keys of the real records, in any order
///
/// # Examples
///
/// ```
/// use rhier::{synthesize_ancestors, PathKey};
///
/// let keys = vec![PathKey::from(["US", "East", "Ontario"])];
/// let ancestors = synthesize_ancestors(&keys);
/// assert_eq!(ancestors, vec![PathKey::from(["US"]), PathKey::from(["US", "East"])]);
/// ```
pub fn synthesize_ancestors<'a, I>(keys: I) -> Vec<PathKey>
where
    I: IntoIterator<Item = &'a PathKey>,
{
    let mut sorted: Vec<&PathKey> = keys.into_iter().collect();
    sorted.sort();

    let mut ancestors = Vec::new();
    let root = PathKey::root();
    let mut prev: &PathKey = &root;

    for curr in sorted {
        let parent_len = curr.len().saturating_sub(1);
        // First position in the parent chain that `prev` does not share.
        let diverge = prev.common_prefix_len(curr).min(parent_len);
        for len in (diverge + 1)..=parent_len {
            ancestors.push(curr.prefix(len));
        }
        prev = curr;
    }

    ancestors
}
