//! Name matching between target and source columns

use std::collections::HashMap;

/// Pair each target with the source whose name matches case-insensitively
///
/// Returns (target, source) pairs in target order. Targets with no match are
/// skipped. If several sources fold to the same lowercase name, the last one
/// wins.
pub fn match_case_insensitive<T, S>(targets: &[T], sources: &[S]) -> Vec<(String, String)>
where
    T: AsRef<str>,
    S: AsRef<str>,
{
    // Build source lookup
    let source_lookup: HashMap<String, &str> = sources
        .iter()
        .map(|s| (s.as_ref().to_lowercase(), s.as_ref()))
        .collect();

    targets
        .iter()
        .filter_map(|target| {
            let target = target.as_ref();
            source_lookup
                .get(&target.to_lowercase())
                .map(|source| (target.to_string(), source.to_string()))
        })
        .collect()
}
