use crate::models::{MergeRegion, OutputRow};

/// Split `rows` into maximal runs of the same symbol.
///
/// Every row lands in exactly one region, single-row runs included; callers
/// decide whether a one-row region is worth merging (see
/// [`MergeRegion::is_mergeable`]).
pub fn compute_regions(rows: &[OutputRow]) -> Vec<MergeRegion> {
    let mut regions = Vec::new();
    let Some(first) = rows.first() else {
        return regions;
    };

    let mut run_symbol = first.symbol.as_str();
    let mut run_start = 0;

    for (i, row) in rows.iter().enumerate().skip(1) {
        if row.symbol != run_symbol {
            regions.push(MergeRegion { start: run_start, end: i - 1 });
            run_symbol = row.symbol.as_str();
            run_start = i;
        }
    }
    regions.push(MergeRegion { start: run_start, end: rows.len() - 1 });

    regions
}
