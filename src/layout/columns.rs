use std::collections::{BTreeMap, BTreeSet};

use crate::partition::lineups::Lineup;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Column chosen for one member of one lineup.
pub struct ColumnSlot {
    pub artist_id: String,
    pub column: u32,
    pub is_replacement: bool,
    /// Name of the member who last held `column`, set for replacements.
    pub replaced_from: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Columns for every lineup of one band.
pub struct BandColumns {
    /// One entry per lineup; slots follow the lineup's member order.
    pub lineups: Vec<Vec<ColumnSlot>>,
    /// Number of distinct columns the band needs.
    pub column_count: u32,
}

/// Assign each member of each lineup a stable column.
///
/// Members carried over from the previous lineup keep their column. Members returning after an
/// absence reclaim their old column when it is free. Everyone else takes the lowest column
/// vacated since the previous lineup (becoming a replacement of its last holder) and, once
/// those run out, a fresh column.
pub fn assign_columns(lineups: &[Lineup]) -> BandColumns {
    let mut column_of = BTreeMap::<&str, u32>::new();
    let mut holder_of = BTreeMap::<u32, &str>::new();
    let mut prev_ids = BTreeSet::<&str>::new();
    let mut next_free = 0u32;
    let mut out = Vec::with_capacity(lineups.len());

    for lineup in lineups {
        let ids: BTreeSet<&str> = lineup.members.iter().map(|m| m.artist_id.as_str()).collect();
        let mut slots: Vec<Option<ColumnSlot>> = vec![None; lineup.members.len()];
        let mut taken = BTreeSet::<u32>::new();

        for (slot, m) in slots.iter_mut().zip(&lineup.members) {
            let id = m.artist_id.as_str();
            if prev_ids.contains(id)
                && let Some(&column) = column_of.get(id)
            {
                taken.insert(column);
                *slot = Some(kept(id, column));
            }
        }

        for (slot, m) in slots.iter_mut().zip(&lineup.members) {
            let id = m.artist_id.as_str();
            if slot.is_some() {
                continue;
            }
            if let Some(&column) = column_of.get(id)
                && taken.insert(column)
            {
                *slot = Some(kept(id, column));
            }
        }

        let mut vacated: Vec<u32> = prev_ids
            .iter()
            .filter(|id| !ids.contains(*id))
            .filter_map(|id| column_of.get(id).copied())
            .filter(|c| !taken.contains(c))
            .collect::<BTreeSet<u32>>()
            .into_iter()
            .rev()
            .collect();

        for (slot, m) in slots.iter_mut().zip(&lineup.members) {
            if slot.is_some() {
                continue;
            }
            let id = m.artist_id.as_str();
            *slot = Some(match vacated.pop() {
                Some(column) => ColumnSlot {
                    artist_id: id.to_string(),
                    column,
                    is_replacement: true,
                    replaced_from: holder_of.get(&column).map(|s| s.to_string()),
                },
                None => {
                    let column = next_free;
                    next_free += 1;
                    kept(id, column)
                }
            });
        }

        let slots: Vec<ColumnSlot> = slots.into_iter().flatten().collect();
        for (slot, m) in slots.iter().zip(&lineup.members) {
            column_of.insert(m.artist_id.as_str(), slot.column);
            holder_of.insert(slot.column, m.artist_name.as_str());
        }
        prev_ids = ids;
        out.push(slots);
    }

    BandColumns {
        lineups: out,
        column_count: next_free,
    }
}

fn kept(artist_id: &str, column: u32) -> ColumnSlot {
    ColumnSlot {
        artist_id: artist_id.to_string(),
        column,
        is_replacement: false,
        replaced_from: None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/columns.rs"]
mod tests;
