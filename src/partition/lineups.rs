use std::collections::BTreeSet;

use crate::{
    compile::layout::CompileWarning,
    foundation::core::{YearSpan, display_year},
    foundation::error::BandtreeResult,
    graph::model::Graph,
    graph::normalize::{Membership, NormalizedBand, YearDefaults, normalize_band},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// A maximal epoch during which a band's active member set does not change.
pub struct Lineup {
    /// Owning band.
    pub band_id: String,
    /// Sequence number within the band, starting at 1.
    pub number: u32,
    /// Epoch covered by this lineup.
    pub span: YearSpan,
    /// Active tenures in lineup order (position hint, then input order).
    pub members: Vec<Membership>,
}

impl Lineup {
    /// `<band_id>_<number>`.
    pub fn version_id(&self) -> String {
        format!("{}_{}", self.band_id, self.number)
    }

    /// `#<n> (<start> - <end>)` with whole years.
    pub fn sublabel(&self) -> String {
        format!(
            "#{} ({} - {})",
            self.number,
            display_year(self.span.start),
            display_year(self.span.end)
        )
    }

    /// Identity set of the active members.
    pub fn artist_ids(&self) -> BTreeSet<&str> {
        self.members.iter().map(|m| m.artist_id.as_str()).collect()
    }

    /// `true` when `artist_id` is active in this lineup.
    pub fn has_artist(&self, artist_id: &str) -> bool {
        self.members.iter().any(|m| m.artist_id == artist_id)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// A normalized band together with its lineups.
pub struct PartitionedBand {
    /// Resolved band data.
    pub band: NormalizedBand,
    /// Chronological, non-overlapping lineups.
    pub lineups: Vec<Lineup>,
}

impl PartitionedBand {
    /// Span from the first lineup's start to the last lineup's end.
    pub fn active_span(&self) -> Option<YearSpan> {
        let first = self.lineups.first()?;
        let last = self.lineups.last()?;
        Some(YearSpan {
            start: first.span.start,
            end: last.span.end,
        })
    }
}

/// Every distinct year at which the band's membership may change, ascending.
pub fn boundary_years(band: &NormalizedBand) -> Vec<f64> {
    let mut years = Vec::with_capacity(band.memberships.len() * 2 + 2);
    if band.dated {
        years.push(band.span.start);
        years.push(band.span.end);
    }
    for m in &band.memberships {
        years.push(m.span.start);
        years.push(m.span.end);
    }
    years.sort_by(f64::total_cmp);
    years.dedup();
    years
}

/// Split a band's history into lineups.
///
/// A tenure is active in `[s, e)` when it contains the midpoint `s + (e - s) / 2`. Empty epochs
/// are skipped; an epoch whose active set equals the directly preceding lineup's set extends
/// that lineup instead of opening a new one.
pub fn partition_band(band: &NormalizedBand) -> Vec<Lineup> {
    let years = boundary_years(band);

    let mut ordered: Vec<&Membership> = band.memberships.iter().collect();
    ordered.sort_by_key(|m| (m.position.is_none(), m.position, m.index));

    let mut lineups = Vec::<Lineup>::new();
    for w in years.windows(2) {
        let span = YearSpan {
            start: w[0],
            end: w[1],
        };
        let mid = span.midpoint();

        let mut ids = BTreeSet::<&str>::new();
        let mut members = Vec::new();
        for m in &ordered {
            if m.span.is_empty() || !m.span.contains(mid) {
                continue;
            }
            if ids.insert(m.artist_id.as_str()) {
                members.push((*m).clone());
            }
        }
        if members.is_empty() {
            continue;
        }

        let unchanged = lineups
            .last()
            .is_some_and(|prev| prev.span.end == span.start && prev.artist_ids() == ids);
        if unchanged && let Some(prev) = lineups.last_mut() {
            tracing::debug!(
                band = %band.id,
                lineup = prev.number,
                end = span.end,
                "extending lineup with unchanged member set"
            );
            prev.span.end = span.end;
            continue;
        }

        lineups.push(Lineup {
            band_id: band.id.clone(),
            number: lineups.len() as u32 + 1,
            span,
            members,
        });
    }
    lineups
}

/// Normalize and partition every band of a graph, in band-id order.
#[tracing::instrument(skip(graph), fields(bands = graph.bands.len()))]
pub fn partition_graph(
    graph: &Graph,
    defaults: YearDefaults,
) -> BandtreeResult<(Vec<PartitionedBand>, Vec<CompileWarning>)> {
    graph.validate()?;

    let mut warnings = Vec::new();
    let mut out = Vec::with_capacity(graph.bands.len());
    for (id, def) in &graph.bands {
        let band = normalize_band(id, def, defaults, &mut warnings);
        let lineups = partition_band(&band);
        if lineups.is_empty() {
            tracing::debug!(band = %id, "band produced no lineups");
        }
        out.push(PartitionedBand { band, lineups });
    }
    Ok((out, warnings))
}

#[cfg(test)]
#[path = "../../tests/unit/partition/lineups.rs"]
mod tests;
