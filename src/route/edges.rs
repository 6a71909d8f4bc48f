use std::collections::BTreeMap;

use crate::compile::layout::{Edge, EdgeKind, MemberNode, VersionBox};

/// Annotation for a migration whose target role is unknown.
pub const JOINED_NOTE: &str = "Joined";

/// Connect consecutive appearances of every artist.
///
/// Appearances are ordered by their lineup's start year, then x; equal keys keep placement
/// order. Each adjacent pair yields one edge: `continuity` within a band, `migration` across
/// bands. Edges leave the bottom of the earlier member's text block and land on the later
/// member's tick on its beam. Members whose version is missing are skipped.
pub fn route_edges(
    members: &[MemberNode],
    versions: &BTreeMap<String, VersionBox>,
    text_block_height: f64,
) -> Vec<Edge> {
    let mut order = Vec::<&str>::new();
    let mut history = BTreeMap::<&str, Vec<(f64, &MemberNode)>>::new();
    for m in members {
        let Some(version) = versions.get(&m.version_id) else {
            tracing::debug!(member = %m.id, "member without a placed version; skipping");
            continue;
        };
        let appearances = history.entry(m.artist_id.as_str()).or_insert_with(|| {
            order.push(m.artist_id.as_str());
            Vec::new()
        });
        appearances.push((version.start_year, m));
    }

    let mut edges = Vec::new();
    for artist_id in order {
        let Some(appearances) = history.get_mut(artist_id) else {
            continue;
        };
        appearances.sort_by(|(ya, a), (yb, b)| ya.total_cmp(yb).then_with(|| a.x.total_cmp(&b.x)));
        for pair in appearances.windows(2) {
            let (from, to) = (pair[0].1, pair[1].1);
            edges.push(connect(from, to, text_block_height));
        }
    }
    edges
}

fn connect(from: &MemberNode, to: &MemberNode, text_block_height: f64) -> Edge {
    let (kind, note) = if from.band_id == to.band_id {
        (EdgeKind::Continuity, None)
    } else {
        (EdgeKind::Migration, Some(migration_note(to.role.as_deref())))
    };
    Edge {
        kind,
        artist_id: from.artist_id.clone(),
        from: from.id.clone(),
        to: to.id.clone(),
        x1: from.x,
        y1: from.y + text_block_height,
        x2: to.x,
        y2: to.beam_y,
        note,
    }
}

/// `"To <first role>"` for a known role, otherwise [`JOINED_NOTE`].
pub fn migration_note(role: Option<&str>) -> String {
    role.and_then(|r| r.split(',').next())
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map_or_else(|| JOINED_NOTE.to_string(), |r| format!("To {r}"))
}

#[cfg(test)]
#[path = "../../tests/unit/route/edges.rs"]
mod tests;
