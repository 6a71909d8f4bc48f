use std::collections::BTreeSet;

use crate::{
    compile::layout::CompileWarning,
    foundation::core::{UNKNOWN_YEAR, YearSpan},
    graph::model::{BandDef, MembershipDef},
};

/// Name used for bands that arrive without one.
pub const UNKNOWN_BAND_NAME: &str = "Unknown";

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Defaults applied when years are missing.
pub struct YearDefaults {
    /// Year used when neither a membership nor its band is dated.
    pub fallback_year: f64,
    /// Span given to a dated band whose resolved end does not follow its start.
    pub min_span_years: f64,
}

impl Default for YearDefaults {
    fn default() -> Self {
        Self {
            fallback_year: UNKNOWN_YEAR,
            min_span_years: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// A band with every optional field resolved.
pub struct NormalizedBand {
    /// External identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Resolved band lifespan.
    pub span: YearSpan,
    /// `false` when no year at all was known and `span` is pure fallback.
    pub dated: bool,
    /// Deduplicated tenures in input order.
    pub memberships: Vec<Membership>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// One tenure with resolved years.
pub struct Membership {
    /// Position in the band's deduplicated input list; the stable tie-breaker.
    pub index: usize,
    /// External artist identifier.
    pub artist_id: String,
    /// Display name (falls back to the id).
    pub artist_name: String,
    /// Role, when known and non-blank.
    pub role: Option<String>,
    /// Resolved tenure.
    pub span: YearSpan,
    /// Ordering hint within a lineup.
    pub position: Option<i64>,
}

/// Band start precedence: declared start, earliest member start, earliest member end.
pub fn resolve_band_start(band: &BandDef) -> Option<f64> {
    band.start_year
        .or_else(|| min_year(band.all_members.iter().filter_map(|m| m.start_year)))
        .or_else(|| min_year(band.all_members.iter().filter_map(|m| m.end_year)))
}

/// Band end precedence: declared end, latest member end, latest member start.
pub fn resolve_band_end(band: &BandDef) -> Option<f64> {
    band.end_year
        .or_else(|| max_year(band.all_members.iter().filter_map(|m| m.end_year)))
        .or_else(|| max_year(band.all_members.iter().filter_map(|m| m.start_year)))
}

/// Resolve the band's lifespan, returning `(span, dated)`.
///
/// An undated band collapses onto `fallback_year` with zero length. A dated band always spans
/// at least `min_span_years`.
pub fn resolve_band_span(band: &BandDef, defaults: YearDefaults) -> (YearSpan, bool) {
    let start = resolve_band_start(band);
    let end = resolve_band_end(band);
    let (start, end) = match (start, end) {
        (None, None) => {
            let y = defaults.fallback_year;
            return (YearSpan { start: y, end: y }, false);
        }
        (Some(s), None) => (s, s),
        (None, Some(e)) => (e, e),
        (Some(s), Some(e)) => (s, e),
    };
    let end = if end <= start {
        start + defaults.min_span_years
    } else {
        end
    };
    (YearSpan { start, end }, true)
}

/// Tenure precedence: own year, then the band's resolved bound.
///
/// A tenure ending before it starts is clamped to zero length.
pub fn resolve_membership_span(m: &MembershipDef, band_span: YearSpan) -> YearSpan {
    let start = m.start_year.unwrap_or(band_span.start);
    let end = m.end_year.unwrap_or(band_span.end);
    if end < start {
        tracing::debug!(
            artist = %m.artist_id,
            start,
            end,
            "membership ends before it starts; clamping to zero length"
        );
        return YearSpan { start, end: start };
    }
    YearSpan { start, end }
}

/// Resolve names and years, dropping repeated (artist, start year) tenures.
pub fn normalize_band(
    id: &str,
    band: &BandDef,
    defaults: YearDefaults,
    warnings: &mut Vec<CompileWarning>,
) -> NormalizedBand {
    let (span, dated) = resolve_band_span(band, defaults);
    if !dated {
        tracing::debug!(band = %id, fallback = defaults.fallback_year, "band has no dates");
    }

    let mut seen = BTreeSet::<(String, Option<u64>)>::new();
    let mut memberships = Vec::with_capacity(band.all_members.len());
    for m in &band.all_members {
        let key = (m.artist_id.clone(), m.start_year.map(f64::to_bits));
        if !seen.insert(key) {
            tracing::warn!(
                band = %id,
                artist = %m.artist_id,
                start_year = ?m.start_year,
                "duplicate membership dropped"
            );
            warnings.push(CompileWarning::DuplicateMembership {
                band_id: id.to_string(),
                artist_id: m.artist_id.clone(),
                start_year: m.start_year,
            });
            continue;
        }
        memberships.push(Membership {
            index: memberships.len(),
            artist_id: m.artist_id.clone(),
            artist_name: non_blank(m.artist_name.as_deref())
                .unwrap_or(m.artist_id.as_str())
                .to_string(),
            role: non_blank(m.role.as_deref()).map(str::to_string),
            span: resolve_membership_span(m, span),
            position: m.position,
        });
    }

    NormalizedBand {
        id: id.to_string(),
        name: non_blank(band.name.as_deref())
            .unwrap_or(UNKNOWN_BAND_NAME)
            .to_string(),
        span,
        dated,
        memberships,
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn min_year(it: impl Iterator<Item = f64>) -> Option<f64> {
    it.fold(None, |acc, y| Some(acc.map_or(y, |a: f64| a.min(y))))
}

fn max_year(it: impl Iterator<Item = f64>) -> Option<f64> {
    it.fold(None, |acc, y| Some(acc.map_or(y, |a: f64| a.max(y))))
}

#[cfg(test)]
#[path = "../../tests/unit/graph/normalize.rs"]
mod tests;
