use std::collections::BTreeMap;

use crate::{
    compile::layout::{CanvasSize, CompileWarning, Layout, MemberNode, VersionBox},
    foundation::core::Rect,
    foundation::error::{BandtreeError, BandtreeResult},
    graph::model::Graph,
    layout::collision::{BoxRequest, PlacementPass, SearchParams, place_boxes},
    layout::columns::{BandColumns, assign_columns},
    layout::config::{LayoutConfig, LayoutMode},
    layout::lanes::{BandExtent, pack_lanes},
    partition::lineups::{PartitionedBand, partition_graph},
    route::edges::route_edges,
};

/// A band ready for placement: its lineups, columns and box width.
struct BandPlan<'a> {
    band: &'a PartitionedBand,
    columns: BandColumns,
    width: f64,
}

/// Compile a membership graph into a renderable layout.
///
/// The call is pure: identical inputs give identical layouts, and no state survives between
/// calls. Data-quality issues end up in [`Layout::warnings`]; only structurally invalid input or
/// configuration is an error.
#[tracing::instrument(skip(graph, config), fields(bands = graph.bands.len(), mode = ?config.mode))]
pub fn compile_layout(graph: &Graph, config: &LayoutConfig) -> BandtreeResult<Layout> {
    config.validate()?;
    if graph.is_empty() {
        tracing::debug!("empty graph; nothing to place");
        return Ok(Layout::default());
    }

    let (bands, mut warnings) = partition_graph(graph, config.year_defaults())?;

    let plans: Vec<BandPlan<'_>> = bands
        .iter()
        .filter(|b| !b.lineups.is_empty())
        .map(|band| {
            let columns = assign_columns(&band.lineups);
            let width = f64::from(columns.column_count.max(1)) * config.member_width
                + 2.0 * config.box_padding;
            BandPlan {
                band,
                columns,
                width,
            }
        })
        .collect();

    let Some(min_year) = plans
        .iter()
        .filter_map(|p| p.band.active_span())
        .map(|s| s.start)
        .min_by(f64::total_cmp)
    else {
        return Ok(Layout {
            warnings,
            ..Layout::default()
        });
    };

    let (requests, origins) = box_requests(&plans, config, min_year);
    let pass = place_boxes(
        &requests,
        config.canvas_width / 2.0,
        SearchParams {
            step: config.search_step,
            max_steps: config.max_search_steps,
            margin: config.margin,
        },
    );
    warnings.extend(
        pass.overflows()
            .map(|(id, steps)| CompileWarning::PlacementOverflow {
                version_id: id.to_string(),
                steps,
            }),
    );

    let rects = shifted_rects(&pass, config.left_padding);

    let mut versions = BTreeMap::new();
    let mut members = Vec::new();
    for ((req, &(plan_idx, lineup_idx)), rect) in requests.iter().zip(&origins).zip(&rects) {
        let plan = &plans[plan_idx];
        let lineup = &plan.band.lineups[lineup_idx];
        let slots = plan.columns.lineups.get(lineup_idx).ok_or_else(|| {
            BandtreeError::layout(format!("no column plan for version '{}'", req.id))
        })?;

        let beam_y = rect.y0 + config.header_height;
        for (slot, m) in slots.iter().zip(&lineup.members) {
            members.push(MemberNode {
                id: format!("{}_{}", req.id, m.artist_id),
                artist_id: m.artist_id.clone(),
                version_id: req.id.clone(),
                band_id: plan.band.band.id.clone(),
                name: m.artist_name.clone(),
                role: m.role.clone(),
                column: slot.column,
                x: rect.x0 + config.box_padding + f64::from(slot.column) * config.member_width,
                y: beam_y + config.member_drop,
                beam_y,
                start_year: m.span.start,
                end_year: m.span.end,
                is_replacement: slot.is_replacement,
                replaced_from: slot.replaced_from.clone(),
            });
        }

        versions.insert(
            req.id.clone(),
            VersionBox {
                id: req.id.clone(),
                band_id: plan.band.band.id.clone(),
                band_name: plan.band.band.name.to_uppercase(),
                sublabel: lineup.sublabel(),
                number: lineup.number,
                start_year: lineup.span.start,
                end_year: lineup.span.end,
                x: rect.x0,
                y: rect.y0,
                width: rect.width(),
                height: rect.height(),
                beam_y,
            },
        );
    }

    let edges = route_edges(&members, &versions, config.text_block_height);
    let canvas = canvas_size(&rects, config);

    tracing::info!(
        versions = versions.len(),
        members = members.len(),
        edges = edges.len(),
        warnings = warnings.len(),
        "compiled layout"
    );

    Ok(Layout {
        canvas,
        versions,
        members,
        edges,
        warnings,
    })
}

/// Vertical pixels per year for this graph.
///
/// Starts from `px_per_year` and grows until the shortest lineup holds `min_box_height` plus
/// both margins within its own years, stopping at `max_px_per_year`.
fn vertical_scale(plans: &[BandPlan<'_>], config: &LayoutConfig) -> f64 {
    let shortest = plans
        .iter()
        .flat_map(|p| &p.band.lineups)
        .map(|l| l.span.len_years())
        .filter(|len| *len > 0.0)
        .min_by(f64::total_cmp);
    let Some(shortest) = shortest else {
        return config.px_per_year;
    };
    let needed = (config.min_box_height + 2.0 * config.margin) / shortest;
    let scale = needed.min(config.max_px_per_year).max(config.px_per_year);
    if scale > config.px_per_year {
        tracing::debug!(
            base = config.px_per_year,
            scale,
            shortest_years = shortest,
            "raised vertical scale to fit the shortest lineup"
        );
    }
    scale
}

/// Build one placement request per lineup, in (start year, band name, band id, number) order.
///
/// Box edges come straight from year positions, `year_y(start) + margin` down to
/// `year_y(end) - margin`, stretched to `min_box_height` but never past the band's next lineup.
/// Consecutive lineups of one band therefore meet exactly at their shared margin.
///
/// Returns the requests and, parallel to them, `(plan index, lineup index)` back-references.
fn box_requests(
    plans: &[BandPlan<'_>],
    config: &LayoutConfig,
    min_year: f64,
) -> (Vec<BoxRequest>, Vec<(usize, usize)>) {
    let scale = vertical_scale(plans, config);
    let year_y = |year: f64| config.top_padding + (year - min_year) * scale;

    let lane_x: BTreeMap<&str, f64> = match config.mode {
        LayoutMode::Canvas => BTreeMap::new(),
        LayoutMode::Lanes => {
            let extents: Vec<BandExtent> = plans
                .iter()
                .filter_map(|p| {
                    Some(BandExtent {
                        band_id: p.band.band.id.clone(),
                        name: p.band.band.name.clone(),
                        span: p.band.active_span()?,
                        width: p.width,
                    })
                })
                .collect();
            let packing = pack_lanes(&extents, config.left_padding, config.lane_gap);
            plans
                .iter()
                .filter_map(|p| {
                    let id = p.band.band.id.as_str();
                    packing.lane_for(id).map(|lane| (id, lane.x))
                })
                .collect()
        }
    };

    let mut origins: Vec<(usize, usize)> = plans
        .iter()
        .enumerate()
        .flat_map(|(pi, p)| (0..p.band.lineups.len()).map(move |li| (pi, li)))
        .collect();
    origins.sort_by(|&(pa, la), &(pb, lb)| {
        let (a, b) = (&plans[pa], &plans[pb]);
        let (la, lb) = (&a.band.lineups[la], &b.band.lineups[lb]);
        la.span
            .start
            .total_cmp(&lb.span.start)
            .then_with(|| a.band.band.name.cmp(&b.band.band.name))
            .then_with(|| a.band.band.id.cmp(&b.band.band.id))
            .then_with(|| la.number.cmp(&lb.number))
    });

    let requests = origins
        .iter()
        .map(|&(pi, li)| {
            let plan = &plans[pi];
            let lineup = &plan.band.lineups[li];
            let top = year_y(lineup.span.start) + config.margin;
            let mut bottom =
                (year_y(lineup.span.end) - config.margin).max(top + config.min_box_height);
            if let Some(next) = plan.band.lineups.get(li + 1) {
                let limit = year_y(next.span.start) - config.margin;
                if bottom > limit {
                    tracing::debug!(
                        version = %lineup.version_id(),
                        "box clipped to the start of the band's next lineup"
                    );
                    bottom = limit.max(top);
                }
            }
            BoxRequest {
                id: lineup.version_id(),
                band_id: plan.band.band.id.clone(),
                anchor_x: lane_x.get(plan.band.band.id.as_str()).copied(),
                y: top,
                width: plan.width,
                height: bottom - top,
            }
        })
        .collect();

    (requests, origins)
}

/// Translate every placed box so the leftmost one starts at `left`.
fn shifted_rects(pass: &PlacementPass, left: f64) -> Vec<Rect> {
    let min_x = pass
        .boxes
        .iter()
        .map(|b| b.rect.x0)
        .min_by(f64::total_cmp)
        .unwrap_or(left);
    let dx = left - min_x;
    pass.boxes
        .iter()
        .map(|b| b.rect + kurbo::Vec2::new(dx, 0.0))
        .collect()
}

fn canvas_size(rects: &[Rect], config: &LayoutConfig) -> CanvasSize {
    let max_x = rects.iter().map(|r| r.x1).fold(0.0, f64::max);
    let max_y = rects.iter().map(|r| r.y1).fold(0.0, f64::max);
    CanvasSize {
        width: max_x + config.left_padding,
        height: max_y + config.top_padding,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/compiler.rs"]
mod tests;
