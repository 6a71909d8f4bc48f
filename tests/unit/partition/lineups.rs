use super::*;

fn partition_json(json: &str) -> Vec<PartitionedBand> {
    let graph = Graph::from_json_str(json).unwrap();
    partition_graph(&graph, YearDefaults::default()).unwrap().0
}

fn names(l: &Lineup) -> Vec<&str> {
    let mut v: Vec<&str> = l.members.iter().map(|m| m.artist_name.as_str()).collect();
    v.sort_unstable();
    v
}

fn assert_tiles(pb: &PartitionedBand) {
    let total: f64 = pb.lineups.iter().map(|l| l.span.len_years()).sum();
    let span = pb.active_span().unwrap();
    assert_eq!(total, span.len_years());
    for w in pb.lineups.windows(2) {
        assert_eq!(w[0].span.end, w[1].span.start);
        assert_ne!(w[0].artist_ids(), w[1].artist_ids());
    }
}

const TESTERS: &str = r#"{"bands":{"band-1":{"id":"band-1","name":"The Testers","start_year":1990,"end_year":2000,"all_members":[
  {"artist_id":"a1","artist_name":"Alice","role":"Vocals","start_year":1990,"end_year":1995,"position":0},
  {"artist_id":"a2","artist_name":"Bob","role":"Guitar","start_year":1990,"end_year":2000,"position":1},
  {"artist_id":"a3","artist_name":"Charlie","role":"Vocals","start_year":1995,"end_year":2000,"position":0}
]}}}"#;

const NEW_ORDER: &str = r#"{"bands":{"mbid-no":{"id":"mbid-no","name":"New Order","start_year":1980,"end_year":2023,"all_members":[
  {"artist_id":"Bernard","artist_name":"Bernard Sumner","role":"Vocals/Guitar","start_year":1980,"end_year":2023,"position":0},
  {"artist_id":"Hooky","artist_name":"Peter Hook","role":"Bass","start_year":1980,"end_year":2007,"position":1},
  {"artist_id":"Steve","artist_name":"Stephen Morris","role":"Drums","start_year":1980,"end_year":2023,"position":2},
  {"artist_id":"Gillian","artist_name":"Gillian Gilbert","role":"Keys","start_year":1980,"end_year":2001,"position":3},
  {"artist_id":"Gillian","artist_name":"Gillian Gilbert","role":"Keys","start_year":2011,"end_year":2023,"position":3}
]}}}"#;

#[test]
fn midpoint_test_splits_at_member_change() {
    let bands = partition_json(TESTERS);
    let lineups = &bands[0].lineups;
    assert_eq!(lineups.len(), 2);
    assert_eq!((lineups[0].span.start, lineups[0].span.end), (1990.0, 1995.0));
    assert_eq!(names(&lineups[0]), vec!["Alice", "Bob"]);
    assert_eq!((lineups[1].span.start, lineups[1].span.end), (1995.0, 2000.0));
    assert_eq!(names(&lineups[1]), vec!["Bob", "Charlie"]);
    assert_eq!(lineups[0].number, 1);
    assert_eq!(lineups[1].number, 2);
    assert_tiles(&bands[0]);
}

#[test]
fn absence_years_are_not_merged_away() {
    let bands = partition_json(NEW_ORDER);
    let lineups = &bands[0].lineups;
    let spans: Vec<(f64, f64)> = lineups.iter().map(|l| (l.span.start, l.span.end)).collect();
    assert_eq!(
        spans,
        vec![(1980.0, 2001.0), (2001.0, 2007.0), (2007.0, 2011.0), (2011.0, 2023.0)]
    );
    assert!(lineups[0].has_artist("Gillian"));
    assert!(!lineups[1].has_artist("Gillian"));
    assert!(!lineups[2].has_artist("Gillian"));
    assert!(lineups[3].has_artist("Gillian"));
    assert!(!lineups[2].has_artist("Hooky"));
    assert_tiles(&bands[0]);
}

#[test]
fn unchanged_member_sets_merge() {
    // Bob's split tenure adds a boundary at 1995 but changes nobody's presence.
    let json = r#"{"bands":{"b":{"all_members":[
      {"artist_id":"a","start_year":1990,"end_year":2000},
      {"artist_id":"b","start_year":1990,"end_year":1995},
      {"artist_id":"b","start_year":1995,"end_year":2000}
    ]}}}"#;
    let bands = partition_json(json);
    assert_eq!(bands[0].lineups.len(), 1);
    assert_eq!(bands[0].lineups[0].span.end, 2000.0);
    assert_eq!(bands[0].lineups[0].members.len(), 2);
}

#[test]
fn hiatus_is_skipped_and_not_bridged() {
    let json = r#"{"bands":{"b":{"all_members":[
      {"artist_id":"a","start_year":1970,"end_year":1975},
      {"artist_id":"a","start_year":1980,"end_year":1985}
    ]}}}"#;
    let bands = partition_json(json);
    let lineups = &bands[0].lineups;
    assert_eq!(lineups.len(), 2);
    assert_eq!(lineups[0].span.end, 1975.0);
    assert_eq!(lineups[1].span.start, 1980.0);
    assert_eq!(lineups[1].number, 2);
}

#[test]
fn undated_band_yields_no_lineups() {
    let bands = partition_json(r#"{"bands":{"b":{"all_members":[{"artist_id":"a"}]}}}"#);
    assert!(bands[0].lineups.is_empty());
    assert!(bands[0].active_span().is_none());
}

#[test]
fn memberless_band_yields_no_lineups() {
    let bands = partition_json(r#"{"bands":{"b":{"start_year":1990,"end_year":2000}}}"#);
    assert!(bands[0].lineups.is_empty());
}

#[test]
fn undated_members_inherit_band_bounds() {
    let json = r#"{"bands":{"b":{"start_year":1976,"end_year":1980,"all_members":[
      {"artist_id":"a"},{"artist_id":"b","end_year":1978}
    ]}}}"#;
    let bands = partition_json(json);
    let lineups = &bands[0].lineups;
    assert_eq!(lineups.len(), 2);
    assert_eq!(lineups[0].members.len(), 2);
    assert_eq!(lineups[1].members.len(), 1);
}

#[test]
fn position_hint_orders_members_then_input_order() {
    let json = r#"{"bands":{"b":{"start_year":1990,"end_year":2000,"all_members":[
      {"artist_id":"late","position":5},
      {"artist_id":"nohint"},
      {"artist_id":"first","position":0},
      {"artist_id":"nohint2"}
    ]}}}"#;
    let bands = partition_json(json);
    let ids: Vec<&str> = bands[0].lineups[0]
        .members
        .iter()
        .map(|m| m.artist_id.as_str())
        .collect();
    assert_eq!(ids, vec!["first", "late", "nohint", "nohint2"]);
}

#[test]
fn overlapping_tenures_of_one_artist_count_once() {
    let json = r#"{"bands":{"b":{"all_members":[
      {"artist_id":"a","start_year":1990,"end_year":2000,"role":"Bass"},
      {"artist_id":"a","start_year":1992,"end_year":1998,"role":"Keys"}
    ]}}}"#;
    let bands = partition_json(json);
    for l in &bands[0].lineups {
        assert_eq!(l.members.len(), 1);
    }
    // Sets never change, so everything merges into one lineup.
    assert_eq!(bands[0].lineups.len(), 1);
    assert_eq!(bands[0].lineups[0].members[0].role.as_deref(), Some("Bass"));
}

#[test]
fn fractional_years_render_as_integers() {
    let json = r#"{"bands":{"b":{"all_members":[{"artist_id":"a","start_year":1990.5,"end_year":1994.75}]}}}"#;
    let bands = partition_json(json);
    let l = &bands[0].lineups[0];
    assert_eq!(l.sublabel(), "#1 (1990 - 1994)");
    assert_eq!(l.version_id(), "b_1");
}

#[test]
fn boundary_years_are_sorted_and_unique() {
    let bands = partition_json(NEW_ORDER);
    assert_eq!(
        boundary_years(&bands[0].band),
        vec![1980.0, 2001.0, 2007.0, 2011.0, 2023.0]
    );
}

#[test]
fn structural_errors_propagate() {
    let graph = Graph::from_json_str(r#"{"bands":{"b":{"all_members":[{"artist_id":""}]}}}"#).unwrap();
    assert!(partition_graph(&graph, YearDefaults::default()).is_err());
}
