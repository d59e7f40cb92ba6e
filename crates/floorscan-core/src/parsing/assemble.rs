use crate::config::ExtractionConfig;
use crate::model::{
    BBox, Code, DimensionValue, Fragment, OtherDimension, PageResult, Room, SkipReason,
    SkippedFragment,
};
use crate::parsing::classify::{classify_fragment, is_code, LineKind};
use crate::parsing::dimension::{looks_like_two_part, parse_dimension};

/// Result of assembling one page: the output record plus dropped fragments.
#[derive(Debug, Clone)]
pub struct PageAssembly {
    pub result: PageResult,
    pub skipped: Vec<SkippedFragment>,
}

/// A name line directly followed by a two-part dimension line.
#[derive(Debug, Clone)]
struct RoomBlock {
    name: String,
    dim_line: String,
    length: DimensionValue,
    width: DimensionValue,
}

/// Per-fragment facts needed by both passes, computed once.
struct Candidate<'a> {
    fragment: &'a Fragment,
    /// Room found entirely inside this fragment.
    inner_room: Option<RoomBlock>,
    /// Last non-blank line, when it is a name line.
    trailing_name: Option<String>,
    /// First non-blank line, when it is a two-part dimension.
    leading_dims: Option<(String, DimensionValue, DimensionValue)>,
}

/// Run both passes over one page's fragments (in scan order).
///
/// Pass 1 builds rooms and claims the fragments it used. Pass 2 turns each
/// unclaimed fragment into an other-dimension or a code, or drops it.
pub fn assemble_page(
    page_number: usize,
    fragments: &[Fragment],
    config: &ExtractionConfig,
) -> PageAssembly {
    let mut result = PageResult::empty(page_number);
    let mut skipped = Vec::new();

    let mut candidates = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        if fragment.is_malformed() {
            log::debug!(
                "page {}: skipping malformed fragment {:?} at {:?}",
                page_number,
                fragment.text,
                fragment.bbox
            );
            skipped.push(SkippedFragment {
                page: page_number,
                text: fragment.text.clone(),
                reason: SkipReason::Malformed,
            });
            continue;
        }
        candidates.push(analyze(page_number, fragment, config));
    }

    let mut claimed = vec![false; candidates.len()];

    // Pass 1: rooms
    for i in 0..candidates.len() {
        if claimed[i] {
            continue;
        }

        if let Some(block) = &candidates[i].inner_room {
            claimed[i] = true;
            result.rooms.push(make_room(block.clone(), candidates[i].fragment.bbox));
            continue;
        }

        let Some(name) = candidates[i].trailing_name.clone() else {
            continue;
        };
        let below = find_dimension_below(i, &candidates, &claimed, config);
        if let Some((j, (dim_line, length, width))) = below {
            claimed[i] = true;
            claimed[j] = true;
            let bbox = candidates[i].fragment.bbox.union(&candidates[j].fragment.bbox);
            let block = RoomBlock {
                name,
                dim_line,
                length,
                width,
            };
            result.rooms.push(make_room(block, bbox));
        }
    }

    // Pass 2: other dimensions and codes
    for (i, candidate) in candidates.iter().enumerate() {
        if claimed[i] {
            continue;
        }
        let fragment = candidate.fragment;
        let text = fragment.text.trim();

        if let Some(inches) = parse_dimension(text) {
            result.other_dimensions.push(OtherDimension {
                raw: text.to_string(),
                inches,
                bbox: fragment.bbox,
            });
        } else if is_code(text, config) {
            result.codes.push(Code {
                text: text.to_string(),
                bbox: fragment.bbox,
            });
        } else {
            log::debug!("page {}: no match for {:?}", page_number, text);
            skipped.push(SkippedFragment {
                page: page_number,
                text: fragment.text.clone(),
                reason: SkipReason::Unmatched,
            });
        }
    }

    log::info!(
        "page {}: {} room(s), {} other dimension(s), {} code(s), {} skipped",
        page_number,
        result.rooms.len(),
        result.other_dimensions.len(),
        result.codes.len(),
        skipped.len()
    );

    PageAssembly { result, skipped }
}

fn analyze<'a>(
    page_number: usize,
    fragment: &'a Fragment,
    config: &ExtractionConfig,
) -> Candidate<'a> {
    let lines = classify_fragment(&fragment.text, config);

    for (line, kind) in &lines {
        if !matches!(kind, LineKind::TwoPartDimension(..)) && looks_like_two_part(line) {
            log::warn!(
                "page {}: could not parse room dimensions in {:?}",
                page_number,
                line
            );
        }
    }

    let inner_room = lines.windows(2).find_map(|pair| match (pair[0], pair[1]) {
        ((name, LineKind::Name), (dim_line, LineKind::TwoPartDimension(length, width))) => {
            Some(RoomBlock {
                name: name.to_string(),
                dim_line: dim_line.to_string(),
                length,
                width,
            })
        }
        _ => None,
    });

    let mut non_blank = lines.iter().filter(|(_, kind)| *kind != LineKind::Blank);

    let leading_dims = non_blank.clone().next().and_then(|(line, kind)| match kind {
        LineKind::TwoPartDimension(l, w) => Some((line.to_string(), *l, *w)),
        _ => None,
    });

    let trailing_name = non_blank
        .next_back()
        .filter(|(_, kind)| kind.is_name())
        .map(|(line, _)| line.to_string());

    Candidate {
        fragment,
        inner_room,
        trailing_name,
        leading_dims,
    }
}

/// Find the unclaimed dimension fragment stacked right under fragment `i`.
///
/// Closest gap wins; ties go to the earlier fragment in scan order.
fn find_dimension_below(
    i: usize,
    candidates: &[Candidate<'_>],
    claimed: &[bool],
    config: &ExtractionConfig,
) -> Option<(usize, (String, DimensionValue, DimensionValue))> {
    let above = &candidates[i].fragment.bbox;
    let mut best: Option<(usize, f64)> = None;

    for (j, candidate) in candidates.iter().enumerate() {
        if j == i
            || claimed[j]
            || candidate.inner_room.is_some()
            || candidate.leading_dims.is_none()
        {
            continue;
        }
        let below = &candidate.fragment.bbox;
        let gap = above.vertical_gap_to(below);
        if gap > config.max_vertical_gap || gap < -config.max_vertical_gap {
            continue;
        }
        let overlap = above.horizontal_overlap(below);
        if overlap <= 0.0 || overlap < config.min_horizontal_overlap {
            continue;
        }
        let distance = gap.abs();
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((j, distance));
        }
    }

    let (j, _) = best?;
    let dims = candidates[j].leading_dims.clone()?;
    Some((j, dims))
}

fn make_room(block: RoomBlock, bbox: BBox) -> Room {
    Room {
        raw_text: format!("{}\n{}", block.name, block.dim_line),
        name: block.name,
        length_in: block.length,
        width_in: block.width,
        bbox,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ExtractionConfig {
        ExtractionConfig::builtin().unwrap()
    }

    fn frag(text: &str, x0: f64, y0: f64, x1: f64, y1: f64) -> Fragment {
        Fragment::new(text, BBox::new(x0, y0, x1, y1), 0)
    }

    #[test]
    fn test_room_within_one_fragment() {
        let fragments = vec![frag("Kitchen\n12' x 10' 6\"", 100.0, 100.0, 160.0, 124.0)];
        let page = assemble_page(1, &fragments, &config()).result;

        assert_eq!(page.rooms.len(), 1);
        let room = &page.rooms[0];
        assert_eq!(room.name, "Kitchen");
        assert_eq!(room.raw_text, "Kitchen\n12' x 10' 6\"");
        assert_eq!(room.length_in.inches(), 144.0);
        assert_eq!(room.width_in.inches(), 126.0);
        assert_eq!(room.bbox, BBox::new(100.0, 100.0, 160.0, 124.0));
        assert!(page.other_dimensions.is_empty());
        assert!(page.codes.is_empty());
    }

    #[test]
    fn test_room_from_adjacent_fragments() {
        let fragments = vec![
            frag("Master Bedroom", 100.0, 100.0, 180.0, 112.0),
            frag("14' x 12' 6\"", 110.0, 114.0, 170.0, 126.0),
        ];
        let assembly = assemble_page(1, &fragments, &config());
        let page = assembly.result;

        assert_eq!(page.rooms.len(), 1);
        assert_eq!(page.rooms[0].name, "Master Bedroom");
        assert_eq!(page.rooms[0].bbox, BBox::new(100.0, 100.0, 180.0, 126.0));
        assert!(page.other_dimensions.is_empty());
        assert!(assembly.skipped.is_empty());
    }

    #[test]
    fn test_distant_dimension_not_paired() {
        let fragments = vec![
            frag("Den", 100.0, 100.0, 140.0, 112.0),
            frag("10' x 9'", 100.0, 300.0, 150.0, 312.0),
        ];
        let assembly = assemble_page(1, &fragments, &config());
        assert!(assembly.result.rooms.is_empty());
        assert_eq!(assembly.skipped.len(), 2);
    }

    #[test]
    fn test_side_by_side_dimension_not_paired() {
        let fragments = vec![
            frag("Den", 100.0, 100.0, 140.0, 112.0),
            frag("10' x 9'", 200.0, 113.0, 250.0, 125.0),
        ];
        let page = assemble_page(1, &fragments, &config()).result;
        assert!(page.rooms.is_empty());
    }

    #[test]
    fn test_closest_dimension_wins() {
        let fragments = vec![
            frag("Den", 100.0, 100.0, 140.0, 112.0),
            frag("11' x 9'", 100.0, 117.0, 150.0, 129.0),
            frag("10' x 9'", 100.0, 113.0, 150.0, 125.0),
        ];
        let page = assemble_page(1, &fragments, &config()).result;
        assert_eq!(page.rooms.len(), 1);
        assert_eq!(page.rooms[0].length_in.inches(), 120.0);
    }

    #[test]
    fn test_scan_order_across_passes() {
        let fragments = vec![
            frag("Living", 10.0, 10.0, 60.0, 20.0),
            frag("20' x 15'", 10.0, 22.0, 60.0, 32.0),
            frag("30'", 200.0, 400.0, 230.0, 410.0),
            frag("OTS", 300.0, 50.0, 320.0, 60.0),
        ];
        let page = assemble_page(3, &fragments, &config()).result;

        assert_eq!(page.page, 3);
        assert_eq!(page.rooms.len(), 1);
        assert_eq!(page.rooms[0].name, "Living");
        assert_eq!(page.other_dimensions.len(), 1);
        assert_eq!(page.other_dimensions[0].raw, "30'");
        assert_eq!(page.other_dimensions[0].inches.inches(), 360.0);
        assert_eq!(page.code_texts(), vec!["OTS"]);
    }

    #[test]
    fn test_consumed_fragments_not_reused() {
        let fragments = vec![
            frag("Bath\n8' x 5'", 10.0, 10.0, 60.0, 30.0),
            frag("Hall", 10.0, 40.0, 60.0, 50.0),
            frag("8' x 5'", 10.0, 52.0, 60.0, 62.0),
        ];
        let page = assemble_page(1, &fragments, &config()).result;
        assert_eq!(page.rooms.len(), 2);
        assert_eq!(page.rooms[0].name, "Bath");
        assert_eq!(page.rooms[1].name, "Hall");
        assert!(page.other_dimensions.is_empty());
        assert!(page.codes.is_empty());
    }

    #[test]
    fn test_room_fragment_not_taken_as_dimension_below() {
        // The lower fragment carries its own room, so "Porch" stays unpaired.
        let fragments = vec![
            frag("Porch", 10.0, 10.0, 60.0, 20.0),
            frag("12' x 8'\nStudy\n10' x 10'", 10.0, 22.0, 60.0, 50.0),
        ];
        let page = assemble_page(1, &fragments, &config()).result;
        assert_eq!(page.rooms.len(), 1);
        assert_eq!(page.rooms[0].name, "Study");
    }

    #[test]
    fn test_duplicate_codes_kept() {
        let fragments = vec![
            frag("OTS", 10.0, 10.0, 30.0, 20.0),
            frag("OTS", 100.0, 10.0, 120.0, 20.0),
        ];
        let page = assemble_page(1, &fragments, &config()).result;
        assert_eq!(page.code_texts(), vec!["OTS", "OTS"]);
        assert_ne!(page.codes[0].bbox, page.codes[1].bbox);
    }

    #[test]
    fn test_malformed_fragments_skipped() {
        let fragments = vec![
            frag("   ", 10.0, 10.0, 30.0, 20.0),
            frag("OTS", 10.0, 10.0, 10.0, 20.0),
            frag("12'", 10.0, 10.0, 30.0, 20.0),
        ];
        let assembly = assemble_page(1, &fragments, &config());
        assert_eq!(assembly.result.other_dimensions.len(), 1);
        assert!(assembly.result.codes.is_empty());
        assert_eq!(assembly.skipped.len(), 2);
        assert!(assembly
            .skipped
            .iter()
            .all(|s| s.reason == SkipReason::Malformed));
    }

    #[test]
    fn test_unparseable_room_falls_through() {
        let fragments = vec![frag("Garage\n20' x lots", 10.0, 10.0, 60.0, 30.0)];
        let assembly = assemble_page(1, &fragments, &config());
        assert!(assembly.result.rooms.is_empty());
        assert!(assembly.result.other_dimensions.is_empty());
        assert_eq!(assembly.skipped[0].reason, SkipReason::Unmatched);
    }

    #[test]
    fn test_empty_page() {
        let assembly = assemble_page(2, &[], &config());
        assert_eq!(assembly.result, PageResult::empty(2));
        assert!(assembly.skipped.is_empty());
    }
}
