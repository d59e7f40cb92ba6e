//! Integration tests for the parse_pdf() / annotate_pdf() pipeline.
//!
//! Uses a MockSource that returns pre-built PageFragments without
//! invoking pdftotext, so these tests run without poppler-utils.

use floorscan_core::annotate::raster::PageRasterizer;
use floorscan_core::annotate::{to_annotations, Color};
use floorscan_core::config::ExtractionConfig;
use floorscan_core::error::FloorscanError;
use floorscan_core::extraction::{FragmentSource, PageFragments};
use floorscan_core::model::{BBox, Fragment, SkipReason};
use floorscan_core::{annotate_pdf, parse_pdf};

struct MockSource {
    pages: Vec<PageFragments>,
}

impl FragmentSource for MockSource {
    fn extract_pages(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageFragments>, FloorscanError> {
        Ok(self.pages.clone())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

struct FailingSource;

impl FragmentSource for FailingSource {
    fn extract_pages(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageFragments>, FloorscanError> {
        Err(FloorscanError::PdftotextFailed {
            code: 1,
            stderr: "Syntax Error: Couldn't find trailer dictionary".into(),
        })
    }

    fn backend_name(&self) -> &str {
        "failing"
    }
}

struct MockRasterizer;

impl PageRasterizer for MockRasterizer {
    fn rasterize_page(&self, _pdf: &[u8], page_number: usize) -> Result<Vec<u8>, FloorscanError> {
        if page_number == 2 {
            return Err(FloorscanError::Render("no such page".into()));
        }
        Ok(b"\x89PNG".to_vec())
    }
}

fn frag(page: usize, text: &str, bbox: [f64; 4]) -> Fragment {
    Fragment::new(text, BBox::from(bbox), page - 1)
}

fn page(number: usize, fragments: Vec<Fragment>) -> PageFragments {
    PageFragments {
        page_number: number,
        width: 792.0,
        height: 612.0,
        fragments,
    }
}

fn config() -> ExtractionConfig {
    ExtractionConfig::builtin().unwrap()
}

/// A 30x50 model plan: two labelled rooms, one split across blocks,
/// overall dimensions, codes and title furniture.
fn model_plan() -> MockSource {
    MockSource {
        pages: vec![
            page(
                1,
                vec![
                    frag(1, "FIRST FLOOR PLAN", [300.0, 20.0, 480.0, 36.0]),
                    frag(1, "Great Room\n18' 4\" x 15' 6\"", [100.0, 100.0, 190.0, 124.0]),
                    frag(1, "Master Bedroom", [300.0, 100.0, 380.0, 111.0]),
                    frag(1, "14' x 12' 8 1/2\"", [305.0, 113.0, 375.0, 124.0]),
                    frag(1, "50'", [380.0, 560.0, 400.0, 572.0]),
                    frag(1, "30' 0\"", [20.0, 300.0, 50.0, 312.0]),
                    frag(1, "OTS", [150.0, 250.0, 170.0, 260.0]),
                    frag(1, "WIC", [320.0, 250.0, 340.0, 260.0]),
                    frag(1, "Scale 1/4\" = 1'", [600.0, 580.0, 700.0, 592.0]),
                ],
            ),
            page(2, vec![]),
        ],
    }
}

// ---------------------------------------------------------------------------
// Test 1: full page extraction
// ---------------------------------------------------------------------------
#[test]
fn model_plan_extracts_rooms_dimensions_and_codes() {
    let report = parse_pdf(&[], &model_plan(), &config()).unwrap();
    assert_eq!(report.pages.len(), 2);

    let first = &report.pages[0];
    assert_eq!(first.page, 1);

    let names: Vec<&str> = first.rooms.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Great Room", "Master Bedroom"]);
    assert_eq!(first.rooms[0].length_in.inches(), 220.0);
    assert_eq!(first.rooms[0].width_in.inches(), 186.0);
    assert_eq!(first.rooms[1].length_in.inches(), 168.0);
    assert_eq!(first.rooms[1].width_in.inches(), 152.5);
    assert_eq!(first.rooms[1].bbox, BBox::new(300.0, 100.0, 380.0, 124.0));

    let others: Vec<(&str, f64)> = first
        .other_dimensions
        .iter()
        .map(|d| (d.raw.as_str(), d.inches.inches()))
        .collect();
    assert_eq!(others, vec![("50'", 600.0), ("30' 0\"", 360.0)]);

    assert_eq!(first.code_texts(), vec!["OTS", "WIC"]);

    let skipped: Vec<&str> = report.skipped.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(skipped, vec!["FIRST FLOOR PLAN", "Scale 1/4\" = 1'"]);
    assert!(report
        .skipped
        .iter()
        .all(|s| s.reason == SkipReason::Unmatched));
}

// ---------------------------------------------------------------------------
// Test 2: serialized record shape
// ---------------------------------------------------------------------------
#[test]
fn serialized_record_matches_output_shape() {
    let report = parse_pdf(&[], &model_plan(), &config()).unwrap();
    let value = serde_json::to_value(&report.pages).unwrap();

    let room = &value[0]["rooms"][0];
    assert_eq!(room["name"], "Great Room");
    assert_eq!(room["raw_text"], "Great Room\n18' 4\" x 15' 6\"");
    assert_eq!(room["length_in"], 220.0);
    assert_eq!(room["width_in"], 186.0);
    assert_eq!(room["bbox"], serde_json::json!([100.0, 100.0, 190.0, 124.0]));

    let other = &value[0]["other_dimensions"][0];
    assert_eq!(other["raw"], "50'");
    assert_eq!(other["inches"], 600.0);

    assert_eq!(value[0]["codes"], serde_json::json!(["OTS", "WIC"]));
    assert_eq!(
        value[1],
        serde_json::json!({"page": 2, "rooms": [], "other_dimensions": [], "codes": []})
    );
}

// ---------------------------------------------------------------------------
// Test 3: order across passes
// ---------------------------------------------------------------------------
#[test]
fn each_pass_keeps_scan_order() {
    let source = MockSource {
        pages: vec![page(
            1,
            vec![
                frag(1, "Dining", [10.0, 10.0, 60.0, 20.0]),
                frag(1, "12' x 11'", [10.0, 21.0, 60.0, 31.0]),
                frag(1, "8' 2 1/2\"", [200.0, 10.0, 240.0, 20.0]),
                frag(1, "OTS", [300.0, 10.0, 320.0, 20.0]),
            ],
        )],
    };

    let report = parse_pdf(&[], &source, &config()).unwrap();
    let p = &report.pages[0];
    assert_eq!(p.rooms.len(), 1);
    assert_eq!(p.rooms[0].name, "Dining");
    assert_eq!(p.other_dimensions.len(), 1);
    assert_eq!(p.other_dimensions[0].inches.inches(), 98.5);
    assert_eq!(p.code_texts(), vec!["OTS"]);
}

// ---------------------------------------------------------------------------
// Test 4: room fragments never reach pass 2
// ---------------------------------------------------------------------------
#[test]
fn consumed_fragments_are_not_reclassified() {
    let source = model_plan();
    let fragment_count = source.pages[0].fragments.len();
    let report = parse_pdf(&[], &source, &config()).unwrap();
    let p = &report.pages[0];

    // Great Room uses one block, Master Bedroom two; everything else is
    // exactly one record or one skip.
    let used = 1 + 2 + p.other_dimensions.len() + p.codes.len();
    let skipped = report.skipped.iter().filter(|s| s.page == 1).count();
    assert_eq!(used + skipped, fragment_count);

    for room in &p.rooms {
        assert!(p.other_dimensions.iter().all(|d| d.bbox != room.bbox));
        assert!(p.other_dimensions.iter().all(|d| !room.raw_text.contains(&d.raw)));
    }
}

// ---------------------------------------------------------------------------
// Test 5: annotations
// ---------------------------------------------------------------------------
#[test]
fn annotations_cover_every_record() {
    let report = parse_pdf(&[], &model_plan(), &config()).unwrap();
    let annotations = to_annotations(&report.pages[0]);
    assert_eq!(annotations.len(), report.pages[0].record_count());
    assert_eq!(annotations.len(), 6);

    let greens = annotations.iter().filter(|a| a.color == Color::Green).count();
    let reds = annotations.iter().filter(|a| a.color == Color::Red).count();
    let blues = annotations.iter().filter(|a| a.color == Color::Blue).count();
    assert_eq!((greens, reds, blues), (2, 2, 2));
}

#[test]
fn annotate_pdf_renders_every_page() {
    let rasterizer = MockRasterizer;
    let (report, rendered) =
        annotate_pdf(&[], &model_plan(), &config(), Some(&rasterizer)).unwrap();

    assert_eq!(rendered.len(), report.pages.len());
    assert_eq!(rendered[0].page_number, 1);
    assert_eq!(rendered[0].box_count, 6);
    assert_eq!(rendered[0].svg.matches("<rect").count(), 6);
    assert!(rendered[0].svg.contains("data:image/png;base64,"));

    // Page 2 failed to rasterize and is drawn without a background.
    assert_eq!(rendered[1].box_count, 0);
    assert!(!rendered[1].svg.contains("<image"));
}

// ---------------------------------------------------------------------------
// Test 6: empty and failing documents
// ---------------------------------------------------------------------------
#[test]
fn document_without_fragments_is_empty_not_an_error() {
    let source = MockSource { pages: vec![] };
    let report = parse_pdf(&[], &source, &config()).unwrap();
    assert!(report.pages.is_empty());
    assert_eq!(serde_json::to_string(&report.pages).unwrap(), "[]");
}

#[test]
fn extraction_failure_is_surfaced() {
    let err = parse_pdf(&[], &FailingSource, &config()).unwrap_err();
    assert!(matches!(err, FloorscanError::PdftotextFailed { code: 1, .. }));
}

// ---------------------------------------------------------------------------
// Test 7: adjacency threshold is configuration
// ---------------------------------------------------------------------------
#[test]
fn wider_gap_config_pairs_distant_blocks() {
    let source = MockSource {
        pages: vec![page(
            1,
            vec![
                frag(1, "Garage", [10.0, 10.0, 80.0, 20.0]),
                frag(1, "22' x 20'", [10.0, 40.0, 80.0, 50.0]),
            ],
        )],
    };

    let strict = parse_pdf(&[], &source, &config()).unwrap();
    assert!(strict.pages[0].rooms.is_empty());

    let loose = ExtractionConfig {
        max_vertical_gap: 25.0,
        ..config()
    };
    let report = parse_pdf(&[], &source, &loose).unwrap();
    assert_eq!(report.pages[0].rooms.len(), 1);
    assert_eq!(report.pages[0].rooms[0].length_in.inches(), 264.0);
}

// ---------------------------------------------------------------------------
// Test 8: overflowing numbers never reach the output
// ---------------------------------------------------------------------------
#[test]
fn overflowing_dimension_is_skipped_not_null() {
    let huge = format!("{}'", "9".repeat(400));
    let source = MockSource {
        pages: vec![page(1, vec![frag(1, &huge, [10.0, 10.0, 80.0, 20.0])])],
    };

    let report = parse_pdf(&[], &source, &config()).unwrap();
    assert!(report.pages[0].other_dimensions.is_empty());
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].reason, SkipReason::Unmatched);

    let json = serde_json::to_string(&report.pages).unwrap();
    assert!(!json.contains("null"));
}
