use floorscan_core::model::{ExtractionReport, SkipReason};

pub fn format_report(report: &ExtractionReport) -> String {
    let mut out = String::new();

    if report.pages.is_empty() {
        out.push_str("No pages found.\n");
        return out;
    }

    for (i, page) in report.pages.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("=== Page {} ===\n\n", page.page));

        if page.record_count() == 0 {
            out.push_str("  (nothing found)\n");
            continue;
        }

        if !page.rooms.is_empty() {
            out.push_str("  Rooms:\n");
            let max_name = page.rooms.iter().map(|r| r.name.len()).max().unwrap_or(10);
            for room in &page.rooms {
                out.push_str(&format!(
                    "    {:<width$}  {} x {}  ({} x {} in)\n",
                    room.name,
                    room.length_in,
                    room.width_in,
                    room.length_in.inches(),
                    room.width_in.inches(),
                    width = max_name
                ));
            }
            out.push('\n');
        }

        if !page.other_dimensions.is_empty() {
            out.push_str("  Other dimensions:\n");
            for dim in &page.other_dimensions {
                out.push_str(&format!("    {:<12}  {} in\n", dim.raw, dim.inches.inches()));
            }
            out.push('\n');
        }

        if !page.codes.is_empty() {
            out.push_str(&format!("  Codes: {}\n", page.code_texts().join(", ")));
        }
    }

    let unmatched = count(report, SkipReason::Unmatched);
    let malformed = count(report, SkipReason::Malformed);
    if unmatched + malformed > 0 {
        out.push_str(&format!(
            "\n{} fragment(s) skipped ({} unmatched, {} malformed)\n",
            unmatched + malformed,
            unmatched,
            malformed
        ));
    }

    out
}

pub fn print_skipped_summary(report: &ExtractionReport) {
    let malformed = count(report, SkipReason::Malformed);
    if malformed > 0 {
        eprintln!("  warning: {} malformed fragment(s) ignored", malformed);
    }
    let unmatched = count(report, SkipReason::Unmatched);
    if unmatched > 0 {
        eprintln!("  {} fragment(s) matched no pattern", unmatched);
    }
}

fn count(report: &ExtractionReport, reason: SkipReason) -> usize {
    report.skipped.iter().filter(|s| s.reason == reason).count()
}
