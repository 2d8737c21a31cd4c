//! AI summary segmentation.
//!
//! Backend summaries arrive as one blob of prose that may embed the
//! standard label headings "WARNINGS:", "ADVERSE REACTIONS:", and
//! "DOSAGE AND ADMINISTRATION:" mid-line. The text is cut at newlines
//! and immediately before each heading; heading-led sections render
//! emphasized.

use std::sync::LazyLock;

use regex::Regex;

static HEADINGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)WARNINGS:|ADVERSE REACTIONS:|DOSAGE AND ADMINISTRATION:").unwrap()
});

/// One displayable piece of a summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Section opening with a recognized heading; rendered emphasized.
    Heading(String),
    Paragraph(String),
}

impl Segment {
    pub fn text(&self) -> &str {
        match self {
            Segment::Heading(s) | Segment::Paragraph(s) => s,
        }
    }
}

/// Split a summary into renderable segments. Blank sections are
/// dropped; the "No information available." sentinel passes through as
/// a single paragraph.
pub fn segment_summary(text: &str) -> Vec<Segment> {
    if text == "No information available." {
        return vec![Segment::Paragraph(text.to_string())];
    }

    let mut segments = Vec::new();
    for line in text.split('\n') {
        for section in split_before_headings(line) {
            let section = section.trim();
            if section.is_empty() {
                continue;
            }
            if HEADINGS.find(section).is_some_and(|m| m.start() == 0) {
                segments.push(Segment::Heading(section.to_string()));
            } else {
                segments.push(Segment::Paragraph(section.to_string()));
            }
        }
    }
    segments
}

/// Cut `line` immediately before every heading occurrence, keeping the
/// headings themselves.
fn split_before_headings(line: &str) -> Vec<&str> {
    let cuts: Vec<usize> = HEADINGS
        .find_iter(line)
        .map(|m| m.start())
        .filter(|&start| start > 0)
        .collect();

    let mut sections = Vec::with_capacity(cuts.len() + 1);
    let mut begin = 0;
    for cut in cuts {
        sections.push(&line[begin..cut]);
        begin = cut;
    }
    sections.push(&line[begin..]);
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_one_paragraph() {
        let segments = segment_summary("Aspirin and warfarin interact.");
        assert_eq!(
            segments,
            vec![Segment::Paragraph("Aspirin and warfarin interact.".into())]
        );
    }

    #[test]
    fn newlines_split_paragraphs_and_blanks_drop() {
        let segments = segment_summary("First.\n\n  \nSecond.");
        assert_eq!(
            segments,
            vec![
                Segment::Paragraph("First.".into()),
                Segment::Paragraph("Second.".into()),
            ]
        );
    }

    #[test]
    fn heading_mid_line_starts_a_new_section() {
        let segments = segment_summary("Take with food. WARNINGS: May cause drowsiness.");
        assert_eq!(
            segments,
            vec![
                Segment::Paragraph("Take with food.".into()),
                Segment::Heading("WARNINGS: May cause drowsiness.".into()),
            ]
        );
    }

    #[test]
    fn headings_match_case_insensitively() {
        let segments = segment_summary("adverse reactions: nausea");
        assert_eq!(
            segments,
            vec![Segment::Heading("adverse reactions: nausea".into())]
        );
    }

    #[test]
    fn all_three_headings_are_recognized() {
        let text = "WARNINGS: a ADVERSE REACTIONS: b DOSAGE AND ADMINISTRATION: c";
        let segments = segment_summary(text);
        assert_eq!(segments.len(), 3);
        assert!(segments
            .iter()
            .all(|s| matches!(s, Segment::Heading(_))));
    }

    #[test]
    fn sentinel_passes_through_unsplit() {
        let segments = segment_summary("No information available.");
        assert_eq!(
            segments,
            vec![Segment::Paragraph("No information available.".into())]
        );
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(segment_summary("").is_empty());
    }
}
