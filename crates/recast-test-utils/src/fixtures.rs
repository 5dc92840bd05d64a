use recast_core::{TextRange, TextSize};

const CARET_MARKER: &str = "/*caret*/";
const START_MARKER: &str = "/*start*/";
const END_MARKER: &str = "/*end*/";

/// Extracts a caret offset from a fixture containing a single `/*caret*/` marker.
///
/// Returns the fixture with the marker removed and the caret as an empty range.
pub fn extract_caret(fixture: &str) -> (String, TextRange) {
    let offset = fixture
        .find(CARET_MARKER)
        .expect("fixture missing /*caret*/ marker");
    assert!(
        fixture[offset + CARET_MARKER.len()..]
            .find(CARET_MARKER)
            .is_none(),
        "fixture contains more than one /*caret*/ marker"
    );

    let mut text = String::with_capacity(fixture.len());
    text.push_str(&fixture[..offset]);
    text.push_str(&fixture[offset + CARET_MARKER.len()..]);
    (text, TextRange::empty(size(offset)))
}

/// Extracts a byte range selection from a fixture containing `/*start*/` and
/// `/*end*/` markers.
///
/// Returns the fixture with markers removed and the selection `TextRange`
/// pointing at the extracted region.
pub fn extract_range(fixture: &str) -> (String, TextRange) {
    let start = fixture
        .find(START_MARKER)
        .expect("fixture missing /*start*/ marker");
    let after_start = start + START_MARKER.len();
    let end = fixture
        .find(END_MARKER)
        .expect("fixture missing /*end*/ marker");
    assert!(end >= after_start, "/*end*/ must come after /*start*/");

    let mut text = String::with_capacity(fixture.len());
    text.push_str(&fixture[..start]);
    text.push_str(&fixture[after_start..end]);
    text.push_str(&fixture[end + END_MARKER.len()..]);

    // Range in the marker-stripped text: the start position stays the same;
    // the end shrinks by the length of the start marker.
    let range = TextRange::new(size(start), size(end - START_MARKER.len()));
    (text, range)
}

/// Either marker style: a caret yields an empty range.
pub fn extract_selection(fixture: &str) -> (String, TextRange) {
    if fixture.contains(CARET_MARKER) {
        extract_caret(fixture)
    } else {
        extract_range(fixture)
    }
}

fn size(offset: usize) -> TextSize {
    TextSize::from(offset as u32)
}
