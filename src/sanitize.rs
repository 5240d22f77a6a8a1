//! Markup sanitization for user-supplied text and composed SVG documents.
//!
//! User text is stripped of anything tag-shaped before it is rendered,
//! embedded in markup, or used in a filename. Composed SVG documents get a
//! second, whole-document pass that removes script elements and event
//! handler attributes before the markup is wrapped into a payload.

// ============================================================================
// Text Sanitization
// ============================================================================

/// Strips markup tags from user-supplied text, keeping the text content.
///
/// `<b>a</b>` becomes `a`; tag-only input becomes empty. An unterminated
/// `<` swallows the rest of the input, matching the "no tags survive"
/// contract over content preservation.
pub fn strip_markup(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut in_tag = false;

    for ch in input.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

/// Escapes text for embedding as XML character data or attribute values.
pub fn xml_escape(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            c => result.push(c),
        }
    }
    result
}

// ============================================================================
// SVG Document Sanitization
// ============================================================================

/// Scrubs a composed SVG document before it becomes a downloadable payload.
///
/// Removes `<script>` elements (including their content) and `on*` event
/// handler attributes, leaving the drawing elements untouched. The text
/// content embedded in the document is expected to have gone through
/// [`strip_markup`] and [`xml_escape`] already; this pass is the defense for
/// the document as a whole.
pub fn sanitize_svg(markup: &str) -> String {
    strip_event_attributes(&strip_script_elements(markup))
}

/// Removes `<script ...>...</script>` blocks and self-closing script tags.
fn strip_script_elements(markup: &str) -> String {
    let mut result = String::with_capacity(markup.len());
    let mut remaining = markup;

    while let Some(start) = find_ignore_case(remaining, "<script") {
        result.push_str(&remaining[..start]);
        let after_open = &remaining[start..];

        if let Some(end) = find_ignore_case(after_open, "</script>") {
            remaining = &after_open[end + "</script>".len()..];
        } else if let Some(end) = after_open.find("/>") {
            remaining = &after_open[end + 2..];
        } else {
            // Unterminated script: drop the rest of the document
            remaining = "";
        }
    }

    result.push_str(remaining);
    result
}

/// Removes ` on*="..."` attributes (e.g. `onload`, `onclick`).
fn strip_event_attributes(markup: &str) -> String {
    let bytes = markup.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if let Some(end) = event_attribute_end(bytes, i) {
            i = end;
        } else {
            result.push(bytes[i]);
            i += 1;
        }
    }

    // Removed ranges are delimited by ASCII bytes, so this never splits a
    // multi-byte character.
    String::from_utf8_lossy(&result).into_owned()
}

/// If an event handler attribute starts at `i`, returns the index just past
/// its closing quote.
fn event_attribute_end(bytes: &[u8], i: usize) -> Option<usize> {
    // Attribute boundary: whitespace, then "on", then at least one letter,
    // then '=' and a quoted value.
    if !bytes[i].is_ascii_whitespace() {
        return None;
    }
    let mut j = i + 1;
    if bytes.len() < j + 2 || bytes[j].to_ascii_lowercase() != b'o' || bytes[j + 1].to_ascii_lowercase() != b'n' {
        return None;
    }
    j += 2;
    let name_start = j;
    while j < bytes.len() && bytes[j].is_ascii_alphabetic() {
        j += 1;
    }
    if j == name_start || j >= bytes.len() || bytes[j] != b'=' {
        return None;
    }
    j += 1;
    if j >= bytes.len() || (bytes[j] != b'"' && bytes[j] != b'\'') {
        return None;
    }
    let quote = bytes[j];
    j += 1;
    while j < bytes.len() && bytes[j] != quote {
        j += 1;
    }
    // Past the closing quote (or end of input if unterminated)
    Some((j + 1).min(bytes.len()))
}

fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .to_ascii_lowercase()
        .find(&needle.to_ascii_lowercase())
}

// ============================================================================
// Tests
// ============================================================================
