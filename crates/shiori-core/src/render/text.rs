//! Plain-text transforms applied while building a note.

/// Substituted when a record has no description.
pub const NO_DESCRIPTION: &str = "No description available.";

/// Used when a title sanitizes down to nothing.
const FALLBACK_FILENAME: &str = "Untitled";

/// Longest file stem in bytes. Leaves room for `.jpg`/`.md` under the usual 255-byte name limit.
pub const MAX_STEM_BYTES: usize = 200;

/// Markup AniList leaves in `asHtml: false` descriptions, with the plain-text replacement.
const MARKUP_TOKENS: &[(&str, &str)] = &[
    ("<br>", "\n"),
    ("<br/>", "\n"),
    ("<br />", "\n"),
    ("<i>", ""),
    ("</i>", ""),
];

/// Turn a title into a file stem: anything but alphanumerics, space, `_` and `-` becomes `_`.
///
/// The stem is cut on a char boundary to at most [`MAX_STEM_BYTES`].
pub fn sanitize_filename(title: &str) -> String {
    let safe: String = title
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let mut end = safe.len().min(MAX_STEM_BYTES);
    while !safe.is_char_boundary(end) {
        end -= 1;
    }
    let trimmed = safe[..end].trim();
    if trimmed.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Replace known markup tokens with plain text.
///
/// Runs until nothing changes, so removing a token can never expose a new one.
pub fn strip_markup(text: &str) -> String {
    let mut current = text.replace("\r\n", "\n");
    loop {
        let next = MARKUP_TOKENS
            .iter()
            .fold(current.clone(), |acc, (token, replacement)| {
                acc.replace(token, replacement)
            });
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Description as it appears in the note body: markup stripped, placeholder if absent, wrapped.
pub fn normalize_description(description: Option<&str>, width: usize) -> String {
    let plain = match description {
        Some(d) if !d.trim().is_empty() => strip_markup(d),
        _ => NO_DESCRIPTION.to_string(),
    };
    wrap(&plain, width)
}

/// Remove all whitespace inside a genre so it survives a comma-joined list.
pub fn compact_genre(genre: &str) -> String {
    genre.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Wrap text to `width` columns.
///
/// Each input line is wrapped on its own, so explicit line breaks survive. Runs of blank lines
/// collapse to one, whitespace at a wrap point is dropped, and words longer than `width` are
/// split across lines. Lines only break at whitespace, never after a hyphen, so
/// `well-known` stays whole unless it is longer than `width`. Columns are counted in `char`s.
pub fn wrap(text: &str, width: usize) -> String {
    let width = width.max(1);
    let mut out: Vec<String> = Vec::new();
    let mut previous_blank = true;

    for line in text.trim().lines() {
        if line.trim().is_empty() {
            if !previous_blank {
                out.push(String::new());
            }
            previous_blank = true;
            continue;
        }
        out.extend(wrap_line(line, width));
        previous_blank = false;
    }

    out.join("\n")
}

fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for chunk in split_chunks(line) {
        let is_space = chunk.starts_with(' ');
        let chunk_len = chunk.chars().count();

        if is_space {
            // Whitespace never starts a line and is dropped at a break.
            if current_len > 0 && current_len + chunk_len < width {
                current.push_str(&chunk);
                current_len += chunk_len;
            } else if current_len > 0 {
                lines.push(finish(&mut current));
                current_len = 0;
            }
            continue;
        }

        if current_len + chunk_len <= width {
            current.push_str(&chunk);
            current_len += chunk_len;
            continue;
        }

        if chunk_len <= width {
            lines.push(finish(&mut current));
            current.push_str(&chunk);
            current_len = chunk_len;
            continue;
        }

        // Word longer than a whole line: fill the rest of this line, then full-width pieces.
        let mut rest: Vec<char> = chunk.chars().collect();
        loop {
            let space_left = width - current_len;
            if space_left == 0 {
                lines.push(finish(&mut current));
                current_len = 0;
                continue;
            }
            if rest.len() <= space_left {
                current.extend(rest.iter());
                current_len += rest.len();
                break;
            }
            current.extend(rest.drain(..space_left));
            lines.push(finish(&mut current));
            current_len = 0;
        }
    }

    if current_len > 0 {
        lines.push(finish(&mut current));
    }
    lines
}

/// Split a line into alternating runs of words and spaces; other whitespace counts as space.
fn split_chunks(line: &str) -> Vec<String> {
    let mut chunks: Vec<String> = Vec::new();
    let mut last_was_space: Option<bool> = None;

    for c in line.chars() {
        let is_space = c.is_whitespace();
        let c = if is_space { ' ' } else { c };
        match chunks.last_mut() {
            Some(chunk) if last_was_space == Some(is_space) => chunk.push(c),
            _ => chunks.push(c.to_string()),
        }
        last_was_space = Some(is_space);
    }
    chunks
}

fn finish(current: &mut String) -> String {
    let line = current.trim_end().to_string();
    current.clear();
    line
}
