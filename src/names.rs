use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

const PROFILE_MARKER: &str = "profile";

/// Canonical comparison key: diacritics stripped, lowercased, whitespace collapsed.
pub fn normalize(name: &str) -> String {
    let folded: String = name
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect();
    collapse_whitespace(&folded)
}

/// Drops every `(<digits>)` annotation, e.g. a seeding or ranking number.
pub fn strip_ranking(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut rest = name;
    while let Some(open) = rest.find('(') {
        let after = &rest[open + 1..];
        let digits = after.chars().take_while(|c| c.is_ascii_digit()).count();
        // Digits are ASCII so the char count is also the byte length.
        if digits > 0 && after[digits..].starts_with(')') {
            out.push_str(&rest[..open]);
            out.push(' ');
            rest = &after[digits + 1..];
        } else {
            out.push_str(&rest[..=open]);
            rest = after;
        }
    }
    out.push_str(rest);
    collapse_whitespace(&out)
}

/// Removes the trailing "Profile" link text left behind by anchor scraping.
pub fn strip_profile_suffix(name: &str) -> String {
    let trimmed = trim_separators(name);
    let len = trimmed.len();
    if len < PROFILE_MARKER.len() || !trimmed.is_char_boundary(len - PROFILE_MARKER.len()) {
        return trimmed.to_string();
    }
    let (head, tail) = trimmed.split_at(len - PROFILE_MARKER.len());
    let at_word_start = head.chars().last().is_none_or(|c| !c.is_alphanumeric());
    if tail.eq_ignore_ascii_case(PROFILE_MARKER) && at_word_start {
        trim_separators(head).to_string()
    } else {
        trimmed.to_string()
    }
}

/// Rewrites feed ordering into "Given Surname" form.
///
/// `"Surname - Given"` becomes `"Given Surname"`, two tokens are swapped and
/// three tokens `"Surname Given Middle"` rotate to `"Given Middle Surname"`.
/// Other shapes are returned with whitespace collapsed. Multi-part surnames
/// cannot be told apart from given names here, so callers should also try the
/// unreordered form.
pub fn reorder(name: &str) -> String {
    let collapsed = collapse_whitespace(name);
    if let Some((surname, given)) = collapsed.split_once(" - ") {
        let surname = surname.trim();
        let given = given.trim();
        if !surname.is_empty() && !given.is_empty() {
            return format!("{given} {surname}");
        }
    }

    let tokens: Vec<&str> = collapsed.split(' ').filter(|t| !t.is_empty()).collect();
    match tokens.as_slice() {
        [surname, given] => format!("{given} {surname}"),
        [surname, given, middle] => format!("{given} {middle} {surname}"),
        _ => tokens.join(" "),
    }
}

/// Strips the scraping noise a quote-feed token typically carries.
pub fn clean_feed_name(raw: &str) -> String {
    strip_ranking(&strip_profile_suffix(raw))
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn trim_separators(raw: &str) -> &str {
    raw.trim_end_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '|' | ':'))
        .trim_start()
}
