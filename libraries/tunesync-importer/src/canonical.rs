//! Comparison keys for artist and album names

use unicode_general_category::{get_general_category, GeneralCategory};

/// Reduce a display name to its comparison key
///
/// Control characters, combining marks, punctuation, whitespace and symbols
/// are dropped; everything else is lower-cased and kept in order. Letters
/// and digits from any script survive, so `"䩄䬠湥"` maps to itself.
pub fn canonicalize_name(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    for c in name.chars() {
        if is_ignored(c) {
            continue;
        }
        // A few lower-case mappings expand into a base letter plus a
        // combining mark; the mark is dropped like any other.
        key.extend(c.to_lowercase().filter(|l| !is_ignored(*l)));
    }
    key
}

fn is_ignored(c: char) -> bool {
    if c.is_whitespace() {
        return true;
    }

    use GeneralCategory::*;
    matches!(
        get_general_category(c),
        Control
            | NonspacingMark
            | SpacingMark
            | EnclosingMark
            | ConnectorPunctuation
            | DashPunctuation
            | OpenPunctuation
            | ClosePunctuation
            | InitialPunctuation
            | FinalPunctuation
            | OtherPunctuation
            | MathSymbol
            | CurrencySymbol
            | ModifierSymbol
            | OtherSymbol
            | SpaceSeparator
            | LineSeparator
            | ParagraphSeparator
    )
}
