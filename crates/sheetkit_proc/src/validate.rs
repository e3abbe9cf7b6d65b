//! Identifier format checks and masking.
//!
//! All functions are total: malformed input yields `false` or `None`.

/// Expected identifier length in characters.
pub const N_LEN_IDENTIFIER: usize = 16;
/// Number of leading characters left visible by [`mask_identifier`].
pub const N_LEN_VISIBLE_PREFIX: usize = 6;
/// Number of mask characters appended after the visible prefix.
pub const N_LEN_MASK: usize = 10;
/// Mask character.
pub const C_MASK_CHAR: char = '*';

/// True iff `s` has exactly 16 characters.
pub fn is_correct_length(s: &str) -> bool {
    s.chars().count() == N_LEN_IDENTIFIER
}

/// True iff the first three 2-character groups are equal (`s[0:2] == s[2:4] == s[4:6]`).
///
/// Strings shorter than six characters never match.
pub fn is_correct_grouping(s: &str) -> bool {
    let l_chars: Vec<char> = s.chars().take(N_LEN_VISIBLE_PREFIX).collect();
    if l_chars.len() < N_LEN_VISIBLE_PREFIX {
        return false;
    }
    l_chars[0..2] == l_chars[2..4] && l_chars[2..4] == l_chars[4..6]
}

pub fn is_valid(s: &str) -> bool {
    is_correct_length(s) && is_correct_grouping(s)
}

/// Keep the first six characters of a valid identifier and mask the rest.
pub fn mask_identifier(s: &str) -> Option<String> {
    if !is_valid(s) {
        return None;
    }
    let mut c_masked: String = s.chars().take(N_LEN_VISIBLE_PREFIX).collect();
    c_masked.extend(std::iter::repeat_n(C_MASK_CHAR, N_LEN_MASK));
    Some(c_masked)
}
