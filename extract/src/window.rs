//! Sentence-bounded context windows around a focus token.
//!
//! The two sides are bounded differently. The left edge is moved past the
//! last `.` before the focus token before anything is collected. The right
//! edge is only clipped to the sentence length; a `.` on the right stops
//! collection instead.

use crate::planner::FocusSet;
use crate::token::Token;
use crate::undesirables::UndesirableFilter;

/// Filtered context collected from a window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    /// Comma-separated, lower-cased kept tokens.
    pub text: String,

    /// Number of kept tokens.
    pub kept: usize,
}

/// A token anchors a window if its lower-cased text is a focus word and it
/// is tagged as a noun.
pub fn is_focus_token(token: &Token, focus: &FocusSet) -> bool {
    token.is_noun() && focus.contains(&token.text.to_lowercase())
}

/// Inclusive `(left, right)` bounds of the window around `index`, which must
/// be a position in `tokens`.
pub fn window_bounds(tokens: &[Token], index: usize, half_width: usize) -> (usize, usize) {
    let mut left = index.saturating_sub(half_width);
    if let Some(end) = tokens[left..index].iter().rposition(Token::is_sentence_end) {
        left += end + 1;
    }
    let right = index
        .saturating_add(half_width)
        .min(tokens.len().saturating_sub(1));
    (left, right)
}

/// Whether a window spans enough positions to be worth collecting.
pub fn passes_size_gate(left: usize, right: usize, min_valid_size: usize) -> bool {
    left.abs_diff(right) >= min_valid_size
}

/// Collect kept tokens from `left..=right`, stopping at the first `.`.
pub fn collect_context(
    tokens: &[Token],
    left: usize,
    right: usize,
    filter: &dyn UndesirableFilter,
) -> Context {
    let mut context = Context::default();
    let Some(window) = tokens.get(left..=right) else {
        return context;
    };

    for token in window {
        if token.is_sentence_end() {
            break;
        }
        if !token.is_text {
            continue;
        }

        let word = token.text.to_lowercase();
        if filter.is_undesirable(&word) {
            continue;
        }
        if !context.text.is_empty() {
            context.text.push(',');
        }
        context.text.push_str(&word);
        context.kept += 1;
    }
    context
}
