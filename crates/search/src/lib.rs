mod filter_state;
mod matcher;

pub use filter_state::FilterState;
pub use matcher::{highlight, highlight_spans, matches, QueryMatcher, MARK_CLOSE, MARK_OPEN};
