//! Conversation history window.

use crate::api_types::ConversationTurn;

/// The last `limit` messages of `history`, oldest first.
///
/// Counts individual messages, not user/assistant exchanges.
pub fn recent_history(history: &[ConversationTurn], limit: usize) -> &[ConversationTurn] {
    &history[history.len().saturating_sub(limit)..]
}
