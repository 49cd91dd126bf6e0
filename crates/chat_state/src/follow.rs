//! Active conversation auto-follow

use crate::conversation::Conversation;

/// Decide which conversation should be active after the list changed.
///
/// - nothing active: the latest conversation
/// - no manual tab choice: always the latest conversation
/// - manual tab choice: keep it, unless it is gone from the list
///
/// An empty list leaves the selection untouched.
pub fn follow_latest(
    conversations: &[Conversation],
    active_id: Option<&str>,
    user_selected_tab: bool,
) -> Option<String> {
    let Some(latest) = conversations.last() else {
        return active_id.map(str::to_string);
    };

    match active_id {
        None => Some(latest.id.clone()),
        Some(_) if !user_selected_tab => Some(latest.id.clone()),
        Some(active) => {
            if conversations.iter().any(|c| c.id == active) {
                Some(active.to_string())
            } else {
                Some(latest.id.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convos(ids: &[&str]) -> Vec<Conversation> {
        ids.iter()
            .map(|id| Conversation {
                id: id.to_string(),
                title: id.to_string(),
                user_prompt: String::new(),
                ai_response: String::new(),
                timestamp: 0,
            })
            .collect()
    }

    #[test]
    fn test_selects_latest_when_nothing_active() {
        assert_eq!(follow_latest(&convos(&["a", "b"]), None, false).as_deref(), Some("b"));
    }

    #[test]
    fn test_follows_new_results_without_manual_choice() {
        let list = convos(&["a", "b", "c"]);
        assert_eq!(follow_latest(&list, Some("b"), false).as_deref(), Some("c"));
    }

    #[test]
    fn test_manual_choice_persists() {
        let list = convos(&["a", "b", "c"]);
        assert_eq!(follow_latest(&list, Some("a"), true).as_deref(), Some("a"));
    }

    #[test]
    fn test_manual_choice_falls_back_when_removed() {
        let list = convos(&["b", "c"]);
        assert_eq!(follow_latest(&list, Some("a"), true).as_deref(), Some("c"));
    }

    #[test]
    fn test_empty_list_keeps_selection() {
        assert_eq!(follow_latest(&[], Some("a"), true).as_deref(), Some("a"));
        assert_eq!(follow_latest(&[], None, false), None);
    }
}
