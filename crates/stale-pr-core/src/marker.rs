//! Hidden comment markers
//!
//! A marker is an HTML comment embedded in a bot comment so that a later
//! run can recognise the comment as a specific kind of automated notice.
//! [`Marker::encode`] and [`Marker::find_in`] are the only places the
//! textual form exists.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, IntoEnumIterator};

const MARKER_PREFIX: &str = "<!-- stale-pr-bot:";
const MARKER_SUFFIX: &str = " -->";

/// Kind of automated notice a bot comment represents
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Marker {
    /// The PR was warned that it is stale and will be closed
    StalePr,
    /// The PR received a heads-up about unresolved merge conflicts
    MergeConflict,
}

impl Marker {
    /// The hidden token to embed in a comment body
    pub fn encode(&self) -> String {
        format!("{}{}{}", MARKER_PREFIX, self.as_ref(), MARKER_SUFFIX)
    }

    /// Whether `body` carries this marker
    pub fn is_in(&self, body: &str) -> bool {
        body.contains(&self.encode())
    }

    /// Every marker carried by `body`
    pub fn find_in(body: &str) -> impl Iterator<Item = Marker> + '_ {
        Marker::iter().filter(move |marker| marker.is_in(body))
    }

    /// Whether `body` carries any bot marker at all
    pub fn any_in(body: &str) -> bool {
        body.contains(MARKER_PREFIX) && Marker::find_in(body).next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_is_hidden_html_comment() {
        assert_eq!(Marker::StalePr.encode(), "<!-- stale-pr-bot:stale-pr -->");
        assert_eq!(
            Marker::MergeConflict.encode(),
            "<!-- stale-pr-bot:merge-conflict -->"
        );
    }

    #[test]
    fn test_find_in_detects_what_encode_emits() {
        for marker in Marker::iter() {
            let body = format!("{}\nSome human text", marker.encode());
            assert_eq!(Marker::find_in(&body).collect::<Vec<_>>(), vec![marker]);
        }
    }

    #[test]
    fn test_plain_text_mentions_do_not_match() {
        let body = "This stale-pr discussion mentions merge-conflict and stale-pr-bot";
        assert!(!Marker::any_in(body));
        assert!(!Marker::StalePr.is_in(body));
    }

    #[test]
    fn test_markers_do_not_collide() {
        let body = Marker::MergeConflict.encode();
        assert!(!Marker::StalePr.is_in(&body));
        assert!(Marker::any_in(&body));
    }
}
