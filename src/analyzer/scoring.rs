use crate::models::TagStatus;

pub const MAX_SCORE: i32 = 100;

pub const TITLE_ERROR_PENALTY: i32 = 25;
pub const DESCRIPTION_ERROR_PENALTY: i32 = 15;
pub const MISSING_CANONICAL_PENALTY: i32 = 10;
pub const MISSING_VIEWPORT_PENALTY: i32 = 15;
pub const TITLE_WARNING_PENALTY: i32 = 5;
pub const DESCRIPTION_WARNING_PENALTY: i32 = 5;
pub const INCOMPLETE_OPEN_GRAPH_PENALTY: i32 = 5;
pub const MISSING_TWITTER_CARD_PENALTY: i32 = 5;

/// The rule outcomes that carry a score penalty.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInputs {
    pub title: TagStatus,
    pub description: TagStatus,
    pub has_canonical: bool,
    pub has_viewport: bool,
    /// og:title, og:description and og:image are all present.
    pub open_graph_complete: bool,
    pub has_twitter_card: bool,
}

/// Deduct fixed penalties from 100 and clamp to `0..=100`.
pub fn score(inputs: &ScoreInputs) -> u8 {
    let penalties = [
        (inputs.title == TagStatus::Error, TITLE_ERROR_PENALTY),
        (inputs.description == TagStatus::Error, DESCRIPTION_ERROR_PENALTY),
        (!inputs.has_canonical, MISSING_CANONICAL_PENALTY),
        (!inputs.has_viewport, MISSING_VIEWPORT_PENALTY),
        (inputs.title == TagStatus::Warning, TITLE_WARNING_PENALTY),
        (inputs.description == TagStatus::Warning, DESCRIPTION_WARNING_PENALTY),
        (!inputs.open_graph_complete, INCOMPLETE_OPEN_GRAPH_PENALTY),
        (!inputs.has_twitter_card, MISSING_TWITTER_CARD_PENALTY),
    ];

    let deducted: i32 = penalties
        .iter()
        .filter(|(applies, _)| *applies)
        .map(|(_, points)| points)
        .sum();

    (MAX_SCORE - deducted).clamp(0, MAX_SCORE) as u8
}
