use crate::db::CompletedRound;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreboardEntry {
    pub rank: usize,
    pub display_name: String,
    pub score: i32,
    pub is_viewer: bool,
}

/// Ranks completed attempts, best first. The input is already ordered by
/// score descending; ties keep whatever order storage returned, which is
/// deliberately unspecified. Read-only: the scoreboard never touches
/// session state.
pub fn rank(completed: Vec<CompletedRound>, viewer_user_id: Option<i32>) -> Vec<ScoreboardEntry> {
    completed
        .into_iter()
        .enumerate()
        .map(|(index, row)| ScoreboardEntry {
            rank: index + 1,
            display_name: row.display_name,
            score: row.total_score,
            is_viewer: viewer_user_id == Some(row.user_id),
        })
        .collect()
}
