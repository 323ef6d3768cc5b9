use maud::{html, Markup};

use crate::db::Round;
use crate::names;
use crate::services::scoreboard::ScoreboardEntry;

pub struct ScoreboardData<'a> {
    pub rounds: &'a [Round],
    pub selected_round: Option<&'a Round>,
    pub entries: &'a [ScoreboardEntry],
}

pub fn scoreboard(data: ScoreboardData<'_>) -> Markup {
    html! {
        h1 { "Scoreboard" }

        @if data.rounds.is_empty() {
            p { "No rounds yet." }
        } @else {
            nav class="round-picker" {
                ul {
                    @for round in data.rounds {
                        li {
                            @if data.selected_round.is_some_and(|s| s.id == round.id) {
                                strong { (round.name) }
                            } @else {
                                a href=(names::scoreboard_url(round.id)) { (round.name) }
                            }
                        }
                    }
                }
            }
        }

        @if let Some(round) = data.selected_round {
            @if data.entries.is_empty() {
                p { "Nobody has finished " (round.name) " yet. Be the first!" }
            } @else {
                table {
                    thead {
                        tr {
                            th { "Rank" }
                            th { "Player" }
                            th { "Score" }
                        }
                    }
                    tbody {
                        @for entry in data.entries {
                            tr class=[entry.is_viewer.then_some("viewer-row")] {
                                td { (entry.rank) }
                                td {
                                    (entry.display_name)
                                    @if entry.is_viewer { " (you)" }
                                }
                                td { (entry.score) }
                            }
                        }
                    }
                }
            }
        }
    }
}
