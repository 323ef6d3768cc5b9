use maud::{html, Markup};

use crate::db::{AuthUser, PlayerRound, Round};
use crate::names;

pub struct HomeData<'a> {
    pub user: Option<&'a AuthUser>,
    pub active_round: Option<&'a Round>,
    pub player_round: Option<&'a PlayerRound>,
    pub can_play: bool,
    pub message: Option<&'a str>,
    pub error: Option<&'a str>,
}

pub fn home(data: HomeData<'_>) -> Markup {
    html! {
        @if let Some(message) = data.message {
            p class="flash" { (message) }
        }
        @if let Some(error) = data.error {
            p class="flash error" { (error) }
        }

        h1 { "Quizround" }

        @match data.user {
            None => {
                p { "Timed trivia rounds. Log in with your email to play." }
                p { a href=(names::LOGIN_URL) role="button" { "Log in" } }
            }
            Some(user) => {
                p { "Welcome back, " (user.display_name) "." }

                @match data.active_round {
                    None => {
                        p { "There is no round open for play right now. Check back soon!" }
                    }
                    Some(round) => {
                        article {
                            h3 { (round.name) }
                            p { "Open from " (round.start_date) " to " (round.end_date) "." }

                            @if let Some(pr) = data.player_round.filter(|pr| pr.is_completed()) {
                                p { "You finished this round with " strong { (pr.total_score) } " points." }
                                a href=(names::quiz_result_url(pr.id)) { "Your result" }
                                " · "
                                a href=(names::scoreboard_url(round.id)) { "Scoreboard" }
                            } @else if let Some(pr) = data.player_round {
                                p { "You have a round in progress." }
                                a href=(names::continue_quiz_url(pr.id)) role="button" { "Continue" }
                            } @else if data.can_play {
                                a href=(names::start_quiz_url(round.id)) role="button" { "Play now" }
                            }
                        }
                    }
                }

                p {
                    a href=(names::QUIZ_HISTORY_URL) { "Your played rounds" }
                }
                @if user.is_admin() {
                    p { a href=(names::ADMIN_URL) { "Administration" } }
                }
            }
        }
    }
}
