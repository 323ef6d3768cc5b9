use maud::{html, Markup, PreEscaped};

use crate::db::{AnswerOptionRow, AnswerReview, HistoryRow, PlayerRound, QuestionFull};
use crate::names;
use crate::services::quiz::AnswerResult;

pub struct QuestionData<'a> {
    pub player_round_id: i32,
    pub question: &'a QuestionFull,
    /// Options in display order, already shuffled for this render.
    pub options: &'a [AnswerOptionRow],
    pub question_number: usize,
    pub total_questions: usize,
    pub timer_seconds: u32,
    pub is_resuming: bool,
}

pub fn question(data: QuestionData<'_>) -> Markup {
    html! {
        article {
            p class="muted" {
                "Question " strong { (data.question_number) } " of " (data.total_questions)
            }

            @if data.is_resuming {
                p class="flash" { "Welcome back! Picking up where you left off." }
            }

            @if let Some(text) = &data.question.question.text {
                h3 { (text) }
            }
            @if let Some(image) = &data.question.question.image_filename {
                img src=(names::image_url(image)) alt="Question image" class="question-image";
            }

            p class="timer" {
                "Time left: " span id="countdown" { (data.timer_seconds) } "s"
            }

            form method="post" action=(names::SUBMIT_ANSWER_URL) id="answer-form" {
                input type="hidden" name="player_round_id" value=(data.player_round_id);
                input type="hidden" name="question_id" value=(data.question.question.id);

                fieldset {
                    @for option in data.options {
                        label {
                            input type="radio" name="answer_id" value=(option.id);
                            @if let Some(text) = &option.text { (text) }
                            @if let Some(image) = &option.image_filename {
                                img src=(names::image_url(image)) alt="Answer image" class="option-image";
                            }
                        }
                    }
                }

                button type="submit" { "Answer" }
            }

            // Counts down and submits with no selection once time is up; the
            // server measures time on its own either way.
            script {
                (PreEscaped(format!(
                    r#"
let remaining = {timer};
const label = document.getElementById('countdown');
const tick = setInterval(() => {{
    remaining -= 1;
    if (remaining <= 0) {{
        clearInterval(tick);
        document.getElementById('answer-form').submit();
    }}
    label.textContent = Math.max(remaining, 0);
}}, 1000);
"#,
                    timer = data.timer_seconds
                )))
            }
        }
    }
}

pub fn answer_result(player_round_id: i32, result: &AnswerResult) -> Markup {
    html! {
        article {
            @if result.correct {
                h3 class="correct" { "Correct!" }
                p { "You scored " strong { (result.score) } " points." }
            } @else {
                h3 class="incorrect" { "Not quite." }
                @if let Some(correct) = &result.correct_answer {
                    @if let Some(text) = &correct.text {
                        p { "The correct answer was: " strong { (text) } }
                    }
                }
            }

            @if let Some(explanation) = &result.explanation {
                p class="muted" { (explanation) }
            }

            @if result.has_next_question {
                a href=(names::continue_quiz_url(player_round_id)) role="button" { "Next question" }
            } @else {
                p { "That was the last question!" }
                a href=(names::quiz_result_url(player_round_id)) role="button" { "See your result" }
            }
        }
    }
}

pub struct ResultData<'a> {
    pub player_round: &'a PlayerRound,
    pub round_name: &'a str,
    pub reviews: &'a [AnswerReview],
}

pub fn result(data: ResultData<'_>) -> Markup {
    let correct_count = data.reviews.iter().filter(|r| r.correct).count();

    html! {
        h1 { "Your result: " (data.round_name) }

        article {
            p {
                "Total score: " strong { (data.player_round.total_score) }
                " (" (correct_count) " of " (data.reviews.len()) " correct)"
            }
            a href=(names::scoreboard_url(data.player_round.round_id)) { "See the scoreboard" }
        }

        @for review in data.reviews {
            article {
                p {
                    strong { "Q" (review.order_index + 1) ". " }
                    @if let Some(text) = &review.question_text { (text) }
                }
                @if let Some(selected) = &review.selected_text {
                    p {
                        "Your answer: " (selected) ", "
                        @if review.correct {
                            span class="correct" { "correct, " (review.score) " points" }
                        } @else {
                            span class="incorrect" { "incorrect" }
                        }
                    }
                } @else {
                    p { span class="incorrect" { "No answer given" } }
                }
                @if let Some(explanation) = &review.explanation {
                    p class="muted" { (explanation) }
                }
            }
        }
    }
}

pub fn history(rows: &[HistoryRow]) -> Markup {
    html! {
        h1 { "Your played rounds" }

        @if rows.is_empty() {
            p { "You have not played any rounds yet." }
        } @else {
            table {
                thead {
                    tr {
                        th { "Round" }
                        th { "Started" }
                        th { "Status" }
                        th { "Score" }
                    }
                }
                tbody {
                    @for row in rows {
                        tr {
                            td { (row.round_name) }
                            td { (row.started_at.format("%Y-%m-%d %H:%M")) }
                            td {
                                @if row.completed_at.is_some() {
                                    a href=(names::quiz_result_url(row.player_round_id)) { "Completed" }
                                } @else {
                                    a href=(names::continue_quiz_url(row.player_round_id)) { "Continue" }
                                }
                            }
                            td { (row.total_score) }
                        }
                    }
                }
            }
        }
    }
}
