use maud::{html, Markup, DOCTYPE};

use crate::{names, utils};

fn css() -> Markup {
    html! {
        link rel="stylesheet" href="/static/index.css";
    }
}

fn header(user_name: Option<&str>) -> Markup {
    html! {
        header {
            nav {
                ul {
                    li {
                        a href=(names::HOME_URL) {
                            strong { "Quizround" }
                        }
                    }
                    li { a href=(names::SCOREBOARD_URL) { "Scoreboard" } }
                }
                ul {
                    @if let Some(name) = user_name {
                        li { (name) }
                        li {
                            form method="post" action=(names::LOGOUT_URL) {
                                button type="submit" class="secondary" { "Log out" }
                            }
                        }
                    } @else {
                        li { a href=(names::LOGIN_URL) { "Log in" } }
                    }
                    li class="version" { (utils::VERSION) }
                }
            }
        }
    }
}

pub fn page(title: &str, body: Markup) -> Markup {
    page_for(title, None, body)
}

pub fn page_for(title: &str, user_name: Option<&str>, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        head {
            meta charset="utf-8";
            meta name="viewport" content="width=device-width, initial-scale=1";
            meta name="color-scheme" content="light dark";

            (css())

            title { (format!("{title} - Quizround")) }
        }

        body class="container" {
            (header(user_name))
            main { (body) }
        }
    }
}

