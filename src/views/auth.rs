use maud::{html, Markup};

use crate::names;

pub fn login(error: Option<&str>) -> Markup {
    html! {
        h1 { "Log in" }

        @if let Some(error) = error {
            p class="flash error" { (error) }
        }

        p { "Enter your email address and we'll send you a login link. No password needed." }

        form method="post" action=(names::MAGIC_LINK_URL) {
            label {
                "Email"
                input type="email" name="email" placeholder="you@example.com" required autofocus;
            }
            button type="submit" { "Send me a login link" }
        }
    }
}

pub fn check_email(email: &str) -> Markup {
    html! {
        h1 { "Check your email" }
        p {
            "If an account exists for " strong { (email) }
            ", you will receive a login link shortly."
        }
        p { "The link can be used once and expires after a short while." }
    }
}
