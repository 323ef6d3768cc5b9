use chrono::{Duration, TimeZone, Utc};
use quizround::services::quiz::ScoringConfig;

fn shown() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

#[test]
fn golden_scores_with_default_config() {
    let scoring = ScoringConfig::default();
    let shown = shown();

    assert_eq!(scoring.score(shown, shown, true), 100);
    assert_eq!(scoring.score(shown, shown + Duration::seconds(10), true), 50);
    assert_eq!(scoring.score(shown, shown + Duration::seconds(5), true), 75);
    assert_eq!(scoring.score(shown, shown + Duration::seconds(2), true), 90);
    assert_eq!(scoring.score(shown, shown + Duration::seconds(100), true), 50);
}

#[test]
fn incorrect_answers_score_zero_at_any_speed() {
    let scoring = ScoringConfig::default();
    let shown = shown();

    assert_eq!(scoring.score(shown, shown, false), 0);
    assert_eq!(scoring.score(shown, shown + Duration::seconds(3), false), 0);
    assert_eq!(scoring.score(shown, shown + Duration::seconds(1000), false), 0);
}

#[test]
fn fractional_elapsed_truncates_toward_zero() {
    let scoring = ScoringConfig::default();
    let shown = shown();

    // 100 - 50 * 0.19 = 90.5 -> 90
    assert_eq!(
        scoring.score(shown, shown + Duration::milliseconds(1900), true),
        90
    );
    // 100 - 50 * 0.999 = 50.05 -> 50
    assert_eq!(
        scoring.score(shown, shown + Duration::milliseconds(9990), true),
        50
    );
    // 100 - 50 * 0.0001 = 99.9995 -> 99
    assert_eq!(
        scoring.score(shown, shown + Duration::milliseconds(1), true),
        99
    );
}

#[test]
fn negative_elapsed_clamps_to_max() {
    let scoring = ScoringConfig::default();
    let shown = shown();

    assert_eq!(scoring.score(shown, shown - Duration::seconds(5), true), 100);
}

#[test]
fn custom_parameters_are_respected() {
    let scoring = ScoringConfig {
        timer_seconds: 20,
        max_score: 1000,
        min_score: 0,
    };
    let shown = shown();

    assert_eq!(scoring.score(shown, shown, true), 1000);
    assert_eq!(scoring.score(shown, shown + Duration::seconds(10), true), 500);
    assert_eq!(scoring.score(shown, shown + Duration::seconds(20), true), 0);
    assert_eq!(scoring.score(shown, shown + Duration::seconds(25), true), 0);
}

#[test]
fn scoring_is_deterministic_for_equal_inputs() {
    let scoring = ScoringConfig::default();
    let shown = shown();
    let answered = shown + Duration::milliseconds(4321);

    let first = scoring.score(shown, answered, true);
    for _ in 0..10 {
        assert_eq!(scoring.score(shown, answered, true), first);
    }
}
