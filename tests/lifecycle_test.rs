//! End-to-end flows through the public surface: page fixture in, clicks and
//! virtual-time advances, rendered markup out.

use quirk_lab::demos::AsyncErrorDemo;
use quirk_lab::scheduler::{FetchAttempt, TimerEvent};
use quirk_lab::{App, Demo, Error, Page, Result, Scheduler};

#[test]
fn ready_page_hosts_all_seven_units() {
    let app = App::ready(Page::demo_fixture());
    assert_eq!(app.demo_count(), 7);
    assert_eq!(app.now_ms(), 0);
    assert!(app.pending_timers().is_empty());
}

#[test]
fn comparison_flow_shows_where_the_equality_rules_disagree() -> Result<()> {
    let mut app = App::ready(Page::demo_fixture());
    app.set_value("comparison-value1", "5")?;
    app.set_value("comparison-value2", "\"5\"")?;
    app.click("comparison-run")?;

    let html = app.page().html_of("comparison-result")?;
    assert!(html.contains("5 == \"5\" (Loose)"));
    assert!(html.contains("alert-info"));
    assert!(!app.page().is_disabled("comparison-run")?);
    assert_eq!(app.page().text_of("comparison-run")?, "Compare Values");
    Ok(())
}

#[test]
fn arithmetic_flow_concatenates_raw_and_adds_coerced() -> Result<()> {
    let mut app = App::ready(Page::demo_fixture());
    app.set_value("arithmetic-value1", "5")?;
    app.set_value("arithmetic-value2", "3")?;
    app.click("arithmetic-run")?;

    let html = app.page().html_of("arithmetic-result")?;
    assert!(html.contains("<td>53</td>"));
    assert!(html.contains("<td>8</td>"));
    Ok(())
}

#[test]
fn arithmetic_flow_reports_division_by_zero_as_infinity() -> Result<()> {
    let mut app = App::ready(Page::demo_fixture());
    app.set_value("arithmetic-value1", "5")?;
    app.set_value("arithmetic-value2", "0")?;
    app.set_value("arithmetic-operator", "/")?;
    app.click("arithmetic-run")?;

    let html = app.page().html_of("arithmetic-result")?;
    assert!(html.contains("<td>Infinity</td>"));
    Ok(())
}

#[test]
fn arithmetic_flow_renders_an_unknown_operator_as_an_error_alert() -> Result<()> {
    let mut app = App::ready(Page::demo_fixture());
    app.set_value("arithmetic-value1", "5")?;
    app.set_value("arithmetic-value2", "3")?;
    app.set_value("arithmetic-operator", "%")?;
    app.click("arithmetic-run")?;

    let html = app.page().html_of("arithmetic-result")?;
    assert!(html.contains("alert-danger"));
    assert!(html.contains("Invalid operator"));
    assert!(!html.contains("<table"));
    assert!(!app.page().is_disabled("arithmetic-run")?);
    Ok(())
}

#[test]
fn mutable_state_flow_uses_defaults_for_empty_inputs() -> Result<()> {
    let mut app = App::ready(Page::demo_fixture());
    app.click("mutable-run")?;

    let html = app.page().html_of("mutable-result")?;
    assert!(html.contains("[1,2,3]"));
    assert!(html.contains("[1,2,3,4]"));
    assert!(html.contains("Original array modified"));
    assert!(html.contains("Original array preserved"));
    Ok(())
}

#[test]
fn async_flow_fails_first_then_recovers() -> Result<()> {
    let mut app = App::ready(Page::demo_fixture());
    app.click("async-run")?;
    assert!(app.page().is_disabled("async-run")?);
    assert!(app.page().text_of("async-run")?.contains("Processing..."));
    assert_eq!(app.pending_timers().len(), 1);

    // The initial fetch settles and fails.
    app.advance_time(1000)?;
    assert!(!app.page().has_class("async-failure", "d-none")?);
    let failure = app.page().text_of("async-failure")?;
    assert!(failure.contains("Original Error: Network error: Failed to fetch user data"));
    assert!(failure.contains("Stack trace:"));
    assert!(failure.contains("at fetch_user_data"));
    assert!(app.page().is_disabled("async-run")?);

    // The recovery fetch settles, then its processing stage.
    app.advance_time(1000)?;
    app.advance_time(500)?;
    assert!(!app.page().has_class("async-result", "d-none")?);
    assert_eq!(
        app.page().text_of("async-result")?,
        "Recovery successful: Processed John Doe's information"
    );

    // Both messages from the same run stay visible; the trigger is restored.
    assert!(!app.page().has_class("async-failure", "d-none")?);
    assert!(!app.page().is_disabled("async-run")?);
    assert_eq!(
        app.page().text_of("async-run")?,
        "Trigger Async Operation"
    );
    assert_eq!(app.now_ms(), 2500);
    Ok(())
}

#[test]
fn async_unit_appends_a_note_when_recovery_fails_too() -> Result<()> {
    let mut page = Page::demo_fixture();
    let mut scheduler = Scheduler::new();
    let mut demo = AsyncErrorDemo::new(&page)?;
    demo.inject_recovery_failure(true);

    demo.trigger(&mut page, &mut scheduler);
    demo.on_timer(
        TimerEvent::FetchSettled {
            attempt: FetchAttempt::Initial,
        },
        &mut page,
        &mut scheduler,
    );
    demo.on_timer(
        TimerEvent::FetchSettled {
            attempt: FetchAttempt::Recovery,
        },
        &mut page,
        &mut scheduler,
    );

    let failure = page.text_of("async-failure")?;
    assert!(failure.contains("Original Error:"));
    assert!(failure.ends_with("Recovery attempt also failed!"));
    assert!(page.has_class("async-result", "d-none")?);
    assert!(!demo.busy());
    Ok(())
}

#[test]
fn timing_flow_runs_all_three_styles_on_the_same_timeline() -> Result<()> {
    let mut app = App::ready(Page::demo_fixture());
    app.click("timing-run")?;
    assert!(app.page().is_disabled("timing-run")?);

    let ran = app.flush()?;
    assert_eq!(ran, 9);
    assert_eq!(app.now_ms(), 9000);

    let html = app.page().html_of("timing-result")?;
    assert!(html.contains("<code>Callbacks</code>"));
    assert!(html.contains("<code>Promises</code>"));
    assert!(html.contains("<code>Async/Await</code>"));
    // Each style measures from its own start, so all three read the same.
    assert_eq!(html.matches("First task: 1000ms").count(), 3);
    assert_eq!(html.matches("Third task: 3000ms").count(), 3);
    assert!(!app.page().is_disabled("timing-run")?);
    assert_eq!(app.page().text_of("timing-run")?, "Run Tasks");
    Ok(())
}

#[test]
fn clicks_on_a_busy_trigger_are_dropped() -> Result<()> {
    let mut app = App::ready(Page::demo_fixture());
    app.click("async-run")?;
    assert_eq!(app.pending_timers().len(), 1);
    app.click("async-run")?;
    assert_eq!(app.pending_timers().len(), 1);

    let trace = app.take_trace_logs();
    assert!(trace
        .iter()
        .any(|line| line == "[click] async-run dropped (element disabled)"));
    Ok(())
}

#[test]
fn teardown_mid_flight_turns_pending_completions_into_no_ops() -> Result<()> {
    let mut app = App::ready(Page::demo_fixture());
    app.click("async-run")?;
    app.teardown();

    // The queued completion still fires, but the destroyed unit writes
    // nothing and schedules nothing further.
    let ran = app.advance_time(1000)?;
    assert_eq!(ran, 1);
    assert_eq!(app.page().html_of("async-failure")?, "");
    assert!(app.page().has_class("async-failure", "d-none")?);
    assert!(app.pending_timers().is_empty());
    Ok(())
}

#[test]
fn teardown_is_idempotent_and_later_clicks_do_nothing() -> Result<()> {
    let mut app = App::ready(Page::demo_fixture());
    app.teardown();
    app.teardown();
    app.click("this-run")?;
    app.click("timing-run")?;
    assert_eq!(app.page().html_of("this-result")?, "");
    assert!(app.pending_timers().is_empty());
    Ok(())
}

#[test]
fn construction_against_missing_markup_stops_and_is_traced() {
    let mut page = Page::demo_fixture();
    page.remove("async-run");
    let mut app = App::ready(page);
    assert_eq!(app.demo_count(), 3);
    assert!(app.demo("async-recovery").is_none());
    assert!(app.demo("mutable-state").is_some());

    let trace = app.take_trace_logs();
    assert!(trace.iter().any(|line| {
        line == "[init] demo async-recovery failed: element with id \"async-run\" not found"
    }));
}

#[test]
fn clicking_an_unknown_element_is_a_missing_element_error() {
    let mut app = App::ready(Page::demo_fixture());
    assert_eq!(
        app.click("ghost"),
        Err(Error::MissingElement("ghost".to_string()))
    );
}

#[test]
fn progress_indicator_tracks_the_furthest_section_seen() -> Result<()> {
    let mut app = App::ready(Page::demo_fixture());
    app.reveal_section("async-recovery", 0.6);
    assert_eq!(app.page().text_of("progress-bar")?, "4/7");

    // Scrolling back up never regresses the indicator.
    app.reveal_section("comparison-coercion", 1.0);
    assert_eq!(app.page().text_of("progress-bar")?, "4/7");

    app.reveal_section("callback-timing", 0.9);
    assert_eq!(app.page().text_of("progress-bar")?, "7/7");
    assert_eq!(
        app.page().attr("progress-bar", "style")?.as_deref(),
        Some("width: 100%")
    );
    Ok(())
}

#[test]
fn negative_advance_is_a_lifecycle_error() {
    let mut app = App::ready(Page::demo_fixture());
    assert!(matches!(app.advance_time(-1), Err(Error::Lifecycle(_))));
}
