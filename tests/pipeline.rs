mod support;

use linkscrub::sanitize_url;

#[test]
fn attribution_across_providers_empties_query() {
    let (engine, _tmp) = support::engine();
    let outcome = engine
        .process("look https://ex.com/p?utm_source=a&fbclid=b")
        .unwrap();

    assert_eq!(outcome.rewritten_text, "look https://ex.com/p");
    assert_eq!(outcome.affected_providers, ["Google", "Meta"]);
    assert_eq!(outcome.notice, "Removed trackers from Google, and Meta");
}

#[test]
fn kept_parameters_stay_in_order() {
    let (engine, _tmp) = support::engine();
    let outcome = engine
        .process("https://ex.com/?b=2&gclid=x&a=1&c=&utm_medium=m")
        .unwrap();
    assert_eq!(outcome.rewritten_text, "https://ex.com/?b=2&a=1&c=");
}

#[test]
fn bare_keys_are_preserved() {
    let (engine, _tmp) = support::engine_with_trackers(r#"{"Acme": ["y"]}"#);
    let outcome = engine.process("https://ex.com/?x&y=1").unwrap();
    assert_eq!(outcome.rewritten_text, "https://ex.com/?x");
    assert_eq!(outcome.affected_providers, ["Acme"]);
}

#[test]
fn sanitizing_twice_changes_nothing() {
    let (engine, _tmp) = support::engine();
    let first = engine
        .process("https://ex.com/a?q=1&igsh=2#frag")
        .unwrap();
    assert_eq!(first.rewritten_text, "https://ex.com/a?q=1#frag");
    assert!(engine.process(&first.rewritten_text).is_none());
}

#[test]
fn url_without_trackers_is_untouched() {
    let (engine, _tmp) = support::engine();
    let snapshot = engine.snapshot();
    let url = "https://ex.com/a;p?Q=%zz&x+y=1#";
    let result = sanitize_url(url, &snapshot.rules);

    assert!(!result.has_removals());
    assert_eq!(result.cleaned_url, url);
    assert_eq!(result.message, "No trackers found");
}

#[test]
fn three_providers_are_named_with_serial_comma() {
    let (engine, _tmp) = support::engine();
    let outcome = engine
        .process("https://a.com/?fbclid=1 https://b.com/?ttclid=2 https://c.com/?gclid=3")
        .unwrap();
    assert_eq!(outcome.affected_providers, ["Meta", "TikTok", "Google"]);
    assert_eq!(outcome.notice, "Removed trackers from Meta, TikTok, and Google");
}

#[test]
fn gate_skips_text_without_links() {
    let (engine, _tmp) = support::engine();
    assert!(engine.process("nothing to see ?fbclid=1").is_none());
}

#[test]
fn disabled_gate_still_needs_a_link() {
    let (engine, _tmp) = support::engine();
    engine.set_require_links(false).unwrap();
    assert!(engine.process("no links here").is_none());
    assert!(engine.process("www.ex.com/?fbclid=1").is_some());
}

#[test]
fn repeated_link_is_rewritten_everywhere() {
    let (engine, _tmp) = support::engine();
    let outcome = engine
        .process("https://ex.com/?fbclid=1 and again https://ex.com/?fbclid=1")
        .unwrap();
    assert_eq!(
        outcome.rewritten_text,
        "https://ex.com/ and again https://ex.com/"
    );
}

#[test]
fn custom_pattern_is_used_for_detection() {
    let (engine, _tmp) = support::engine();
    engine.set_pattern(r"<(https://[^>]+)>").unwrap();

    let outcome = engine.process("<https://ex.com/?gclid=1>").unwrap();
    assert_eq!(outcome.rewritten_text, "<https://ex.com/>");
    assert!(engine.process("https://ex.com/?gclid=1").is_none());
}
