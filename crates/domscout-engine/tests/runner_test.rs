mod common;

use common::{MockBackend, quiet};
use domscout_engine::catalog::{
    self, BY_CSS_SELECTOR, BY_ID, BY_TAG_NAME, DEFAULT_CATALOG, EvaluationKind, SampleSpec,
    SelectorCase, StrategyDescriptor, TEXT_CONTENT,
};
use domscout_engine::protocol::{Interaction, LocatorKind};
use domscout_engine::record::StrategyOutcome;
use domscout_engine::runner::{RunnerOptions, StrategyRunner};
use std::time::Duration;

fn runner() -> StrategyRunner {
    StrategyRunner::new(
        RunnerOptions {
            pacing: Duration::ZERO,
            demo_pause: Duration::ZERO,
            ..Default::default()
        },
        quiet(),
    )
}

const THREE_CASES: StrategyDescriptor = StrategyDescriptor {
    name: "three-cases",
    target: "Three independent lookups",
    kind: EvaluationKind::Composite,
    locator: LocatorKind::Css,
    cases: &[
        SelectorCase::new("Broken", "[[broken"),
        SelectorCase::new("Missing", ".missing"),
        SelectorCase::new("Present", ".present"),
    ],
    sample: SampleSpec::BASIC,
    demo: None,
};

#[tokio::test]
async fn test_run_produces_one_result_per_attempt() {
    let mut backend = MockBackend::new();
    backend.add(None, "body");

    let outcomes = runner().run(&mut backend, DEFAULT_CATALOG).await;

    assert_eq!(outcomes.len(), DEFAULT_CATALOG.len());
    let attempts: usize = outcomes.iter().map(StrategyOutcome::attempts).sum();
    assert_eq!(attempts, catalog::expected_attempts(DEFAULT_CATALOG));

    for (outcome, strategy) in outcomes.iter().zip(DEFAULT_CATALOG) {
        assert_eq!(outcome.strategy_name(), strategy.name);
        assert_eq!(outcome.attempts(), strategy.attempts());
        assert!(!outcome.is_success(), "{} should miss on an empty page", strategy.name);
    }
}

#[tokio::test]
async fn test_error_detail_present_exactly_on_miss() {
    let mut backend = MockBackend::new();
    let body = backend.add(None, "body");
    for _ in 0..4 {
        let img = backend.add(Some(body), "img");
        backend.set_attr(img, "src", "logo.png");
    }

    let outcomes = runner().run(&mut backend, DEFAULT_CATALOG).await;

    for result in outcomes.iter().flat_map(|o| o.results()) {
        assert_eq!(result.found(), result.error_detail().is_none());
        if result.found() {
            assert!(result.match_count() > 0);
        } else {
            assert_eq!(result.match_count(), 0);
        }
    }
}

#[tokio::test]
async fn test_failing_case_does_not_stop_composite() {
    let mut backend = MockBackend::new();
    let body = backend.add(None, "body");
    let present = backend.add(Some(body), "div");
    backend.route(LocatorKind::Css, ".present", &[present]);
    backend.broken_selectors.insert("[[broken".to_string());

    let outcome = runner().evaluate(&mut backend, &THREE_CASES).await;

    let StrategyOutcome::Composite(composite) = &outcome else {
        panic!("expected a composite outcome");
    };
    assert_eq!(composite.total_tested(), 3);
    assert_eq!(composite.found_count(), 1);

    let details = composite.details();
    assert!(details[0].error_detail().unwrap().contains("Invalid selector"));
    assert!(details[1].error_detail().unwrap().contains("No element matches"));
    assert!(details[2].found());
    assert!(outcome.is_success());
}

#[tokio::test]
async fn test_demo_leaves_search_field_cleared() {
    let mut backend = MockBackend::new();
    let body = backend.add(None, "body");
    let input = backend.add(Some(body), "input");
    backend.set_attr(input, "id", "twotabsearchtextbox");
    backend.set_attr(input, "placeholder", "Pesquisa Amazon.com.br");
    backend.route(LocatorKind::Id, "twotabsearchtextbox", &[input]);

    let outcome = runner().evaluate(&mut backend, &BY_ID).await;

    assert!(outcome.is_success());
    assert_eq!(backend.value_of(input), "");
    assert!(
        backend
            .interactions
            .iter()
            .any(|(_, action)| *action == Interaction::SendKeys("smartphone".into()))
    );
    assert_eq!(backend.interactions.last().map(|(_, a)| a), Some(&Interaction::Clear));

    let result = outcome.results().next().unwrap();
    assert_eq!(result.sample_attributes()["id"], "twotabsearchtextbox");
    assert_eq!(result.sample_attributes()["tag_name"], "input");
}

#[tokio::test]
async fn test_singular_falls_back_to_next_selector() {
    let mut backend = MockBackend::new();
    let body = backend.add(None, "body");
    let button = backend.add(Some(body), "input");
    backend.set_attr(button, "id", "nav-search-submit-button");
    backend.route(LocatorKind::Css, "#nav-search-submit-button", &[button]);

    let outcome = runner().evaluate(&mut backend, &BY_CSS_SELECTOR).await;

    let result = outcome.results().next().unwrap();
    assert!(result.found());
    assert_eq!(result.selector_value(), "#nav-search-submit-button");
    assert_eq!(result.target_description(), "Search button (alternative)");
}

#[tokio::test]
async fn test_singular_miss_reports_first_selector() {
    let mut backend = MockBackend::new();
    backend.add(None, "body");

    let outcome = runner().evaluate(&mut backend, &BY_CSS_SELECTOR).await;

    let result = outcome.results().next().unwrap();
    assert!(!result.found());
    assert_eq!(result.selector_value(), "input[type='submit'][value='Ir']");
    let detail = result.error_detail().unwrap();
    assert!(detail.contains("input[type='submit'][value='Ir']"), "{}", detail);
    assert!(!detail.contains("#nav-search-submit-button"), "{}", detail);
}

#[tokio::test]
async fn test_multiple_matches_are_sampled_with_suffix() {
    let mut backend = MockBackend::new();
    let body = backend.add(None, "body");
    for i in 0..5 {
        let img = backend.add(Some(body), "img");
        backend.set_attr(img, "alt", &format!("image {}", i));
    }

    let outcome = runner().evaluate(&mut backend, &BY_TAG_NAME).await;

    let result = outcome.results().next().unwrap();
    assert_eq!(result.match_count(), 5);
    let sample = result.sample_attributes();
    assert_eq!(sample["alt[1]"], "image 0");
    assert_eq!(sample["alt[3]"], "image 2");
    assert!(!sample.contains_key("alt[4]"));
}

#[tokio::test]
async fn test_text_content_ignores_blank_matches() {
    let mut backend = MockBackend::new();
    let body = backend.add(None, "body");
    let blank = backend.add_text(Some(body), "span", "   ");
    let price = backend.add_text(Some(body), "span", "R$ 1.299,00 em até 10x sem juros no cartão");
    let prices_selector = TEXT_CONTENT.cases[1].selector;
    backend.route(LocatorKind::XPath, prices_selector, &[blank, price]);

    let outcome = runner().evaluate(&mut backend, &TEXT_CONTENT).await;

    let StrategyOutcome::Composite(composite) = &outcome else {
        panic!("expected a composite outcome");
    };
    let prices = &composite.details()[1];
    assert_eq!(prices.match_count(), 1);
    assert_eq!(
        prices.sample_attributes()["summary"],
        "R$ 1.299,00 em até 10x sem juros no cartão"
    );
    assert_eq!(composite.found_count(), 1);
}
