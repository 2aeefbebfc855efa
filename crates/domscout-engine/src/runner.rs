//! Selector-strategy runner.
//!
//! Applies every entry of a strategy catalog to the loaded page and turns
//! each into a [`StrategyOutcome`]. Strategies are independent: a lookup
//! error, a stale element or a selector the driver rejects is recorded as a
//! miss for that strategy (or sub-case) and the run moves on.

use crate::backend::{Backend, BackendError, LocateError};
use crate::catalog::{Demo, EvaluationKind, SampleSpec, SelectorCase, StrategyDescriptor};
use crate::cli::OutputHandlers;
use domscout_common::formatter::{self, ellipsize, truncate_chars};
use domscout_common::protocol::{ElementHandle, Interaction};
use domscout_common::record::{CompositeResult, SampleAttributes, StrategyOutcome, StrategyResult};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct RunnerOptions {
    /// Delay between two strategies. Pacing only, results do not depend on it.
    pub pacing: Duration,
    /// Text typed into the search field by the demo interaction.
    pub demo_query: String,
    /// How long the typed text stays in the field before it is cleared.
    pub demo_pause: Duration,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            pacing: Duration::from_secs(2),
            demo_query: "smartphone".to_string(),
            demo_pause: Duration::from_secs(1),
        }
    }
}

pub struct StrategyRunner {
    options: RunnerOptions,
    output: OutputHandlers,
}

impl StrategyRunner {
    pub fn new(options: RunnerOptions, output: OutputHandlers) -> Self {
        Self { options, output }
    }

    /// Run every strategy of `catalog` in order. The returned outcomes follow
    /// the catalog order one to one.
    pub async fn run<B: Backend + ?Sized>(
        &self,
        backend: &mut B,
        catalog: &[StrategyDescriptor],
    ) -> Vec<StrategyOutcome> {
        let mut outcomes = Vec::with_capacity(catalog.len());

        for (i, strategy) in catalog.iter().enumerate() {
            if i > 0 && !self.options.pacing.is_zero() {
                tokio::time::sleep(self.options.pacing).await;
            }

            (self.output.out)(&format!(
                "\n🎯 STRATEGY {}: {} ({})",
                i + 1,
                strategy.name,
                strategy.locator
            ));
            (self.output.out)(&"-".repeat(40));

            let outcome = self.evaluate(backend, strategy).await;
            info!(
                strategy = strategy.name,
                success = outcome.is_success(),
                "strategy evaluated"
            );
            outcomes.push(outcome);
        }

        outcomes
    }

    /// Evaluate a single catalog entry.
    pub async fn evaluate<B: Backend + ?Sized>(
        &self,
        backend: &mut B,
        strategy: &StrategyDescriptor,
    ) -> StrategyOutcome {
        match strategy.kind {
            EvaluationKind::Singular => {
                StrategyOutcome::Singular(self.evaluate_singular(backend, strategy).await)
            }
            EvaluationKind::Composite => {
                let mut details = Vec::with_capacity(strategy.cases.len());
                for case in strategy.cases {
                    let result = match probe(backend, strategy, case).await {
                        Ok((result, _)) => result,
                        Err(e) => {
                            debug!(strategy = strategy.name, selector = case.selector, "miss: {}", e);
                            StrategyResult::miss(
                                strategy.name,
                                case.description,
                                case.selector,
                                e.to_string(),
                            )
                        }
                    };
                    self.report(&result);
                    details.push(result);
                }
                StrategyOutcome::Composite(CompositeResult::new(
                    strategy.name,
                    strategy.target,
                    details,
                ))
            }
        }
    }

    async fn evaluate_singular<B: Backend + ?Sized>(
        &self,
        backend: &mut B,
        strategy: &StrategyDescriptor,
    ) -> StrategyResult {
        let mut first_error = None;

        for case in strategy.cases {
            match probe(backend, strategy, case).await {
                Ok((result, first)) => {
                    self.report(&result);
                    if let Some(Demo::TypeAndClear) = strategy.demo {
                        self.type_and_clear(backend, first).await;
                    }
                    return result;
                }
                Err(e) => {
                    debug!(strategy = strategy.name, selector = case.selector, "miss: {}", e);
                    first_error.get_or_insert(e);
                }
            }
        }

        let (target, selector) = strategy
            .cases
            .first()
            .map(|c| (c.description, c.selector))
            .unwrap_or((strategy.target, ""));
        // Selector and detail both describe the primary case.
        let detail = first_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "No selector declared".to_string());
        let result = StrategyResult::miss(strategy.name, target, selector, detail);
        self.report(&result);
        result
    }

    /// Type the demo query into `element`, then clear it. The field is
    /// cleared even when typing failed so later strategies see it empty.
    async fn type_and_clear<B: Backend + ?Sized>(&self, backend: &mut B, element: ElementHandle) {
        let typed = match backend.interact(element, Interaction::Clear).await {
            Ok(()) => {
                backend
                    .interact(element, Interaction::SendKeys(self.options.demo_query.clone()))
                    .await
            }
            Err(e) => Err(e),
        };

        match typed {
            Ok(()) => {
                (self.output.out)(&format!(
                    "   💡 Demo: typed '{}' into the field",
                    self.options.demo_query
                ));
                if !self.options.demo_pause.is_zero() {
                    tokio::time::sleep(self.options.demo_pause).await;
                }
            }
            Err(e) => warn!("Demo input failed: {}", e),
        }

        if let Err(e) = backend.interact(element, Interaction::Clear).await {
            warn!("Failed to clear demo input: {}", e);
            (self.output.err)(&format!("{} Could not clear the field: {}", formatter::FAIL_MARK, e));
        }
    }

    fn report(&self, result: &StrategyResult) {
        let line = formatter::format_result(result);
        if result.found() {
            (self.output.out)(&line);
            for (name, value) in result.sample_attributes() {
                (self.output.out)(&format!("   {}: {}", name, truncate_chars(value, 80)));
            }
        } else {
            (self.output.err)(&line);
        }
    }
}

/// Locate `case` and sample its matches. Returns the hit together with the
/// first matched element.
async fn probe<B: Backend + ?Sized>(
    backend: &mut B,
    strategy: &StrategyDescriptor,
    case: &SelectorCase,
) -> Result<(StrategyResult, ElementHandle), LocateError> {
    let mut matches = backend.find_all(None, strategy.locator, case.selector).await?;

    if strategy.sample.visible_text_only {
        let mut visible = Vec::with_capacity(matches.len());
        for element in matches {
            if !backend.text(element).await?.trim().is_empty() {
                visible.push(element);
            }
        }
        matches = visible;
    }

    let Some(&first) = matches.first() else {
        return Err(LocateError::no_match(strategy.locator, case.selector));
    };

    let sample = sample_elements(backend, &matches, &strategy.sample, case.probe_attribute).await?;
    let result = StrategyResult::hit(
        strategy.name,
        case.description,
        case.selector,
        matches.len(),
        sample,
    );
    Ok((result, first))
}

/// Read the attributes requested by `spec` from the first few matches.
pub async fn sample_elements<B: Backend + ?Sized>(
    backend: &mut B,
    matches: &[ElementHandle],
    spec: &SampleSpec,
    probe_attribute: Option<&'static str>,
) -> Result<SampleAttributes, BackendError> {
    let mut sample = SampleAttributes::new();
    let limit = spec.matches.max(1);

    for (i, &element) in matches.iter().take(limit).enumerate() {
        let key = |name: &str| {
            if limit > 1 {
                format!("{}[{}]", name, i + 1)
            } else {
                name.to_string()
            }
        };

        sample.insert(key("tag_name"), backend.tag_name(element).await?);

        for attribute in spec.attributes.iter().copied().chain(probe_attribute) {
            if let Some(value) = backend.attribute(element, attribute).await? {
                sample.insert(key(attribute), value);
            }
        }

        if spec.text_chars.is_some() || spec.summary_chars.is_some() {
            let text = backend.text(element).await?;
            let text = text.trim();
            if !text.is_empty() {
                if let Some(max) = spec.text_chars {
                    sample.insert(key("text"), truncate_chars(text, max));
                }
                if let Some(max) = spec.summary_chars {
                    sample.insert(key("summary"), ellipsize(text, max));
                }
            }
        }

        if spec.data_attributes {
            match backend.attribute_names(element).await {
                Ok(names) => {
                    for name in names.iter().filter(|n| n.starts_with("data-")) {
                        if let Some(value) = backend.attribute(element, name).await? {
                            sample.insert(key(name), value);
                        }
                    }
                }
                Err(BackendError::NotSupported(_)) => {
                    debug!("Backend cannot list attributes, skipping data-* sample");
                }
                Err(e) => return Err(e),
            }
        }

        if spec.position || spec.layout {
            let rect = backend.rect(element).await?;
            if spec.position {
                sample.insert(key("position"), format!("x:{}, y:{}", rect.x, rect.y));
            }
            if spec.layout {
                sample.insert(key("x"), rect.x.to_string());
                sample.insert(key("y"), rect.y.to_string());
                sample.insert(key("width"), rect.width.to_string());
                sample.insert(key("height"), rect.height.to_string());
                let visible = backend.is_displayed(element).await?;
                sample.insert(key("visible"), visible.to_string());
            }
        }
    }

    Ok(sample)
}
