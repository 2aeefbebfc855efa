//! Static catalog of element-location strategies.
//!
//! Each entry is plain data: which locator mechanism to use, which selectors
//! to try, and what to sample from the matches. The runner iterates the
//! table in declaration order, which is also the order of the final report.

use domscout_common::protocol::LocatorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationKind {
    /// One result; extra cases are fallbacks tried in order until one hits.
    Singular,
    /// One result per case, every case evaluated independently.
    Composite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorCase {
    pub description: &'static str,
    pub selector: &'static str,
    /// Attribute whose value is reported for the first match.
    pub probe_attribute: Option<&'static str>,
}

impl SelectorCase {
    pub const fn new(description: &'static str, selector: &'static str) -> Self {
        Self {
            description,
            selector,
            probe_attribute: None,
        }
    }

    pub const fn probing(mut self, attribute: &'static str) -> Self {
        self.probe_attribute = Some(attribute);
        self
    }
}

/// What to read from matched elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleSpec {
    /// How many matches to sample. Keys get a `[n]` suffix when above one.
    pub matches: usize,
    pub attributes: &'static [&'static str],
    /// Include the first `n` characters of the visible text.
    pub text_chars: Option<usize>,
    /// Include an ellipsized summary of the visible text.
    pub summary_chars: Option<usize>,
    /// Include every `data-*` attribute.
    pub data_attributes: bool,
    /// Include `x:.., y:..` of the element.
    pub position: bool,
    /// Include location, size and visibility.
    pub layout: bool,
    /// Only count matches that render non-empty text.
    pub visible_text_only: bool,
}

impl SampleSpec {
    pub const BASIC: SampleSpec = SampleSpec {
        matches: 1,
        attributes: &[],
        text_chars: None,
        summary_chars: None,
        data_attributes: false,
        position: false,
        layout: false,
        visible_text_only: false,
    };
}

/// Interaction performed on the first match for demonstration purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demo {
    /// Type the configured query, then clear the field again.
    TypeAndClear,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyDescriptor {
    pub name: &'static str,
    pub target: &'static str,
    pub kind: EvaluationKind,
    pub locator: LocatorKind,
    pub cases: &'static [SelectorCase],
    pub sample: SampleSpec,
    pub demo: Option<Demo>,
}

impl StrategyDescriptor {
    /// Number of results this strategy contributes.
    pub fn attempts(&self) -> usize {
        match self.kind {
            EvaluationKind::Singular => 1,
            EvaluationKind::Composite => self.cases.len(),
        }
    }
}

pub const BY_ID: StrategyDescriptor = StrategyDescriptor {
    name: "by-id",
    target: "Search bar",
    kind: EvaluationKind::Singular,
    locator: LocatorKind::Id,
    cases: &[SelectorCase::new("Search bar", "twotabsearchtextbox")],
    sample: SampleSpec {
        attributes: &["id", "placeholder"],
        ..SampleSpec::BASIC
    },
    demo: Some(Demo::TypeAndClear),
};

pub const BY_NAME: StrategyDescriptor = StrategyDescriptor {
    name: "by-name",
    target: "Keywords field",
    kind: EvaluationKind::Singular,
    locator: LocatorKind::Name,
    cases: &[SelectorCase::new("Keywords field", "field-keywords")],
    sample: SampleSpec {
        attributes: &["type", "name"],
        ..SampleSpec::BASIC
    },
    demo: None,
};

pub const BY_CLASS_NAME: StrategyDescriptor = StrategyDescriptor {
    name: "by-class-name",
    target: "Navigation element",
    kind: EvaluationKind::Singular,
    locator: LocatorKind::ClassName,
    cases: &[SelectorCase::new("Navigation element", "nav-line-1")],
    sample: SampleSpec {
        attributes: &["class"],
        text_chars: Some(80),
        ..SampleSpec::BASIC
    },
    demo: None,
};

pub const BY_TAG_NAME: StrategyDescriptor = StrategyDescriptor {
    name: "by-tag-name",
    target: "Images",
    kind: EvaluationKind::Singular,
    locator: LocatorKind::TagName,
    cases: &[SelectorCase::new("Images", "img")],
    sample: SampleSpec {
        matches: 3,
        attributes: &["src", "alt", "width", "height"],
        ..SampleSpec::BASIC
    },
    demo: None,
};

pub const BY_CSS_SELECTOR: StrategyDescriptor = StrategyDescriptor {
    name: "by-css-selector",
    target: "Search button",
    kind: EvaluationKind::Singular,
    locator: LocatorKind::Css,
    cases: &[
        SelectorCase::new("Search button", "input[type='submit'][value='Ir']"),
        SelectorCase::new("Search button (alternative)", "#nav-search-submit-button"),
    ],
    sample: SampleSpec {
        attributes: &["id", "type", "value", "class"],
        ..SampleSpec::BASIC
    },
    demo: None,
};

pub const BY_XPATH: StrategyDescriptor = StrategyDescriptor {
    name: "by-xpath",
    target: "Navigation links",
    kind: EvaluationKind::Singular,
    locator: LocatorKind::XPath,
    cases: &[SelectorCase::new(
        "Navigation links",
        "//div[@id='nav-main']//a[contains(@class, 'nav-a')]",
    )],
    sample: SampleSpec {
        matches: 5,
        attributes: &["href", "class"],
        text_chars: Some(80),
        ..SampleSpec::BASIC
    },
    demo: None,
};

pub const DATA_ATTRIBUTES: StrategyDescriptor = StrategyDescriptor {
    name: "data-attributes",
    target: "Elements with data attributes",
    kind: EvaluationKind::Composite,
    locator: LocatorKind::Css,
    cases: &[
        SelectorCase::new("Navigation role", "[data-nav-role]"),
        SelectorCase::new("Test hooks", "[data-cy]"),
        SelectorCase::new("Accessible labels", "[aria-label]"),
        SelectorCase::new("ARIA roles", "[role]"),
        SelectorCase::new("Focusable elements", "[tabindex]"),
    ],
    sample: SampleSpec {
        text_chars: Some(50),
        data_attributes: true,
        ..SampleSpec::BASIC
    },
    demo: None,
};

pub const ATTRIBUTE_CONTAINS: StrategyDescriptor = StrategyDescriptor {
    name: "attribute-contains",
    target: "Elements whose attribute contains text",
    kind: EvaluationKind::Composite,
    locator: LocatorKind::Css,
    cases: &[
        SelectorCase::new("href contains 'amazon'", "[href*='amazon']").probing("href"),
        SelectorCase::new("class contains 'nav'", "[class*='nav']").probing("class"),
        SelectorCase::new("id contains 'search'", "[id*='search']").probing("id"),
        SelectorCase::new("placeholder contains 'pesquis'", "[placeholder*='pesquis' i]")
            .probing("placeholder"),
        SelectorCase::new("alt contains 'amazon'", "[alt*='amazon' i]").probing("alt"),
    ],
    sample: SampleSpec {
        text_chars: Some(30),
        ..SampleSpec::BASIC
    },
    demo: None,
};

pub const PSEUDO_SELECTORS: StrategyDescriptor = StrategyDescriptor {
    name: "pseudo-selectors",
    target: "Elements by CSS pseudo-selectors",
    kind: EvaluationKind::Composite,
    locator: LocatorKind::Css,
    cases: &[
        SelectorCase::new("First link of the page", "a:first-of-type"),
        SelectorCase::new("Last list item", "li:last-child"),
        SelectorCase::new("Even elements", "div:nth-child(even)"),
        SelectorCase::new("Links with href", "a[href]:not([href=''])"),
        SelectorCase::new("Enabled inputs", "input:not([disabled])"),
    ],
    sample: SampleSpec {
        attributes: &["class"],
        text_chars: Some(40),
        ..SampleSpec::BASIC
    },
    demo: None,
};

pub const MULTIPLE_ATTRIBUTES: StrategyDescriptor = StrategyDescriptor {
    name: "multiple-attributes",
    target: "Elements by combined attributes",
    kind: EvaluationKind::Composite,
    locator: LocatorKind::Css,
    cases: &[
        SelectorCase::new("Search button", "input[type='submit'][class*='nav']"),
        SelectorCase::new("Navigation links", "a[class*='nav'][href]"),
        SelectorCase::new("Images with alt", "img[alt][src]"),
        SelectorCase::new("Text inputs", "input[type='text'][name]"),
        SelectorCase::new("Styled containers", "div[style*='display'][class]"),
    ],
    sample: SampleSpec {
        attributes: &["id", "class", "name"],
        ..SampleSpec::BASIC
    },
    demo: None,
};

pub const XPATH_ADVANCED: StrategyDescriptor = StrategyDescriptor {
    name: "xpath-advanced",
    target: "Elements by advanced XPath",
    kind: EvaluationKind::Composite,
    locator: LocatorKind::XPath,
    cases: &[
        SelectorCase::new(
            "Elements with specific text",
            "//*[contains(text(), 'Amazon') or contains(text(), 'Prime')]",
        ),
        SelectorCase::new("Links by position", "//nav//a[position()<=3]"),
        SelectorCase::new(
            "Elements with specific class",
            "//div[contains(@class, 'nav') and @id]",
        ),
        SelectorCase::new("Sibling elements", "//input/following-sibling::*"),
        SelectorCase::new("Image parents", "//img/parent::*"),
    ],
    sample: SampleSpec {
        text_chars: Some(40),
        position: true,
        ..SampleSpec::BASIC
    },
    demo: None,
};

pub const TEXT_CONTENT: StrategyDescriptor = StrategyDescriptor {
    name: "text-content",
    target: "Elements by text content",
    kind: EvaluationKind::Composite,
    locator: LocatorKind::XPath,
    cases: &[
        SelectorCase::new(
            "Login and account",
            "//*[contains(text(), 'Login') or contains(text(), 'Conta') or contains(text(), 'Entrar') or contains(text(), 'Olá')]",
        ),
        SelectorCase::new(
            "Prices",
            "//*[contains(text(), 'R$') or contains(text(), 'reais') or contains(text(), '%')]",
        ),
        SelectorCase::new(
            "Navigation labels",
            "//*[contains(text(), 'Livros') or contains(text(), 'Prime') or contains(text(), 'Casa')]",
        ),
        SelectorCase::new(
            "Section titles",
            "//*[self::h1 or self::h2 or self::h3 or self::span][normalize-space(text())]",
        ),
        SelectorCase::new(
            "Offers",
            "//*[contains(text(), 'oferta') or contains(text(), 'desconto') or contains(text(), 'off')]",
        ),
    ],
    sample: SampleSpec {
        text_chars: Some(usize::MAX),
        summary_chars: Some(50),
        visible_text_only: true,
        ..SampleSpec::BASIC
    },
    demo: None,
};

pub const POSITION_CONTEXT: StrategyDescriptor = StrategyDescriptor {
    name: "position-context",
    target: "Elements by position and context",
    kind: EvaluationKind::Composite,
    locator: LocatorKind::Css,
    cases: &[
        SelectorCase::new(
            "First header item",
            "header *:first-child, [role='banner'] *:first-child",
        ),
        SelectorCase::new(
            "Last footer item",
            "footer *:last-child, [role='contentinfo'] *:last-child",
        ),
        SelectorCase::new("Central elements", "div:nth-child(even)"),
        SelectorCase::new("First link of each nav", "nav a:first-of-type"),
        SelectorCase::new("Elements after inputs", "input + *, input ~ *"),
    ],
    sample: SampleSpec {
        layout: true,
        ..SampleSpec::BASIC
    },
    demo: None,
};

/// Default catalog, in report order.
pub const DEFAULT_CATALOG: &[StrategyDescriptor] = &[
    BY_ID,
    BY_NAME,
    BY_CLASS_NAME,
    BY_TAG_NAME,
    BY_CSS_SELECTOR,
    BY_XPATH,
    DATA_ATTRIBUTES,
    ATTRIBUTE_CONTAINS,
    PSEUDO_SELECTORS,
    MULTIPLE_ATTRIBUTES,
    XPATH_ADVANCED,
    TEXT_CONTENT,
    POSITION_CONTEXT,
];

/// Total number of results a run over `catalog` produces.
pub fn expected_attempts(catalog: &[StrategyDescriptor]) -> usize {
    catalog.iter().map(StrategyDescriptor::attempts).sum()
}
