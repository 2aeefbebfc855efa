use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Mechanism used to locate elements on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocatorKind {
    Id,
    Name,
    ClassName,
    TagName,
    Css,
    #[serde(rename = "xpath")]
    XPath,
    LinkText,
    PartialLinkText,
}

impl LocatorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocatorKind::Id => "id",
            LocatorKind::Name => "name",
            LocatorKind::ClassName => "class name",
            LocatorKind::TagName => "tag name",
            LocatorKind::Css => "css selector",
            LocatorKind::XPath => "xpath",
            LocatorKind::LinkText => "link text",
            LocatorKind::PartialLinkText => "partial link text",
        }
    }
}

impl fmt::Display for LocatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque reference to an element located by a backend.
///
/// Handles are only meaningful to the backend that produced them and become
/// invalid after the next navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle(pub u32);

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Input simulated on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    Click,
    Clear,
    SendKeys(String),
}

#[derive(Debug, Clone)]
pub struct NavigationResult {
    pub url: String,
    pub title: String,
}

/// Row action offered by the challenge table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Edit,
    Delete,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Edit => "edit",
            ActionKind::Delete => "delete",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "edit" => Ok(ActionKind::Edit),
            "delete" => Ok(ActionKind::Delete),
            other => Err(format!("unknown action '{}'", other)),
        }
    }
}
