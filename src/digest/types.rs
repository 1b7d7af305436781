// src/digest/types.rs
use anyhow::Result;

/// One rendered block of a source's output: a markdown heading plus
/// pre-rendered item lines.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Section {
    pub heading: String,
    pub items: Vec<String>,
}

impl Section {
    pub fn new(heading: impl Into<String>, items: Vec<String>) -> Self {
        Self {
            heading: heading.into(),
            items,
        }
    }

    pub fn empty(heading: impl Into<String>) -> Self {
        Self::new(heading, Vec::new())
    }
}

/// What a successful fetch produces. `partial` holds only the items passing
/// the source's recency filter and is always a subset of `all`. Zero items is
/// a valid result, not an error.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SourceResult {
    pub all: Section,
    pub partial: Section,
}

#[async_trait::async_trait]
pub trait SourceAdapter: Send + Sync {
    async fn fetch(&self) -> Result<SourceResult>;
    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct QuoteOfDay {
    pub quote: String,
    pub author: String,
}

#[async_trait::async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn fetch_quote(&self) -> Result<QuoteOfDay>;
}
