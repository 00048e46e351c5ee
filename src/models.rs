use serde::Serialize;

use crate::classifier::MarkType;
use crate::provider::Provider;

/// One provider's mark finding for one phone number.
///
/// A record whose `mark` is `None` is the provider's "no mark" sentinel.
/// `mark_type` is only ever derived from `mark`, so the two cannot drift apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkRecord {
    provider: Provider,
    source: Option<String>,
    mark: Option<String>,
    mark_type: Option<MarkType>,
    mark_as: Option<String>,
    count: u32,
    origin_desc: Option<String>,
}

impl MarkRecord {
    /// An empty record for `provider`, equivalent to "no mark found".
    pub fn no_mark(provider: Provider) -> Self {
        Self {
            provider,
            source: None,
            mark: None,
            mark_type: None,
            mark_as: None,
            count: 0,
            origin_desc: None,
        }
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn mark(&self) -> Option<&str> {
        self.mark.as_deref()
    }

    pub fn mark_type(&self) -> Option<MarkType> {
        self.mark_type
    }

    pub fn mark_as(&self) -> Option<&str> {
        self.mark_as.as_deref()
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn origin_desc(&self) -> Option<&str> {
        self.origin_desc.as_deref()
    }

    pub fn is_marked(&self) -> bool {
        self.mark.is_some()
    }

    /// Set the mark label and reclassify it.
    pub fn set_mark(&mut self, mark: Option<String>) {
        self.mark_type = MarkType::of(mark.as_deref());
        self.mark = mark;
    }

    pub fn set_source(&mut self, source: Option<String>) {
        self.source = source;
    }

    pub fn set_mark_as(&mut self, mark_as: Option<String>) {
        self.mark_as = mark_as;
    }

    pub fn set_count(&mut self, count: u32) {
        self.count = count;
    }

    pub fn set_origin_desc(&mut self, origin_desc: Option<String>) {
        self.origin_desc = origin_desc;
    }
}
