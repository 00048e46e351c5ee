use serde::Serialize;
use std::str::FromStr;

use crate::error::UnknownProvider;

/// A search service queried for phone marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Baidu,
    So360,
}

/// Where the descriptive sentence sits relative to the mark label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentenceLocator {
    /// First element in the document matching the selector.
    Selector(&'static str),
    /// The label's next element sibling.
    NextSibling,
}

/// Structural and textual markers of a provider's fraud-label widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Markers {
    pub label_selector: &'static str,
    pub sentence: SentenceLocator,
    pub count: (&'static str, &'static str),
    pub mark_as: (&'static str, &'static str),
}

const BAIDU_MARKERS: Markers = Markers {
    label_selector: ".op_fraudphone_label",
    sentence: SentenceLocator::Selector(".op_fraudphone_word"),
    count: ("被", "个"),
    mark_as: ("标记为", ","),
};

const SO360_MARKERS: Markers = Markers {
    label_selector: ".mohe-ph-mark",
    sentence: SentenceLocator::NextSibling,
    count: ("被", "位"),
    mark_as: ("疑似为", "电话"),
};

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::Baidu, Provider::So360];

    pub fn id(&self) -> &'static str {
        match self {
            Provider::Baidu => "baidu",
            Provider::So360 => "so360",
        }
    }

    /// Search endpoint; the phone number is appended as the query value.
    pub fn search_base(&self) -> &'static str {
        match self {
            Provider::Baidu => "http://www.baidu.com/s?wd=",
            Provider::So360 => "https://www.so.com/s?q=",
        }
    }

    pub fn markers(&self) -> &'static Markers {
        match self {
            Provider::Baidu => &BAIDU_MARKERS,
            Provider::So360 => &SO360_MARKERS,
        }
    }
}

/// Build a search URL from a base and a phone number.
pub fn search_url(base: &str, phone: &str) -> String {
    format!("{}{}", base, urlencoding::encode(phone))
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Provider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Provider::ALL
            .into_iter()
            .find(|p| p.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownProvider(s.to_string()))
    }
}
