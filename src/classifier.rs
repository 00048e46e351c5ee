use serde::Serialize;

/// Category of a provider mark, derived from its label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarkType {
    IllegalCall,
    SalesCall,
    RealEstateAgent,
    FraudPhone,
    InsuranceFinancial,
    CrankCall,
    Other,
}

/// Keyword rules, first match wins.
const MARK_RULES: &[(&[&str], MarkType)] = &[
    (&["违法"], MarkType::IllegalCall),
    (&["推销"], MarkType::SalesCall),
    (&["房产"], MarkType::RealEstateAgent),
    (&["诈骗", "欺诈"], MarkType::FraudPhone),
    (&["保险", "理财"], MarkType::InsuranceFinancial),
    (&["骚扰"], MarkType::CrankCall),
];

impl MarkType {
    /// Classify a label. Labels matching no rule are `Other`.
    pub fn classify(label: &str) -> Self {
        MARK_RULES
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| label.contains(*k)))
            .map(|(_, mark_type)| *mark_type)
            .unwrap_or(MarkType::Other)
    }

    /// Like [`MarkType::classify`], but an absent label has no type.
    pub fn of(label: Option<&str>) -> Option<Self> {
        label.map(Self::classify)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MarkType::IllegalCall => "违法电话",
            MarkType::SalesCall => "推销电话",
            MarkType::RealEstateAgent => "房产中介",
            MarkType::FraudPhone => "诈骗电话",
            MarkType::InsuranceFinancial => "保险理财",
            MarkType::CrankCall => "骚扰电话",
            MarkType::Other => "其他标记",
        }
    }
}

impl std::fmt::Display for MarkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
