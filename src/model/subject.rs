/// Audit subject category
///
/// Classifies the target business so the analyzer can pick the matching
/// grading-prompt variant. Unrecognized or absent caller text falls back
/// to `Default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubjectCategory {
    /// Generic business website
    Default,
    /// CPA / accounting firm
    CpaFirm,
    /// Wealth-management firm
    WealthManagement,
    /// Independent financial advisor
    FinancialAdvisor,
}

impl SubjectCategory {
    /// Display name used in reports and logs
    pub fn name(self) -> &'static str {
        match self {
            SubjectCategory::Default => "business",
            SubjectCategory::CpaFirm => "CPA firm",
            SubjectCategory::WealthManagement => "wealth management firm",
            SubjectCategory::FinancialAdvisor => "financial advisor",
        }
    }

    /// Exact-token parse (used by tests and structured callers)
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "default" => Some(SubjectCategory::Default),
            "cpaFirm" | "cpa_firm" => Some(SubjectCategory::CpaFirm),
            "wealthManagement" | "wealth_management" => Some(SubjectCategory::WealthManagement),
            "financialAdvisor" | "financial_advisor" => Some(SubjectCategory::FinancialAdvisor),
            _ => None,
        }
    }

    /// Resolve a category from free-form caller text
    ///
    /// Case-insensitive substring matching; first exact parse wins,
    /// then keyword scan. `None`/no match resolves to `Default`.
    pub fn find(text: Option<&str>) -> Self {
        let Some(text) = text else {
            return SubjectCategory::Default;
        };

        if let Some(category) = Self::from_str(text.trim()) {
            return category;
        }

        let lower = text.to_lowercase();
        if lower.contains("cpa") || lower.contains("accounting") || lower.contains("accountant") {
            return SubjectCategory::CpaFirm;
        }
        if lower.contains("wealth") {
            return SubjectCategory::WealthManagement;
        }
        if lower.contains("financial advisor") || lower.contains("advisor") {
            return SubjectCategory::FinancialAdvisor;
        }

        SubjectCategory::Default
    }
}

impl Default for SubjectCategory {
    fn default() -> Self {
        SubjectCategory::Default
    }
}

impl std::fmt::Display for SubjectCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_by_substring_case_insensitively() {
        assert_eq!(
            SubjectCategory::find(Some("Smith & Co CPA Services")),
            SubjectCategory::CpaFirm
        );
        assert_eq!(
            SubjectCategory::find(Some("WEALTH management group")),
            SubjectCategory::WealthManagement
        );
        assert_eq!(
            SubjectCategory::find(Some("independent financial advisor")),
            SubjectCategory::FinancialAdvisor
        );
    }

    #[test]
    fn falls_back_to_default() {
        assert_eq!(SubjectCategory::find(None), SubjectCategory::Default);
        assert_eq!(
            SubjectCategory::find(Some("plumbing company")),
            SubjectCategory::Default
        );
    }

    #[test]
    fn cpa_wins_over_advisor_when_both_match() {
        assert_eq!(
            SubjectCategory::find(Some("CPA and financial advisor")),
            SubjectCategory::CpaFirm
        );
    }
}
