use tracing::debug;

/// Companies that accept electronic confirmation requests.
///
/// Membership is a case-sensitive substring test in both directions, so a
/// listed "ABC" also matches "ABC상사" and vice versa. Very short entries will
/// therefore match unrelated names; the rule is kept as-is because the
/// eligibility lists are maintained with it in mind.
#[derive(Debug, Clone, Default)]
pub struct EligibilitySet {
    names: Vec<String>,
}

impl EligibilitySet {
    /// Build from raw column values. Blank values are dropped and duplicates
    /// collapse, keeping first-seen order.
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<String> = Vec::new();
        for value in values {
            let name = value.as_ref().trim();
            if name.is_empty() || names.iter().any(|existing| existing == name) {
                continue;
            }
            names.push(name.to_string());
        }
        Self { names }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Check if `company_name` is eligible for electronic confirmation
    pub fn is_eligible(&self, company_name: &str) -> bool {
        if company_name.is_empty() {
            return false;
        }

        let matched = self
            .names
            .iter()
            .find(|name| name.contains(company_name) || company_name.contains(name.as_str()));

        if let Some(name) = matched {
            debug!("{} is electronic-eligible (listed as {})", company_name, name);
            true
        } else {
            false
        }
    }
}
