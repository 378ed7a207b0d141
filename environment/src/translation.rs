use ahash::HashMap;

const DEFAULT_DOMAIN: &str = "default";

pub trait TranslationManager {
    /// `None` when no text is known for `key`. Without a domain the default
    /// domain is searched.
    fn translate(&self, key: &str, domain: Option<&str>) -> Option<String>;
}

/// Translations held in memory, grouped by domain.
#[derive(Debug, Clone, Default)]
pub struct StaticTranslationManager {
    domains: HashMap<String, HashMap<String, String>>,
}

impl StaticTranslationManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, domain: Option<&str>, key: &str, text: &str) -> &mut Self {
        self.domains
            .entry(domain.unwrap_or(DEFAULT_DOMAIN).to_owned())
            .or_default()
            .insert(key.to_owned(), text.to_owned());
        self
    }
}

impl TranslationManager for StaticTranslationManager {
    fn translate(&self, key: &str, domain: Option<&str>) -> Option<String> {
        self.domains
            .get(domain.unwrap_or(DEFAULT_DOMAIN))
            .and_then(|texts| texts.get(key))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_per_domain() {
        let mut manager = StaticTranslationManager::new();
        manager
            .insert(None, "delete", "Löschen")
            .insert(Some("people"), "name", "Name der Person");

        assert_eq!(manager.translate("delete", None), Some("Löschen".to_owned()));
        assert_eq!(
            manager.translate("name", Some("people")),
            Some("Name der Person".to_owned())
        );
        assert_eq!(manager.translate("name", None), None);
        assert_eq!(manager.translate("delete", Some("pets")), None);
    }
}
