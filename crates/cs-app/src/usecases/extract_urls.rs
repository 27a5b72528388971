use cs_core::content::{ContentKind, ContentRegistry, HistoryError};
use cs_core::urls::extract_urls;

/// URLs found in one text entry of the history.
pub struct ExtractUrls {
    registry: ContentRegistry,
}

impl ExtractUrls {
    pub fn new(registry: ContentRegistry) -> Self {
        Self { registry }
    }

    pub fn execute(&self, index: u32) -> Result<Vec<String>, HistoryError> {
        let entry = self.registry.get(ContentKind::Text, index)?;
        Ok(entry.payload.as_text().map(extract_urls).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_core::content::ContentPayload;

    #[test]
    fn extracts_from_the_selected_entry() {
        let registry = ContentRegistry::new();
        registry.append(ContentPayload::Text("nothing here".into()), 0);
        registry.append(
            ContentPayload::Text("docs at https://docs.rs and www.rust-lang.org".into()),
            0,
        );

        let uc = ExtractUrls::new(registry);
        assert!(uc.execute(1).unwrap().is_empty());
        assert_eq!(
            uc.execute(2).unwrap(),
            vec!["https://docs.rs", "www.rust-lang.org"]
        );
    }

    #[test]
    fn unknown_index_is_not_found() {
        let uc = ExtractUrls::new(ContentRegistry::new());
        assert!(matches!(
            uc.execute(1),
            Err(HistoryError::NotFound { .. })
        ));
    }
}
