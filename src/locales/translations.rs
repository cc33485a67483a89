//! UI strings backed by Fluent bundles

use super::SupportedLanguage;
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource};
use std::collections::HashMap;
use unic_langid::LanguageIdentifier;

const RESOURCES: &[(SupportedLanguage, &str)] = &[
    (SupportedLanguage::En, include_str!("ftl/en.ftl")),
    (SupportedLanguage::Fr, include_str!("ftl/fr.ftl")),
    (SupportedLanguage::De, include_str!("ftl/de.ftl")),
    (SupportedLanguage::Es, include_str!("ftl/es.ftl")),
    (SupportedLanguage::It, include_str!("ftl/it.ftl")),
    (SupportedLanguage::Pt, include_str!("ftl/pt.ftl")),
];

#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("invalid language identifier for {0}")]
    LanguageId(SupportedLanguage),
    #[error("{count} syntax error(s) in the {lang} messages")]
    Syntax { lang: SupportedLanguage, count: usize },
    #[error("duplicate messages in the {0} resource")]
    Duplicate(SupportedLanguage),
}

/// Translation store, one bundle per supported language
pub struct Translations {
    bundles: HashMap<SupportedLanguage, FluentBundle<FluentResource>>,
}

impl Translations {
    /// Load the embedded message resources
    pub fn new() -> Result<Self, TranslationError> {
        let mut bundles = HashMap::new();

        for (lang, source) in RESOURCES {
            let langid: LanguageIdentifier = lang
                .code()
                .parse()
                .map_err(|_| TranslationError::LanguageId(*lang))?;

            let resource = FluentResource::try_new(source.to_string()).map_err(|(_, errors)| {
                TranslationError::Syntax {
                    lang: *lang,
                    count: errors.len(),
                }
            })?;

            let mut bundle = FluentBundle::new_concurrent(vec![langid]);
            bundle.set_use_isolating(false);
            bundle
                .add_resource(resource)
                .map_err(|_| TranslationError::Duplicate(*lang))?;

            bundles.insert(*lang, bundle);
        }

        Ok(Self { bundles })
    }

    /// Get a message, falling back to English and then to the id itself
    pub fn get(&self, lang: SupportedLanguage, id: &str) -> String {
        self.format(lang, id, None)
    }

    /// Get a message with named arguments
    pub fn get_with_args(&self, lang: SupportedLanguage, id: &str, args: &[(&str, &str)]) -> String {
        let mut fluent_args = FluentArgs::new();
        for (name, value) in args {
            fluent_args.set(*name, *value);
        }
        self.format(lang, id, Some(&fluent_args))
    }

    fn format(&self, lang: SupportedLanguage, id: &str, args: Option<&FluentArgs<'_>>) -> String {
        self.format_in(lang, id, args)
            .or_else(|| self.format_in(SupportedLanguage::DEFAULT, id, args))
            .unwrap_or_else(|| {
                tracing::warn!("Missing translation '{}' for {}", id, lang);
                id.to_string()
            })
    }

    fn format_in(
        &self,
        lang: SupportedLanguage,
        id: &str,
        args: Option<&FluentArgs<'_>>,
    ) -> Option<String> {
        let bundle = self.bundles.get(&lang)?;
        let pattern = bundle.get_message(id)?.value()?;

        let mut errors = Vec::new();
        let value = bundle.format_pattern(pattern, args, &mut errors);
        if !errors.is_empty() {
            tracing::debug!("Formatting '{}' for {} reported {:?}", id, lang, errors);
        }
        Some(value.into_owned())
    }
}
