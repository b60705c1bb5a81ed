// src/common/i18n.rs

use std::collections::HashMap;

use anyhow::Context;

pub const DEFAULT_LANG: &str = "en";
pub const SUPPORTED_LANGS: [&str; 3] = ["en", "fr", "pt"];

// Catálogos planos: "errors.tenant_not_found" -> "Fire department '{slug}' not found."
#[derive(Debug, Clone)]
pub struct I18nStore {
    catalogs: HashMap<String, HashMap<String, String>>,
}

impl I18nStore {
    /// Carrega os catálogos embutidos no binário.
    pub fn load_embedded() -> anyhow::Result<Self> {
        let sources = [
            ("en", include_str!("../../locales/en.json")),
            ("fr", include_str!("../../locales/fr.json")),
            ("pt", include_str!("../../locales/pt.json")),
        ];

        let mut catalogs = HashMap::new();
        for (lang, raw) in sources {
            let catalog: HashMap<String, String> = serde_json::from_str(raw)
                .with_context(|| format!("catálogo de mensagens '{lang}' inválido"))?;
            catalogs.insert(lang.to_string(), catalog);
        }

        tracing::debug!(languages = catalogs.len(), "catálogos de mensagens carregados");
        Ok(Self { catalogs })
    }

    pub fn supports(&self, lang: &str) -> bool {
        self.catalogs.contains_key(lang)
    }

    /// Procura a chave no idioma pedido, depois no padrão; por fim devolve a própria chave.
    /// Os `{nome}` do modelo são substituídos pelos argumentos.
    pub fn translate(&self, lang: &str, key: &str, args: &[(&str, String)]) -> String {
        let template = self
            .catalogs
            .get(lang)
            .and_then(|catalog| catalog.get(key))
            .or_else(|| self.catalogs.get(DEFAULT_LANG).and_then(|catalog| catalog.get(key)))
            .map(String::as_str)
            .unwrap_or(key);

        args.iter().fold(template.to_string(), |message, (name, value)| {
            message.replace(&format!("{{{name}}}"), value)
        })
    }
}
