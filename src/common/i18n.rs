// src/common/i18n.rs

use std::collections::HashMap;

pub const DEFAULT_LOCALE: &str = "en";

// (chave, en, fr, pt)
const MESSAGES: &[(&str, &str, &str, &str)] = &[
    (
        "error.validation",
        "One or more fields are invalid.",
        "Un ou plusieurs champs sont invalides.",
        "Um ou mais campos são inválidos.",
    ),
    (
        "error.unknown_products",
        "One or more products do not exist or do not belong to your association.",
        "Un ou plusieurs produits n'existent pas ou n'appartiennent pas à votre association.",
        "Um ou mais produtos não existem ou não pertencem à sua associação.",
    ),
    (
        "error.unauthenticated",
        "The authenticated user's e-mail is missing.",
        "L'email de l'utilisateur authentifié est manquant.",
        "O e-mail do usuário autenticado está ausente.",
    ),
    (
        "error.association_not_found",
        "No association found for this e-mail.",
        "Aucune association trouvée avec cet email.",
        "Nenhuma associação encontrada com este e-mail.",
    ),
    (
        "error.category_not_found",
        "Category not found or not owned by your association.",
        "Catégorie non trouvée ou n'appartient pas à votre association.",
        "Categoria não encontrada ou não pertence à sua associação.",
    ),
    (
        "error.product_not_found",
        "Product not found or not owned by your association.",
        "Produit non trouvé ou n'appartient pas à votre association.",
        "Produto não encontrado ou não pertence à sua associação.",
    ),
    (
        "error.insufficient_stock",
        "Insufficient stock for {product}. Current stock: {available} {unit}. Requested: {requested} {unit}.",
        "Stock insuffisant pour {product}. Stock actuel: {available} {unit}. Quantité demandée: {requested} {unit}.",
        "Estoque insuficiente para {product}. Estoque atual: {available} {unit}. Quantidade solicitada: {requested} {unit}.",
    ),
    (
        "error.product_has_history",
        "This product has stock movements and cannot be deleted.",
        "Ce produit a des mouvements de stock et ne peut pas être supprimé.",
        "Este produto possui movimentações de estoque e não pode ser excluído.",
    ),
    (
        "error.internal",
        "An unexpected error occurred.",
        "Une erreur inattendue est survenue.",
        "Ocorreu um erro inesperado.",
    ),
];

/// Catálogo de mensagens por idioma, carregado uma vez e partilhado no `AppState`.
#[derive(Debug, Clone)]
pub struct I18nStore {
    catalogs: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

impl I18nStore {
    pub fn new() -> Self {
        let mut catalogs: HashMap<&'static str, HashMap<&'static str, &'static str>> = HashMap::new();

        for &(key, en, fr, pt) in MESSAGES {
            catalogs.entry("en").or_default().insert(key, en);
            catalogs.entry("fr").or_default().insert(key, fr);
            catalogs.entry("pt").or_default().insert(key, pt);
        }

        Self { catalogs }
    }

    pub fn supports(&self, lang: &str) -> bool {
        self.catalogs.contains_key(lang)
    }

    /// Idioma desconhecido cai no inglês; chave desconhecida volta como está.
    pub fn translate(&self, lang: &str, key: &str) -> String {
        self.catalogs
            .get(lang)
            .and_then(|catalog| catalog.get(key))
            .or_else(|| {
                self.catalogs
                    .get(DEFAULT_LOCALE)
                    .and_then(|catalog| catalog.get(key))
            })
            .map(|message| message.to_string())
            .unwrap_or_else(|| key.to_string())
    }

    /// Como `translate`, substituindo os `{placeholders}`.
    pub fn translate_with(&self, lang: &str, key: &str, args: &[(&str, String)]) -> String {
        args.iter().fold(self.translate(lang, key), |message, (name, value)| {
            message.replace(&format!("{{{}}}", name), value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_exists_in_every_locale() {
        let store = I18nStore::new();
        for lang in ["en", "fr", "pt"] {
            assert!(store.supports(lang));
            for (key, ..) in MESSAGES {
                assert_ne!(store.translate(lang, key), *key, "{lang} sem {key}");
            }
        }
    }

    #[test]
    fn unknown_locale_falls_back_to_english() {
        let store = I18nStore::new();
        assert_eq!(
            store.translate("de", "error.category_not_found"),
            "Category not found or not owned by your association."
        );
    }

    #[test]
    fn unknown_key_is_returned_verbatim() {
        assert_eq!(I18nStore::new().translate("fr", "error.nope"), "error.nope");
    }

    #[test]
    fn placeholders_are_replaced_everywhere() {
        let message = I18nStore::new().translate_with(
            "pt",
            "error.insufficient_stock",
            &[
                ("product", "Arroz".into()),
                ("available", "6".into()),
                ("requested", "10".into()),
                ("unit", "kg".into()),
            ],
        );
        assert_eq!(
            message,
            "Estoque insuficiente para Arroz. Estoque atual: 6 kg. Quantidade solicitada: 10 kg."
        );
    }
}
