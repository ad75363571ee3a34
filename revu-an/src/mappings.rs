//! Mappings between API identifiers and database dimension values
//!
//! The dashboard API speaks kebab-case product and source identifiers;
//! the database stores category and source names as written by the
//! classifier. Products are a virtual grouping of categories: one
//! product can span several categories and categories repeat across
//! products.

/// Product identifier → database category names
const PRODUCT_TO_CATEGORIES: &[(&str, &[&str])] = &[
    // Card products
    ("credit-cards", &["Карты", "Кредиты", "Кэшбэк / Бонусы"]),
    ("debit-cards", &["Карты", "Кэшбэк / Бонусы", "Карточная служба"]),
    // Credit products
    ("mortgage", &["Кредиты"]),
    ("auto-loan", &["Кредиты"]),
    ("consumer-loan", &["Кредиты"]),
    // Deposits and savings
    ("deposits", &["Вклады"]),
    ("savings", &["Вклады", "Счета"]),
    // Digital services
    ("mobile-app", &["Приложение"]),
    ("online-banking", &["Приложение"]),
    // Support and service
    (
        "support",
        &["Служба поддержки", "Обслуживание в офисе", "Курьерская служба"],
    ),
];

/// Source identifier (API) → source name (database)
const SOURCE_API_TO_DB: &[(&str, &str)] = &[
    ("banki-ru", "Banki.ru"),
    ("sravni-ru", "Sravni.ru"),
];

/// Database categories covered by a list of API products
///
/// Empty input means "all products": no filter, empty output. Unknown
/// products contribute nothing. Duplicates collapse, first occurrence
/// order preserved.
pub fn categories_for_products(products: &[String]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for product in products {
        if let Some((_, names)) = PRODUCT_TO_CATEGORIES
            .iter()
            .find(|(key, _)| *key == product.as_str())
        {
            for name in *names {
                if !categories.iter().any(|c| c.as_str() == *name) {
                    categories.push((*name).to_string());
                }
            }
        }
    }
    categories
}

/// Database source names for a list of API source identifiers
///
/// Empty input means "all sources". Unknown identifiers pass through
/// unchanged, matching how the original service resolved them.
pub fn db_source_names(sources: &[String]) -> Vec<String> {
    sources
        .iter()
        .map(|source| {
            SOURCE_API_TO_DB
                .iter()
                .find(|(api, _)| *api == source.as_str())
                .map(|(_, db)| (*db).to_string())
                .unwrap_or_else(|| source.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn products_expand_to_unique_categories() {
        let categories = categories_for_products(&strings(&["credit-cards", "debit-cards"]));
        // "Карты" and "Кэшбэк / Бонусы" appear in both products but only once here
        assert_eq!(
            categories,
            strings(&[
                "Карты",
                "Кредиты",
                "Кэшбэк / Бонусы",
                "Карточная служба"
            ])
        );
    }

    #[test]
    fn empty_products_means_no_filter() {
        assert!(categories_for_products(&[]).is_empty());
    }

    #[test]
    fn unknown_product_contributes_nothing() {
        assert!(categories_for_products(&strings(&["crypto-wallet"])).is_empty());
    }

    #[test]
    fn known_sources_map_unknown_pass_through() {
        let sources = db_source_names(&strings(&["banki-ru", "irecommend"]));
        assert_eq!(sources, strings(&["Banki.ru", "irecommend"]));
    }
}
