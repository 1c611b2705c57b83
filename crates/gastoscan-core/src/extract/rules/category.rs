//! Keyword-based category inference.

use crate::models::receipt::Category;

use super::{ExtractionMatch, FieldExtractor};

/// Keywords per category, checked in this order. Keywords are lower-case
/// substrings of the lower-cased receipt text.
pub const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Alimentacion,
        &[
            "supermercado",
            "mercado",
            "alimentación",
            "comida",
            "carrefour",
            "mercadona",
            "dia",
            "lidl",
            "aldi",
        ],
    ),
    (
        Category::Restaurante,
        &["restaurante", "bar", "cafe", "cafeteria", "mcdonald", "burger", "pizza"],
    ),
    (
        Category::Farmacia,
        &["farmacia", "medicina", "medicamento", "salud"],
    ),
    (
        Category::Transporte,
        &["gasolina", "combustible", "metro", "bus", "taxi", "uber", "parking"],
    ),
    (Category::Ropa, &["moda", "ropa", "zara", "h&m", "tienda"]),
    (
        Category::Hogar,
        &["ferreteria", "bricomart", "ikea", "decoración", "muebles"],
    ),
];

/// Category extractor.
///
/// Matching is plain substring search, so short keywords also hit inside
/// longer words ("dia" in "mediodia").
pub struct CategoryExtractor;

impl CategoryExtractor {
    pub fn new() -> Self {
        Self
    }

    fn matching(lowered: &str) -> impl Iterator<Item = ExtractionMatch<Category>> + '_ {
        CATEGORY_KEYWORDS.iter().filter_map(move |(category, keywords)| {
            keywords.iter().find_map(|keyword| {
                lowered.find(*keyword).map(|start| {
                    ExtractionMatch::new(*category, "keyword", *keyword)
                        .with_position(start, start + keyword.len())
                })
            })
        })
    }
}

impl Default for CategoryExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CategoryExtractor {
    type Output = ExtractionMatch<Category>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        Self::matching(&text.to_lowercase()).next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        Self::matching(&text.to_lowercase()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_order_is_category_order() {
        let declared: Vec<Category> = CATEGORY_KEYWORDS.iter().map(|(c, _)| *c).collect();
        assert_eq!(declared, Category::ALL.to_vec());
    }

    #[test]
    fn test_case_insensitive_match() {
        let extractor = CategoryExtractor::new();

        for text in ["Carrefour Express", "CARREFOUR EXPRESS", "carrefour"] {
            let result = extractor.extract(text).unwrap();
            assert_eq!(result.value, Category::Alimentacion);
            assert_eq!(result.source, "carrefour");
        }
    }

    #[test]
    fn test_first_declared_category_wins() {
        let extractor = CategoryExtractor::new();

        // "bar" (Restaurante) and "taxi" (Transporte) both present
        let result = extractor.extract("TAXI AEROPUERTO BAR").unwrap();
        assert_eq!(result.value, Category::Restaurante);

        let all = extractor.extract_all("TAXI AEROPUERTO BAR");
        let categories: Vec<Category> = all.iter().map(|m| m.value).collect();
        assert_eq!(categories, vec![Category::Restaurante, Category::Transporte]);
    }

    #[test]
    fn test_accented_keywords() {
        let extractor = CategoryExtractor::new();

        assert_eq!(
            extractor.extract("TIENDA DE DECORACIÓN").unwrap().value,
            Category::Ropa
        );
        assert_eq!(
            extractor.extract("Artículos de DECORACIÓN").unwrap().value,
            Category::Hogar
        );
        assert_eq!(
            extractor.extract("McDonald's Gran Vía").unwrap().value,
            Category::Restaurante
        );
    }

    #[test]
    fn test_no_category() {
        let extractor = CategoryExtractor::new();
        assert!(extractor.extract("").is_none());
        assert!(extractor.extract("Gracias por su visita").is_none());
    }
}
