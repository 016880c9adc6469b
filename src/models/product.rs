use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// A product being tracked, keyed by a human-assigned slug
/// (e.g. `eucerin-eczema-5oz`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub size: String, // Free text, e.g. "5 oz" or "2x2.5 mL"
    pub category: String,
    pub brand: Option<String>,
}

impl Product {
    /// Create a new Product without an explicit brand
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        size: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            size: size.into(),
            category: category.into(),
            brand: None,
        }
    }

    /// Set the brand
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Brand used for grouping: the explicit brand, or the first word of the name
    pub fn brand_name(&self) -> &str {
        match self.brand.as_deref().map(str::trim) {
            Some(brand) if !brand.is_empty() => brand,
            _ => self.name.split_whitespace().next().unwrap_or(&self.name),
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brand_falls_back_to_first_word() {
        let product = Product::new("eucerin-eczema-5oz", "Eucerin Eczema Relief Cream", "5 oz", "skincare");
        assert_eq!(product.brand_name(), "Eucerin");

        let product = product.with_brand("Beiersdorf");
        assert_eq!(product.brand_name(), "Beiersdorf");
    }

    #[test]
    fn test_blank_brand_is_ignored() {
        let product = Product::new("p", "Pataday Drops", "2.5 mL", "eye-drops").with_brand("  ");
        assert_eq!(product.brand_name(), "Pataday");
    }

    #[test]
    fn test_display() {
        let product = Product::new("p", "Pataday Once Daily", "2.5 mL", "eye-drops");
        assert_eq!(product.to_string(), "Pataday Once Daily (2.5 mL)");
    }
}
