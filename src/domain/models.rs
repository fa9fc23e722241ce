use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::errors::{DomainError, DomainResult};

/// One of the five answer symbols a quiz option belongs to.
///
/// The declaration order is the canonical order used to break ties when
/// tallying answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    A,
    B,
    C,
    D,
    E,
}

impl Category {
    pub const ALL: [Category; 5] = [Category::A, Category::B, Category::C, Category::D, Category::E];

    pub fn index(self) -> usize {
        match self {
            Category::A => 0,
            Category::B => 1,
            Category::C => 2,
            Category::D => 3,
            Category::E => 4,
        }
    }

    pub fn letter(self) -> char {
        (b'A' + self.index() as u8) as char
    }

    pub fn profile(self) -> &'static SkinProfile {
        &PROFILES[self.index()]
    }

    /// Key the catalog uses to filter products for this skin type.
    pub fn filter_key(self) -> &'static str {
        self.profile().filter_key
    }

    pub fn from_filter_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.filter_key().eq_ignore_ascii_case(key.trim()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    /// Accepts either the answer letter (`"b"`, `"B"`) or a catalog filter
    /// key (`"oily"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.len() == 1 {
            let letter = trimmed.as_bytes()[0].to_ascii_uppercase();
            if let Some(category) = Self::ALL.into_iter().find(|c| c.letter() as u8 == letter) {
                return Ok(category);
            }
        }
        Self::from_filter_key(trimmed)
            .ok_or_else(|| DomainError::InvalidInput(format!("unknown skin type '{}'", s)))
    }
}

/// Static display and catalog data for a skin type.
#[derive(Debug)]
pub struct SkinProfile {
    pub label: &'static str,
    pub description: &'static str,
    pub filter_key: &'static str,
    pub catalog_headline: &'static str,
    pub catalog_blurb: &'static str,
    pub keywords: &'static [&'static str],
}

static PROFILES: [SkinProfile; 5] = [
    SkinProfile {
        label: "Dry Skin",
        description: "Your skin tends to lack oil and moisture. It may feel tight, rough, or flaky, especially after cleansing. Focus on hydrating and nourishing products with ingredients like hyaluronic acid, ceramides, and rich moisturizers.",
        filter_key: "dry",
        catalog_headline: "Dry Skin",
        catalog_blurb: "Hydrating products with rich moisturizers and nourishing ingredients",
        keywords: &["hydrating", "moisturizing", "nourishing", "cream", "oil", "hyaluronic"],
    },
    SkinProfile {
        label: "Oily Skin",
        description: "Your skin produces excess sebum, leading to shine and enlarged pores. You may be prone to breakouts. Look for lightweight, oil-free products with ingredients like salicylic acid, niacinamide, and mattifying formulas.",
        filter_key: "oily",
        catalog_headline: "Oily Skin",
        catalog_blurb: "Lightweight, oil-free products with mattifying and clarifying properties",
        keywords: &["oil-free", "mattifying", "gel", "salicylic", "clarifying", "lightweight"],
    },
    SkinProfile {
        label: "Combination Skin",
        description: "Your skin has both oily and dry areas, typically oily in the T-zone and dry on the cheeks. Balance is key. Use targeted products for different zones and consider gel-based moisturizers.",
        filter_key: "combination",
        catalog_headline: "Combination Skin",
        catalog_blurb: "Balancing products that address both dry and oily areas",
        keywords: &["balancing", "gel-cream", "lightweight", "hydrating"],
    },
    SkinProfile {
        label: "Normal Skin",
        description: "Your skin is well-balanced with minimal issues. It's neither too oily nor too dry. Maintain your skin's health with a consistent, gentle routine focused on protection and hydration.",
        filter_key: "normal",
        catalog_headline: "Normal Skin",
        catalog_blurb: "Gentle maintenance products to preserve your skin's natural balance",
        keywords: &["gentle", "balanced", "antioxidant", "protective"],
    },
    SkinProfile {
        label: "Sensitive Skin",
        description: "Your skin is easily irritated and reactive to products or environmental factors. Stick to gentle, fragrance-free products with minimal ingredients. Patch test new products and avoid harsh actives.",
        filter_key: "sensitive",
        catalog_headline: "Sensitive Skin",
        catalog_blurb: "Fragrance-free, gentle products designed to soothe and protect",
        keywords: &["gentle", "soothing", "fragrance-free", "calming", "sensitive"],
    },
];

#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOption {
    pub category: Category,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub id: u32,
    pub prompt: String,
    pub options: Vec<AnswerOption>,
}

impl Question {
    pub fn option_for(&self, category: Category) -> Option<&AnswerOption> {
        self.options.iter().find(|option| option.category == category)
    }
}

/// Chosen category per answered question id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSet {
    answers: BTreeMap<u32, Category>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an answer, replacing any earlier answer to the same question.
    pub fn record(&mut self, question_id: u32, category: Category) {
        self.answers.insert(question_id, category);
    }

    pub fn get(&self, question_id: u32) -> Option<Category> {
        self.answers.get(&question_id).copied()
    }

    pub fn contains(&self, question_id: u32) -> bool {
        self.answers.contains_key(&question_id)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.answers.values().copied()
    }
}

impl FromIterator<(u32, Category)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (u32, Category)>>(iter: I) -> Self {
        let mut set = AnswerSet::new();
        for (question_id, category) in iter {
            set.record(question_id, category);
        }
        set
    }
}

/// A decimal amount in a single currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub currency_code: String,
    pub amount: Decimal,
}

impl Money {
    pub fn new(currency_code: impl Into<String>, amount: Decimal) -> Self {
        Self {
            currency_code: currency_code.into(),
            amount,
        }
    }

    pub fn zero(currency_code: impl Into<String>) -> Self {
        Self::new(currency_code, Decimal::ZERO)
    }

    /// Parses a price as the commerce platform reports it (`"24.0"`, `"USD"`).
    pub fn parse(amount: &str, currency_code: &str) -> DomainResult<Self> {
        let value = Decimal::from_str(amount.trim())
            .map_err(|_| DomainError::InvalidInput(format!("malformed price '{}'", amount)))?;
        let money = Self::new(currency_code.trim().to_ascii_uppercase(), value);
        money.validate()?;
        Ok(money)
    }

    /// Checks for a three-letter currency code and a non-negative amount.
    pub fn validate(&self) -> DomainResult<()> {
        let code = &self.currency_code;
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(DomainError::InvalidInput(format!(
                "malformed currency code '{}'",
                code
            )));
        }
        if self.amount.is_sign_negative() {
            return Err(DomainError::InvalidInput(format!("negative price '{}'", self.amount)));
        }
        Ok(())
    }

    /// Price of `quantity` units, or an error when the product does not fit
    /// in a `Decimal`.
    pub fn checked_times(&self, quantity: u32) -> DomainResult<Money> {
        self.amount
            .checked_mul(Decimal::from(quantity))
            .map(|amount| Money::new(self.currency_code.clone(), amount))
            .ok_or_else(|| {
                DomainError::InvalidInput(format!("{} x {} is too large", self, quantity))
            })
    }

    pub fn checked_add(&self, other: &Money) -> DomainResult<Money> {
        if self.currency_code != other.currency_code {
            return Err(DomainError::CurrencyMismatch {
                expected: self.currency_code.clone(),
                found: other.currency_code.clone(),
            });
        }
        self.amount
            .checked_add(other.amount)
            .map(|amount| Money::new(self.currency_code.clone(), amount))
            .ok_or_else(|| DomainError::InvalidInput(format!("{} + {} is too large", self, other)))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut amount = self.amount.round_dp(2);
        amount.rescale(2);
        write!(f, "{} {}", self.currency_code, amount)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductImage {
    pub url: String,
    pub alt_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductVariant {
    pub id: String,
    pub title: String,
    pub price: Money,
    pub available_for_sale: bool,
    pub selected_options: Vec<SelectedOption>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceRange {
    pub min: Money,
    pub max: Money,
}

/// A product listing as returned by the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub description: String,
    pub handle: String,
    pub images: Vec<ProductImage>,
    pub variants: Vec<ProductVariant>,
    pub price_range: PriceRange,
}

impl Product {
    pub fn first_image(&self) -> Option<&ProductImage> {
        self.images.first()
    }

    pub fn first_variant(&self) -> Option<&ProductVariant> {
        self.variants.first()
    }

    /// A product is purchasable through its first variant only.
    pub fn is_available(&self) -> bool {
        self.first_variant().is_some_and(|variant| variant.available_for_sale)
    }

    pub fn image_alt(&self) -> &str {
        self.first_image()
            .and_then(|image| image.alt_text.as_deref())
            .unwrap_or(&self.title)
    }

    pub fn matches_any_keyword(&self, keywords: &[&str]) -> bool {
        let haystack = format!("{} {}", self.title, self.description).to_lowercase();
        keywords.iter().any(|keyword| haystack.contains(&keyword.to_lowercase()))
    }
}
