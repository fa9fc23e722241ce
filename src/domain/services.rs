//! Answer tallying for the skin-type quiz.
//!
//! The tally turns an [`AnswerSet`] into the dominant [`Category`]. It only
//! looks at the answers that were actually recorded, so a partially
//! completed quiz still produces a result.

use super::models::{AnswerSet, Category, Product};

/// Per-category answer counts, indexed in canonical order.
///
/// # Examples
///
/// ```
/// use skinshop::domain::{AnswerSet, AnswerTally, Category};
///
/// let answers: AnswerSet = [(1, Category::B), (2, Category::B), (3, Category::A)]
///     .into_iter()
///     .collect();
/// let tally = AnswerTally::count(&answers);
/// assert_eq!(tally.count_for(Category::B), 2);
/// assert_eq!(tally.dominant(), Category::B);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnswerTally {
    counts: [usize; 5],
}

impl AnswerTally {
    pub fn count(answers: &AnswerSet) -> Self {
        let mut counts = [0; 5];
        for category in answers.categories() {
            counts[category.index()] += 1;
        }
        Self { counts }
    }

    pub fn count_for(&self, category: Category) -> usize {
        self.counts[category.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// The category with the highest count. Ties go to the category that
    /// comes first in canonical order, so an empty tally yields `A`.
    pub fn dominant(&self) -> Category {
        let mut best = Category::A;
        for category in Category::ALL {
            if self.count_for(category) > self.count_for(best) {
                best = category;
            }
        }
        best
    }
}

/// Derives the quiz result from the recorded answers.
pub fn derive_result(answers: &AnswerSet) -> Category {
    AnswerTally::count(answers).dominant()
}

/// Products whose title or description mention one of the skin type's
/// keywords, in catalog order.
pub fn recommended<'a>(products: &'a [Product], category: Category) -> impl Iterator<Item = &'a Product> {
    let keywords = category.profile().keywords;
    products
        .iter()
        .filter(move |product| product.matches_any_keyword(keywords))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Money, PriceRange};

    fn answers(pairs: &[(u32, Category)]) -> AnswerSet {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_unique_maximum_wins() {
        let set = answers(&[
            (1, Category::C),
            (2, Category::E),
            (3, Category::C),
            (4, Category::A),
            (5, Category::C),
        ]);
        assert_eq!(derive_result(&set), Category::C);
    }

    #[test]
    fn test_tie_goes_to_canonical_first() {
        assert_eq!(derive_result(&answers(&[(1, Category::A), (2, Category::B)])), Category::A);
        assert_eq!(derive_result(&answers(&[(1, Category::B), (2, Category::A)])), Category::A);
        assert_eq!(
            derive_result(&answers(&[
                (1, Category::E),
                (2, Category::D),
                (3, Category::E),
                (4, Category::D),
            ])),
            Category::D
        );
    }

    #[test]
    fn test_tie_is_independent_of_question_ids() {
        let forward = answers(&[(1, Category::E), (2, Category::C)]);
        let reversed = answers(&[(1, Category::C), (2, Category::E)]);
        assert_eq!(derive_result(&forward), derive_result(&reversed));
        assert_eq!(derive_result(&forward), Category::C);
    }

    #[test]
    fn test_empty_and_partial_answer_sets() {
        assert_eq!(derive_result(&AnswerSet::new()), Category::A);
        assert_eq!(derive_result(&answers(&[(7, Category::E)])), Category::E);
    }

    #[test]
    fn test_tally_counts() {
        let set = answers(&[(1, Category::D), (2, Category::D), (3, Category::B)]);
        let tally = AnswerTally::count(&set);
        assert_eq!(tally.count_for(Category::D), 2);
        assert_eq!(tally.count_for(Category::A), 0);
        assert_eq!(tally.total(), 3);
    }

    #[test]
    fn test_recommended_filters_by_keywords() {
        let product = |title: &str| crate::domain::Product {
            id: title.to_string(),
            title: title.to_string(),
            description: String::new(),
            handle: title.to_lowercase(),
            images: Vec::new(),
            variants: Vec::new(),
            price_range: PriceRange {
                min: Money::zero("USD"),
                max: Money::zero("USD"),
            },
        };
        let products = vec![product("Hydrating Serum"), product("Clay Mask"), product("Rich Cream")];
        let titles: Vec<&str> = recommended(&products, Category::A)
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Hydrating Serum", "Rich Cream"]);
    }
}
