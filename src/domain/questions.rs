//! The skin-type questionnaire.
//!
//! Every question offers exactly one option per category, listed in
//! canonical order.

use super::models::{AnswerOption, Category, Question};

const QUESTIONS: [(&str, [&str; 5]); 10] = [
    (
        "Two to three hours after cleansing (no products applied), my skin feels:",
        [
            "Tight, slightly uncomfortable, or flaky",
            "Noticeably oily or greasy",
            "Oily on forehead/nose/chin, dry or tight on cheeks",
            "Comfortable, supple, neither dry nor oily",
            "Stinging, itchy, or slightly burning",
        ],
    ),
    (
        "My pore size is:",
        [
            "Very small or barely visible",
            "Clearly large and visible across most of the face",
            "Large on the nose and forehead, small on cheeks",
            "Small to medium, not particularly noticeable",
            "Normal size, but skin often looks flushed/red",
        ],
    ),
    (
        "By midday, the shine on my face is:",
        [
            "None, it actually looks dull or matte",
            "Significant shine all over (I often need to blot or powder)",
            "Shine only on T-zone, cheeks stay matte",
            "Minimal or none",
            "Little shine, but redness or irritation is visible",
        ],
    ),
    (
        "I experience flakiness, rough patches, or peeling:",
        [
            "Frequently, especially on cheeks",
            "Almost never (I get blackheads instead)",
            "Sometimes on cheeks, never on T-zone",
            "Almost never",
            "Rarely, but I get redness/itching instead",
        ],
    ),
    (
        "Breakouts/acne occur:",
        [
            "Rarely, my problem is dryness, not pimples",
            "Regularly, often cystic or inflammatory",
            "Mostly in the T-zone, cheeks are usually clear",
            "Very rarely",
            "Occasionally, usually triggered by a product or stress",
        ],
    ),
    (
        "When I try a new skincare product, my skin usually:",
        [
            "Feels drier or tighter",
            "Gets oilier or breaks out",
            "Cheeks get dry, T-zone gets oilier",
            "Tolerates it perfectly",
            "Reacts with redness, stinging, or itching within 24-48 hours",
        ],
    ),
    (
        "In cold, dry, or windy weather my skin:",
        [
            "Becomes painfully tight, flaky, or even cracked",
            "Stays oily (weather barely affects it)",
            "Cheeks become very dry, T-zone stays oily",
            "Remains pretty much the same",
            "Becomes red, inflamed, or stingy",
        ],
    ),
    (
        "My skin texture generally feels:",
        [
            "Rough, dull, or slightly scaly",
            "Smooth but slick/greasy",
            "Different textures in different areas",
            "Soft, even, and smooth",
            "Thin, fragile, easily reddened",
        ],
    ),
    (
        "I need to blot or powder my face during the day:",
        [
            "Never",
            "3+ times a day",
            "1-2 times (only T-zone)",
            "Almost never",
            "Never, but I avoid makeup because it irritates",
        ],
    ),
    (
        "When I apply a standard moisturizer:",
        [
            "It absorbs immediately and I still feel dry",
            "It sits on top or makes me even shinier",
            "Feels great on cheeks, too heavy on T-zone",
            "Absorbs nicely and skin feels perfectly comfortable",
            "Many moisturizers cause burning or redness (I have to be very careful)",
        ],
    ),
];

/// Builds the questionnaire. Question ids start at 1 and follow display order.
pub fn question_bank() -> Vec<Question> {
    QUESTIONS
        .iter()
        .enumerate()
        .map(|(position, (prompt, texts))| Question {
            id: position as u32 + 1,
            prompt: prompt.to_string(),
            options: Category::ALL
                .iter()
                .zip(texts.iter())
                .map(|(category, text)| AnswerOption {
                    category: *category,
                    text: text.to_string(),
                })
                .collect(),
        })
        .collect()
}
