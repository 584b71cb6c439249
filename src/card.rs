use core::fmt;
use std::fmt::Display;

use strum_macros::{Display, EnumCount as EnumCountMacro, EnumIter, EnumString};

/// The four playable colors. Wild-ness is not a color: a wild card carries
/// no color of its own, see [`Card`].
///
/// The variant order is the tie-break order used by
/// [`crate::machine::choose_color`].
#[derive(Clone, Copy, Debug, Display, EnumString, EnumCountMacro, EnumIter, PartialEq, Eq)]
pub enum CardColor {
    Blue,
    Green,
    Red,
    Yellow,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ColoredCard {
    Number(u8),
    Skip,
    Reverse,
    DrawTwo,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Card {
    Colored(CardColor, ColoredCard),
    Wild,
    WildDrawFour,
}

impl Card {
    /// The card's color, `None` for wilds.
    pub fn color(&self) -> Option<CardColor> {
        match self {
            Card::Colored(color, _) => Some(*color),
            Card::Wild | Card::WildDrawFour => None,
        }
    }

    pub fn is_wild(&self) -> bool {
        matches!(self, Card::Wild | Card::WildDrawFour)
    }

    /// Special cards cannot open the discard pile.
    pub fn is_special(&self) -> bool {
        match self {
            Card::Colored(_, kind) => !matches!(kind, ColoredCard::Number(_)),
            Card::Wild | Card::WildDrawFour => true,
        }
    }

    /// The matching rule: two cards play on each other if they share a
    /// color, share a type, or either is wild. Symmetric.
    pub fn similar_to(&self, other: &Card) -> bool {
        match (self, other) {
            (Card::Colored(color_a, kind_a), Card::Colored(color_b, kind_b)) => {
                color_a == color_b || kind_a == kind_b
            }
            _ => true,
        }
    }

    /// Stable asset key for the presentation layer, derived from color and
    /// type: `"7_red"`, `"skip_red"`, `"draw_two_blue"`, `"wild"`,
    /// `"wild_draw_four"`.
    pub fn image_key(&self) -> String {
        match self {
            Card::Wild => "wild".to_string(),
            Card::WildDrawFour => "wild_draw_four".to_string(),
            Card::Colored(color, kind) => {
                let kind = match kind {
                    ColoredCard::Number(number) => number.to_string(),
                    ColoredCard::Skip => "skip".to_string(),
                    ColoredCard::Reverse => "reverse".to_string(),
                    ColoredCard::DrawTwo => "draw_two".to_string(),
                };
                format!("{}_{}", kind, color.to_string().to_lowercase())
            }
        }
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Colored(color, card) => {
                write!(f, "{} {}", color, {
                    match card {
                        ColoredCard::Number(number) => number.to_string(),
                        ColoredCard::Skip => "Skip".to_string(),
                        ColoredCard::Reverse => "Reverse".to_string(),
                        ColoredCard::DrawTwo => "Draw Two".to_string(),
                    }
                })
            }
            Card::Wild => write!(f, "Wild"),
            Card::WildDrawFour => write!(f, "Wild Draw Four"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn return_correct_string_for_number_card() {
        let red_3 = Card::Colored(CardColor::Red, ColoredCard::Number(3));
        assert_eq!(red_3.to_string(), "Red 3");

        let yellow_5 = Card::Colored(CardColor::Yellow, ColoredCard::Number(5));
        assert_eq!(yellow_5.to_string(), "Yellow 5");

        let blue_9 = Card::Colored(CardColor::Blue, ColoredCard::Number(9));
        assert_eq!(blue_9.to_string(), "Blue 9");
    }

    #[test]
    fn return_correct_string_for_special_cards() {
        let red_skip = Card::Colored(CardColor::Red, ColoredCard::Skip);
        assert_eq!(red_skip.to_string(), "Red Skip");

        let green_reverse = Card::Colored(CardColor::Green, ColoredCard::Reverse);
        assert_eq!(green_reverse.to_string(), "Green Reverse");

        let blue_draw_two = Card::Colored(CardColor::Blue, ColoredCard::DrawTwo);
        assert_eq!(blue_draw_two.to_string(), "Blue Draw Two");

        assert_eq!(Card::Wild.to_string(), "Wild");
        assert_eq!(Card::WildDrawFour.to_string(), "Wild Draw Four");
    }

    #[test]
    fn image_key_is_derived_from_color_and_type() {
        let yellow_7 = Card::Colored(CardColor::Yellow, ColoredCard::Number(7));
        assert_eq!(yellow_7.image_key(), "7_yellow");

        let red_skip = Card::Colored(CardColor::Red, ColoredCard::Skip);
        assert_eq!(red_skip.image_key(), "skip_red");

        let blue_draw_two = Card::Colored(CardColor::Blue, ColoredCard::DrawTwo);
        assert_eq!(blue_draw_two.image_key(), "draw_two_blue");

        assert_eq!(Card::Wild.image_key(), "wild");
        assert_eq!(Card::WildDrawFour.image_key(), "wild_draw_four");
    }

    #[test]
    fn cards_with_same_color_are_similar() {
        let red_3 = Card::Colored(CardColor::Red, ColoredCard::Number(3));
        let red_skip = Card::Colored(CardColor::Red, ColoredCard::Skip);
        assert!(red_3.similar_to(&red_skip));
    }

    #[test]
    fn cards_with_same_type_are_similar() {
        let red_3 = Card::Colored(CardColor::Red, ColoredCard::Number(3));
        let blue_3 = Card::Colored(CardColor::Blue, ColoredCard::Number(3));
        assert!(red_3.similar_to(&blue_3));

        let red_skip = Card::Colored(CardColor::Red, ColoredCard::Skip);
        let blue_skip = Card::Colored(CardColor::Blue, ColoredCard::Skip);
        assert!(red_skip.similar_to(&blue_skip));
    }

    #[test]
    fn cards_with_different_color_and_type_are_not_similar() {
        let red_3 = Card::Colored(CardColor::Red, ColoredCard::Number(3));
        let blue_7 = Card::Colored(CardColor::Blue, ColoredCard::Number(7));
        assert!(!red_3.similar_to(&blue_7));

        let green_reverse = Card::Colored(CardColor::Green, ColoredCard::Reverse);
        assert!(!red_3.similar_to(&green_reverse));
    }

    #[test]
    fn wild_cards_are_similar_to_everything() {
        let red_3 = Card::Colored(CardColor::Red, ColoredCard::Number(3));
        assert!(Card::Wild.similar_to(&red_3));
        assert!(red_3.similar_to(&Card::Wild));
        assert!(Card::WildDrawFour.similar_to(&red_3));
        assert!(Card::Wild.similar_to(&Card::WildDrawFour));
    }

    #[test]
    fn similarity_is_symmetric() {
        let cards = [
            Card::Colored(CardColor::Red, ColoredCard::Number(3)),
            Card::Colored(CardColor::Blue, ColoredCard::Number(3)),
            Card::Colored(CardColor::Blue, ColoredCard::Number(7)),
            Card::Colored(CardColor::Green, ColoredCard::Skip),
            Card::Colored(CardColor::Yellow, ColoredCard::DrawTwo),
            Card::Wild,
            Card::WildDrawFour,
        ];
        for a in &cards {
            for b in &cards {
                assert_eq!(a.similar_to(b), b.similar_to(a), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn only_number_cards_are_not_special() {
        let red_3 = Card::Colored(CardColor::Red, ColoredCard::Number(3));
        assert!(!red_3.is_special());

        assert!(Card::Colored(CardColor::Red, ColoredCard::Skip).is_special());
        assert!(Card::Colored(CardColor::Red, ColoredCard::Reverse).is_special());
        assert!(Card::Colored(CardColor::Red, ColoredCard::DrawTwo).is_special());
        assert!(Card::Wild.is_special());
        assert!(Card::WildDrawFour.is_special());
    }
}
