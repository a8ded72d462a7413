use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Discount cards a passenger can present at purchase time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountCard {
    Senior,
    /// Railway employee card.
    TrainStroke,
    Couple,
    HalfCouple,
    Family,
}

impl DiscountCard {
    pub const ALL: [DiscountCard; 5] = [
        DiscountCard::Senior,
        DiscountCard::TrainStroke,
        DiscountCard::Couple,
        DiscountCard::HalfCouple,
        DiscountCard::Family,
    ];

    fn bit(self) -> u8 {
        match self {
            DiscountCard::Senior => 1 << 0,
            DiscountCard::TrainStroke => 1 << 1,
            DiscountCard::Couple => 1 << 2,
            DiscountCard::HalfCouple => 1 << 3,
            DiscountCard::Family => 1 << 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountCard::Senior => "senior",
            DiscountCard::TrainStroke => "train_stroke",
            DiscountCard::Couple => "couple",
            DiscountCard::HalfCouple => "half_couple",
            DiscountCard::Family => "family",
        }
    }
}

impl fmt::Display for DiscountCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "unknown discount card '{0}' \
     (expected one of: senior, train-stroke, couple, half-couple, family)"
)]
pub struct UnknownDiscountCard(pub String);

impl FromStr for DiscountCard {
    type Err = UnknownDiscountCard;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "senior" => Ok(DiscountCard::Senior),
            "train-stroke" | "train_stroke" | "trainstroke" | "employee" => {
                Ok(DiscountCard::TrainStroke)
            }
            "couple" => Ok(DiscountCard::Couple),
            "half-couple" | "half_couple" | "halfcouple" => Ok(DiscountCard::HalfCouple),
            "family" => Ok(DiscountCard::Family),
            _ => Err(UnknownDiscountCard(s.to_string())),
        }
    }
}

/// Set of discount cards held by one passenger.
///
/// Serialized as a plain list; duplicates collapse on construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<DiscountCard>", into = "Vec<DiscountCard>")]
pub struct DiscountCards(u8);

impl DiscountCards {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn contains(&self, card: DiscountCard) -> bool {
        self.0 & card.bit() != 0
    }

    pub fn insert(&mut self, card: DiscountCard) {
        self.0 |= card.bit();
    }

    pub fn with(mut self, card: DiscountCard) -> Self {
        self.insert(card);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = DiscountCard> + '_ {
        DiscountCard::ALL
            .into_iter()
            .filter(move |card| self.contains(*card))
    }
}

impl FromIterator<DiscountCard> for DiscountCards {
    fn from_iter<I: IntoIterator<Item = DiscountCard>>(iter: I) -> Self {
        let mut cards = Self::empty();
        for card in iter {
            cards.insert(card);
        }
        cards
    }
}

impl From<Vec<DiscountCard>> for DiscountCards {
    fn from(cards: Vec<DiscountCard>) -> Self {
        cards.into_iter().collect()
    }
}

impl From<DiscountCards> for Vec<DiscountCard> {
    fn from(cards: DiscountCards) -> Self {
        cards.iter().collect()
    }
}

impl<const N: usize> From<[DiscountCard; N]> for DiscountCards {
    fn from(cards: [DiscountCard; N]) -> Self {
        cards.into_iter().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripDetails {
    pub from: String,
    pub to: String,
    pub when: DateTime<Utc>,
}

impl TripDetails {
    pub fn new(from: impl Into<String>, to: impl Into<String>, when: DateTime<Utc>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            when,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passenger {
    pub age: f64,
    #[serde(default)]
    pub discounts: DiscountCards,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl Passenger {
    pub fn new(age: f64, discounts: impl Into<DiscountCards>) -> Self {
        Self {
            age,
            discounts: discounts.into(),
            last_name: None,
        }
    }

    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    pub fn holds(&self, card: DiscountCard) -> bool {
        self.discounts.contains(card)
    }

    pub fn is_employee(&self) -> bool {
        self.holds(DiscountCard::TrainStroke)
    }

    pub fn is_minor(&self) -> bool {
        self.age < 18.0
    }

    /// Last name usable for family grouping; empty names never group.
    pub fn family_name(&self) -> Option<&str> {
        self.last_name.as_deref().filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    pub details: TripDetails,
    #[serde(default)]
    pub passengers: Vec<Passenger>,
}

impl TripRequest {
    pub fn new(details: TripDetails, passengers: Vec<Passenger>) -> Self {
        Self {
            details,
            passengers,
        }
    }
}

/// Which rule produced a passenger's fare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FareKind {
    Free,
    Child,
    Employee,
    Standard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassengerPrice {
    pub kind: FareKind,
    pub amount: Decimal,
}

/// Priced trip: per-passenger fares in input order plus the group adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub base_fare: Decimal,
    pub passengers: Vec<PassengerPrice>,
    pub group_adjustment: Decimal,
    pub total: Decimal,
}

impl Quote {
    pub fn empty() -> Self {
        Self {
            base_fare: Decimal::ZERO,
            passengers: Vec::new(),
            group_adjustment: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }

    pub fn subtotal(&self) -> Decimal {
        self.passengers.iter().map(|p| p.amount).sum()
    }
}
