//! Fixed fare rules.
//!
//! Pure functions over a base fare: no I/O, no clock reads. Every
//! time-dependent rule takes `now` explicitly.

use crate::domain::model::{DiscountCard, FareKind, Passenger, PassengerPrice};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeSet;

pub const CHILD_PRICE: Decimal = dec!(9);
pub const EMPLOYEE_PRICE: Decimal = dec!(1);

const MINOR_RATE: Decimal = dec!(0.6);
const ELDER_RATE: Decimal = dec!(0.8);
const ADULT_RATE: Decimal = dec!(1.2);
const SENIOR_CARD_RATE: Decimal = dec!(0.2);

const TIMING_DISCOUNT_RATE: Decimal = dec!(0.2);
const RISE_RATE: Decimal = dec!(0.02);
const EARLY_PURCHASE_DAYS: i64 = 30;
const LAST_MINUTE_HOURS: i64 = 6;
const RISE_PERIOD_LOOKBACK_DAYS: i64 = 25;
const RISE_PERIOD_DAYS: i64 = 20;
const DAY_MILLIS: u64 = 24 * 60 * 60 * 1000;

const FAMILY_RATE: Decimal = dec!(0.3);
const COUPLE_RATE: Decimal = dec!(0.2);
const HALF_COUPLE_RATE: Decimal = dec!(0.1);

const FREE_AGE: f64 = 1.0;
const CHILD_AGE: f64 = 4.0;
const MINOR_MAX_AGE: f64 = 17.0;
const ELDER_AGE: f64 = 70.0;

/// Price one passenger against the base fare.
///
/// Infants travel free, employees pay a flat fare (even as toddlers), toddlers
/// pay the child price; everyone else gets the age tier plus the
/// purchase-timing modifier.
pub fn passenger_fare(
    base: Decimal,
    passenger: &Passenger,
    when: DateTime<Utc>,
    now: DateTime<Utc>,
) -> PassengerPrice {
    if passenger.age < FREE_AGE {
        return PassengerPrice {
            kind: FareKind::Free,
            amount: Decimal::ZERO,
        };
    }

    if passenger.is_employee() {
        return PassengerPrice {
            kind: FareKind::Employee,
            amount: EMPLOYEE_PRICE,
        };
    }

    if passenger.age < CHILD_AGE {
        return PassengerPrice {
            kind: FareKind::Child,
            amount: CHILD_PRICE,
        };
    }

    PassengerPrice {
        kind: FareKind::Standard,
        amount: age_tier_price(base, passenger) + purchase_timing_adjustment(base, when, now),
    }
}

pub fn age_tier_price(base: Decimal, passenger: &Passenger) -> Decimal {
    if passenger.age <= MINOR_MAX_AGE {
        return base * MINOR_RATE;
    }

    if passenger.age >= ELDER_AGE {
        let price = base * ELDER_RATE;
        if passenger.holds(DiscountCard::Senior) {
            return price - base * SENIOR_CARD_RATE;
        }
        return price;
    }

    base * ADULT_RATE
}

/// Amount added to (or, when negative, removed from) an age-tier price
/// depending on how far ahead of departure the ticket is bought.
pub fn purchase_timing_adjustment(
    base: Decimal,
    when: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Decimal {
    let early_purchase = now + Duration::days(EARLY_PURCHASE_DAYS);
    let last_minute = now + Duration::hours(LAST_MINUTE_HOURS);
    let rise_period_start = now - Duration::days(RISE_PERIOD_LOOKBACK_DAYS);

    if when >= early_purchase || when <= last_minute {
        return -(base * TIMING_DISCOUNT_RATE);
    }

    if when > rise_period_start {
        let modifier = RISE_PERIOD_DAYS - days_before_departure(when, now);
        return Decimal::from(modifier) * RISE_RATE * base;
    }

    // Unreachable with the windows above; kept so a departure outside every
    // window still prices at the full surcharge.
    base
}

/// Whole days between `now` and departure, rounded up.
pub fn days_before_departure(when: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (when - now).num_milliseconds().unsigned_abs();
    millis.div_ceil(DAY_MILLIS) as i64
}

/// Adjustment applied once to the summed passenger fares.
///
/// A family card anywhere in the trip switches off the couple rules.
pub fn group_adjustment(base: Decimal, passengers: &[Passenger]) -> Decimal {
    if passengers.iter().any(|p| p.holds(DiscountCard::Family)) {
        return family_adjustment(base, passengers);
    }

    let has_minor = passengers.iter().any(Passenger::is_minor);
    if has_minor {
        return Decimal::ZERO;
    }

    match passengers {
        [first, second]
            if first.holds(DiscountCard::Couple) || second.holds(DiscountCard::Couple) =>
        {
            -(base * COUPLE_RATE * dec!(2))
        }
        [only] if only.holds(DiscountCard::HalfCouple) => -(base * HALF_COUPLE_RATE),
        _ => Decimal::ZERO,
    }
}

fn family_adjustment(base: Decimal, passengers: &[Passenger]) -> Decimal {
    let family_names: BTreeSet<&str> = passengers
        .iter()
        .filter(|p| p.holds(DiscountCard::Family))
        .filter_map(Passenger::family_name)
        .collect();

    passengers
        .iter()
        .filter(|p| p.age > FREE_AGE && !p.is_employee())
        .filter(|p| p.family_name().is_some_and(|name| family_names.contains(name)))
        .map(|p| family_member_adjustment(base, p))
        .sum()
}

fn family_member_adjustment(base: Decimal, passenger: &Passenger) -> Decimal {
    let mut adjustment = Decimal::ZERO;

    // The family rate replaces the senior card reduction.
    if passenger.age >= ELDER_AGE && passenger.holds(DiscountCard::Senior) {
        adjustment += base * SENIOR_CARD_RATE;
    }

    if passenger.age > 0.0 && passenger.age < CHILD_AGE {
        adjustment -= CHILD_PRICE * FAMILY_RATE;
    }

    if passenger.age >= CHILD_AGE {
        adjustment -= base * FAMILY_RATE;
    }

    adjustment
}
