use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::domain::NoteId;

/// Денежная сумма. Обёртка над u32, чтобы не путать деньги с прочими числами.
#[derive(
    Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct Money(pub u32);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn new(v: u32) -> Self {
        Money(v)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;
    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Номиналы стартовой руки каждого участника (по возрастанию).
/// Каждый получает по одной купюре каждого номинала.
pub const NOTE_DENOMINATIONS: [u32; 11] = [1, 2, 3, 4, 6, 8, 10, 12, 15, 20, 25];

/// Одна денежная купюра.
///
/// Номинал фиксирован при создании. `available=false` означает,
/// что купюра уже потрачена на выигранный аукцион и больше не вернётся.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoneyNote {
    pub id: NoteId,
    pub value: Money,
    pub available: bool,
}

impl MoneyNote {
    pub fn new(id: NoteId, value: Money) -> Self {
        Self {
            id,
            value,
            available: true,
        }
    }
}
