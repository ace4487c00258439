//! Value Objects for the storefront

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};
use thiserror::Error;

/// Money value object.
///
/// The storefront runs in a single currency, so only the exact decimal
/// amount is carried. Arithmetic never rounds; `rounded` is for display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self { Self(amount) }
    pub fn from_major(amount: i64) -> Self { Self(Decimal::from(amount)) }
    /// `Money::from_minor(116910)` is 1169.10.
    pub fn from_minor(cents: i64) -> Self { Self(Decimal::new(cents, 2)) }
    pub fn amount(&self) -> Decimal { self.0 }
    pub fn is_zero(&self) -> bool { self.0.is_zero() }
    pub fn is_positive(&self) -> bool { self.0 > Decimal::ZERO }
    pub fn rounded(&self) -> Money { Money(self.0.round_dp(2)) }

    /// Reduces the amount by a percentage: `amount × (1 − pct/100)`.
    pub fn percent_off(&self, pct: DiscountPercent) -> Money {
        Money(self.0 * (Decimal::ONE - pct.as_fraction()))
    }

    /// The share of this amount a percentage represents: `amount × pct/100`.
    pub fn percent_of(&self, pct: Decimal) -> Money { Money(self.0 * pct / Decimal::ONE_HUNDRED) }

    pub fn saturating_sub(&self, other: Money) -> Money {
        if other.0 >= self.0 { Money::ZERO } else { Money(self.0 - other.0) }
    }
}

impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money { Money(self.0 + rhs.0) }
}

impl Mul<u32> for Money {
    type Output = Money;
    fn mul(self, qty: u32) -> Money { Money(self.0 * Decimal::from(qty)) }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money { iter.fold(Money::ZERO, Add::add) }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "${:.2}", self.0) }
}

/// Whole-number discount percentage in `0..=100`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DiscountPercent(u8);

impl DiscountPercent {
    pub const NONE: DiscountPercent = DiscountPercent(0);

    pub fn new(value: u8) -> Result<Self, DiscountPercentError> {
        if value > 100 { return Err(DiscountPercentError(value)); }
        Ok(Self(value))
    }
    /// Caps out-of-range values at 100.
    pub fn saturating(value: u8) -> Self { Self(value.min(100)) }
    pub fn value(&self) -> u8 { self.0 }
    pub fn is_zero(&self) -> bool { self.0 == 0 }
    fn as_fraction(&self) -> Decimal { Decimal::from(self.0) / Decimal::ONE_HUNDRED }
}

impl TryFrom<u8> for DiscountPercent {
    type Error = DiscountPercentError;
    fn try_from(value: u8) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<DiscountPercent> for u8 {
    fn from(pct: DiscountPercent) -> u8 { pct.0 }
}

impl fmt::Display for DiscountPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}%", self.0) }
}

#[derive(Debug, Clone, Error)]
#[error("discount must be between 0 and 100, got {0}")]
pub struct DiscountPercentError(pub u8);

/// Promotion code value object: trimmed, upper-cased, 3 to 20 characters.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiscountCode(String);

impl DiscountCode {
    pub const MIN_LEN: usize = 3;
    pub const MAX_LEN: usize = 20;

    pub fn new(value: impl Into<String>) -> Result<Self, DiscountCodeError> {
        let value = value.into().trim().to_uppercase();
        if value.len() < Self::MIN_LEN { return Err(DiscountCodeError::TooShort); }
        if value.len() > Self::MAX_LEN { return Err(DiscountCodeError::TooLong); }
        if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') { return Err(DiscountCodeError::InvalidCharacter); }
        Ok(Self(value))
    }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl TryFrom<String> for DiscountCode {
    type Error = DiscountCodeError;
    fn try_from(value: String) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<DiscountCode> for String {
    fn from(code: DiscountCode) -> String { code.0 }
}

impl fmt::Display for DiscountCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscountCodeError {
    #[error("discount code must be at least 3 characters")]
    TooShort,
    #[error("discount code must be at most 20 characters")]
    TooLong,
    #[error("discount code may only contain letters, digits, '-' and '_'")]
    InvalidCharacter,
}

/// Quantity value object
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    pub fn new(value: u32) -> Self { Self(value) }
    pub fn value(&self) -> u32 { self.0 }
    pub fn add(&self, other: u32) -> Self { Self(self.0.saturating_add(other)) }
    pub fn subtract(&self, other: u32) -> Option<Self> {
        if other > self.0 { None } else { Some(Self(self.0 - other)) }
    }
    /// Subtracts, stopping at zero.
    pub fn drain(&self, other: u32) -> Self { Self(self.0.saturating_sub(other)) }
    pub fn is_zero(&self) -> bool { self.0 == 0 }
}

impl From<u32> for Quantity {
    fn from(value: u32) -> Self { Self(value) }
}

/// Page sizes offered by the listing pages.
pub const PAGE_SIZE_OPTIONS: [u32; 4] = [12, 24, 36, 48];
pub const DEFAULT_PAGE_SIZE: u32 = 12;
const VISIBLE_PAGES: u32 = 5;

/// One-based page request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl Default for PageRequest {
    fn default() -> Self { Self { page: 1, per_page: DEFAULT_PAGE_SIZE } }
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Self { Self { page, per_page } }
}

/// A page of results together with the numbers a pager needs.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Slices `items` for the requested page. A page past the end snaps
    /// back to the last page; a zero page size falls back to the default.
    pub fn paginate(items: Vec<T>, request: PageRequest) -> Self {
        let per_page = if request.per_page == 0 { DEFAULT_PAGE_SIZE } else { request.per_page };
        let total = items.len();
        let total_pages = u32::try_from(total.div_ceil(per_page as usize)).unwrap_or(u32::MAX);
        let page = request.page.clamp(1, total_pages.max(1));
        let start = (page as usize - 1) * per_page as usize;
        let items = items.into_iter().skip(start).take(per_page as usize).collect();
        Self { items, total, page, per_page, total_pages }
    }

    /// First item number shown on this page (one-based), 0 when empty.
    pub fn first_index(&self) -> usize {
        if self.total == 0 { 0 } else { (self.page as usize - 1) * self.per_page as usize + 1 }
    }

    pub fn last_index(&self) -> usize { (self.page as usize * self.per_page as usize).min(self.total) }

    /// Page numbers for a pager: a window of five centred on the current page.
    pub fn visible_pages(&self) -> Vec<u32> {
        if self.total_pages <= 1 { return vec![1]; }
        let mut start = self.page.saturating_sub(VISIBLE_PAGES / 2).max(1);
        let end = (start + VISIBLE_PAGES - 1).min(self.total_pages);
        if end - start + 1 < VISIBLE_PAGES {
            start = (end + 1).saturating_sub(VISIBLE_PAGES).max(1);
        }
        (start..=end).collect()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page { items: self.items.into_iter().map(f).collect(), total: self.total, page: self.page, per_page: self.per_page, total_pages: self.total_pages }
    }
}
