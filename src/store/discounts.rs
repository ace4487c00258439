//! Promotion codes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{next_id, Store};
use crate::domain::aggregates::*;
use crate::domain::value_objects::DiscountCode;
use crate::{Result, StoreError};

const GENERATED_SUFFIX_LEN: usize = 8;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiscountFilter {
    pub search: Option<String>,
    pub status: Option<DiscountStatus>,
    #[serde(rename = "type")]
    pub kind: Option<DiscountKind>,
}

impl Store {
    pub fn discounts(&self) -> &[Discount] { &self.discounts }

    pub fn discount_by_id(&self, discount_id: DiscountId) -> Option<&Discount> {
        self.discounts.iter().find(|d| d.id == discount_id)
    }

    /// Codes are stored normalised, so lookup is case-insensitive.
    pub fn discount_by_code(&self, code: &str) -> Option<&Discount> {
        let code = code.trim();
        self.discounts.iter().find(|d| d.code.as_str().eq_ignore_ascii_case(code))
    }

    pub fn create_discount(&mut self, draft: DiscountDraft) -> Result<&Discount> {
        draft.validate()?;
        let code = self.unique_code(&draft.code, None)?;
        let id = next_id(&self.discounts, |d| d.id);
        let created_by = self.actor_name();
        self.discounts.push(Discount::from_draft(id, code, draft, Self::today(), created_by));
        tracing::info!(discount_id = id, "Discount created");
        self.discount(id)
    }

    /// Replaces the editable fields; usage counters and audit data are kept.
    pub fn update_discount(&mut self, discount_id: DiscountId, draft: DiscountDraft) -> Result<&Discount> {
        draft.validate()?;
        let code = self.unique_code(&draft.code, Some(discount_id))?;
        self.discount_mut(discount_id)?.apply(code, draft);
        tracing::info!(discount_id, "Discount updated");
        self.discount(discount_id)
    }

    pub fn delete_discount(&mut self, discount_id: DiscountId) -> Result<()> {
        let index = self.discounts.iter().position(|d| d.id == discount_id).ok_or(StoreError::DiscountNotFound(discount_id))?;
        self.discounts.remove(index);
        tracing::info!(discount_id, "Discount deleted");
        Ok(())
    }

    /// Flips the active flag and returns the new value.
    pub fn toggle_discount(&mut self, discount_id: DiscountId) -> Result<bool> {
        let discount = self.discount_mut(discount_id)?;
        discount.is_active = !discount.is_active;
        let active = discount.is_active;
        tracing::info!(discount_id, active, "Discount toggled");
        Ok(active)
    }

    /// Copies a discount under a fresh code with its usage reset.
    pub fn duplicate_discount(&mut self, discount_id: DiscountId) -> Result<&Discount> {
        let mut copy = self.discount(discount_id)?.clone();
        copy.id = next_id(&self.discounts, |d| d.id);
        copy.code = self.generate_code("")?;
        copy.name = format!("{} (Copy)", copy.name);
        copy.used_count = 0;
        copy.created_at = Self::today();
        let id = copy.id;
        self.discounts.push(copy);
        tracing::info!(source = discount_id, discount_id = id, "Discount duplicated");
        self.discount(id)
    }

    /// Search over code, name and description, then status and kind.
    pub fn filter_discounts(&self, filter: &DiscountFilter) -> Vec<&Discount> {
        let today = Self::today();
        self.discounts.iter()
            .filter(|d| filter.search.as_deref().map_or(true, |term| d.matches_search(term)))
            .filter(|d| filter.status.map_or(true, |s| d.matches_status(s, today)))
            .filter(|d| filter.kind.map_or(true, |k| d.kind == k))
            .collect()
    }

    pub fn discount_status(&self, discount: &Discount) -> DiscountStatus { discount.status_on(Self::today()) }

    pub fn discount_usages(&self) -> &[DiscountUsage] { &self.discount_usages }

    pub fn discount_stats(&self) -> DiscountStats {
        DiscountStats::compute(&self.discounts, &self.discount_usages, Self::today())
    }

    /// Creates `request.quantity` codes of the form prefix + eight random
    /// characters, each limited to one use per customer.
    pub fn generate_discount_codes(&mut self, request: BulkDiscountRequest) -> Result<Vec<DiscountId>> {
        request.validate()?;
        let created_by = self.actor_name();
        let today = Self::today();
        let mut ids = Vec::with_capacity(request.quantity as usize);
        for index in 0..request.quantity {
            let code = self.generate_code(&request.prefix)?;
            let id = next_id(&self.discounts, |d| d.id);
            let draft = request.draft(index, code.to_string());
            self.discounts.push(Discount::from_draft(id, code, draft, today, created_by.clone()));
            ids.push(id);
        }
        tracing::info!(count = ids.len(), prefix = %request.prefix, "Discount codes generated");
        Ok(ids)
    }

    fn discount(&self, discount_id: DiscountId) -> Result<&Discount> {
        self.discount_by_id(discount_id).ok_or(StoreError::DiscountNotFound(discount_id))
    }

    fn discount_mut(&mut self, discount_id: DiscountId) -> Result<&mut Discount> {
        self.discounts.iter_mut().find(|d| d.id == discount_id).ok_or(StoreError::DiscountNotFound(discount_id))
    }

    /// Normalises `raw` and checks no other discount already uses it.
    fn unique_code(&self, raw: &str, except: Option<DiscountId>) -> Result<DiscountCode> {
        let code = DiscountCode::new(raw)?;
        match self.discount_by_code(code.as_str()) {
            Some(existing) if Some(existing.id) != except => Err(StoreError::DuplicateDiscountCode(code.to_string())),
            _ => Ok(code),
        }
    }

    fn generate_code(&self, prefix: &str) -> Result<DiscountCode> {
        loop {
            let suffix = Uuid::new_v4().simple().to_string();
            let code = DiscountCode::new(format!("{prefix}{}", &suffix[..GENERATED_SUFFIX_LEN]))?;
            if self.discount_by_code(code.as_str()).is_none() { return Ok(code); }
        }
    }

    fn actor_name(&self) -> String { self.current_user().map_or_else(|| "Admin".to_string(), |u| u.name.clone()) }
}
