//! Read-side buyer queries: filtered lists, detail and history
//!
//! Reads are not restricted by ownership; any authenticated user sees every
//! buyer the filters select.

use crate::audit::HistoryEntry;
use crate::error::{LeadsError, LeadsResult};
use crate::models::{Buyer, BuyerId};
use crate::storage::{BuyerFilter, LeadStore, Page};

/// One page of a filtered buyer list
#[derive(Debug, Clone)]
pub struct BuyerPage {
    pub buyers: Vec<Buyer>,
    /// Matches across all pages
    pub total: usize,
    pub page: usize,
    pub pages: usize,
}

pub struct QueryService<'a> {
    store: &'a dyn LeadStore,
    page_size: usize,
}

impl<'a> QueryService<'a> {
    pub fn new(store: &'a dyn LeadStore, page_size: usize) -> Self {
        Self { store, page_size }
    }

    /// Page `page` (1-based) of buyers matching `filter`, newest update first
    pub fn list(&self, filter: &BuyerFilter, page: usize) -> LeadsResult<BuyerPage> {
        let page = Page::new(page, self.page_size);
        let (buyers, total) = self.store.scan_buyers(filter, Some(page))?;
        Ok(BuyerPage {
            buyers,
            total,
            page: page.number,
            pages: page.count_for(total),
        })
    }

    /// Every buyer matching `filter`, for export
    pub fn all(&self, filter: &BuyerFilter) -> LeadsResult<Vec<Buyer>> {
        let (buyers, _) = self.store.scan_buyers(filter, None)?;
        Ok(buyers)
    }

    /// Look up a buyer by its full id or the short `byr-xxxxxxxx` form
    pub fn get(&self, id: &str) -> LeadsResult<Buyer> {
        if let Ok(buyer_id) = id.parse::<BuyerId>() {
            return self
                .store
                .get_buyer(&buyer_id)?
                .ok_or_else(|| LeadsError::buyer_not_found(id));
        }

        let wanted = id.trim().to_lowercase();
        self.all(&BuyerFilter::default())?
            .into_iter()
            .find(|b| b.id.short() == wanted)
            .ok_or_else(|| LeadsError::buyer_not_found(id))
    }

    /// History of a buyer, newest first
    pub fn history(&self, id: &str) -> LeadsResult<(Buyer, Vec<HistoryEntry>)> {
        let buyer = self.get(id)?;
        let entries = self.store.history_for(&buyer.id)?;
        Ok((buyer, entries))
    }
}
