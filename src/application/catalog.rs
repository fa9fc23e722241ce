//! What the catalog screen shows, and which fetch it is waiting for.

use crate::domain::{Category, DomainError, DomainResult, LineInput, Product};
use crate::infrastructure::{CatalogRequest, CatalogResponse};
use tracing::{debug, info};

pub const DEFAULT_PRODUCT_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogStatus {
    Idle,
    Loading,
    Loaded(Vec<Product>),
    Failed(DomainError),
}

/// Catalog screen state.
///
/// Every navigation bumps the ticket. Only the response carrying the
/// current ticket is applied, so a slow fetch for a screen the visitor has
/// already left cannot overwrite what is shown now.
#[derive(Debug, Clone)]
pub struct CatalogView {
    filter: Option<Category>,
    status: CatalogStatus,
    ticket: u64,
    limit: usize,
    pending: Option<CatalogRequest>,
}

impl Default for CatalogView {
    fn default() -> Self {
        Self::new(DEFAULT_PRODUCT_LIMIT)
    }
}

impl CatalogView {
    pub fn new(limit: usize) -> Self {
        Self {
            filter: None,
            status: CatalogStatus::Idle,
            ticket: 0,
            limit,
            pending: None,
        }
    }

    pub fn filter(&self) -> Option<Category> {
        self.filter
    }

    pub fn status(&self) -> &CatalogStatus {
        &self.status
    }

    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, CatalogStatus::Loading)
    }

    pub fn products(&self) -> &[Product] {
        match &self.status {
            CatalogStatus::Loaded(products) => products.as_slice(),
            _ => &[],
        }
    }

    /// Shows the catalog for a skin type, or everything when `filter` is
    /// `None`, and queues a fresh fetch.
    pub fn open(&mut self, filter: Option<Category>) {
        self.filter = filter;
        self.ticket += 1;
        self.status = CatalogStatus::Loading;
        self.pending = Some(CatalogRequest {
            ticket: self.ticket,
            limit: self.limit,
        });
        info!(
            ticket = self.ticket,
            filter = filter.map(|c| c.filter_key()).unwrap_or("all"),
            "opening catalog"
        );
    }

    /// Fetches again for the same filter. Ignored while a fetch is in flight.
    pub fn refresh(&mut self) -> bool {
        if self.is_loading() {
            return false;
        }
        self.open(self.filter);
        true
    }

    /// Abandons whatever fetch is in flight.
    pub fn leave(&mut self) {
        self.ticket += 1;
        self.pending = None;
        if self.is_loading() {
            self.status = CatalogStatus::Idle;
        }
    }

    pub fn take_request(&mut self) -> Option<CatalogRequest> {
        self.pending.take()
    }

    /// Applies a fetch result. Returns `false` when it was stale.
    pub fn apply(&mut self, response: CatalogResponse) -> bool {
        if response.ticket != self.ticket {
            debug!(
                stale = response.ticket,
                current = self.ticket,
                "discarding stale catalog response"
            );
            return false;
        }
        self.status = match response.result {
            Ok(products) => CatalogStatus::Loaded(products),
            Err(e) => CatalogStatus::Failed(e),
        };
        true
    }

    pub fn headline(&self) -> String {
        match self.filter {
            Some(category) => format!("Products for {}", category.profile().catalog_headline),
            None => "All Products".to_string(),
        }
    }

    pub fn blurb(&self) -> Option<&'static str> {
        self.filter.map(|category| category.profile().catalog_blurb)
    }

    pub fn is_recommended(&self, product: &Product) -> bool {
        self.filter
            .is_some_and(|category| product.matches_any_keyword(category.profile().keywords))
    }

    /// Re-checks an add-to-cart request against the current listing and
    /// refreshes its price from it.
    pub fn verify_line(&self, mut input: LineInput) -> DomainResult<LineInput> {
        let product = self
            .products()
            .iter()
            .find(|product| product.id == input.product.id)
            .ok_or_else(|| DomainError::NotFound(input.product.title.clone()))?;
        let variant = product
            .variants
            .iter()
            .find(|variant| variant.id == input.variant_id)
            .ok_or_else(|| DomainError::NotFound(input.variant_id.clone()))?;
        if !variant.available_for_sale {
            return Err(DomainError::Unavailable(product.title.clone()));
        }
        input.unit_price = variant.price.clone();
        Ok(input)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::{Money, PriceRange, ProductVariant};
    use rust_decimal::Decimal;

    pub(crate) fn product(id: &str, title: &str, price: Decimal, available: bool) -> Product {
        let money = Money::new("USD", price);
        Product {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            handle: id.to_string(),
            images: Vec::new(),
            variants: vec![ProductVariant {
                id: format!("{}-variant", id),
                title: "Default Title".to_string(),
                price: money.clone(),
                available_for_sale: available,
                selected_options: Vec::new(),
            }],
            price_range: PriceRange {
                min: money.clone(),
                max: money,
            },
        }
    }

    #[test]
    fn test_open_queues_request() {
        let mut view = CatalogView::new(12);
        view.open(Some(Category::B));

        assert!(view.is_loading());
        assert_eq!(view.filter(), Some(Category::B));
        assert_eq!(view.take_request(), Some(CatalogRequest { ticket: 1, limit: 12 }));
        assert_eq!(view.take_request(), None);
        assert_eq!(view.headline(), "Products for Oily Skin");
    }

    #[test]
    fn test_current_response_is_applied() {
        let mut view = CatalogView::default();
        view.open(None);
        let applied = view.apply(CatalogResponse {
            ticket: view.ticket(),
            result: Ok(vec![product("p1", "Serum", Decimal::ONE, true)]),
        });

        assert!(applied);
        assert_eq!(view.products().len(), 1);
        assert_eq!(view.headline(), "All Products");
        assert_eq!(view.blurb(), None);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut view = CatalogView::default();
        view.open(Some(Category::A));
        let stale_ticket = view.ticket();
        view.open(Some(Category::E));

        let applied = view.apply(CatalogResponse {
            ticket: stale_ticket,
            result: Ok(vec![product("p1", "Rich Cream", Decimal::ONE, true)]),
        });

        assert!(!applied);
        assert!(view.is_loading());
        assert_eq!(view.filter(), Some(Category::E));
    }

    #[test]
    fn test_leaving_discards_late_response() {
        let mut view = CatalogView::default();
        view.open(None);
        let ticket = view.ticket();
        view.leave();

        assert!(!view.apply(CatalogResponse {
            ticket,
            result: Ok(Vec::new()),
        }));
        assert_eq!(view.status(), &CatalogStatus::Idle);
        assert_eq!(view.take_request(), None);
    }

    #[test]
    fn test_failure_is_kept_and_refresh_retries() {
        let mut view = CatalogView::default();
        view.open(Some(Category::C));
        assert!(!view.refresh());
        view.take_request();

        view.apply(CatalogResponse {
            ticket: view.ticket(),
            result: Err(DomainError::UpstreamUnavailable("timeout".to_string())),
        });
        assert!(matches!(view.status(), CatalogStatus::Failed(_)));
        assert!(view.products().is_empty());

        assert!(view.refresh());
        assert_eq!(view.take_request().map(|r| r.ticket), Some(2));
        assert_eq!(view.filter(), Some(Category::C));
    }

    #[test]
    fn test_recommended_only_with_filter() {
        let mut view = CatalogView::default();
        let serum = product("p1", "Hydrating Serum", Decimal::ONE, true);
        assert!(!view.is_recommended(&serum));
        view.open(Some(Category::A));
        assert!(view.is_recommended(&serum));
    }

    #[test]
    fn test_verify_line_against_listing() {
        let mut view = CatalogView::default();
        view.open(None);
        let listed = product("p1", "Serum", Decimal::new(1500, 2), true);
        view.apply(CatalogResponse {
            ticket: view.ticket(),
            result: Ok(vec![listed.clone()]),
        });

        let mut input = LineInput::from_product(&listed, 1).unwrap();
        input.unit_price = Money::new("USD", Decimal::ONE);
        let verified = view.verify_line(input.clone()).unwrap();
        assert_eq!(verified.unit_price.amount, Decimal::new(1500, 2));

        input.product.id = "gone".to_string();
        assert!(matches!(view.verify_line(input), Err(DomainError::NotFound(_))));
    }
}
