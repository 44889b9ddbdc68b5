//! Catalog query state: product list, current product, categories.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::store::{
    CategoryListParams, Product, ProductApi, ProductCategory, ProductDetailParams,
    ProductListParams, StoreClient,
};
use crate::stores::classified_message;

const DEFAULT_PAGE_SIZE: u64 = 20;
const DEFAULT_SORT: &str = "created_at";

#[derive(Debug)]
struct ProductState {
    products: Vec<Product>,
    count: u64,
    offset: u64,
    limit: u64,
    current_product: Option<Product>,
    categories: Vec<ProductCategory>,
    search_query: Option<String>,
    selected_category: Option<String>,
    sort_by: String,
    is_loading: bool,
    error: Option<String>,
}

impl Default for ProductState {
    fn default() -> Self {
        Self {
            products: Vec::new(),
            count: 0,
            offset: 0,
            limit: DEFAULT_PAGE_SIZE,
            current_product: None,
            categories: Vec::new(),
            search_query: None,
            selected_category: None,
            sort_by: DEFAULT_SORT.to_string(),
            is_loading: false,
            error: None,
        }
    }
}

/// Holds catalog lists and the query state that shapes them.
///
/// Setters are pure state changes; they never trigger a fetch. The caller
/// decides when to call [`fetch_products`](Self::fetch_products) again after
/// changing a filter. Each fetch replaces its list wholesale, no merging.
#[derive(Debug)]
pub struct ProductStore {
    api: ProductApi,
    state: RwLock<ProductState>,
}

impl ProductStore {
    /// Creates a store backed by `client`'s catalog endpoints.
    #[must_use]
    pub fn new(client: &StoreClient) -> Self {
        Self {
            api: client.products(),
            state: RwLock::new(ProductState::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, ProductState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ProductState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self) {
        let mut state = self.write();
        state.is_loading = true;
        state.error = None;
    }

    fn finish_err(&self, message: String) {
        let mut state = self.write();
        state.is_loading = false;
        state.error = Some(message);
    }

    /// Fetches a product page shaped by the held query state.
    ///
    /// The list is replaced wholesale; pagination metadata comes from the
    /// response envelope.
    pub async fn fetch_products(&self) {
        self.begin();

        let params = {
            let state = self.read();
            ProductListParams {
                limit: Some(state.limit),
                offset: Some(state.offset),
                category_id: state.selected_category.iter().cloned().collect(),
                q: state.search_query.clone(),
                order: Some(state.sort_by.clone()),
            }
        };

        match self.api.list(&params).await {
            Ok(response) => {
                let mut state = self.write();
                state.is_loading = false;
                state.products = response.products;
                state.count = response.count;
                state.offset = response.offset;
                state.limit = response.limit;
            }
            Err(error) => self.finish_err(classified_message(&error)),
        }
    }

    /// Fetches one product into the current-product slot.
    ///
    /// Independent of the list; a detail fetch never touches the page.
    pub async fn fetch_product(&self, product_id: &str, params: &ProductDetailParams) {
        self.begin();

        match self.api.retrieve(product_id, params).await {
            Ok(response) => {
                let mut state = self.write();
                state.is_loading = false;
                state.current_product = Some(response.product);
            }
            Err(error) => self.finish_err(classified_message(&error)),
        }
    }

    /// Fetches the category list, replacing it wholesale.
    pub async fn fetch_categories(&self) {
        self.begin();

        match self.api.categories(&CategoryListParams::default()).await {
            Ok(response) => {
                let mut state = self.write();
                state.is_loading = false;
                state.categories = response.product_categories;
            }
            Err(error) => self.finish_err(classified_message(&error)),
        }
    }

    /// Sets the free-text search query. `None` clears it.
    pub fn set_search_query(&self, query: Option<String>) {
        self.write().search_query = query;
    }

    /// Sets the category filter. `None` clears it.
    pub fn set_selected_category(&self, category_id: Option<String>) {
        self.write().selected_category = category_id;
    }

    /// Sets the sort order expression (e.g. `created_at` or `-created_at`).
    pub fn set_sort_by(&self, sort_by: impl Into<String>) {
        self.write().sort_by = sort_by.into();
    }

    /// Moves to the page starting at `offset`.
    pub fn set_offset(&self, offset: u64) {
        self.write().offset = offset;
    }

    /// Sets the page size.
    pub fn set_limit(&self, limit: u64) {
        self.write().limit = limit;
    }

    /// Drops the product list, pagination state, the current product, and
    /// the search/category filters. The sort order is left in place.
    pub fn reset_products(&self) {
        let mut state = self.write();
        state.products = Vec::new();
        state.count = 0;
        state.offset = 0;
        state.current_product = None;
        state.search_query = None;
        state.selected_category = None;
    }

    /// A snapshot of the current product page.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.read().products.clone()
    }

    /// Total products matching the current query, per the backend.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.read().count
    }

    /// The product loaded by the last detail fetch, if any.
    #[must_use]
    pub fn current_product(&self) -> Option<Product> {
        self.read().current_product.clone()
    }

    /// A snapshot of the category list.
    #[must_use]
    pub fn categories(&self) -> Vec<ProductCategory> {
        self.read().categories.clone()
    }

    /// The free-text search query in effect.
    #[must_use]
    pub fn search_query(&self) -> Option<String> {
        self.read().search_query.clone()
    }

    /// The category filter in effect.
    #[must_use]
    pub fn selected_category(&self) -> Option<String> {
        self.read().selected_category.clone()
    }

    /// The sort order expression in effect.
    #[must_use]
    pub fn sort_by(&self) -> String {
        self.read().sort_by.clone()
    }

    /// Whether a fetch is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.read().is_loading
    }

    /// The last failure's classified message, if any.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    /// Clears the surfaced error.
    pub fn clear_error(&self) {
        self.write().error = None;
    }
}
