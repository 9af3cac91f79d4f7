use crate::models::{Cents, Product};

/// Price sentinel meaning "no upper bound" ($10,000).
pub const MAX_PRICE_SENTINEL: Cents = 1_000_000;

pub const DEFAULT_PAGE_SIZE: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    Relevance,
    Price,
    Rating,
    Sales,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    Asc,
    #[default]
    Desc,
}

/// One facet per field; a facet at its default value is a pass-through.
/// `in_stock_only` deliberately defaults to *on* — the storefront hides
/// out-of-stock products unless the shopper opts in.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchFilters {
    pub query: Option<String>,
    pub categories: Vec<String>,
    pub brands: Vec<String>,
    pub min_price: Cents,
    pub max_price: Cents,
    pub min_rating: f32,
    pub has_discount: bool,
    pub in_stock_only: bool,
    pub free_shipping: bool,
    pub sort_by: SortBy,
    pub sort_dir: SortDir,
    /// 1-based.
    pub page: i64,
    pub per_page: i64,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            query: None,
            categories: Vec::new(),
            brands: Vec::new(),
            min_price: 0,
            max_price: MAX_PRICE_SENTINEL,
            min_rating: 0.0,
            has_discount: false,
            in_stock_only: true,
            free_shipping: false,
            sort_by: SortBy::default(),
            sort_dir: SortDir::default(),
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// The requested page of the filtered, sorted catalog.
    pub items: Vec<Product>,
    pub total: i64,
    pub total_pages: i64,
    pub page: i64,
    pub per_page: i64,
    /// Distinct brands on the returned page, in page order. The brand
    /// facet narrows to what is visible.
    pub available_brands: Vec<String>,
    /// One removable-chip label per non-default facet.
    pub active_filters: Vec<String>,
}

/// Filter, sort, and paginate the catalog. Never mutates the input; an
/// empty result is a normal outcome. Tie-breaking is the catalog's own
/// order (stable sort, no secondary key).
pub fn search(catalog: &[Product], filters: &SearchFilters) -> SearchOutcome {
    let query = normalized_query(filters);
    let mut hits: Vec<&Product> = catalog
        .iter()
        .filter(|product| matches(product, filters, query.as_deref()))
        .collect();

    sort_hits(&mut hits, filters, query.as_deref());

    let per_page = filters.per_page.clamp(1, 100);
    let page = filters.page.max(1);
    let total = hits.len() as i64;
    let total_pages = (total + per_page - 1) / per_page;

    let start = ((page - 1) * per_page) as usize;
    let items: Vec<Product> = hits
        .into_iter()
        .skip(start)
        .take(per_page as usize)
        .cloned()
        .collect();

    let mut available_brands: Vec<String> = Vec::new();
    for product in &items {
        if !available_brands.contains(&product.brand) {
            available_brands.push(product.brand.clone());
        }
    }

    SearchOutcome {
        items,
        total,
        total_pages,
        page,
        per_page,
        available_brands,
        active_filters: active_filters(filters),
    }
}

fn normalized_query(filters: &SearchFilters) -> Option<String> {
    filters
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase)
}

/// Conjunction of the facet predicates. Only active products are ever
/// searchable.
fn matches(product: &Product, filters: &SearchFilters, query: Option<&str>) -> bool {
    if !product.is_active {
        return false;
    }
    if let Some(q) = query {
        let title_hit = product.title.to_lowercase().contains(q);
        let brand_hit = product.brand.to_lowercase().contains(q);
        if !title_hit && !brand_hit {
            return false;
        }
    }
    if !filters.categories.is_empty() && !filters.categories.contains(&product.category_id) {
        return false;
    }
    if !filters.brands.is_empty() && !filters.brands.contains(&product.brand) {
        return false;
    }
    if product.price < filters.min_price || product.price > filters.max_price {
        return false;
    }
    if filters.min_rating > 0.0 && product.rating < filters.min_rating {
        return false;
    }
    if filters.has_discount && !product.has_discount() {
        return false;
    }
    if filters.in_stock_only && !product.in_stock() {
        return false;
    }
    if filters.free_shipping && !product.free_shipping {
        return false;
    }
    true
}

fn sort_hits(hits: &mut [&Product], filters: &SearchFilters, query: Option<&str>) {
    match filters.sort_by {
        SortBy::Relevance => {
            // Without a query, relevance is the catalog's own order.
            if let Some(q) = query {
                hits.sort_by_key(|p| std::cmp::Reverse(relevance_score(p, q)));
            }
        }
        SortBy::Price => sort_directed(hits, filters.sort_dir, |a, b| a.price.cmp(&b.price)),
        SortBy::Rating => {
            sort_directed(hits, filters.sort_dir, |a, b| a.rating.total_cmp(&b.rating))
        }
        SortBy::Sales => sort_directed(hits, filters.sort_dir, |a, b| {
            a.total_sales.cmp(&b.total_sales)
        }),
        SortBy::CreatedAt => sort_directed(hits, filters.sort_dir, |a, b| {
            a.created_at.cmp(&b.created_at)
        }),
    }
}

fn sort_directed(
    hits: &mut [&Product],
    dir: SortDir,
    cmp: impl Fn(&Product, &Product) -> std::cmp::Ordering,
) {
    hits.sort_by(|a, b| match dir {
        SortDir::Asc => cmp(a, b),
        SortDir::Desc => cmp(a, b).reverse(),
    });
}

/// A title hit outranks a brand hit; a product matching both outranks
/// either alone.
fn relevance_score(product: &Product, query: &str) -> i32 {
    let mut score = 0;
    if product.title.to_lowercase().contains(query) {
        score += 2;
    }
    if product.brand.to_lowercase().contains(query) {
        score += 1;
    }
    score
}

/// One label per non-default facet, worded exactly as the removal chips
/// display them.
pub fn active_filters(filters: &SearchFilters) -> Vec<String> {
    let mut active = Vec::new();
    if !filters.categories.is_empty() {
        active.push(format!("Categories: {}", filters.categories.join(", ")));
    }
    if !filters.brands.is_empty() {
        active.push(format!("Brands: {}", filters.brands.join(", ")));
    }
    if filters.min_price > 0 || filters.max_price < MAX_PRICE_SENTINEL {
        active.push(format!(
            "Price: {} - {}",
            dollars(filters.min_price),
            dollars(filters.max_price)
        ));
    }
    if filters.min_rating > 0.0 {
        active.push(format!("Rating: {}+ stars", filters.min_rating));
    }
    if filters.has_discount {
        active.push("On Sale".to_string());
    }
    if !filters.in_stock_only {
        active.push("Include Out of Stock".to_string());
    }
    if filters.free_shipping {
        active.push("Free Shipping".to_string());
    }
    active
}

/// Reset exactly the facet a chip names back to its default, leaving the
/// other facets (and sort/pagination) untouched.
pub fn reset_filter(filters: &SearchFilters, label: &str) -> SearchFilters {
    let defaults = SearchFilters::default();
    let mut next = filters.clone();
    if label.starts_with("Categories:") {
        next.categories = defaults.categories;
    } else if label.starts_with("Brands:") {
        next.brands = defaults.brands;
    } else if label.starts_with("Price:") {
        next.min_price = defaults.min_price;
        next.max_price = defaults.max_price;
    } else if label.starts_with("Rating:") {
        next.min_rating = defaults.min_rating;
    } else if label == "On Sale" {
        next.has_discount = false;
    } else if label == "Include Out of Stock" {
        next.in_stock_only = true;
    } else if label == "Free Shipping" {
        next.free_shipping = false;
    }
    next
}

fn dollars(cents: Cents) -> String {
    if cents % 100 == 0 {
        format!("${}", cents / 100)
    } else {
        format!("${}.{:02}", cents / 100, cents % 100)
    }
}
