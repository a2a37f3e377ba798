//! Storefront page handler.
//!
//! Every unmatched GET serves the single storefront page. Cards are rendered
//! server-side, and the catalog is embedded as JSON so the client script can
//! keep working from it when the API is unreachable.

use affiliate_shop_core::{Category, Item};
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    http::Method,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::catalog::Catalog;
use crate::error::AppError;
use crate::state::AppState;

/// One category's block of cards.
pub struct CategorySection {
    pub slug: &'static str,
    pub label: &'static str,
    pub items: Vec<Item>,
}

/// The storefront page.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub sections: Vec<CategorySection>,
    pub fallback_json: String,
}

impl IndexTemplate {
    /// Group the catalog into sections and embed the fallback copy.
    #[must_use]
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let sections = Category::ALL
            .into_iter()
            .map(|category| CategorySection {
                slug: category.as_str(),
                label: category.label(),
                items: catalog.in_category(category).cloned().collect(),
            })
            .filter(|section| !section.items.is_empty())
            .collect();

        Self {
            sections,
            fallback_json: embeddable_json(catalog.items()),
        }
    }
}

/// Serialize items for a `<script type="application/json">` block.
///
/// `</` is escaped so item text can never close the script element.
fn embeddable_json(items: &[Item]) -> String {
    serde_json::to_string(items)
        .unwrap_or_else(|_| "[]".to_string())
        .replace("</", "<\\/")
}

/// Single-page fallback for unmatched routes.
#[instrument(skip(state))]
pub async fn index(method: Method, State(state): State<AppState>) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return AppError::NotFound("route".to_string()).into_response();
    }

    IndexTemplate::from_catalog(state.catalog()).into_response()
}
