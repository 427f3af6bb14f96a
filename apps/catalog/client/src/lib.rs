//! Client for the Catalog API
//!
//! - [`ProductsClient`]: one method per `/api/products` route
//! - [`ProductList`]: list view state (search, sort, delete)
//! - [`ProductForm`]: create/edit form with submit outcome handling
//! - [`Notifier`]: where success and failure messages go

pub mod api;
pub mod form;
pub mod list;
pub mod notify;

pub use api::{ClientError, DEFAULT_API_URL, ProductsClient};
pub use domain_products::Product;
pub use form::{FormMode, ProductForm};
pub use list::ProductList;
pub use notify::{ConsoleNotifier, Level, Notice, Notifier, RecordingNotifier};
