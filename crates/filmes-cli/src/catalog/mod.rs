//! Request-time composition over the API clients and the local store.
//!
//! [`CatalogService`] searches TMDB, imports remote movies into the local
//! catalog, and assembles the details view (local record, remote details,
//! forecast) without ever failing because a remote call did.

mod import;
mod outcome;
mod service;

pub use import::parse_release_date;
pub use outcome::{DetailsView, ForecastOutcome, LocalLookup, RemoteDetails, SearchOutcome};
#[allow(clippy::module_name_repetitions)]
pub use service::CatalogService;
