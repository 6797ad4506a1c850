//! `CatalogService` - search, details and import orchestration.

use anyhow::{Context, Result};
use filmes_api::tmdb::{MetadataApi, resolve_poster_url};
use filmes_api::weather::ForecastApi;
use filmes_db::{CatalogStore, MovieRecord, NewMovie};
use tracing::instrument;

use super::import::new_movie_from_details;
use super::outcome::{
    DetailsView, ForecastOutcome, ImportedMovie, LocalLookup, RemoteDetails, SearchHit,
    SearchOutcome,
};

/// Composes the metadata client, the forecast client and the local store.
#[derive(Debug)]
pub struct CatalogService<M, F, S> {
    metadata: M,
    forecast: F,
    store: S,
}

impl<M, F, S> CatalogService<M, F, S>
where
    M: MetadataApi,
    F: ForecastApi,
    S: CatalogStore,
{
    /// Creates a service over the given collaborators.
    pub const fn new(metadata: M, forecast: F, store: S) -> Self {
        Self {
            metadata,
            forecast,
            store,
        }
    }

    /// Searches TMDB and resolves every poster against the provider
    /// configuration.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str, page: u32) -> SearchOutcome {
        if query.trim().is_empty() {
            return SearchOutcome::EmptyQuery;
        }

        let Some(result) = self.metadata.search(query, page).await else {
            return SearchOutcome::Unavailable;
        };
        let config = self.metadata.configuration().await;

        let hits = result
            .results
            .into_iter()
            .map(|summary| {
                let poster_url = resolve_poster_url(config.as_ref(), summary.poster_path.as_deref());
                SearchHit {
                    summary,
                    poster_url,
                }
            })
            .collect();

        SearchOutcome::Page {
            page: result.page,
            total_pages: result.total_pages,
            total_results: result.total_results,
            hits,
        }
    }

    /// Builds the details view for a local movie.
    ///
    /// The TMDB ID comes from the local record when it exists; `remote_id`
    /// is only used when there is no local record. The forecast is only
    /// requested for a local record with coordinates other than `(0, 0)`.
    /// Remote failures show up as indicators in the view.
    #[instrument(skip(self))]
    pub async fn details(&self, local_id: i64, remote_id: Option<u64>) -> DetailsView {
        let local = match self.store.get_by_id(local_id) {
            Ok(Some(record)) => LocalLookup::Found(record),
            Ok(None) => LocalLookup::NotFound(local_id),
            Err(err) => {
                tracing::warn!(local_id, error = %format!("{err:#}"), "Catalog lookup failed");
                LocalLookup::NotFound(local_id)
            }
        };

        let target = match local.record() {
            Some(record) => record.remote_id,
            None => remote_id,
        }
        .filter(|id| *id > 0);
        let coordinates = local.record().and_then(MovieRecord::coordinates);

        let (remote, forecast) = tokio::join!(
            self.remote_details(target),
            self.forecast_at(coordinates)
        );

        DetailsView {
            local,
            remote,
            forecast,
        }
    }

    /// Imports a TMDB movie into the local catalog.
    ///
    /// Coordinates default to `(0, 0)`; a missing or malformed release date
    /// is stored as the sentinel date.
    ///
    /// # Errors
    ///
    /// - TMDB details are unavailable (nothing is stored).
    /// - The store rejects the record.
    #[instrument(skip(self))]
    pub async fn import_movie(
        &self,
        remote_id: u64,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<ImportedMovie> {
        let details = self
            .metadata
            .details(remote_id)
            .await
            .with_context(|| {
                format!("TMDB details unavailable for movie {remote_id}; nothing was imported")
            })?;
        let config = self.metadata.configuration().await;
        let poster_url = resolve_poster_url(config.as_ref(), details.poster_path.as_deref());

        let (movie, release_date_defaulted) =
            new_movie_from_details(details, poster_url, latitude, longitude);
        if release_date_defaulted {
            tracing::warn!(remote_id, "Release date missing or malformed, storing sentinel date");
        }

        let record = self
            .store
            .create(movie)
            .with_context(|| format!("failed to store imported movie {remote_id}"))?;
        tracing::debug!(id = record.id, remote_id, "Imported movie stored");

        Ok(ImportedMovie {
            record,
            release_date_defaulted,
        })
    }

    /// Lists every local movie.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub fn list(&self) -> Result<Vec<MovieRecord>> {
        self.store.read_all()
    }

    /// Loads one local movie.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub fn get(&self, id: i64) -> Result<Option<MovieRecord>> {
        self.store.get_by_id(id)
    }

    /// Stores a hand-entered movie.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the record.
    pub fn create(&self, movie: NewMovie) -> Result<MovieRecord> {
        self.store.create(movie)
    }

    /// Overwrites a local movie. Returns `false` when the ID does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the update.
    pub fn update(&self, movie: &MovieRecord) -> Result<bool> {
        Ok(self.store.update(movie)? > 0)
    }

    /// Deletes a local movie. Returns `false` when the ID does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the delete.
    pub fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.store.delete(id)? > 0)
    }

    async fn remote_details(&self, remote_id: Option<u64>) -> RemoteDetails {
        let Some(remote_id) = remote_id else {
            return RemoteDetails::NotLinked;
        };
        let Some(details) = self.metadata.details(remote_id).await else {
            return RemoteDetails::Unavailable(remote_id);
        };
        let config = self.metadata.configuration().await;
        let poster_url = resolve_poster_url(config.as_ref(), details.poster_path.as_deref());
        RemoteDetails::Found {
            details,
            poster_url,
        }
    }

    async fn forecast_at(&self, coordinates: Option<(f64, f64)>) -> ForecastOutcome {
        let Some((latitude, longitude)) = coordinates else {
            return ForecastOutcome::NoCoordinates;
        };
        self.forecast
            .forecast(latitude, longitude)
            .await
            .map_or(ForecastOutcome::Unavailable, ForecastOutcome::Available)
    }
}
