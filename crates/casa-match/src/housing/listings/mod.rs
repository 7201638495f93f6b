//! Static listing dataset: loaded once at startup, read-only afterwards.

pub mod domain;
mod parser;

pub use domain::{AmiTier, Borough, Listing, ListingInvariant, RentRange, PARTNER_MARKER};

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use parser::RowError;

const BUNDLED_DATASET: &str = include_str!("../../../data/listings.csv");

#[derive(Debug, thiserror::Error)]
pub enum ListingImportError {
    #[error("failed to read listing dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid listing CSV data: {0}")]
    Csv(#[source] csv::Error),
    #[error("listing row {line} rejected: {reason}")]
    InvalidRow { line: u64, reason: String },
    #[error("listing id '{0}' appears more than once")]
    DuplicateId(String),
}

impl From<RowError> for ListingImportError {
    fn from(err: RowError) -> Self {
        match err {
            RowError::Csv(err) => Self::Csv(err),
            RowError::Invalid { line, reason } => Self::InvalidRow { line, reason },
        }
    }
}

/// Immutable, cheaply cloneable collection of listings in dataset order.
#[derive(Debug, Clone)]
pub struct ListingStore {
    listings: Arc<[Listing]>,
}

impl ListingStore {
    /// The dataset compiled into the crate.
    pub fn bundled() -> Result<Self, ListingImportError> {
        Self::from_reader(BUNDLED_DATASET.as_bytes())
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ListingImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ListingImportError> {
        let listings = parser::parse_listings(reader)?;
        Self::from_listings(listings)
    }

    pub fn from_listings(listings: Vec<Listing>) -> Result<Self, ListingImportError> {
        let mut seen = std::collections::HashSet::new();
        for listing in &listings {
            if !seen.insert(listing.id.as_str()) {
                return Err(ListingImportError::DuplicateId(listing.id.clone()));
            }
        }

        Ok(Self {
            listings: listings.into(),
        })
    }

    /// Load from an optional override path, falling back to the bundled dataset.
    pub fn load(dataset: Option<&Path>) -> Result<Self, ListingImportError> {
        let store = match dataset {
            Some(path) => Self::from_path(path)?,
            None => Self::bundled()?,
        };
        tracing::info!(
            listings = store.len(),
            source = %dataset.map(|p| p.display().to_string()).unwrap_or_else(|| "bundled".to_string()),
            "listing store loaded"
        );
        Ok(store)
    }

    pub fn all(&self) -> &[Listing] {
        &self.listings
    }

    pub fn get(&self, id: &str) -> Option<&Listing> {
        self.listings.iter().find(|listing| listing.id == id)
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}
