pub(crate) mod cache;
pub(crate) mod elevation;
pub(crate) mod geocoding;

pub(crate) use cache::{cache_key, MemoryTerrainCache, PgTerrainCache, TerrainCache};
pub(crate) use elevation::{fetch_elevations, ElevationSource, OpenTopoDataSource};
pub(crate) use geocoding::{resolve, Geocoder, LocationQuery, NominatimGeocoder};
