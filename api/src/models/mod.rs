pub(crate) mod requests;
pub(crate) mod responses;

pub(crate) use requests::TerrainQuery;
pub(crate) use responses::{ErrorPayload, HealthPayload, TerrainPayload};
