use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::core::error::Result;
use crate::features::lookups::dtos::{
    BrandQuery, DistrictQuery, LookupItemDto, ModelQuery, ProvinceQuery, SubdistrictDto,
};
use crate::features::lookups::services::{optional_id, required_id, LookupService};
use crate::shared::types::ApiResponse;

fn ok<T>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(Some(data), None, None))
}

// ==================== Passenger cars ====================

/// List passenger car brands
#[utoipa::path(
    get,
    path = "/api/car/brands",
    responses(
        (status = 200, description = "Passenger car brands", body = ApiResponse<Vec<LookupItemDto>>)
    ),
    tag = "lookups"
)]
pub async fn list_car_brands(
    State(service): State<Arc<LookupService>>,
) -> Json<ApiResponse<Vec<LookupItemDto>>> {
    ok(service.car_brands())
}

/// List passenger car models of a brand
#[utoipa::path(
    get,
    path = "/api/car/models",
    params(BrandQuery),
    responses(
        (status = 200, description = "Models of the brand", body = ApiResponse<Vec<LookupItemDto>>),
        (status = 400, description = "brand_id missing or not a number")
    ),
    tag = "lookups"
)]
pub async fn list_car_models(
    State(service): State<Arc<LookupService>>,
    Query(query): Query<BrandQuery>,
) -> Result<Json<ApiResponse<Vec<LookupItemDto>>>> {
    let brand_id = required_id(query.brand_id.as_deref(), "brand_id")?;
    Ok(ok(service.car_models(brand_id)))
}

// ==================== Commercial vehicles ====================

/// List commercial vehicle brands, optionally a single one
#[utoipa::path(
    get,
    path = "/api/commercial-car/brands",
    params(BrandQuery),
    responses(
        (status = 200, description = "Commercial vehicle brands", body = ApiResponse<Vec<LookupItemDto>>),
        (status = 400, description = "brand_id not a number")
    ),
    tag = "lookups"
)]
pub async fn list_commercial_brands(
    State(service): State<Arc<LookupService>>,
    Query(query): Query<BrandQuery>,
) -> Result<Json<ApiResponse<Vec<LookupItemDto>>>> {
    let brand_id = optional_id(query.brand_id.as_deref(), "brand_id")?;
    Ok(ok(service.commercial_brands(brand_id)))
}

/// List commercial vehicle models of a brand
#[utoipa::path(
    get,
    path = "/api/commercial-car/models",
    params(ModelQuery),
    responses(
        (status = 200, description = "Models of the brand", body = ApiResponse<Vec<LookupItemDto>>),
        (status = 400, description = "brand_id missing or not a number")
    ),
    tag = "lookups"
)]
pub async fn list_commercial_models(
    State(service): State<Arc<LookupService>>,
    Query(query): Query<ModelQuery>,
) -> Result<Json<ApiResponse<Vec<LookupItemDto>>>> {
    let brand_id = required_id(query.brand_id.as_deref(), "brand_id")?;
    Ok(ok(service.commercial_models(
        brand_id,
        query.wheel_type.as_deref(),
    )))
}

// ==================== Thai address ====================

/// List provinces
#[utoipa::path(
    get,
    path = "/api/thai-address/provinces",
    responses(
        (status = 200, description = "Provinces", body = ApiResponse<Vec<LookupItemDto>>)
    ),
    tag = "lookups"
)]
pub async fn list_provinces(
    State(service): State<Arc<LookupService>>,
) -> Json<ApiResponse<Vec<LookupItemDto>>> {
    ok(service.provinces())
}

/// List districts of a province
#[utoipa::path(
    get,
    path = "/api/thai-address/districts",
    params(ProvinceQuery),
    responses(
        (status = 200, description = "Districts of the province", body = ApiResponse<Vec<LookupItemDto>>),
        (status = 400, description = "province_id missing or not a number")
    ),
    tag = "lookups"
)]
pub async fn list_districts(
    State(service): State<Arc<LookupService>>,
    Query(query): Query<ProvinceQuery>,
) -> Result<Json<ApiResponse<Vec<LookupItemDto>>>> {
    let province_id = required_id(query.province_id.as_deref(), "province_id")?;
    Ok(ok(service.districts(province_id)))
}

/// List subdistricts of a district, with postal codes
#[utoipa::path(
    get,
    path = "/api/thai-address/subdistricts",
    params(DistrictQuery),
    responses(
        (status = 200, description = "Subdistricts of the district", body = ApiResponse<Vec<SubdistrictDto>>),
        (status = 400, description = "district_id missing or not a number")
    ),
    tag = "lookups"
)]
pub async fn list_subdistricts(
    State(service): State<Arc<LookupService>>,
    Query(query): Query<DistrictQuery>,
) -> Result<Json<ApiResponse<Vec<SubdistrictDto>>>> {
    let district_id = required_id(query.district_id.as_deref(), "district_id")?;
    Ok(ok(service.subdistricts(district_id)))
}
