use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::lookups::models::{
    CarBrand, CarModel, CommercialModel, District, Province, Subdistrict,
};

/// Parameters arrive as raw strings so missing and non-numeric values get distinct messages
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct BrandQuery {
    /// Brand id
    #[param(example = "5")]
    pub brand_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ModelQuery {
    /// Brand id (required)
    #[param(example = "1")]
    pub brand_id: Option<String>,
    /// Wheel count filter, "6" or "10"; other values are ignored
    #[param(example = "10")]
    pub wheel_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ProvinceQuery {
    /// Province id (required)
    pub province_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct DistrictQuery {
    /// District id (required)
    pub district_id: Option<String>,
}

/// Id plus Thai and English names
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LookupItemDto {
    pub id: i64,
    pub name_th: String,
    pub name_en: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubdistrictDto {
    pub id: i64,
    pub name_th: String,
    pub name_en: String,
    pub zip_code: i64,
}

macro_rules! impl_lookup_item {
    ($($source:ty),*) => {
        $(
            impl From<&$source> for LookupItemDto {
                fn from(item: &$source) -> Self {
                    Self {
                        id: item.id,
                        name_th: item.name_th.clone(),
                        name_en: item.name_en.clone(),
                    }
                }
            }
        )*
    };
}

impl_lookup_item!(CarBrand, CarModel, CommercialModel, Province, District);

impl From<&Subdistrict> for SubdistrictDto {
    fn from(item: &Subdistrict) -> Self {
        Self {
            id: item.id,
            name_th: item.name_th.clone(),
            name_en: item.name_en.clone(),
            zip_code: item.zip_code,
        }
    }
}
