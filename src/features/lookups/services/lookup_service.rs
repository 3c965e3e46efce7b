use crate::core::error::{AppError, Result};
use crate::features::lookups::dtos::{LookupItemDto, SubdistrictDto};
use crate::features::lookups::models::Catalogue;

/// Wheel counts recognised by the commercial model filter
const WHEEL_TYPES: [&str; 2] = ["6", "10"];

/// Parse a required numeric id query parameter
pub fn required_id(value: Option<&str>, name: &str) -> Result<i64> {
    let raw = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("{} is required", name)))?;

    optional_id(Some(raw), name)?
        .ok_or_else(|| AppError::BadRequest(format!("{} is required", name)))
}

/// Parse an optional numeric id query parameter
pub fn optional_id(value: Option<&str>, name: &str) -> Result<Option<i64>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<i64>()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("{} must be a number", name))),
    }
}

/// Read-only queries over the embedded catalogue
pub struct LookupService {
    catalogue: Catalogue,
}

impl LookupService {
    pub fn new(catalogue: Catalogue) -> Self {
        Self { catalogue }
    }

    pub fn embedded() -> Result<Self> {
        let catalogue = Catalogue::embedded()
            .map_err(|e| AppError::Internal(format!("Invalid embedded reference data: {}", e)))?;
        Ok(Self::new(catalogue))
    }

    pub fn car_brands(&self) -> Vec<LookupItemDto> {
        self.catalogue.car_brands.iter().map(Into::into).collect()
    }

    pub fn car_models(&self, brand_id: i64) -> Vec<LookupItemDto> {
        self.catalogue
            .car_models
            .iter()
            .filter(|m| m.brand_id == brand_id)
            .map(Into::into)
            .collect()
    }

    pub fn commercial_brands(&self, brand_id: Option<i64>) -> Vec<LookupItemDto> {
        self.catalogue
            .commercial_brands
            .iter()
            .filter(|b| brand_id.is_none_or(|id| b.id == id))
            .map(Into::into)
            .collect()
    }

    pub fn commercial_models(&self, brand_id: i64, wheel_type: Option<&str>) -> Vec<LookupItemDto> {
        let wheel_type = wheel_type
            .map(str::trim)
            .filter(|w| WHEEL_TYPES.contains(w));

        self.catalogue
            .commercial_models
            .iter()
            .filter(|m| m.brand_id == brand_id)
            .filter(|m| wheel_type.is_none_or(|w| m.wheel_type == w))
            .map(Into::into)
            .collect()
    }

    pub fn provinces(&self) -> Vec<LookupItemDto> {
        self.catalogue.provinces.iter().map(Into::into).collect()
    }

    pub fn districts(&self, province_id: i64) -> Vec<LookupItemDto> {
        self.catalogue
            .districts
            .iter()
            .filter(|d| d.province_id == province_id)
            .map(Into::into)
            .collect()
    }

    pub fn subdistricts(&self, district_id: i64) -> Vec<SubdistrictDto> {
        self.catalogue
            .subdistricts
            .iter()
            .filter(|s| s.district_id == district_id)
            .map(Into::into)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> LookupService {
        LookupService::embedded().unwrap()
    }

    #[test]
    fn test_required_id() {
        assert_eq!(required_id(Some("5"), "brand_id").unwrap(), 5);
        assert_eq!(required_id(Some(" 12 "), "brand_id").unwrap(), 12);
        assert!(matches!(
            required_id(None, "brand_id"),
            Err(AppError::BadRequest(msg)) if msg == "brand_id is required"
        ));
        assert!(matches!(
            required_id(Some(""), "brand_id"),
            Err(AppError::BadRequest(msg)) if msg == "brand_id is required"
        ));
        assert!(matches!(
            required_id(Some("abc"), "brand_id"),
            Err(AppError::BadRequest(msg)) if msg == "brand_id must be a number"
        ));
    }

    #[test]
    fn test_optional_id() {
        assert_eq!(optional_id(None, "brand_id").unwrap(), None);
        assert_eq!(optional_id(Some("3"), "brand_id").unwrap(), Some(3));
        assert!(optional_id(Some("x"), "brand_id").is_err());
    }

    #[test]
    fn test_car_models_filtered_by_brand() {
        let service = service();
        let ids: Vec<i64> = service.car_models(5).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![501, 502, 503, 504]);
        assert!(service.car_models(999).is_empty());
    }

    #[test]
    fn test_commercial_brands_optional_filter() {
        let service = service();
        assert_eq!(service.commercial_brands(None).len(), 5);

        let one = service.commercial_brands(Some(2));
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].id, 2);
    }

    #[test]
    fn test_commercial_models_wheel_filter() {
        let service = service();
        let all: Vec<i64> = service.commercial_models(1, None).iter().map(|m| m.id).collect();
        assert_eq!(all, vec![1001, 1002, 1003]);

        let six: Vec<i64> = service
            .commercial_models(1, Some("6"))
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(six, vec![1001, 1002]);

        let ten: Vec<i64> = service
            .commercial_models(1, Some("10"))
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ten, vec![1003]);

        // Unknown wheel types are ignored
        assert_eq!(service.commercial_models(1, Some("8")).len(), 3);
    }

    #[test]
    fn test_address_hierarchy() {
        let service = service();
        let districts: Vec<i64> = service.districts(1).iter().map(|d| d.id).collect();
        assert_eq!(districts, vec![1001, 1002, 1003]);

        let subdistricts = service.subdistricts(1001);
        assert_eq!(subdistricts.len(), 2);
        assert!(subdistricts.iter().all(|s| s.zip_code == 10200));
    }
}
