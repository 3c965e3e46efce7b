use serde::Deserialize;

const CAR_BRANDS: &str = include_str!("../../../../data/thai_car/brand.json");
const CAR_MODELS: &str = include_str!("../../../../data/thai_car/model.json");
const COMMERCIAL_BRANDS: &str = include_str!("../../../../data/commercial_car/brand.json");
const COMMERCIAL_MODELS: &str = include_str!("../../../../data/commercial_car/model.json");
const PROVINCES: &str = include_str!("../../../../data/thai_address/province.json");
const DISTRICTS: &str = include_str!("../../../../data/thai_address/district.json");
const SUBDISTRICTS: &str = include_str!("../../../../data/thai_address/sub_district.json");

#[derive(Debug, Clone, Deserialize)]
pub struct CarBrand {
    pub id: i64,
    pub name_th: String,
    pub name_en: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CarModel {
    pub id: i64,
    pub name_th: String,
    pub name_en: String,
    pub brand_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommercialModel {
    pub id: i64,
    pub name_th: String,
    pub name_en: String,
    pub brand_id: i64,
    /// "6" or "10"
    pub wheel_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Province {
    pub id: i64,
    pub name_th: String,
    pub name_en: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct District {
    pub id: i64,
    pub name_th: String,
    pub name_en: String,
    pub province_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Subdistrict {
    pub id: i64,
    pub name_th: String,
    pub name_en: String,
    pub district_id: i64,
    pub zip_code: i64,
}

/// Parsed reference tables
#[derive(Debug, Clone)]
pub struct Catalogue {
    pub car_brands: Vec<CarBrand>,
    pub car_models: Vec<CarModel>,
    pub commercial_brands: Vec<CarBrand>,
    pub commercial_models: Vec<CommercialModel>,
    pub provinces: Vec<Province>,
    pub districts: Vec<District>,
    pub subdistricts: Vec<Subdistrict>,
}

impl Catalogue {
    /// Parse the tables embedded at build time
    pub fn embedded() -> Result<Self, serde_json::Error> {
        Ok(Self {
            car_brands: serde_json::from_str(CAR_BRANDS)?,
            car_models: serde_json::from_str(CAR_MODELS)?,
            commercial_brands: serde_json::from_str(COMMERCIAL_BRANDS)?,
            commercial_models: serde_json::from_str(COMMERCIAL_MODELS)?,
            provinces: serde_json::from_str(PROVINCES)?,
            districts: serde_json::from_str(DISTRICTS)?,
            subdistricts: serde_json::from_str(SUBDISTRICTS)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_tables_parse() {
        let catalogue = Catalogue::embedded().unwrap();
        assert!(!catalogue.car_brands.is_empty());
        assert!(!catalogue.car_models.is_empty());
        assert!(!catalogue.commercial_brands.is_empty());
        assert!(!catalogue.commercial_models.is_empty());
        assert!(!catalogue.provinces.is_empty());
        assert!(!catalogue.districts.is_empty());
        assert!(!catalogue.subdistricts.is_empty());
    }

    #[test]
    fn test_every_model_references_a_known_brand() {
        let catalogue = Catalogue::embedded().unwrap();
        for model in &catalogue.car_models {
            assert!(catalogue.car_brands.iter().any(|b| b.id == model.brand_id));
        }
        for model in &catalogue.commercial_models {
            assert!(catalogue
                .commercial_brands
                .iter()
                .any(|b| b.id == model.brand_id));
            assert!(model.wheel_type == "6" || model.wheel_type == "10");
        }
    }
}
