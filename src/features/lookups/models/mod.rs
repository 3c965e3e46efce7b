mod catalogue;

pub use catalogue::{
    CarBrand, CarModel, Catalogue, CommercialModel, District, Province, Subdistrict,
};
