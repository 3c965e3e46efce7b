mod lookup_dto;

pub use lookup_dto::{
    BrandQuery, DistrictQuery, LookupItemDto, ModelQuery, ProvinceQuery, SubdistrictDto,
};
