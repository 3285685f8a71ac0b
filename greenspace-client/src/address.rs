//! Province → district → ward address picker

use async_trait::async_trait;
use serde::Deserialize;
use shared::models::{District, Province, Ward};

use crate::error::{ClientError, ClientResult};
use crate::http::join_url;

/// Source of administrative divisions
#[async_trait]
pub trait AddressProvider: Send + Sync {
    async fn provinces(&self) -> ClientResult<Vec<Province>>;
    async fn districts(&self, province_code: u32) -> ClientResult<Vec<District>>;
    async fn wards(&self, district_code: u32) -> ClientResult<Vec<Ward>>;
}

#[derive(Deserialize)]
struct ProvinceWithDistricts {
    #[serde(default)]
    districts: Vec<District>,
}

#[derive(Deserialize)]
struct DistrictWithWards {
    #[serde(default)]
    wards: Vec<Ward>,
}

/// Public Vietnamese provinces API
#[derive(Debug, Clone)]
pub struct OpenApiAddressProvider {
    client: reqwest::Client,
    base_url: String,
}

impl OpenApiAddressProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = join_url(&self.base_url, path);
        tracing::debug!(%url, "address request");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: format!("address lookup failed: {path}"),
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl AddressProvider for OpenApiAddressProvider {
    async fn provinces(&self) -> ClientResult<Vec<Province>> {
        self.get("p/").await
    }

    async fn districts(&self, province_code: u32) -> ClientResult<Vec<District>> {
        let province: ProvinceWithDistricts =
            self.get(&format!("p/{province_code}?depth=2")).await?;
        Ok(province.districts)
    }

    async fn wards(&self, district_code: u32) -> ClientResult<Vec<Ward>> {
        let district: DistrictWithWards = self.get(&format!("d/{district_code}?depth=2")).await?;
        Ok(district.wards)
    }
}

/// Dependent address selection state.
///
/// Choosing a province clears the district and ward (selection and
/// option list); choosing a district clears the ward.
pub struct AddressCascade<P: AddressProvider> {
    provider: P,
    provinces: Vec<Province>,
    districts: Vec<District>,
    wards: Vec<Ward>,
    province: Option<Province>,
    district: Option<District>,
    ward: Option<Ward>,
}

impl<P: AddressProvider> AddressCascade<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            provinces: Vec::new(),
            districts: Vec::new(),
            wards: Vec::new(),
            province: None,
            district: None,
            ward: None,
        }
    }

    pub async fn load_provinces(&mut self) -> ClientResult<&[Province]> {
        self.provinces = self.provider.provinces().await?;
        Ok(&self.provinces)
    }

    pub async fn select_province(&mut self, code: u32) -> ClientResult<&[District]> {
        let province = self
            .provinces
            .iter()
            .find(|p| p.code == code)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("province {code}")))?;
        self.province = Some(province);
        self.district = None;
        self.ward = None;
        self.districts.clear();
        self.wards.clear();

        self.districts = self.provider.districts(code).await?;
        Ok(&self.districts)
    }

    pub async fn select_district(&mut self, code: u32) -> ClientResult<&[Ward]> {
        let district = self
            .districts
            .iter()
            .find(|d| d.code == code)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("district {code}")))?;
        self.district = Some(district);
        self.ward = None;
        self.wards.clear();

        self.wards = self.provider.wards(code).await?;
        Ok(&self.wards)
    }

    pub fn select_ward(&mut self, code: u32) -> ClientResult<&Ward> {
        let ward = self
            .wards
            .iter()
            .find(|w| w.code == code)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("ward {code}")))?;
        Ok(self.ward.insert(ward))
    }

    pub fn provinces(&self) -> &[Province] {
        &self.provinces
    }

    pub fn districts(&self) -> &[District] {
        &self.districts
    }

    pub fn wards(&self) -> &[Ward] {
        &self.wards
    }

    pub fn province(&self) -> Option<&Province> {
        self.province.as_ref()
    }

    pub fn district(&self) -> Option<&District> {
        self.district.as_ref()
    }

    pub fn ward(&self) -> Option<&Ward> {
        self.ward.as_ref()
    }

    /// "street, ward, district, province" once all three are chosen.
    pub fn full_address(&self, street: &str) -> Option<String> {
        let (ward, district, province) = (self.ward()?, self.district()?, self.province()?);
        let street = street.trim();
        if street.is_empty() {
            return None;
        }
        Some(format!(
            "{street}, {}, {}, {}",
            ward.name, district.name, province.name
        ))
    }
}
