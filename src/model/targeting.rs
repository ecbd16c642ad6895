// src/model/targeting.rs

use serde::{Deserialize, Serialize};

use crate::model::value::DynamicValue;

/// 经纬度坐标
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct LocationCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// 两个坐标在经纬度上都逐位相等才算重复
    pub fn same_as(&self, other: &LocationCoordinate) -> bool {
        self.latitude.to_bits() == other.latitude.to_bits()
            && self.longitude.to_bits() == other.longitude.to_bits()
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

impl From<(f64, f64)> for LocationCoordinate {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

/// 自定义定向键值对，线上格式为 `{"key": ..., "value": ...}`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CustomKeyValue {
    pub key: String,
    pub value: DynamicValue,
}

impl CustomKeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<DynamicValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// 定向条件，三个维度互相独立，未设置的维度不出现在 JSON 中
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Targeting {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub geo: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub location: Option<Vec<LocationCoordinate>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub custom: Option<Vec<CustomKeyValue>>,
}

impl Targeting {
    pub fn is_empty(&self) -> bool {
        self.geo.is_none() && self.location.is_none() && self.custom.is_none()
    }

    pub fn custom_value(&self, key: &str) -> Option<&DynamicValue> {
        self.custom
            .as_ref()?
            .iter()
            .find(|kv| kv.key == key)
            .map(|kv| &kv.value)
    }
}

/// 地理 ID 去重，保留首次出现的顺序
pub(crate) fn unique_geo(ids: impl IntoIterator<Item = u64>) -> Vec<u64> {
    let mut result: Vec<u64> = Vec::new();
    for id in ids {
        if !result.contains(&id) {
            result.push(id);
        }
    }
    result
}

/// 坐标去重，保留首次出现的顺序
pub(crate) fn unique_locations(
    locations: impl IntoIterator<Item = LocationCoordinate>,
) -> Vec<LocationCoordinate> {
    let mut result: Vec<LocationCoordinate> = Vec::new();
    for coordinate in locations {
        if !result.iter().any(|existing| existing.same_as(&coordinate)) {
            result.push(coordinate);
        }
    }
    result
}

/// 按 key 合并：重复 key 覆盖已有值，但保留该 key 第一次出现的位置
pub(crate) fn merge_custom(
    mut current: Vec<CustomKeyValue>,
    incoming: impl IntoIterator<Item = CustomKeyValue>,
) -> Vec<CustomKeyValue> {
    for kv in incoming {
        match current.iter_mut().find(|existing| existing.key == kv.key) {
            Some(existing) => existing.value = kv.value,
            None => current.push(kv),
        }
    }
    current
}
