// src/decision/builder.rs

use crate::config::profiles::{AppConfig, DeviceConfig, UserConfig};
use crate::decision::request::DecisionRequest;
use crate::model::context::{App, Consent, Device, User};
use crate::model::placements::Placement;
use crate::model::targeting::{
    merge_custom, unique_geo, unique_locations, CustomKeyValue, LocationCoordinate, Targeting,
};
use crate::model::value::DynamicValue;

/// 决策请求构造器
///
/// 构造时按值拷贝 app / device / user 配置快照，之后 SDK 层的配置变化不影响已创建的构造器。
/// 所有方法都不会失败，非法组合（例如没有广告位）交给服务端校验。
///
/// ```rust,ignore
/// let request = sdk
///     .create_request_builder()
///     .add_placement(Placement::new("home").with_count(2))
///     .add_geo_targeting(2643743)
///     .add_custom_targeting("category", "sports")
///     .set_user_id(Some("user123"))
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct DecisionRequestBuilder {
    placements: Vec<Placement>,
    targeting: Option<Targeting>,
    user: Option<User>,
    device: Option<Device>,
    app: Option<App>,
    collect_app_data: bool,
    collect_device_data: bool,
}

impl DecisionRequestBuilder {
    pub fn new(app: &AppConfig, device: &DeviceConfig, user: &UserConfig) -> Self {
        Self {
            placements: Vec::new(),
            targeting: None,
            user: Some(user.to_user()),
            device: Some(device.to_device()),
            app: Some(app.to_app()),
            collect_app_data: true,
            collect_device_data: true,
        }
    }

    // ========== 广告位 ==========

    /// 追加广告位，不去重：同一个 key 可以出现多次
    pub fn add_placement(mut self, placement: Placement) -> Self {
        self.placements.push(placement);
        self
    }

    /// 按 key 追加一个默认广告位（count = 1，format = native）
    pub fn add_placement_key(self, key: impl Into<String>) -> Self {
        self.add_placement(Placement::new(key))
    }

    // ========== 定向 ==========

    fn targeting_mut(&mut self) -> &mut Targeting {
        self.targeting.get_or_insert_with(Targeting::default)
    }

    /// 替换地理定向。None 或空列表清空该维度，重复 ID 只保留第一次出现
    pub fn set_geo_targeting(mut self, geo_name_ids: Option<Vec<u64>>) -> Self {
        let geo = geo_name_ids
            .filter(|ids| !ids.is_empty())
            .map(unique_geo);
        self.targeting_mut().geo = geo;
        self
    }

    pub fn add_geo_targeting(self, geo_name_id: u64) -> Self {
        let mut current = self
            .targeting
            .as_ref()
            .and_then(|t| t.geo.clone())
            .unwrap_or_default();
        current.push(geo_name_id);
        self.set_geo_targeting(Some(current))
    }

    /// 替换坐标定向。经纬度完全相同的坐标只保留第一次出现
    pub fn set_location_targeting(mut self, locations: Option<Vec<LocationCoordinate>>) -> Self {
        let location = locations
            .filter(|l| !l.is_empty())
            .map(unique_locations);
        self.targeting_mut().location = location;
        self
    }

    pub fn add_location_targeting(self, latitude: f64, longitude: f64) -> Self {
        let mut current = self
            .targeting
            .as_ref()
            .and_then(|t| t.location.clone())
            .unwrap_or_default();
        current.push(LocationCoordinate::new(latitude, longitude));
        self.set_location_targeting(Some(current))
    }

    /// 替换自定义定向。同一 key 以最后一次的值为准，位置保留在第一次出现处
    pub fn set_custom_targeting(mut self, custom: Option<Vec<CustomKeyValue>>) -> Self {
        let custom = custom
            .filter(|c| !c.is_empty())
            .map(|c| merge_custom(Vec::new(), c));
        self.targeting_mut().custom = custom;
        self
    }

    /// 追加自定义定向，已存在的 key 原地覆盖其值
    pub fn add_custom_targeting(
        mut self,
        key: impl Into<String>,
        value: impl Into<DynamicValue>,
    ) -> Self {
        let targeting = self.targeting_mut();
        let current = targeting.custom.take().unwrap_or_default();
        targeting.custom = Some(merge_custom(current, [CustomKeyValue::new(key, value)]));
        self
    }

    // ========== 用户 ==========

    fn user_mut(&mut self) -> &mut User {
        self.user.get_or_insert_with(User::default)
    }

    /// 只修改 id，其他字段保持不变；None 清空 id
    pub fn set_user_id(mut self, id: Option<&str>) -> Self {
        self.user_mut().id = id.map(String::from);
        self
    }

    pub fn set_user_ip(mut self, ip: Option<&str>) -> Self {
        self.user_mut().ip = ip.map(String::from);
        self
    }

    pub fn set_user_timezone(mut self, timezone: Option<&str>) -> Self {
        self.user_mut().timezone = timezone.map(String::from);
        self
    }

    pub fn set_user_consent(mut self, consent: Option<Consent>) -> Self {
        self.user_mut().consent = consent;
        self
    }

    // ========== 采集开关 ==========

    /// 关闭后 `build` 不再带上 app 信息，本构造器内不可恢复
    pub fn disable_app_collection(mut self) -> Self {
        self.collect_app_data = false;
        self.app = None;
        self
    }

    pub fn disable_device_collection(mut self) -> Self {
        self.collect_device_data = false;
        self.device = None;
        self
    }

    /// 生成请求。无副作用，可重复调用
    pub fn build(&self) -> DecisionRequest {
        DecisionRequest::new(
            self.placements.clone(),
            self.targeting.clone(),
            self.user.clone(),
            if self.collect_device_data { self.device.clone() } else { None },
            if self.collect_app_data { self.app.clone() } else { None },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::profiles::UserConfigPatch;
    use proptest::prelude::*;

    fn builder() -> DecisionRequestBuilder {
        let app = AppConfig {
            name: Some("Demo".into()),
            version: Some("1.0".into()),
            ..Default::default()
        };
        let device = DeviceConfig {
            os: Some("linux".into()),
            ..Default::default()
        };
        let user = UserConfig::clear().patch(UserConfigPatch {
            id: Some("config-user".into()),
            ip: Some("10.0.0.1".into()),
            ..Default::default()
        });
        DecisionRequestBuilder::new(&app, &device, &user)
    }

    #[test]
    fn test_basic_request() {
        let request = builder()
            .add_placement(Placement::new("home").with_count(2))
            .add_geo_targeting(5819)
            .set_user_id(Some("user123"))
            .set_user_ip(Some("192.168.1.1"))
            .build();

        assert_eq!(request.placements().len(), 1);
        assert_eq!(request.placements()[0].key, "home");
        assert_eq!(request.placements()[0].count(), 2);
        assert_eq!(request.targeting().and_then(|t| t.geo.clone()), Some(vec![5819]));
        assert_eq!(request.user().and_then(|u| u.id.as_deref()), Some("user123"));
        assert_eq!(request.user().and_then(|u| u.ip.as_deref()), Some("192.168.1.1"));
        assert_eq!(request.app().and_then(|a| a.name.as_deref()), Some("Demo"));
        assert_eq!(request.device().and_then(|d| d.os.as_deref()), Some("linux"));
    }

    #[test]
    fn test_placements_are_append_only() {
        let request = builder()
            .add_placement_key("home")
            .add_placement(Placement::new("home").with_count(3))
            .build();
        assert_eq!(request.placements().len(), 2);
        assert_eq!(request.placements()[0].count(), 1);
        assert_eq!(request.placements()[1].count(), 3);
    }

    #[test]
    fn test_location_dedup_keeps_first_occurrence_order() {
        let request = builder()
            .add_location_targeting(40.7128, -74.0060)
            .add_location_targeting(51.5074, -0.1278)
            .add_location_targeting(40.7128, -74.0060)
            .add_location_targeting(48.8566, 2.3522)
            .add_location_targeting(51.5074, -0.1278)
            .build();
        let locations = request.targeting().and_then(|t| t.location.clone()).unwrap();
        assert_eq!(
            locations,
            vec![
                LocationCoordinate::new(40.7128, -74.0060),
                LocationCoordinate::new(51.5074, -0.1278),
                LocationCoordinate::new(48.8566, 2.3522),
            ]
        );
    }

    #[test]
    fn test_custom_dedup_last_value_wins() {
        let request = builder()
            .add_custom_targeting("category", "sports")
            .add_custom_targeting("hello", "bye")
            .add_custom_targeting("category", "news")
            .add_custom_targeting("score", 100)
            .add_custom_targeting("score", 95.5)
            .add_custom_targeting("premium", false)
            .add_custom_targeting("premium", true)
            .build();
        let custom = request.targeting().and_then(|t| t.custom.clone()).unwrap();
        assert_eq!(
            custom,
            vec![
                CustomKeyValue::new("category", "news"),
                CustomKeyValue::new("hello", "bye"),
                CustomKeyValue::new("score", 95.5),
                CustomKeyValue::new("premium", true),
            ]
        );
    }

    #[test]
    fn test_custom_override_keeps_position() {
        let request = builder()
            .add_custom_targeting("a", 1)
            .add_custom_targeting("b", 2)
            .add_custom_targeting("a", 3)
            .build();
        let keys: Vec<_> = request
            .targeting()
            .and_then(|t| t.custom.clone())
            .unwrap()
            .into_iter()
            .map(|kv| kv.key)
            .collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_set_custom_targeting_dedups_input() {
        let request = builder()
            .add_custom_targeting("old", "gone")
            .set_custom_targeting(Some(vec![
                CustomKeyValue::new("k", "first"),
                CustomKeyValue::new("j", 1),
                CustomKeyValue::new("k", "second"),
            ]))
            .build();
        let custom = request.targeting().and_then(|t| t.custom.clone()).unwrap();
        assert_eq!(
            custom,
            vec![CustomKeyValue::new("k", "second"), CustomKeyValue::new("j", 1)]
        );
    }

    #[test]
    fn test_geo_dedup_and_clear() {
        let builder = builder()
            .add_geo_targeting(1)
            .add_geo_targeting(2)
            .add_geo_targeting(1)
            .add_location_targeting(1.0, 2.0);
        assert_eq!(builder.build().targeting().and_then(|t| t.geo.clone()), Some(vec![1, 2]));

        let cleared = builder.set_geo_targeting(Some(vec![])).build();
        let targeting = cleared.targeting().unwrap();
        assert_eq!(targeting.geo, None);
        assert!(targeting.location.is_some());

        let json = serde_json::to_value(&cleared).unwrap();
        assert!(json["targeting"].get("geo").is_none());
    }

    #[test]
    fn test_set_geo_none_clears_only_geo() {
        let request = builder()
            .set_geo_targeting(Some(vec![7, 8]))
            .add_custom_targeting("k", "v")
            .set_geo_targeting(None)
            .build();
        let targeting = request.targeting().unwrap();
        assert_eq!(targeting.geo, None);
        assert_eq!(targeting.custom_value("k"), Some(&DynamicValue::from("v")));
    }

    #[test]
    fn test_user_partial_overrides() {
        let request = builder()
            .set_user_timezone(Some("Europe/London"))
            .set_user_consent(Some(Consent::new(true)))
            .set_user_ip(None)
            .build();
        let user = request.user().unwrap();
        assert_eq!(user.id.as_deref(), Some("config-user"));
        assert_eq!(user.ip, None);
        assert_eq!(user.timezone.as_deref(), Some("Europe/London"));
        assert_eq!(user.consent, Some(Consent::new(true)));
    }

    #[test]
    fn test_disable_collection() {
        let request = builder()
            .disable_app_collection()
            .disable_device_collection()
            .add_placement_key("home")
            .build();
        assert!(request.app().is_none());
        assert!(request.device().is_none());

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("app").is_none());
        assert!(json.get("device").is_none());
    }

    #[test]
    fn test_build_is_repeatable() {
        let builder = builder()
            .add_placement_key("home")
            .add_custom_targeting("k", 1)
            .add_location_targeting(1.0, 2.0);
        assert_eq!(builder.build(), builder.build());
    }

    #[test]
    fn test_snapshot_is_captured_at_creation() {
        let mut app = AppConfig {
            name: Some("Before".into()),
            ..Default::default()
        };
        let builder = DecisionRequestBuilder::new(&app, &DeviceConfig::clear(), &UserConfig::clear());
        app.name = Some("After".into());
        assert_eq!(builder.build().app().and_then(|a| a.name.as_deref()), Some("Before"));
    }

    proptest! {
        #[test]
        fn prop_locations_unique_in_first_occurrence_order(
            picks in prop::collection::vec(0usize..5, 0..30)
        ) {
            let pool = [(40.7128, -74.0060), (51.5074, -0.1278), (48.8566, 2.3522), (0.0, 0.0), (-33.8688, 151.2093)];
            let mut builder = builder();
            let mut expected: Vec<LocationCoordinate> = Vec::new();
            for i in &picks {
                let (lat, lon) = pool[*i];
                builder = builder.add_location_targeting(lat, lon);
                let c = LocationCoordinate::new(lat, lon);
                if !expected.contains(&c) {
                    expected.push(c);
                }
            }
            let actual = builder.build().targeting().and_then(|t| t.location.clone()).unwrap_or_default();
            prop_assert_eq!(actual, expected);
        }

        #[test]
        fn prop_custom_keys_unique_and_last_value_wins(
            entries in prop::collection::vec(("[a-d]", any::<i32>()), 1..30)
        ) {
            let mut builder = builder();
            for (key, value) in &entries {
                builder = builder.add_custom_targeting(key.clone(), *value);
            }
            let custom = builder.build().targeting().and_then(|t| t.custom.clone()).unwrap();

            let mut distinct: Vec<&String> = Vec::new();
            for (key, _) in &entries {
                if !distinct.contains(&key) {
                    distinct.push(key);
                }
            }
            prop_assert_eq!(custom.len(), distinct.len());
            for kv in &custom {
                let last = entries.iter().rev().find(|(k, _)| *k == kv.key).map(|(_, v)| *v).unwrap();
                prop_assert_eq!(&kv.value, &DynamicValue::from(last));
            }
        }
    }
}
