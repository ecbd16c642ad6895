// src/decision/request.rs

use serde::{Deserialize, Serialize};

use crate::model::context::{App, Device, User};
use crate::model::placements::Placement;
use crate::model::targeting::Targeting;

/// 决策请求体，只能由 `DecisionRequestBuilder::build` 生成，生成后不可变
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DecisionRequest {
    placements: Vec<Placement>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    targeting: Option<Targeting>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    user: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    device: Option<Device>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    app: Option<App>,
}

impl DecisionRequest {
    pub(crate) fn new(
        placements: Vec<Placement>,
        targeting: Option<Targeting>,
        user: Option<User>,
        device: Option<Device>,
        app: Option<App>,
    ) -> Self {
        Self {
            placements,
            targeting,
            user,
            device,
            app,
        }
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn targeting(&self) -> Option<&Targeting> {
        self.targeting.as_ref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn device(&self) -> Option<&Device> {
        self.device.as_ref()
    }

    pub fn app(&self) -> Option<&App> {
        self.app.as_ref()
    }

    /// 检查请求能否编码为合法 JSON
    ///
    /// 非有限浮点数（NaN、无穷大）会被 serde_json 写成 null，这里提前报错。
    pub fn check_encodable(&self) -> Result<(), String> {
        let Some(targeting) = &self.targeting else {
            return Ok(());
        };
        if let Some(custom) = &targeting.custom {
            if let Some(kv) = custom.iter().find(|kv| !kv.value.is_encodable()) {
                return Err(format!(
                    "Unsupported custom targeting value for key '{}': {}",
                    kv.key, kv.value
                ));
            }
        }
        if let Some(locations) = &targeting.location {
            if let Some(coordinate) = locations.iter().find(|c| !c.is_finite()) {
                return Err(format!(
                    "Unsupported location coordinate: ({}, {})",
                    coordinate.latitude, coordinate.longitude
                ));
            }
        }
        Ok(())
    }
}
