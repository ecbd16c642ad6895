// src/model/value.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// 运行时才能确定类型的标量值
///
/// 用于自定义定向（custom targeting）的取值以及创意内容（content）的取值，
/// 线上格式是原生 JSON 标量：字符串 / 数字 / 布尔。
/// 反序列化时按 Bool -> Int -> Double -> String 的顺序尝试，
/// 因此 `100` 解析为 `Int`，`95.5` 解析为 `Double`。
/// null / 数组 / 对象落到 `Other`，原样保留，单个字段异常不影响整个响应的解析。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum DynamicValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    Other(serde_json::Value),
}

impl DynamicValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DynamicValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// 整数和浮点数都可以取出为 f64
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DynamicValue::Int(i) => Some(*i as f64),
            DynamicValue::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DynamicValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DynamicValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, DynamicValue::Int(_) | DynamicValue::Double(_))
    }

    /// 能否作为自定义定向的值发送
    ///
    /// NaN / 无穷大会被 serde_json 静默写成 null；非标量值服务端不接受。
    pub fn is_encodable(&self) -> bool {
        match self {
            DynamicValue::Double(d) => d.is_finite(),
            DynamicValue::Other(_) => false,
            _ => true,
        }
    }

    /// 可读描述，展示层到处在用
    pub fn description(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DynamicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DynamicValue::Bool(b) => write!(f, "{}", b),
            DynamicValue::Int(i) => write!(f, "{}", i),
            DynamicValue::Double(d) => write!(f, "{}", d),
            DynamicValue::String(s) => f.write_str(s),
            DynamicValue::Other(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for DynamicValue {
    fn from(value: &str) -> Self {
        DynamicValue::String(value.to_string())
    }
}

impl From<String> for DynamicValue {
    fn from(value: String) -> Self {
        DynamicValue::String(value)
    }
}

impl From<bool> for DynamicValue {
    fn from(value: bool) -> Self {
        DynamicValue::Bool(value)
    }
}

impl From<f64> for DynamicValue {
    fn from(value: f64) -> Self {
        DynamicValue::Double(value)
    }
}

impl From<f32> for DynamicValue {
    fn from(value: f32) -> Self {
        DynamicValue::Double(value as f64)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for DynamicValue {
                fn from(value: $t) -> Self {
                    DynamicValue::Int(value as i64)
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, isize, u8, u16, u32);

// 超过 i64::MAX 的无符号值退化为 Double
impl From<u64> for DynamicValue {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => DynamicValue::Int(i),
            Err(_) => DynamicValue::Double(value as f64),
        }
    }
}

impl From<usize> for DynamicValue {
    fn from(value: usize) -> Self {
        DynamicValue::from(value as u64)
    }
}
